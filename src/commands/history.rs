use crate::cli::HistoryCommand;
use crate::error::{Result, StoryloomError};
use crate::providers::word_count;
use crate::render::{
    history_label, numbered_history, record_by_ordinal, render_record, EMPTY_HISTORY_MESSAGE,
};
use crate::storage::ChatArchive;
use colored::Colorize;
use prettytable::{format, Table};
use std::io::Write;

const PROMPT_PREVIEW_CHARS: usize = 40;

/// Handle history commands
pub fn handle_history(command: HistoryCommand, archive: &ChatArchive) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        HistoryCommand::List { json } => list_history(archive, json, &mut out),
        HistoryCommand::Show { number } => show_history(archive, number, &mut out),
    }
}

fn preview(prompt: &str) -> String {
    let single_line = prompt.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() > PROMPT_PREVIEW_CHARS {
        let cut: String = single_line.chars().take(PROMPT_PREVIEW_CHARS - 3).collect();
        format!("{}...", cut)
    } else {
        single_line
    }
}

/// Print the archive as a table, most recent first, or as raw JSON
pub fn list_history<W: Write>(archive: &ChatArchive, json: bool, out: &mut W) -> Result<()> {
    let records = archive.load_all()?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&records)?)?;
        return Ok(());
    }

    if records.is_empty() {
        writeln!(out, "{}", EMPTY_HISTORY_MESSAGE.yellow())?;
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "Story".bold(),
        "Prompt".bold(),
        "Words".bold()
    ]);

    for (ordinal, record) in numbered_history(&records) {
        table.add_row(prettytable::row![
            history_label(ordinal, &record.timestamp),
            preview(&record.prompt),
            word_count(&record.story)
        ]);
    }

    writeln!(out, "\nPast Stories:")?;
    table.print(&mut *out)?;
    writeln!(out)?;
    writeln!(
        out,
        "Use {} to read a story in full.",
        "storyloom history show <N>".cyan()
    )?;
    writeln!(out)?;
    Ok(())
}

/// Print one archived story in full
///
/// # Errors
///
/// Returns `StoryloomError::StoryNotFound` if `number` is not a listed ordinal
pub fn show_history<W: Write>(archive: &ChatArchive, number: usize, out: &mut W) -> Result<()> {
    let records = archive.load_all()?;
    let record = record_by_ordinal(&records, number).ok_or(StoryloomError::StoryNotFound {
        number,
        total: records.len(),
    })?;

    writeln!(out, "{}", render_record(number, record))?;
    Ok(())
}

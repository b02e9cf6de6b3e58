//! Terminal rendering for stories and the archive
//!
//! Everything here builds plain `String`s so the shell, the one-shot command,
//! and tests all share the same text. Printing is left to the caller.

use crate::storage::StoryRecord;
use colored::Colorize;
use std::fmt;

/// Title shown when the shell starts
pub const APP_TITLE: &str = "Smart Story Generator";
/// Heading above the archive listing
pub const HISTORY_TITLE: &str = "Past Stories";
/// Shown while an extension run is in flight
pub const GENERATING_MESSAGE: &str = "Generating story... Please wait!";
/// Shown above a freshly generated story
pub const GENERATED_MESSAGE: &str = "Here's your generated story:";
/// Shown when generate is requested without a prompt
pub const EMPTY_PROMPT_MESSAGE: &str = "Please enter a story idea to generate a story.";
/// Shown instead of the listing when the archive is empty
pub const EMPTY_HISTORY_MESSAGE: &str = "No past stories found. Generate one to get started!";

/// Banner severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Progress and placeholders
    Info,
    /// Recoverable user mistakes
    Warning,
    /// Completed actions
    Success,
    /// Failed actions
    Error,
}

impl Notice {
    /// Colored tag shown in front of the message, e.g. `[INFO]`
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Info => format!("[{}]", "INFO".cyan()),
            Self::Warning => format!("[{}]", "WARN".yellow()),
            Self::Success => format!("[{}]", "OK".green()),
            Self::Error => format!("[{}]", "ERROR".red()),
        }
    }

    /// Render `message` as a one-line banner
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom::render::Notice;
    ///
    /// let line = Notice::Warning.banner("Please enter a story idea to generate a story.");
    /// assert!(line.ends_with("Please enter a story idea to generate a story."));
    /// ```
    pub fn banner(&self, message: &str) -> String {
        match self {
            Self::Error => format!("{} {}", self.colored_tag(), message.red()),
            _ => format!("{} {}", self.colored_tag(), message),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Header label for one archive entry
pub fn history_label(ordinal: usize, date: &str) -> String {
    format!("Story {} — {}", ordinal, date)
}

/// Archive entries paired with their ordinals, most recent first
///
/// The newest record gets ordinal `len` and the oldest gets `1`.
pub fn numbered_history(records: &[StoryRecord]) -> Vec<(usize, &StoryRecord)> {
    let total = records.len();
    records
        .iter()
        .rev()
        .enumerate()
        .map(|(i, record)| (total - i, record))
        .collect()
}

/// Look up a record by the ordinal shown in the listing
pub fn record_by_ordinal(records: &[StoryRecord], ordinal: usize) -> Option<&StoryRecord> {
    if ordinal == 0 {
        return None;
    }
    records.get(ordinal - 1)
}

/// One expanded archive entry
pub fn render_record(ordinal: usize, record: &StoryRecord) -> String {
    format!(
        "{}\n{} {}\n{} {}\n",
        history_label(ordinal, &record.timestamp).bold(),
        "Prompt:".bold(),
        record.prompt,
        "Story:".bold(),
        record.story
    )
}

/// The "Past Stories" section
///
/// Entries are collapsed to their header label unless their ordinal matches
/// `expanded`. An empty archive renders the placeholder notice.
pub fn render_history(records: &[StoryRecord], expanded: Option<usize>) -> String {
    let mut out = format!("\n{}\n", HISTORY_TITLE.bold().underline());

    if records.is_empty() {
        out.push_str(&Notice::Info.banner(EMPTY_HISTORY_MESSAGE));
        out.push('\n');
        return out;
    }

    for (ordinal, record) in numbered_history(records) {
        if expanded == Some(ordinal) {
            out.push_str(&render_record(ordinal, record));
        } else {
            out.push_str(&format!(
                "  {} {}\n",
                "▸".dimmed(),
                history_label(ordinal, &record.timestamp)
            ));
        }
    }
    out
}

/// A freshly generated story with its success banner
pub fn render_story(story: &str) -> String {
    format!("{}\n\n{}\n", Notice::Success.banner(GENERATED_MESSAGE), story)
}

/// Title banner for the interactive shell
pub fn title_banner() -> String {
    format!(
        "\n{}\n{}\n",
        APP_TITLE.bold(),
        "=".repeat(APP_TITLE.chars().count())
    )
}

/// Caption naming the model that writes the stories
pub fn footer(provider: &str, model: &str) -> String {
    format!("Stories written by {} via {}", model, provider)
        .dimmed()
        .to_string()
}

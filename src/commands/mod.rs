/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `shell`: Interactive story shell
- `generate`: Generate a single story from the command line
- `history`: Browse the story archive

The handlers are thin: they build a provider and a `StorySession` from the
configuration and print what the session produces.
*/

use crate::config::Config;
use crate::error::Result;
use crate::providers::Provider;
use crate::render::{render_story, Notice, EMPTY_PROMPT_MESSAGE, GENERATING_MESSAGE};
use crate::session::{GenerateOutcome, StorySession};
use crate::storage::{ChatArchive, StoryRecord};
use crate::story::StoryExtender;
use std::io::Write;
use std::sync::Arc;

// Archive browsing
pub mod history;

// Special commands parser for the story shell
pub mod special_commands;

/// Build a session around `provider` using the story and archive settings
///
/// `length` overrides the configured default target length.
///
/// # Errors
///
/// Returns `StoryloomError::LengthOutOfRange` if `length` is outside the
/// configured range
pub fn build_session(
    config: &Config,
    provider: Arc<dyn Provider>,
    length: Option<usize>,
) -> Result<StorySession> {
    let extender = StoryExtender::new(provider, config.story.clone());
    let archive = ChatArchive::new(&config.archive.path);
    let mut session = StorySession::new(extender, archive, config.story.clone());

    if let Some(words) = length {
        session.set_target_word_count(words)?;
    }
    Ok(session)
}

/// Run one generate action: show progress, generate, show the story, save it
///
/// A blank prompt prints a warning and returns `Ok(None)` without calling the
/// provider.
///
/// # Errors
///
/// Provider and archive failures propagate; nothing is saved when the
/// provider fails.
pub async fn generate_and_save<W: Write>(
    session: &mut StorySession,
    out: &mut W,
) -> Result<Option<StoryRecord>> {
    if session.prompt().trim().is_empty() {
        writeln!(out, "{}", Notice::Warning.banner(EMPTY_PROMPT_MESSAGE))?;
        return Ok(None);
    }

    writeln!(out, "{}", Notice::Info.banner(GENERATING_MESSAGE))?;
    out.flush()?;

    match session.generate().await? {
        GenerateOutcome::EmptyPrompt => {
            writeln!(out, "{}", Notice::Warning.banner(EMPTY_PROMPT_MESSAGE))?;
            Ok(None)
        }
        GenerateOutcome::Generated(extension) => {
            tracing::debug!(
                "Extension stopped ({}) after {} chunk(s)",
                extension.stop_reason,
                extension.chunks
            );
            writeln!(out, "{}", render_story(&extension.story))?;
            let record = session.persist()?;
            Ok(Some(record))
        }
    }
}

// Interactive shell handler
pub mod shell {
    //! Interactive story shell.
    //!
    //! Instantiates the provider, builds a `StorySession`, and runs a
    //! readline-based loop. Plain lines grow the story idea; special
    //! commands generate, adjust the length, and browse the archive.

    use super::special_commands::{help_text, parse_special_command, SpecialCommand};
    use super::*;
    use crate::providers::create_provider;
    use crate::render::{footer, record_by_ordinal, render_history, title_banner};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// What the loop should do after a command
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ShellFlow {
        /// Keep reading input
        Continue,
        /// Leave the shell
        Exit,
    }

    /// Start the interactive story shell
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `length` - Optional initial target length
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom::commands::shell;
    /// use storyloom::config::Config;
    ///
    /// // In application code:
    /// // shell::run_shell(Config::default(), None).await?;
    /// ```
    pub async fn run_shell(config: Config, length: Option<usize>) -> Result<()> {
        tracing::info!("Starting interactive story shell");

        let provider = create_provider(&config.provider.provider_type, &config.provider)?;
        let model = provider
            .get_current_model()
            .unwrap_or_else(|_| "unknown model".to_string());
        let caption = footer(provider.name(), &model);
        let mut session = build_session(&config, provider, length)?;

        let mut rl = DefaultEditor::new()?;
        let stdout = std::io::stdout();

        print_welcome_banner(&session, &caption);
        print_history(&session, None, &mut stdout.lock())?;

        loop {
            let prompt = format!("[{} words] > ", session.target_word_count())
                .cyan()
                .to_string();
            match rl.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.trim())?;
                    }

                    // Story text keeps its blank lines and indentation
                    let flow = match parse_special_command(&line) {
                        Ok(command) => {
                            handle_command(&mut session, command, &line, &mut stdout.lock())
                                .await?
                        }
                        Err(e) => {
                            println!("{}\n", Notice::Warning.banner(&e.to_string()));
                            ShellFlow::Continue
                        }
                    };

                    if flow == ShellFlow::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Apply one parsed shell command to the session
    ///
    /// `line` is the raw input, used as story text when `command` is
    /// `SpecialCommand::None`. Generation failures are reported on `out` and
    /// leave the session ready for another attempt; only output errors
    /// propagate.
    pub async fn handle_command<W: Write>(
        session: &mut StorySession,
        command: SpecialCommand,
        line: &str,
        out: &mut W,
    ) -> Result<ShellFlow> {
        match command {
            SpecialCommand::None => {
                session.push_prompt_line(line);
            }
            SpecialCommand::Generate => {
                if let Err(e) = generate_and_save(session, out).await {
                    tracing::error!("Story generation failed: {:#}", e);
                    writeln!(
                        out,
                        "{}",
                        Notice::Error.banner(&format!("Story generation failed: {:#}", e))
                    )?;
                }
                print_history(session, None, out)?;
            }
            SpecialCommand::SetLength(words) => match session.set_target_word_count(words) {
                Ok(()) => writeln!(
                    out,
                    "{}\n",
                    Notice::Info.banner(&format!("Target length set to {} words", words))
                )?,
                Err(e) => writeln!(out, "{}\n", Notice::Warning.banner(&e.to_string()))?,
            },
            SpecialCommand::ShowPrompt => {
                let prompt = if session.prompt().is_empty() {
                    "(empty)".dimmed().to_string()
                } else {
                    session.prompt().to_string()
                };
                writeln!(out, "{} {}", "Story idea:".bold(), prompt)?;
                writeln!(
                    out,
                    "{} {} words\n",
                    "Target length:".bold(),
                    session.target_word_count()
                )?;
            }
            SpecialCommand::ClearPrompt => {
                session.clear_prompt();
                writeln!(out, "{}\n", Notice::Info.banner("Story idea cleared"))?;
            }
            SpecialCommand::History => {
                print_history(session, None, out)?;
            }
            SpecialCommand::Show(number) => {
                let records = match session.history() {
                    Ok(records) => records,
                    Err(e) => {
                        writeln!(out, "{}\n", Notice::Error.banner(&format!("{:#}", e)))?;
                        return Ok(ShellFlow::Continue);
                    }
                };
                if record_by_ordinal(&records, number).is_none() {
                    writeln!(
                        out,
                        "{}\n",
                        Notice::Warning.banner(&format!(
                            "No story number {}; the archive holds {} stories",
                            number,
                            records.len()
                        ))
                    )?;
                } else {
                    writeln!(out, "{}", render_history(&records, Some(number)))?;
                }
            }
            SpecialCommand::Help => {
                writeln!(
                    out,
                    "{}",
                    help_text(session.config().min_words, session.config().max_words)
                )?;
            }
            SpecialCommand::Exit => return Ok(ShellFlow::Exit),
        }

        Ok(ShellFlow::Continue)
    }

    /// Render the archive listing; a broken archive is reported, not fatal
    fn print_history<W: Write>(
        session: &StorySession,
        expanded: Option<usize>,
        out: &mut W,
    ) -> Result<()> {
        match session.history() {
            Ok(records) => writeln!(out, "{}", render_history(&records, expanded))?,
            Err(e) => {
                tracing::error!("Failed to load archive: {:#}", e);
                writeln!(
                    out,
                    "{}",
                    Notice::Error.banner(&format!("Could not load past stories: {:#}", e))
                )?;
            }
        }
        Ok(())
    }

    fn print_welcome_banner(session: &StorySession, caption: &str) {
        println!("{}", title_banner());
        println!(
            "Target length: {} words ({}-{})",
            session.target_word_count(),
            session.config().min_words,
            session.config().max_words
        );
        println!("Archive: {}", session.archive().path().display());
        println!("{}\n", caption);
        println!(
            "Type your story idea, then '/generate'. Type '/help' for commands, 'exit' to quit\n"
        );
    }

}

// One-shot generation handler
pub mod generate {
    //! Non-interactive story generation.

    use super::*;
    use crate::providers::create_provider;

    /// Generate one story from `prompt`, print it, and save it
    ///
    /// A blank prompt prints a warning and exits successfully without
    /// contacting the provider.
    pub async fn run_generate(config: Config, prompt: String, length: Option<usize>) -> Result<()> {
        tracing::info!("Starting one-shot story generation");

        let provider = create_provider(&config.provider.provider_type, &config.provider)?;
        let mut session = build_session(&config, provider, length)?;
        session.set_prompt(prompt);

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if let Some(record) = generate_and_save(&mut session, &mut out).await? {
            let total = session.history()?.len();
            writeln!(
                out,
                "{}",
                Notice::Success.banner(&format!(
                    "Saved as story {} ({}) in {}",
                    total,
                    record.timestamp,
                    session.archive().path().display()
                ))
            )?;
        }
        Ok(())
    }
}

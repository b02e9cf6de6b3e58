//! Special commands parser for the interactive story shell
//!
//! Lines starting with `/` control the session: generate a story, pick a
//! target length, inspect or clear the prompt, browse the archive, or leave.
//! Every other line is story text and is appended to the prompt buffer.
//!
//! Commands are case-insensitive. `exit` and `quit` also work without the
//! leading slash.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed in the story shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Generate a story from the prompt buffer and save it
    Generate,

    /// Set the target story length in words
    SetLength(usize),

    /// Show the prompt buffer and the current target length
    ShowPrompt,

    /// Empty the prompt buffer
    ClearPrompt,

    /// Re-render the archive listing
    History,

    /// Expand one archive entry by its ordinal
    Show(usize),

    /// Display help information
    Help,

    /// Exit the shell
    Exit,

    /// Not a special command
    ///
    /// The line is story text for the prompt buffer.
    None,
}

fn parse_number(command: &str, usage: &str, arg: &str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        });
    }
    arg.parse::<usize>()
        .map_err(|_| CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        })
}

/// Parse a line of shell input into a special command
///
/// # Errors
///
/// - `CommandError::UnknownCommand` for an unrecognized `/` command
/// - `CommandError::MissingArgument` for `/length` or `/show` without a number
/// - `CommandError::UnsupportedArgument` for a non-numeric argument or an
///   argument to a command that takes none
///
/// # Examples
///
/// ```
/// use storyloom::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/generate").unwrap(), SpecialCommand::Generate);
/// assert_eq!(parse_special_command("/length 500").unwrap(), SpecialCommand::SetLength(500));
/// assert_eq!(parse_special_command("A dragon wakes up.").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut parts = lower.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    let no_arg = |cmd: SpecialCommand| {
        if arg.is_empty() {
            Ok(cmd)
        } else {
            Err(CommandError::UnsupportedArgument {
                command: command.to_string(),
                arg: arg.to_string(),
            })
        }
    };

    match command {
        "/generate" | "/gen" | "/g" => no_arg(SpecialCommand::Generate),
        "/length" | "/len" => parse_number("/length", "/length <words>", arg)
            .map(SpecialCommand::SetLength),
        "/prompt" => no_arg(SpecialCommand::ShowPrompt),
        "/clear" => no_arg(SpecialCommand::ClearPrompt),
        "/history" => no_arg(SpecialCommand::History),
        "/show" => parse_number("/show", "/show <story number>", arg).map(SpecialCommand::Show),
        "/help" | "/?" => no_arg(SpecialCommand::Help),
        "exit" | "quit" | "/exit" | "/quit" => no_arg(SpecialCommand::Exit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Help text for the story shell
pub fn help_text(min_words: usize, max_words: usize) -> String {
    format!(
        r#"
Story Shell Commands
====================

WRITING:
  <text>          - Add a line to the story idea
  /prompt         - Show the story idea and target length
  /clear          - Start a new story idea
  /length <n>     - Set the target length ({min}-{max} words)

GENERATING:
  /generate       - Grow the story idea into a story and save it
  /gen, /g        - Same as /generate

ARCHIVE:
  /history        - List past stories, most recent first
  /show <n>       - Show past story number n in full

SESSION CONTROL:
  /help           - Show this help message
  /?              - Same as /help
  exit            - Exit the shell
  quit            - Same as exit

NOTES:
  - Commands are case-insensitive
  - Generated stories are saved to the archive automatically
"#,
        min = min_words,
        max = max_words
    )
}

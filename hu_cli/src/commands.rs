use heads_up::Answer;
use std::fmt;

/// What the player typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Resolve the card in play.
    Answer(Answer),
    /// Show the first card.
    Start,
    /// Print the current view with live timers.
    View,
    /// End the game early.
    End,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing was typed.
    Empty,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Type a command, or 'help' to see available commands"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a line typed at the prompt into a HostCommand.
///
/// # Examples
///
/// ```
/// use heads_up::Answer;
/// use hu_cli::commands::{HostCommand, parse_command};
///
/// assert_eq!(parse_command("c"), Ok(HostCommand::Answer(Answer::Correct)));
/// assert_eq!(parse_command(" skip "), Ok(HostCommand::Answer(Answer::Skip)));
/// assert_eq!(parse_command("start"), Ok(HostCommand::Start));
/// ```
pub fn parse_command(input: &str) -> Result<HostCommand, ParseError> {
    let trimmed = input.trim();

    match trimmed.to_ascii_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "c" | "correct" => Ok(HostCommand::Answer(Answer::Correct)),
        "s" | "skip" => Ok(HostCommand::Answer(Answer::Skip)),
        "start" => Ok(HostCommand::Start),
        "v" | "view" => Ok(HostCommand::View),
        "end" => Ok(HostCommand::End),
        "h" | "help" => Ok(HostCommand::Help),
        "q" | "quit" | "exit" => Ok(HostCommand::Quit),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

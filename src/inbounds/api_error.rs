use std::io;

use thiserror::Error;

use crate::domain::models::types::TypeError;

/// +----------------------------------------------------------+
/// | STRUCTS | TRAITS | ENUMS | FUNCTIONS                     |
/// +----------+-------+-------+------------------------------+
/// | Enums:                                                   |
/// |   - CommandError                                         |
/// |   - ScriptError                                          |
/// +----------------------------------------------------------+

/// Represents errors raised while turning one input line into a command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The first word is not a known command.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A required argument is absent.
    #[error("Missing argument <{argument}> for {command}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    /// An argument could not be parsed.
    #[error("Invalid value for <{argument}>: {value}")]
    InvalidArgument { argument: &'static str, value: String },

    /// More arguments than the command takes.
    #[error("Unexpected extra argument for {command}: {value}")]
    UnexpectedArgument { command: &'static str, value: String },

    /// The side token is neither buy nor sell.
    #[error(transparent)]
    InvalidSide(#[from] TypeError),

    /// A JSON command did not deserialize.
    #[error("Invalid JSON command: {0}")]
    Json(String),
}

/// Represents errors that stop a command script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A line failed to parse.
    #[error("line {line}: {source}")]
    Command {
        line: usize,
        #[source]
        source: CommandError,
    },

    /// The script could not be read.
    #[error("Failed to read script: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_display() {
        let missing = CommandError::MissingArgument { command: "send", argument: "price" };
        assert_eq!(missing.to_string(), "Missing argument <price> for send");

        let side = CommandError::from(TypeError::InvalidSide("up".to_string()));
        assert_eq!(side.to_string(), "Invalid side specified: up");
    }

    #[test]
    fn test_script_error_display() {
        let err = ScriptError::Command {
            line: 3,
            source: CommandError::UnknownCommand("buy".to_string()),
        };
        assert_eq!(err.to_string(), "line 3: Unknown command: buy");
    }
}

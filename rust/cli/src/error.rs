//! Error type shared by the command handlers.
//!
//! Every variant maps to an exit code through [`CliError::exit_code`].

use crate::config::ConfigError;
use crate::exit_code;
use jetons_engine::GameError;
use jetons_engine::cards::CardParseError;
use jetons_engine::roulette::RouletteError;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    /// I/O error (hand log files, stdout/stderr writes)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    Config(String),

    /// The table engine refused an operation
    Engine(String),

    /// The run stopped early; carries what was completed
    Interrupted(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Interrupted(_) => exit_code::INTERRUPTED,
            _ => exit_code::ERROR,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<CardParseError> for CliError {
    fn from(error: CardParseError) -> Self {
        CliError::InvalidInput(error.to_string())
    }
}

impl From<RouletteError> for CliError {
    fn from(error: RouletteError) -> Self {
        match error {
            RouletteError::InvalidStake | RouletteError::InsufficientBalance { .. } => {
                CliError::InvalidInput(error.to_string())
            }
            other => CliError::Engine(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_maps_to_130() {
        assert_eq!(CliError::Interrupted("3 of 10".into()).exit_code(), 130);
        assert_eq!(CliError::InvalidInput("x".into()).exit_code(), 2);
    }

    #[test]
    fn stake_errors_are_user_input() {
        let err: CliError = RouletteError::InvalidStake.into();
        assert!(matches!(err, CliError::InvalidInput(_)));
        let err: CliError = GameError::EmptyDeck.into();
        assert!(matches!(err, CliError::Engine(_)));
    }
}

use thiserror::Error;

use crate::balance::BalanceError;
use crate::player::{Chips, PlayerId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("A hand is already in progress")]
    HandInProgress,
    #[error("Player {0} is not seated at this table")]
    NotInGame(PlayerId),
    #[error("Player {0} has already folded")]
    AlreadyFolded(PlayerId),
    #[error("It's not player {actual}'s turn")]
    NotYourTurn {
        expected: Option<PlayerId>,
        actual: PlayerId,
    },
    #[error("Invalid bet amount: {0}, a bet must be at least 1 chip")]
    InvalidAmount(Chips),
    #[error("Insufficient chips: {needed} needed, {available} available")]
    InsufficientChips { needed: Chips, available: Chips },
    #[error("The deck is empty")]
    EmptyDeck,
    #[error("The game cannot start: {0}")]
    CannotStart(&'static str),
    #[error(transparent)]
    Balance(#[from] BalanceError),
    #[error("Internal error: {0}")]
    Internal(&'static str),
}

/// A [`TableRules`](crate::game::TableRules) value that no table can run with.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("min_players must be at least 1")]
    NoSeatsRequired,
    #[error("max_players cannot exceed {max}")]
    TooManySeats { max: usize },
    #[error("min_players cannot exceed max_players")]
    MinAboveMax,
    #[error("ai_stack must be positive")]
    EmptyAiStack,
}

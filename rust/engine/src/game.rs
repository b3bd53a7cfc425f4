use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::RulesError;
use crate::hand::Category;
use crate::player::{Chips, PlayerId};

/// Lifecycle of a table.
///
/// `Off -> Init` on [`initialize`](crate::engine::GameController::initialize),
/// `Init -> Running` on start, `Running -> Ended` at showdown or when a
/// single player remains, `Ended -> Init` on reset. Aborting a hand goes
/// straight back to `Off`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Off,
    Init,
    Running,
    Ended,
}

/// Stakes and seating limits of a table.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRules {
    /// Minimum target of the first betting round of every hand.
    pub floor_bet: Chips,
    /// Table stack given to AI seats at every hand start.
    pub ai_stack: Chips,
    pub min_players: usize,
    pub max_players: usize,
}

pub const MAX_SEATS: usize = 9;

impl Default for TableRules {
    fn default() -> Self {
        Self {
            floor_bet: 20,
            ai_stack: 500,
            min_players: 2,
            max_players: MAX_SEATS,
        }
    }
}

impl TableRules {
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.min_players < 1 {
            return Err(RulesError::NoSeatsRequired);
        }
        if self.max_players > MAX_SEATS {
            return Err(RulesError::TooManySeats { max: MAX_SEATS });
        }
        if self.min_players > self.max_players {
            return Err(RulesError::MinAboveMax);
        }
        if self.ai_stack == 0 {
            return Err(RulesError::EmptyAiStack);
        }
        Ok(())
    }
}

/// Identifies one specific turn. The sequence number increases every time
/// the turn moves, so a ticket taken for an earlier turn of the same player
/// never matches a later one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TurnTicket {
    pub player_id: PlayerId,
    pub seq: u64,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownHand {
    pub player_id: PlayerId,
    pub cards: Vec<Card>,
    pub category: Category,
}

/// Result of a finished hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandOutcome {
    pub hand_number: u64,
    pub winners: Vec<PlayerId>,
    /// Winning category; `None` when everyone else folded.
    pub category: Option<Category>,
    pub pot: Chips,
    /// Balance credited to each winner (`pot / winners`).
    pub share: f64,
    /// Hands revealed at showdown, empty when the hand ended on folds.
    pub showdown: Vec<ShowdownHand>,
}

impl HandOutcome {
    pub fn won_by_fold(&self) -> bool {
        self.category.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_are_valid() {
        assert_eq!(TableRules::default().validate(), Ok(()));
    }

    #[test]
    fn each_bad_limit_has_its_own_error() {
        let base = TableRules::default();
        let cases = [
            (TableRules { min_players: 0, ..base.clone() }, RulesError::NoSeatsRequired),
            (TableRules { max_players: 10, ..base.clone() }, RulesError::TooManySeats { max: 9 }),
            (
                TableRules { min_players: 4, max_players: 3, ..base.clone() },
                RulesError::MinAboveMax,
            ),
            (TableRules { ai_stack: 0, ..base.clone() }, RulesError::EmptyAiStack),
        ];
        for (rules, expected) in cases {
            assert_eq!(rules.validate(), Err(expected));
        }
    }
}

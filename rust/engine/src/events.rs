use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::HandOutcome;
use crate::logger::Street;
use crate::player::{Chips, PlayerAction, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatInfo {
    pub player_id: PlayerId,
    pub name: String,
    pub stack: Chips,
    pub is_ai: bool,
}

/// Everything the presentation layer needs to narrate a hand. Queued by the
/// controller and drained with
/// [`take_events`](crate::engine::GameController::take_events).
///
/// `CardsDealt` is private to its player; everything else is public.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableEvent {
    HandStarted {
        hand_number: u64,
        seats: Vec<SeatInfo>,
    },
    CardsDealt {
        player_id: PlayerId,
        cards: Vec<Card>,
    },
    TurnChanged {
        player_id: PlayerId,
        seq: u64,
        to_call: Chips,
    },
    PlayerActed {
        player_id: PlayerId,
        action: PlayerAction,
        paid: Chips,
    },
    PlayerLeft {
        player_id: PlayerId,
    },
    RoundClosed {
        street: Street,
        pot: Chips,
    },
    StreetRevealed {
        street: Street,
        cards: Vec<Card>,
    },
    HandEnded {
        outcome: HandOutcome,
    },
    HandAborted {
        reason: String,
    },
}

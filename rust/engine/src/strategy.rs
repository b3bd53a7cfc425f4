use crate::cards::Card;
use crate::logger::Street;
use crate::player::{Chips, PlayerAction, PlayerId};

/// What an AI seat is allowed to see when it is asked to act: its own hole
/// cards and the public table state, nothing about other players' cards.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    pub player_id: PlayerId,
    pub hole: &'a [Card],
    pub board: &'a [Card],
    pub street: Street,
    /// Contribution every player must reach this round.
    pub target: Chips,
    pub contribution: Chips,
    pub to_call: Chips,
    pub stack: Chips,
    /// Chips collected from previous rounds.
    pub pot: Chips,
    /// Non-folded players, the acting seat included.
    pub active_players: usize,
}

/// Decision-making for computer-controlled seats.
///
/// The controller calls [`decide`](AiPolicy::decide) synchronously whenever
/// an AI seat holds the turn and applies the answer through the same rules
/// as a human action. A `Bet` the seat cannot afford is downgraded to a
/// check, and a check that fails is downgraded to a fold.
pub trait AiPolicy: Send + Sync {
    fn decide(&self, view: &TableView<'_>) -> PlayerAction;

    fn name(&self) -> &str;
}

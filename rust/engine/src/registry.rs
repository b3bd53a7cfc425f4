use std::collections::HashSet;

use crate::cards::Card;
use crate::errors::GameError;
use crate::player::{Chips, Player, PlayerId};

/// One seat: the participant, their table stack for the current hand and
/// their hole cards.
#[derive(Debug, Clone)]
pub struct Seat {
    pub player: Player,
    pub stack: Chips,
    pub hole: Vec<Card>,
    /// Left during a hand; removed from the roster at the next reset.
    pub leaving: bool,
}

impl Seat {
    fn new(player: Player) -> Self {
        Self {
            player,
            stack: 0,
            hole: Vec::with_capacity(2),
            leaving: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.player.id()
    }
}

/// Ordered roster of the table. Seat order is join order and is the turn
/// order for every betting round.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    seats: Vec<Seat>,
    folded: HashSet<PlayerId>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seats `player` at the end of the roster. Returns `false` if the id is
    /// already seated.
    pub fn add_player(&mut self, player: Player) -> bool {
        if self.contains(player.id()) {
            return false;
        }
        self.seats.push(Seat::new(player));
        true
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Option<Seat> {
        let pos = self.position(id)?;
        self.folded.remove(&id);
        Some(self.seats.remove(pos))
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: PlayerId) -> Option<usize> {
        self.seats.iter().position(|s| s.id() == id)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, id: PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id() == id)
    }

    pub fn seat_mut(&mut self, id: PlayerId) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.id() == id)
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.seats.iter().map(Seat::id).collect()
    }

    pub fn ai_count(&self) -> usize {
        self.seats.iter().filter(|s| s.player.is_ai()).count()
    }

    pub fn is_folded(&self, id: PlayerId) -> bool {
        self.folded.contains(&id)
    }

    /// Marks `id` folded; returns `false` if they already were.
    pub fn fold(&mut self, id: PlayerId) -> bool {
        self.folded.insert(id)
    }

    pub fn clear_folds(&mut self) {
        self.folded.clear();
    }

    /// Seated, non-folded players in seat order.
    pub fn active_ids(&self) -> Vec<PlayerId> {
        self.seats
            .iter()
            .map(Seat::id)
            .filter(|id| !self.folded.contains(id))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| !self.folded.contains(&s.id()))
            .count()
    }

    pub fn stack(&self, id: PlayerId) -> Option<Chips> {
        self.seat(id).map(|s| s.stack)
    }

    pub fn debit(&mut self, id: PlayerId, amount: Chips) -> Result<(), GameError> {
        let seat = self.seat_mut(id).ok_or(GameError::NotInGame(id))?;
        if seat.stack < amount {
            return Err(GameError::InsufficientChips {
                needed: amount,
                available: seat.stack,
            });
        }
        seat.stack -= amount;
        Ok(())
    }

    pub fn credit(&mut self, id: PlayerId, amount: Chips) -> Result<(), GameError> {
        let seat = self.seat_mut(id).ok_or(GameError::NotInGame(id))?;
        seat.stack = seat.stack.saturating_add(amount);
        Ok(())
    }

    pub fn clear_hands(&mut self) {
        for seat in &mut self.seats {
            seat.hole.clear();
        }
    }

    /// Drops every seat flagged as leaving. Returns the removed ids.
    pub fn remove_leavers(&mut self) -> Vec<PlayerId> {
        let gone: Vec<PlayerId> = self
            .seats
            .iter()
            .filter(|s| s.leaving)
            .map(Seat::id)
            .collect();
        self.seats.retain(|s| !s.leaving);
        for id in &gone {
            self.folded.remove(id);
        }
        gone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(ids: &[u64]) -> PlayerRegistry {
        let mut r = PlayerRegistry::new();
        for &id in ids {
            r.add_player(Player::human(PlayerId(id), format!("p{}", id)));
        }
        r
    }

    #[test]
    fn add_is_idempotent_by_id() {
        let mut r = registry(&[1, 2]);
        assert!(!r.add_player(Player::human(PlayerId(1), "again")));
        assert_eq!(r.len(), 2);
        assert_eq!(r.seat(PlayerId(1)).unwrap().player.name(), "p1");
    }

    #[test]
    fn active_ids_skip_folded_and_keep_order() {
        let mut r = registry(&[3, 1, 2]);
        r.fold(PlayerId(1));
        assert_eq!(r.active_ids(), vec![PlayerId(3), PlayerId(2)]);
        assert_eq!(r.active_count(), 2);
    }

    #[test]
    fn debit_rejects_overdraw() {
        let mut r = registry(&[1]);
        r.credit(PlayerId(1), 50).unwrap();
        assert_eq!(
            r.debit(PlayerId(1), 60),
            Err(GameError::InsufficientChips {
                needed: 60,
                available: 50
            })
        );
        r.debit(PlayerId(1), 50).unwrap();
        assert_eq!(r.stack(PlayerId(1)), Some(0));
    }

    #[test]
    fn remove_leavers_only_drops_flagged_seats() {
        let mut r = registry(&[1, 2, 3]);
        r.seat_mut(PlayerId(2)).unwrap().leaving = true;
        r.fold(PlayerId(2));
        assert_eq!(r.remove_leavers(), vec![PlayerId(2)]);
        assert_eq!(r.ids(), vec![PlayerId(1), PlayerId(3)]);
        assert!(!r.is_folded(PlayerId(2)));
    }
}

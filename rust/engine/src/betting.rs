use std::collections::HashMap;

use crate::errors::GameError;
use crate::player::{Chips, PlayerId};
use crate::registry::PlayerRegistry;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Turn {
    /// Opened, first actor not chosen yet.
    Pending,
    Player(PlayerId),
    Closed,
}

/// State of one betting round (one street).
///
/// Every seated player has a contribution for the round. The amount each
/// player must reach is the *target*: the highest contribution, but never
/// less than the round's floor ([`BettingRound::min_bet_tour`]), which is
/// only non-zero for the opening round of a hand.
///
/// The round remembers the last player who set or matched the target (the
/// closing reference). Turn order walks the roster circularly and the round
/// closes as soon as the walk comes back to that player, even if they have
/// folded since.
///
/// # Examples
///
/// ```
/// use jetons_engine::betting::BettingRound;
/// use jetons_engine::player::{Player, PlayerId};
/// use jetons_engine::registry::PlayerRegistry;
///
/// let mut registry = PlayerRegistry::new();
/// for id in [1, 2] {
///     registry.add_player(Player::human(PlayerId(id), format!("p{id}")));
///     registry.credit(PlayerId(id), 100).unwrap();
/// }
///
/// let mut round = BettingRound::new();
/// round.open(&registry, 20);
/// round.advance_turn(&registry);
/// assert_eq!(round.current_player(), Some(PlayerId(1)));
///
/// // matching the floor costs 20 chips
/// assert_eq!(round.check(&mut registry, PlayerId(1)).unwrap(), 20);
/// round.advance_turn(&registry);
/// round.check(&mut registry, PlayerId(2)).unwrap();
/// round.advance_turn(&registry);
/// assert!(round.is_closed());
/// assert_eq!(round.total(), 40);
/// ```
#[derive(Debug, Clone)]
pub struct BettingRound {
    contributions: HashMap<PlayerId, Chips>,
    turn: Turn,
    first_max_bet_player: Option<PlayerId>,
    min_bet_tour: Chips,
}

impl BettingRound {
    /// A closed round with no contributions.
    pub fn new() -> Self {
        Self {
            contributions: HashMap::new(),
            turn: Turn::Closed,
            first_max_bet_player: None,
            min_bet_tour: 0,
        }
    }

    /// Resets every contribution to zero and waits for
    /// [`advance_turn`](Self::advance_turn) to pick the first actor.
    pub fn open(&mut self, registry: &PlayerRegistry, floor: Chips) {
        self.contributions = registry.ids().into_iter().map(|id| (id, 0)).collect();
        self.turn = Turn::Pending;
        self.first_max_bet_player = None;
        self.min_bet_tour = floor;
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        match self.turn {
            Turn::Player(id) => Some(id),
            Turn::Pending | Turn::Closed => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.turn == Turn::Closed
    }

    pub fn first_max_bet_player(&self) -> Option<PlayerId> {
        self.first_max_bet_player
    }

    pub fn min_bet_tour(&self) -> Chips {
        self.min_bet_tour
    }

    pub fn contribution(&self, id: PlayerId) -> Chips {
        self.contributions.get(&id).copied().unwrap_or(0)
    }

    pub fn max_contribution(&self) -> Chips {
        self.contributions.values().copied().max().unwrap_or(0)
    }

    pub fn target(&self) -> Chips {
        self.min_bet_tour.max(self.max_contribution())
    }

    pub fn to_call(&self, id: PlayerId) -> Chips {
        self.target().saturating_sub(self.contribution(id))
    }

    /// Sum of all contributions not yet swept into the pot.
    pub fn total(&self) -> Chips {
        self.contributions.values().sum()
    }

    fn guard(&self, registry: &PlayerRegistry, player: PlayerId) -> Result<(), GameError> {
        if !registry.contains(player) {
            return Err(GameError::NotInGame(player));
        }
        if registry.is_folded(player) {
            return Err(GameError::AlreadyFolded(player));
        }
        if self.current_player() != Some(player) {
            return Err(GameError::NotYourTurn {
                expected: self.current_player(),
                actual: player,
            });
        }
        Ok(())
    }

    /// Raises the target by `amount`: the player's contribution becomes
    /// `target + amount` and they become the closing reference.
    ///
    /// Returns the chips moved from the player's stack.
    pub fn bet(
        &mut self,
        registry: &mut PlayerRegistry,
        player: PlayerId,
        amount: Chips,
    ) -> Result<Chips, GameError> {
        self.guard(registry, player)?;
        if amount == 0 {
            return Err(GameError::InvalidAmount(amount));
        }
        let own = self.contribution(player);
        let Some(new_contribution) = self.target().checked_add(amount) else {
            return Err(GameError::InsufficientChips {
                needed: Chips::MAX,
                available: registry.stack(player).unwrap_or(0),
            });
        };
        let delta = new_contribution - own;
        registry.debit(player, delta)?;
        self.contributions.insert(player, new_contribution);
        self.first_max_bet_player = Some(player);
        Ok(delta)
    }

    /// Pays whatever is missing to reach the target. A short stack goes
    /// all-in for what it has instead of failing.
    ///
    /// Returns the chips moved from the player's stack (0 for a plain check).
    pub fn check(&mut self, registry: &mut PlayerRegistry, player: PlayerId) -> Result<Chips, GameError> {
        self.guard(registry, player)?;
        let target = self.target();
        let stack = registry.stack(player).unwrap_or(0);
        let paid = self.to_call(player).min(stack);
        registry.debit(player, paid)?;
        *self.contributions.entry(player).or_insert(0) += paid;
        if target > 0 {
            self.first_max_bet_player = Some(player);
        }
        Ok(paid)
    }

    /// Folds on the player's turn. The contribution stays in the round.
    pub fn fold(&mut self, registry: &mut PlayerRegistry, player: PlayerId) -> Result<(), GameError> {
        self.guard(registry, player)?;
        registry.fold(player);
        Ok(())
    }

    /// Folds regardless of whose turn it is (timeouts, players leaving).
    pub fn force_fold(&mut self, registry: &mut PlayerRegistry, player: PlayerId) -> Result<(), GameError> {
        if !registry.contains(player) {
            return Err(GameError::NotInGame(player));
        }
        if !registry.fold(player) {
            return Err(GameError::AlreadyFolded(player));
        }
        Ok(())
    }

    /// Moves the turn to the next player who still has to act, or closes
    /// the round.
    ///
    /// A player may act when they are not folded and have chips left. From
    /// the current seat the walk visits every seat once; it closes on
    /// reaching the closing reference, and stops on a player below the
    /// target (or on anyone while the target is zero).
    pub fn advance_turn(&mut self, registry: &PlayerRegistry) {
        if registry.active_count() <= 1 {
            self.turn = Turn::Closed;
            return;
        }
        let seats = registry.seats();
        let start = match self.turn {
            Turn::Closed => return,
            Turn::Pending => {
                let first = seats
                    .iter()
                    .map(|s| s.id())
                    .find(|&id| can_act(registry, id));
                self.turn = match first {
                    Some(id) => {
                        self.first_max_bet_player = Some(id);
                        Turn::Player(id)
                    }
                    None => Turn::Closed,
                };
                return;
            }
            Turn::Player(id) => match registry.position(id) {
                Some(pos) => pos,
                None => {
                    self.turn = Turn::Closed;
                    return;
                }
            },
        };

        let target = self.target();
        let n = seats.len();
        for step in 1..=n {
            let id = seats[(start + step) % n].id();
            if Some(id) == self.first_max_bet_player {
                self.turn = Turn::Closed;
                return;
            }
            if !can_act(registry, id) {
                continue;
            }
            if target == 0 || self.contribution(id) < target {
                self.turn = Turn::Player(id);
                return;
            }
        }
        self.turn = Turn::Closed;
    }

    /// Non-zero contributions, left in place.
    pub fn pending(&self) -> Vec<(PlayerId, Chips)> {
        self.contributions
            .iter()
            .filter(|(_, &amount)| amount > 0)
            .map(|(&id, &amount)| (id, amount))
            .collect()
    }

    /// Zeroes one player's contribution and returns what it held.
    pub fn take(&mut self, id: PlayerId) -> Chips {
        self.contributions
            .get_mut(&id)
            .map(std::mem::take)
            .unwrap_or(0)
    }

    /// Empties every contribution (folded players included) and returns the
    /// non-zero amounts in no particular order.
    pub fn collect(&mut self) -> Vec<(PlayerId, Chips)> {
        let swept = self
            .contributions
            .iter()
            .filter(|(_, &amount)| amount > 0)
            .map(|(&id, &amount)| (id, amount))
            .collect();
        for amount in self.contributions.values_mut() {
            *amount = 0;
        }
        swept
    }

    pub fn close(&mut self) {
        self.turn = Turn::Closed;
    }
}

impl Default for BettingRound {
    fn default() -> Self {
        Self::new()
    }
}

fn can_act(registry: &PlayerRegistry, id: PlayerId) -> bool {
    !registry.is_folded(id) && registry.stack(id).unwrap_or(0) > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;

    fn table(stacks: &[(u64, Chips)]) -> PlayerRegistry {
        let mut r = PlayerRegistry::new();
        for &(id, stack) in stacks {
            r.add_player(Player::human(PlayerId(id), format!("p{}", id)));
            r.credit(PlayerId(id), stack).unwrap();
        }
        r
    }

    fn opened(r: &PlayerRegistry, floor: Chips) -> BettingRound {
        let mut round = BettingRound::new();
        round.open(r, floor);
        round.advance_turn(r);
        round
    }

    #[test]
    fn bet_is_relative_to_the_target() {
        let mut r = table(&[(1, 500), (2, 500)]);
        let mut round = opened(&r, 20);
        assert_eq!(round.bet(&mut r, PlayerId(1), 30).unwrap(), 50);
        assert_eq!(round.target(), 50);
        assert_eq!(round.first_max_bet_player(), Some(PlayerId(1)));
        round.advance_turn(&r);
        assert_eq!(round.to_call(PlayerId(2)), 50);
    }

    #[test]
    fn short_check_goes_all_in() {
        let mut r = table(&[(1, 500), (2, 30)]);
        let mut round = opened(&r, 0);
        round.bet(&mut r, PlayerId(1), 100).unwrap();
        round.advance_turn(&r);
        assert_eq!(round.check(&mut r, PlayerId(2)).unwrap(), 30);
        assert_eq!(r.stack(PlayerId(2)), Some(0));
        assert_eq!(round.contribution(PlayerId(2)), 30);
    }

    #[test]
    fn all_in_players_are_skipped() {
        let mut r = table(&[(1, 500), (2, 30), (3, 500)]);
        let mut round = opened(&r, 0);
        round.bet(&mut r, PlayerId(1), 100).unwrap();
        round.advance_turn(&r);
        round.check(&mut r, PlayerId(2)).unwrap();
        round.advance_turn(&r);
        assert_eq!(round.current_player(), Some(PlayerId(3)));
        round.check(&mut r, PlayerId(3)).unwrap();
        round.advance_turn(&r);
        // player 1 has matched, player 2 is all-in, player 3 closed it
        assert!(round.is_closed());
    }

    #[test]
    fn closing_reference_survives_a_fold() {
        let mut r = table(&[(1, 500), (2, 500), (3, 500)]);
        let mut round = opened(&r, 0);
        assert_eq!(round.first_max_bet_player(), Some(PlayerId(1)));
        round.fold(&mut r, PlayerId(1)).unwrap();
        round.advance_turn(&r);
        round.check(&mut r, PlayerId(2)).unwrap();
        round.advance_turn(&r);
        round.check(&mut r, PlayerId(3)).unwrap();
        round.advance_turn(&r);
        assert!(round.is_closed());
    }

    #[test]
    fn collect_sweeps_folded_contributions() {
        let mut r = table(&[(1, 500), (2, 500)]);
        let mut round = opened(&r, 20);
        round.check(&mut r, PlayerId(1)).unwrap();
        round.advance_turn(&r);
        round.fold(&mut r, PlayerId(2)).unwrap();
        let mut swept = round.collect();
        swept.sort();
        assert_eq!(swept, vec![(PlayerId(1), 20)]);
        assert_eq!(round.total(), 0);
    }
}

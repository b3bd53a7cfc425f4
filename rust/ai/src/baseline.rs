//! Baseline computer player.
//!
//! Rates its hand on a 0-10 scale from rank counts (pairs, trips) before the
//! flop and from the made category after it, then picks an action from
//! fixed thresholds. Raise sizes are drawn at random around half the pot.

use std::sync::Mutex;

use jetons_engine::cards::Card;
use jetons_engine::hand::{best_category, Category};
use jetons_engine::player::{Chips, PlayerAction};
use jetons_engine::strategy::{AiPolicy, TableView};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Smallest raise the baseline will make.
const MIN_RAISE: Chips = 10;

/// Rule-based opponent.
///
/// # Strategy
///
/// - Strong hands (7+): bet when nobody has, call otherwise; 9+ re-raises
/// - Medium hands (4-6): check or call
/// - Weak hands: check when free, call only cheap bets, otherwise fold
/// - Facing an all-in sized call: only strong hands call
///
/// # Example
///
/// ```rust
/// use jetons_ai::baseline::BaselineAI;
/// use jetons_ai::AiPolicy;
///
/// let ai = BaselineAI::with_seed(7);
/// assert_eq!(ai.name(), "BaselineAI");
/// ```
#[derive(Debug)]
pub struct BaselineAI {
    rng: Mutex<ChaCha20Rng>,
}

impl BaselineAI {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    /// Strength of two hole cards, 0-10.
    fn preflop_strength(hole: &[Card]) -> u8 {
        let [a, b] = hole else {
            return 0;
        };
        let (high, low) = if a.rank >= b.rank {
            (a.rank.value(), b.rank.value())
        } else {
            (b.rank.value(), a.rank.value())
        };
        let suited = a.suit == b.suit;

        if high == low {
            return match high {
                12..=14 => 10,
                10..=11 => 8,
                7..=9 => 6,
                _ => 5,
            };
        }
        let mut strength = match high {
            14 => 4,
            12..=13 => 3,
            10..=11 => 2,
            _ => 1,
        };
        if low >= 10 {
            strength += 2;
        }
        if suited {
            strength += 1;
        }
        if high - low == 1 {
            strength += 1;
        }
        strength.min(8)
    }

    /// Strength once the board is out, 0-10. A category the board makes on
    /// its own is worth little.
    fn postflop_strength(hole: &[Card], board: &[Card]) -> u8 {
        let mut cards = hole.to_vec();
        cards.extend_from_slice(board);
        let category = best_category(&cards);
        if category == best_category(board) && category < Category::Straight {
            return 2;
        }
        match category {
            Category::HighCard => 1,
            Category::OnePair => 4,
            Category::TwoPair => 6,
            Category::ThreeOfAKind => 7,
            Category::Straight | Category::Flush => 8,
            Category::FullHouse => 9,
            Category::FourOfAKind | Category::StraightFlush => 10,
        }
    }

    fn strength(view: &TableView<'_>) -> u8 {
        if view.board.is_empty() {
            Self::preflop_strength(view.hole)
        } else {
            Self::postflop_strength(view.hole, view.board)
        }
    }

    /// Random raise between half the pot and the full pot, capped at what
    /// the stack can still cover after calling.
    fn raise_size(&self, view: &TableView<'_>) -> Option<Chips> {
        let room = view.stack.saturating_sub(view.to_call);
        if room == 0 {
            return None;
        }
        let pot = view.pot + view.target;
        let base = (pot / 2).max(MIN_RAISE);
        let amount = match self.rng.lock() {
            Ok(mut rng) => rng.random_range(base..=base * 2),
            Err(_) => base,
        };
        Some(amount.min(room))
    }

    fn decide_action(&self, view: &TableView<'_>, strength: u8) -> PlayerAction {
        if view.to_call == 0 {
            if strength >= 7 {
                if let Some(amount) = self.raise_size(view) {
                    return PlayerAction::Bet(amount);
                }
            }
            return PlayerAction::Check;
        }

        if view.to_call >= view.stack {
            return if strength >= 7 {
                PlayerAction::Check
            } else {
                PlayerAction::Fold
            };
        }

        match strength {
            9..=10 => match self.raise_size(view) {
                Some(amount) => PlayerAction::Bet(amount),
                None => PlayerAction::Check,
            },
            4..=8 => PlayerAction::Check,
            _ => {
                let cheap = view.to_call <= (view.pot / 4).max(view.stack / 10);
                if cheap {
                    PlayerAction::Check
                } else {
                    PlayerAction::Fold
                }
            }
        }
    }
}

impl Default for BaselineAI {
    fn default() -> Self {
        Self::new()
    }
}

impl AiPolicy for BaselineAI {
    fn decide(&self, view: &TableView<'_>) -> PlayerAction {
        let strength = Self::strength(view);
        self.decide_action(view, strength)
    }

    fn name(&self) -> &str {
        "BaselineAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetons_engine::cards::parse_cards;
    use jetons_engine::logger::Street;
    use jetons_engine::player::PlayerId;

    fn view<'a>(hole: &'a [Card], board: &'a [Card], to_call: Chips, stack: Chips) -> TableView<'a> {
        TableView {
            player_id: PlayerId(9000),
            hole,
            board,
            street: Street::from_board_len(board.len()),
            target: to_call,
            contribution: 0,
            to_call,
            stack,
            pot: 100,
            active_players: 3,
        }
    }

    #[test]
    fn premium_pairs_rate_highest() {
        let aces = parse_cards("A♥ A♠").unwrap();
        let kings = parse_cards("K♥ K♠").unwrap();
        assert_eq!(BaselineAI::preflop_strength(&aces), 10);
        assert_eq!(BaselineAI::preflop_strength(&kings), 10);
    }

    #[test]
    fn weak_offsuit_rates_low() {
        let weak = parse_cards("7♥ 2♠").unwrap();
        assert!(BaselineAI::preflop_strength(&weak) <= 2);
    }

    #[test]
    fn suited_broadway_beats_offsuit() {
        let suited = parse_cards("A♥ K♥").unwrap();
        let offsuit = parse_cards("A♥ K♠").unwrap();
        assert!(BaselineAI::preflop_strength(&suited) > BaselineAI::preflop_strength(&offsuit));
    }

    #[test]
    fn board_pair_does_not_count_as_ours() {
        let hole = parse_cards("2♥ 7♣").unwrap();
        let board = parse_cards("K♠ K♦ 9♣").unwrap();
        assert_eq!(BaselineAI::postflop_strength(&hole, &board), 2);
    }

    #[test]
    fn trips_postflop_rate_strong() {
        let hole = parse_cards("9♥ 9♣").unwrap();
        let board = parse_cards("9♠ K♦ 2♣").unwrap();
        assert_eq!(BaselineAI::postflop_strength(&hole, &board), 7);
    }

    #[test]
    fn strong_hand_bets_when_checked_to() {
        let ai = BaselineAI::with_seed(1);
        let hole = parse_cards("A♥ A♠").unwrap();
        match ai.decide(&view(&hole, &[], 0, 500)) {
            PlayerAction::Bet(n) => assert!((50..=100).contains(&n)),
            other => panic!("expected a bet, got {:?}", other),
        }
    }

    #[test]
    fn raise_never_exceeds_the_stack() {
        let ai = BaselineAI::with_seed(2);
        let hole = parse_cards("A♥ A♠").unwrap();
        for _ in 0..20 {
            match ai.decide(&view(&hole, &[], 40, 60)) {
                PlayerAction::Bet(n) => assert!(40 + n <= 60),
                PlayerAction::Check => {}
                PlayerAction::Fold => panic!("aces never fold"),
            }
        }
    }

    #[test]
    fn weak_hand_folds_to_a_big_bet() {
        let ai = BaselineAI::with_seed(3);
        let hole = parse_cards("7♥ 2♠").unwrap();
        assert_eq!(ai.decide(&view(&hole, &[], 200, 500)), PlayerAction::Fold);
    }

    #[test]
    fn weak_hand_checks_for_free() {
        let ai = BaselineAI::with_seed(4);
        let hole = parse_cards("7♥ 2♠").unwrap();
        assert_eq!(ai.decide(&view(&hole, &[], 0, 500)), PlayerAction::Check);
    }

    #[test]
    fn all_in_call_needs_a_strong_hand() {
        let ai = BaselineAI::with_seed(5);
        let medium = parse_cards("8♥ 8♠").unwrap();
        let strong = parse_cards("Q♥ Q♠").unwrap();
        assert_eq!(ai.decide(&view(&medium, &[], 80, 80)), PlayerAction::Fold);
        assert_eq!(ai.decide(&view(&strong, &[], 80, 80)), PlayerAction::Check);
    }

    #[test]
    fn same_seed_same_raises() {
        let a = BaselineAI::with_seed(11);
        let b = BaselineAI::with_seed(11);
        let hole = parse_cards("A♥ A♠").unwrap();
        let v = view(&hole, &[], 0, 500);
        for _ in 0..5 {
            assert_eq!(a.decide(&v), b.decide(&v));
        }
    }
}

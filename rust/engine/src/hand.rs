use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Suit};

/// Hand category, ordered weakest to strongest.
///
/// Only the category decides a showdown: two hands of the same category tie
/// and split the pot, whatever their ranks or kickers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    /// Label shown to players at the table.
    pub fn label(self) -> &'static str {
        match self {
            Category::HighCard => "Hauteur",
            Category::OnePair => "Paire",
            Category::TwoPair => "Double paire",
            Category::ThreeOfAKind => "Brelan",
            Category::Straight => "Quinte",
            Category::Flush => "Couleur",
            Category::FullHouse => "Full",
            Category::FourOfAKind => "Carré",
            Category::StraightFlush => "Quinte flush",
        }
    }

    pub fn all() -> [Category; 9] {
        [
            Category::HighCard,
            Category::OnePair,
            Category::TwoPair,
            Category::ThreeOfAKind,
            Category::Straight,
            Category::Flush,
            Category::FullHouse,
            Category::FourOfAKind,
            Category::StraightFlush,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Best category made by any 5 of the given cards (hole cards plus board,
/// 2 to 7 cards in practice).
///
/// - a flush needs at least 5 cards of one suit
/// - a straight is 5 consecutive distinct ranks, Ace high only (no wheel)
/// - a straight flush is a straight among the flush suit's cards
/// - two trips count as a full house
pub fn best_category(cards: &[Card]) -> Category {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut by_suit: [Vec<u8>; 4] = [vec![], vec![], vec![], vec![]];
    for c in cards {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        by_suit[suit_index(c.suit)].push(r);
    }

    let flush_suit = by_suit.iter().position(|ranks| ranks.len() >= 5);

    if let Some(s) = flush_suit {
        let mut ranks = by_suit[s].clone();
        ranks.sort_unstable();
        ranks.dedup();
        if has_straight(&ranks) {
            return Category::StraightFlush;
        }
    }

    let (quads, trips, pairs) = count_multiples(&rank_counts);
    if quads > 0 {
        return Category::FourOfAKind;
    }
    if trips >= 2 || (trips == 1 && pairs >= 1) {
        return Category::FullHouse;
    }
    if flush_suit.is_some() {
        return Category::Flush;
    }

    let distinct: Vec<u8> = (2..=14u8)
        .filter(|&r| rank_counts[r as usize] > 0)
        .collect();
    if has_straight(&distinct) {
        return Category::Straight;
    }

    if trips == 1 {
        Category::ThreeOfAKind
    } else if pairs >= 2 {
        Category::TwoPair
    } else if pairs == 1 {
        Category::OnePair
    } else {
        Category::HighCard
    }
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Spades => 0,
        Suit::Hearts => 1,
        Suit::Diamonds => 2,
        Suit::Clubs => 3,
    }
}

// expects ascending, deduplicated ranks
fn has_straight(ranks: &[u8]) -> bool {
    let mut run = 1;
    for w in ranks.windows(2) {
        if w[1] == w[0] + 1 {
            run += 1;
            if run >= 5 {
                return true;
            }
        } else {
            run = 1;
        }
    }
    false
}

fn count_multiples(rank_counts: &[u8; 15]) -> (usize, usize, usize) {
    let mut quads = 0;
    let mut trips = 0;
    let mut pairs = 0;
    for &c in &rank_counts[2..] {
        match c {
            4..=u8::MAX => quads += 1,
            3 => trips += 1,
            2 => pairs += 1,
            _ => {}
        }
    }
    (quads, trips, pairs)
}

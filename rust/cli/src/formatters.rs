//! Text formatting for terminal output.
//!
//! Cards print the way the engine displays them (`10♥`, `A♠`); hand
//! categories print with their French table label and the English name.
//!
//! ```rust
//! use jetons_engine::hand::Category;
//! use jetons_cli::formatters::{english_name, format_category};
//!
//! assert_eq!(english_name(Category::FullHouse), "Full house");
//! assert_eq!(format_category(Category::OnePair), "Paire (One pair)");
//! ```

use jetons_engine::cards::{Card, format_cards};
use jetons_engine::hand::Category;

pub fn english_name(category: Category) -> &'static str {
    match category {
        Category::HighCard => "High card",
        Category::OnePair => "One pair",
        Category::TwoPair => "Two pair",
        Category::ThreeOfAKind => "Three of a kind",
        Category::Straight => "Straight",
        Category::Flush => "Flush",
        Category::FullHouse => "Full house",
        Category::FourOfAKind => "Four of a kind",
        Category::StraightFlush => "Straight flush",
    }
}

pub fn format_category(category: Category) -> String {
    format!("{} ({})", category.label(), english_name(category))
}

/// `[A♠ K♦ 10♥]`, or `[]` before the flop.
pub fn format_board(board: &[Card]) -> String {
    format!("[{}]", format_cards(board))
}

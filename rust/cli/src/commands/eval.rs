//! `eval`: best category of a hole-plus-board card set.

use crate::error::CliError;
use crate::formatters::{format_board, format_category};
use jetons_engine::cards::parse_cards;
use jetons_engine::hand::best_category;
use std::collections::HashSet;
use std::io::Write;

pub fn handle_eval_command(cards: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let cards = parse_cards(cards)?;
    if !(5..=7).contains(&cards.len()) {
        return Err(CliError::InvalidInput(format!(
            "expected 5 to 7 cards, got {}",
            cards.len()
        )));
    }
    let distinct: HashSet<_> = cards.iter().collect();
    if distinct.len() != cards.len() {
        return Err(CliError::InvalidInput("duplicate card".to_string()));
    }

    writeln!(out, "Cards: {}", format_board(&cards))?;
    writeln!(out, "Category: {}", format_category(best_category(&cards)))?;
    Ok(())
}

//! `deal`: shows what a seeded deck hands out at a table.
//!
//! Two hole cards per seat in seat order, then the five board cards, the
//! same draw order the table uses without burns.

use crate::error::CliError;
use crate::formatters::{format_board, format_category};
use jetons_engine::cards::format_cards;
use jetons_engine::deck::Deck;
use jetons_engine::hand::best_category;
use std::io::Write;

pub fn handle_deal_command(
    seed: Option<u64>,
    players: u8,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut deck = match seed {
        Some(seed) => Deck::new_with_seed(seed),
        None => Deck::new(),
    };
    writeln!(out, "Seed: {}", deck.seed())?;

    let mut hands = Vec::with_capacity(players as usize);
    for _ in 0..players {
        hands.push(deck.draw_n(2)?);
    }
    let board = deck.draw_n(5)?;

    for (seat, hole) in hands.iter().enumerate() {
        let mut all = hole.clone();
        all.extend_from_slice(&board);
        writeln!(
            out,
            "Seat {}: {}  {}",
            seat + 1,
            format_cards(hole),
            format_category(best_category(&all))
        )?;
    }
    writeln!(out, "Board: {}", format_board(&board))?;
    Ok(())
}

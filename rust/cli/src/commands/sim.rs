//! `sim`: computer-only tables played hand after hand.
//!
//! Every seat runs the configured policy; each finished hand is written as
//! one [`HandRecord`](jetons_engine::logger::HandRecord) line when
//! `--output` is given, and a win summary is printed at the end.
//!
//! # Environment Variables
//!
//! - `JETONS_SIM_BREAK_AFTER`: stop after N hands and exit with code 130,
//!   leaving the partial hand log in place

use crate::config::Config;
use crate::error::CliError;
use crate::formatters::format_category;
use crate::ui;
use jetons_engine::balance::InMemoryBalanceStore;
use jetons_engine::logger::HandLogger;
use jetons_engine::{GameController, GameStatus, PlayerId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

/// Tally of a simulation run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SimSummary {
    pub hands: u64,
    /// Hands won per seat (split pots count for every winner)
    pub wins: BTreeMap<PlayerId, u64>,
    /// Winning category label, or `"uncontested"`
    pub categories: BTreeMap<String, u64>,
}

/// Plays `hands` hands at a table of `players` computer seats.
///
/// The seed drives the table and every policy, so a seeded run is
/// reproducible hand for hand.
pub fn handle_sim_command(
    hands: u64,
    players: u8,
    config: &Config,
    output: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let mut table = GameController::with_seed(
        config.rules(),
        Arc::new(InMemoryBalanceStore::new()),
        rng.random(),
    );
    table.initialize()?;
    for _ in 0..players {
        let policy = jetons_ai::create_seeded_ai(&config.ai_strategy, rng.random()).ok_or_else(
            || CliError::Config(format!("unknown ai_strategy '{}'", config.ai_strategy)),
        )?;
        table
            .add_cpu_player(policy)
            .ok_or_else(|| CliError::InvalidInput("table is full".to_string()))?;
    }

    let mut logger = match &output {
        Some(path) => {
            if std::path::Path::new(path).exists() {
                ui::display_warning(err, &format!("overwriting {}", path))?;
            }
            HandLogger::create(path)?
        }
        None => HandLogger::discard(),
    };

    let break_after = std::env::var("JETONS_SIM_BREAK_AFTER")
        .ok()
        .and_then(|v| v.parse::<u64>().ok());

    let mut summary = SimSummary::default();
    for i in 0..hands {
        if break_after == Some(i) {
            write_summary(out, &summary, &table, seed, &config.ai_strategy)?;
            return Err(CliError::Interrupted(format!(
                "stopped after {} of {} hands",
                i, hands
            )));
        }
        play_hand(&mut table, &mut logger, &mut summary)?;
    }

    write_summary(out, &summary, &table, seed, &config.ai_strategy)?;
    if let Some(path) = output {
        writeln!(out, "Hands written to {}", path)?;
    }
    Ok(())
}

fn play_hand(
    table: &mut GameController,
    logger: &mut HandLogger,
    summary: &mut SimSummary,
) -> Result<(), CliError> {
    if table.status() == GameStatus::Ended {
        table.reset_game()?;
    }
    table.start_game()?;
    if table.status() != GameStatus::Ended {
        return Err(CliError::Engine(format!(
            "hand {} did not finish (status {:?})",
            table.hand_number(),
            table.status()
        )));
    }

    let outcome = table
        .last_outcome()
        .ok_or_else(|| CliError::Engine("finished hand has no outcome".to_string()))?;
    for &winner in &outcome.winners {
        *summary.wins.entry(winner).or_insert(0) += 1;
    }
    let category = match outcome.category {
        Some(category) => format_category(category),
        None => "uncontested".to_string(),
    };
    *summary.categories.entry(category).or_insert(0) += 1;
    summary.hands += 1;

    if let Some(record) = table.hand_record() {
        logger.write(&record)?;
    }
    Ok(())
}

fn write_summary(
    out: &mut dyn Write,
    summary: &SimSummary,
    table: &GameController,
    seed: u64,
    ai: &str,
) -> Result<(), CliError> {
    writeln!(
        out,
        "Simulated {} hands, {} seats, seed {}, ai {}",
        summary.hands,
        table.players().len(),
        seed,
        ai
    )?;
    for seat in table.players() {
        let wins = summary.wins.get(&seat.id()).copied().unwrap_or(0);
        writeln!(out, "  {} ({}): {} wins", seat.player.name(), seat.id(), wins)?;
    }
    writeln!(out, "Winning categories:")?;
    for (category, count) in &summary.categories {
        writeln!(out, "  {}: {}", category, count)?;
    }
    Ok(())
}

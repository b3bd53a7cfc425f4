//! `roulette`: one game of Russian roulette against a fresh test balance.

use crate::error::CliError;
use jetons_engine::PlayerId;
use jetons_engine::balance::{BalanceStore, InMemoryBalanceStore};
use jetons_engine::roulette::{CHAMBERS, RouletteHall, Shot, potential_payout};
use std::io::Write;
use std::sync::Arc;

const PLAYER: PlayerId = PlayerId(1);

/// Pulls the trigger until the bullet fires or every chamber is survived.
/// With `flee_after`, walks away once that many chambers have clicked.
pub fn handle_roulette_command(
    stake: u64,
    seed: Option<u64>,
    flee_after: Option<usize>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let balances = Arc::new(InMemoryBalanceStore::new());
    let mut hall = match seed {
        Some(seed) => RouletteHall::with_seed(balances.clone(), seed),
        None => RouletteHall::new(balances.clone()),
    };

    hall.start(PLAYER, stake)?;
    writeln!(
        out,
        "Stake {} on {} chambers, survive them all for {}",
        stake,
        CHAMBERS,
        potential_payout(stake)
    )?;

    let mut survived = 0;
    loop {
        if flee_after.is_some_and(|n| survived >= n) {
            let chambers = hall.flee(PLAYER)?;
            writeln!(out, "Fled after {} chambers, stake lost", chambers)?;
            break;
        }
        match hall.pull_trigger(PLAYER)? {
            Shot::Click { remaining } => {
                survived += 1;
                writeln!(out, "Click. {} chambers left", remaining)?;
            }
            Shot::Bang { chamber } => {
                writeln!(out, "BANG on chamber {}", chamber)?;
                break;
            }
            Shot::Survived { payout } => {
                writeln!(out, "Survived! +{}", payout)?;
                break;
            }
        }
    }

    let balance = balances
        .get_balance(PLAYER)
        .map_err(|e| CliError::Engine(e.to_string()))?
        .unwrap_or(0.0);
    writeln!(out, "Balance: {}", balance)?;
    Ok(())
}

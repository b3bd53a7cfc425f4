//! # jetons CLI
//!
//! Developer harness for the jetons table engine: computer-only simulations,
//! seeded deals, category evaluation, roulette and a configuration dump.
//!
//! The entry point is [`run`], which parses arguments, resolves the layered
//! [`config`] and dispatches to a handler in `commands`.
//!
//! ```
//! use std::io;
//! let code = jetons_cli::run(["jetons", "deal", "--seed", "42"], &mut io::sink(), &mut io::sink());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Subcommands
//!
//! - `sim`: play computer-only hands, optionally logging them as JSON Lines
//! - `eval`: name the best category of 5 to 7 cards
//! - `deal`: deal hole cards and a board from a seeded deck
//! - `cfg`: print the resolved configuration with value sources
//! - `roulette`: play one game of Russian roulette

use clap::Parser;
use std::io::Write;

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
#[macro_use]
mod macros;
pub mod ui;

use cli::{Commands, JetonsCli};
use commands::{
    handle_cfg_command, handle_deal_command, handle_eval_command, handle_roulette_command,
    handle_sim_command,
};
pub use error::CliError;

const COMMANDS: &[&str] = &["sim", "eval", "deal", "cfg", "roulette"];

/// Runs the CLI and returns the process exit code.
///
/// `0` on success, `2` on any error, `130` when a simulation was stopped
/// early by `JETONS_SIM_BREAK_AFTER`.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match JetonsCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                if write!(out, "{}", e).is_err() {
                    return exit_code::ERROR;
                }
                return exit_code::SUCCESS;
            }
            write_or_exit!(err, "{}", e);
            write_or_exit!(err, "Usage: jetons <command> [options]\n");
            write_or_exit!(err, "Commands:");
            for c in COMMANDS {
                write_or_exit!(err, "  {}", c);
            }
            write_or_exit!(err, "\nFor full help, run: jetons --help");
            return exit_code::ERROR;
        }
    };

    match dispatch(cli.cmd, out, err) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            if ui::write_error(err, &e.to_string()).is_err() {
                return exit_code::ERROR;
            }
            e.exit_code()
        }
    }
}

fn dispatch(cmd: Commands, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = config::load_with_sources()?;
    match cmd {
        Commands::Sim {
            hands,
            players,
            seed,
            ai,
            output,
        } => {
            let resolved = resolved.with_flags(seed, ai)?;
            handle_sim_command(hands, players, &resolved.config, output, out, err)
        }
        Commands::Eval { cards } => handle_eval_command(&cards, out),
        Commands::Deal { seed, players } => {
            let resolved = resolved.with_flags(seed, None)?;
            handle_deal_command(resolved.config.seed, players, out)
        }
        Commands::Cfg { seed, ai } => {
            let resolved = resolved.with_flags(seed, ai)?;
            handle_cfg_command(&resolved, out)
        }
        Commands::Roulette {
            stake,
            seed,
            flee_after,
        } => {
            let resolved = resolved.with_flags(seed, None)?;
            handle_roulette_command(stake, resolved.config.seed, flee_after, out)
        }
    }
}

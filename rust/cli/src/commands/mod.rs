//! Subcommand handlers.
//!
//! Each handler takes its parsed arguments plus the output streams and
//! returns `Result<(), CliError>`; [`crate::run`] maps the error to an exit
//! code.

pub mod cfg;
pub mod deal;
pub mod eval;
pub mod roulette;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use roulette::handle_roulette_command;
pub use sim::handle_sim_command;

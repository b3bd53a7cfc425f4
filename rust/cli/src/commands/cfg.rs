//! `cfg`: prints the resolved configuration as JSON.
//!
//! Each field is reported with the layer it came from:
//!
//! ```json
//! { "floor_bet": { "value": 20, "source": "default" }, ... }
//! ```

use crate::config::{ConfigResolved, ValueSource};
use crate::error::CliError;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct Sourced<T: Serialize> {
    value: T,
    source: ValueSource,
}

#[derive(Serialize)]
struct CfgView<'a> {
    seed: Sourced<Option<u64>>,
    floor_bet: Sourced<u64>,
    ai_stack: Sourced<u64>,
    turn_timeout_secs: Sourced<u64>,
    ai_strategy: Sourced<&'a str>,
}

pub fn handle_cfg_command(resolved: &ConfigResolved, out: &mut dyn Write) -> Result<(), CliError> {
    let ConfigResolved { config, sources } = resolved;
    let view = CfgView {
        seed: Sourced {
            value: config.seed,
            source: sources.seed,
        },
        floor_bet: Sourced {
            value: config.floor_bet,
            source: sources.floor_bet,
        },
        ai_stack: Sourced {
            value: config.ai_stack,
            source: sources.ai_stack,
        },
        turn_timeout_secs: Sourced {
            value: config.turn_timeout_secs,
            source: sources.turn_timeout_secs,
        },
        ai_strategy: Sourced {
            value: &config.ai_strategy,
            source: sources.ai_strategy,
        },
    };
    let json = serde_json::to_string_pretty(&view)
        .map_err(|e| CliError::Config(format!("cannot serialize configuration: {}", e)))?;
    writeln!(out, "{}", json)?;
    Ok(())
}

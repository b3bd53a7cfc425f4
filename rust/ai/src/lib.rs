//! # jetons-ai: computer players for chat poker tables
//!
//! Implementations of [`AiPolicy`] that can be seated with
//! [`GameController::add_cpu_player`](jetons_engine::engine::GameController::add_cpu_player).
//!
//! ## Core Components
//!
//! - [`baseline`] - Hand-strength heuristic with randomized raise sizing
//! - [`passive`] - Never raises, never folds
//! - [`create_ai`] - Factory by strategy name
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use jetons_ai::create_ai;
//! use jetons_engine::balance::InMemoryBalanceStore;
//! use jetons_engine::engine::GameController;
//! use jetons_engine::game::{GameStatus, TableRules};
//!
//! let store = Arc::new(InMemoryBalanceStore::new());
//! let mut table = GameController::with_seed(TableRules::default(), store, 42);
//! table.initialize().unwrap();
//! table.add_cpu_player(create_ai("baseline").unwrap());
//! table.add_cpu_player(create_ai("passive").unwrap());
//!
//! // with no human seated the whole hand plays out at once
//! table.start_game().unwrap();
//! assert_eq!(table.status(), GameStatus::Ended);
//! ```

use std::sync::Arc;

pub use jetons_engine::strategy::{AiPolicy, TableView};

pub mod baseline;
pub mod passive;

/// Names accepted by [`create_ai`].
pub const AVAILABLE_AIS: [&str; 2] = ["baseline", "passive"];

/// Builds a policy by name, `None` for unknown names.
///
/// # Example
///
/// ```rust
/// use jetons_ai::create_ai;
///
/// let ai = create_ai("baseline").unwrap();
/// assert_eq!(ai.name(), "BaselineAI");
/// assert!(create_ai("oracle").is_none());
/// ```
pub fn create_ai(ai_type: &str) -> Option<Arc<dyn AiPolicy>> {
    match ai_type {
        "baseline" => Some(Arc::new(baseline::BaselineAI::new())),
        "passive" => Some(Arc::new(passive::PassiveAI)),
        _ => None,
    }
}

/// Like [`create_ai`], with a fixed seed for strategies that use randomness.
pub fn create_seeded_ai(ai_type: &str, seed: u64) -> Option<Arc<dyn AiPolicy>> {
    match ai_type {
        "baseline" => Some(Arc::new(baseline::BaselineAI::with_seed(seed))),
        other => create_ai(other),
    }
}

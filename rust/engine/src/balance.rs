//! Persistent per-user chip balances shared by the poker table and the
//! roulette minigame.
//!
//! The engine only ever talks to the [`BalanceStore`] trait; the backing
//! store (database, file, memory) is chosen by the host application.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use crate::player::PlayerId;

/// Balance every account starts with when first provisioned.
pub const DEFAULT_STARTING_BALANCE: f64 = 500.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("Balance store unavailable: {0}")]
    Unavailable(String),
}

/// Account storage for the chat economy.
///
/// Balances are fractional: split pots credit `pot / winners` exactly.
/// Implementations must be safe to share between tables.
pub trait BalanceStore: Send + Sync {
    /// `None` when the account was never provisioned.
    fn get_balance(&self, player: PlayerId) -> Result<Option<f64>, BalanceError>;

    /// Adds `delta` (negative to debit) and returns the new balance. Unknown
    /// accounts are provisioned first.
    fn add_balance(&self, player: PlayerId, delta: f64) -> Result<f64, BalanceError>;

    /// Provisions the account with the default balance if it does not exist.
    fn ensure_exists(&self, player: PlayerId) -> Result<(), BalanceError>;
}

#[derive(Debug)]
pub struct InMemoryBalanceStore {
    balances: RwLock<HashMap<PlayerId, f64>>,
    default_balance: f64,
}

impl InMemoryBalanceStore {
    pub fn new() -> Self {
        Self::with_default(DEFAULT_STARTING_BALANCE)
    }

    pub fn with_default(default_balance: f64) -> Self {
        Self {
            balances: RwLock::new(HashMap::new()),
            default_balance,
        }
    }

    pub fn with_balances<I>(balances: I) -> Self
    where
        I: IntoIterator<Item = (PlayerId, f64)>,
    {
        let store = Self::new();
        if let Ok(mut map) = store.balances.write() {
            map.extend(balances);
        }
        store
    }

    pub fn default_balance(&self) -> f64 {
        self.default_balance
    }
}

impl Default for InMemoryBalanceStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> BalanceError {
    BalanceError::Unavailable("balance lock poisoned".to_string())
}

impl BalanceStore for InMemoryBalanceStore {
    fn get_balance(&self, player: PlayerId) -> Result<Option<f64>, BalanceError> {
        let map = self.balances.read().map_err(poisoned)?;
        Ok(map.get(&player).copied())
    }

    fn add_balance(&self, player: PlayerId, delta: f64) -> Result<f64, BalanceError> {
        let mut map = self.balances.write().map_err(poisoned)?;
        let entry = map.entry(player).or_insert(self.default_balance);
        *entry += delta;
        Ok(*entry)
    }

    fn ensure_exists(&self, player: PlayerId) -> Result<(), BalanceError> {
        let mut map = self.balances.write().map_err(poisoned)?;
        map.entry(player).or_insert(self.default_balance);
        Ok(())
    }
}

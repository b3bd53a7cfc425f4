//! Russian roulette minigame played against the shared balance store.
//!
//! The stake is debited once when the game opens. One bullet sits in one of
//! six chambers; surviving all six pays twelve times the stake, hitting the
//! bullet or fleeing loses it.

use std::collections::HashMap;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::balance::{BalanceError, BalanceStore};
use crate::player::{Chips, PlayerId};

pub const CHAMBERS: usize = 6;
pub const PAYOUT_MULTIPLIER: Chips = 12;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RouletteError {
    #[error("The stake must be at least 1 chip")]
    InvalidStake,
    #[error("Player {0} already has a game in progress")]
    AlreadyPlaying(PlayerId),
    #[error("Insufficient balance: {balance} available, {stake} staked")]
    InsufficientBalance { balance: f64, stake: Chips },
    #[error("Player {0} has no game in progress")]
    NoGame(PlayerId),
    #[error(transparent)]
    Balance(#[from] BalanceError),
}

/// Result of one trigger pull.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shot {
    /// The bullet fired from this chamber (1-based). The stake is lost.
    Bang { chamber: usize },
    /// Empty chamber, `remaining` chambers left to survive.
    Click { remaining: usize },
    /// All chambers survived; `payout` was credited.
    Survived { payout: Chips },
}

#[derive(Debug, Clone)]
pub struct RouletteGame {
    stake: Chips,
    bullet: usize,
    next_chamber: usize,
}

impl RouletteGame {
    pub fn stake(&self) -> Chips {
        self.stake
    }

    pub fn chambers_survived(&self) -> usize {
        self.next_chamber
    }

    pub fn remaining(&self) -> usize {
        CHAMBERS - self.next_chamber
    }
}

pub fn potential_payout(stake: Chips) -> Chips {
    stake * PAYOUT_MULTIPLIER
}

/// Open roulette games, at most one per player.
pub struct RouletteHall {
    games: HashMap<PlayerId, RouletteGame>,
    balances: Arc<dyn BalanceStore>,
    rng: ChaCha20Rng,
}

impl RouletteHall {
    pub fn new(balances: Arc<dyn BalanceStore>) -> Self {
        Self::with_seed(balances, rand::random())
    }

    pub fn with_seed(balances: Arc<dyn BalanceStore>, seed: u64) -> Self {
        Self {
            games: HashMap::new(),
            balances,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Debits the stake and loads the revolver.
    pub fn start(&mut self, player: PlayerId, stake: Chips) -> Result<&RouletteGame, RouletteError> {
        if stake == 0 {
            return Err(RouletteError::InvalidStake);
        }
        if self.games.contains_key(&player) {
            return Err(RouletteError::AlreadyPlaying(player));
        }
        self.balances.ensure_exists(player)?;
        let balance = self.balances.get_balance(player)?.unwrap_or(0.0);
        if balance < stake as f64 {
            return Err(RouletteError::InsufficientBalance { balance, stake });
        }
        self.balances.add_balance(player, -(stake as f64))?;

        let game = RouletteGame {
            stake,
            bullet: self.rng.random_range(0..CHAMBERS),
            next_chamber: 0,
        };
        let game = self.games.entry(player).or_insert(game);
        Ok(&*game)
    }

    pub fn pull_trigger(&mut self, player: PlayerId) -> Result<Shot, RouletteError> {
        let game = self
            .games
            .get_mut(&player)
            .ok_or(RouletteError::NoGame(player))?;
        let chamber = game.next_chamber;
        if chamber == game.bullet {
            self.games.remove(&player);
            return Ok(Shot::Bang {
                chamber: chamber + 1,
            });
        }
        game.next_chamber += 1;
        if game.next_chamber < CHAMBERS {
            return Ok(Shot::Click {
                remaining: game.remaining(),
            });
        }
        let payout = potential_payout(game.stake);
        self.games.remove(&player);
        self.balances.add_balance(player, payout as f64)?;
        Ok(Shot::Survived { payout })
    }

    /// Walks away; the stake is not returned. Returns the chambers survived.
    pub fn flee(&mut self, player: PlayerId) -> Result<usize, RouletteError> {
        let game = self
            .games
            .remove(&player)
            .ok_or(RouletteError::NoGame(player))?;
        Ok(game.chambers_survived())
    }

    pub fn game(&self, player: PlayerId) -> Option<&RouletteGame> {
        self.games.get(&player)
    }
}

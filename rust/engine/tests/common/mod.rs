#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use jetons_engine::balance::{BalanceStore, InMemoryBalanceStore};
use jetons_engine::engine::GameController;
use jetons_engine::game::TableRules;
use jetons_engine::player::{Player, PlayerAction, PlayerId};
use jetons_engine::strategy::{AiPolicy, TableView};

/// Plays a fixed list of actions, then checks forever.
pub struct ScriptedPolicy {
    script: Mutex<VecDeque<PlayerAction>>,
}

impl ScriptedPolicy {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(actions.into_iter().collect()),
        })
    }

    pub fn checking() -> Arc<Self> {
        Self::new([])
    }
}

impl AiPolicy for ScriptedPolicy {
    fn decide(&self, _view: &TableView<'_>) -> PlayerAction {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PlayerAction::Check)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn p(id: u64) -> PlayerId {
    PlayerId(id)
}

pub fn store_with(balances: &[(u64, f64)]) -> Arc<InMemoryBalanceStore> {
    Arc::new(InMemoryBalanceStore::with_balances(
        balances.iter().map(|&(id, b)| (PlayerId(id), b)),
    ))
}

/// An open table with the given humans seated in order.
pub fn table(store: Arc<InMemoryBalanceStore>, ids: &[u64]) -> GameController {
    let mut table = GameController::with_seed(TableRules::default(), store, 99);
    table.initialize().unwrap();
    for &id in ids {
        assert!(table.add_player(Player::human(PlayerId(id), format!("player{}", id))));
    }
    table
}

pub fn balance(store: &InMemoryBalanceStore, id: u64) -> f64 {
    store.get_balance(PlayerId(id)).unwrap().unwrap_or(0.0)
}

use crate::events::{GameEvent, Presenter};
use crate::settings::{SettingsError, SettingsStore, TableSettings};
use crate::timer::TurnTimer;
use chrono::{DateTime, Utc};
use jetons_engine::balance::BalanceStore;
use jetons_engine::cards::Card;
use jetons_engine::events::TableEvent;
use jetons_engine::logger::{HandRecord, Street};
use jetons_engine::strategy::AiPolicy;
use jetons_engine::{Chips, GameController, GameError, GameStatus, Player, PlayerAction, PlayerId, TurnTicket};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, Weak};
use thiserror::Error;
use tokio::time::Instant;
use uuid::Uuid;

/// Chat-room key a table is attached to.
pub type SessionId = String;

/// All open tables, one per chat room.
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<TableSession>>>,
    presenter: Arc<dyn Presenter>,
    balances: Arc<dyn BalanceStore>,
    settings: SettingsStore,
}

impl SessionManager {
    pub fn new(presenter: Arc<dyn Presenter>, balances: Arc<dyn BalanceStore>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            presenter,
            balances,
            settings: SettingsStore::new(),
        }
    }

    pub fn with_settings(
        presenter: Arc<dyn Presenter>,
        balances: Arc<dyn BalanceStore>,
        settings: TableSettings,
    ) -> Result<Self, SessionError> {
        Ok(Self {
            sessions: RwLock::new(HashMap::new()),
            presenter,
            balances,
            settings: SettingsStore::with_settings(settings)?,
        })
    }

    /// Settings used for tables opened from now on.
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Returns the room's table, creating it on first use. A table left in
    /// `Off` by an aborted hand is reopened.
    pub fn open_table(&self, room: &str) -> Result<Arc<TableSession>, SessionError> {
        let existing = {
            let guard = self
                .sessions
                .read()
                .map_err(|_| SessionError::StoragePoisoned)?;
            guard.get(room).cloned()
        };
        let session = match existing {
            Some(session) => session,
            None => {
                let settings = self.settings.get()?;
                let mut guard = self
                    .sessions
                    .write()
                    .map_err(|_| SessionError::StoragePoisoned)?;
                let session = guard.entry(room.to_string()).or_insert_with(|| {
                    tracing::info!(session_id = %room, "opening table");
                    TableSession::new(
                        room.to_string(),
                        settings,
                        Arc::clone(&self.balances),
                        Arc::clone(&self.presenter),
                    )
                });
                Arc::clone(session)
            }
        };
        session.touch();
        session.reopen()?;
        Ok(session)
    }

    pub fn table(&self, room: &str) -> Result<Arc<TableSession>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        let session = guard
            .get(room)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(room.to_string()))?;
        session.touch();
        Ok(session)
    }

    pub fn join(&self, room: &str, player: PlayerId, name: &str) -> Result<bool, SessionError> {
        self.open_table(room)?.join(player, name)
    }

    /// Seats a CPU player using `strategy`, or the table's default policy.
    pub fn add_cpu(&self, room: &str, strategy: Option<&str>) -> Result<Option<PlayerId>, SessionError> {
        let session = self.open_table(room)?;
        let name = strategy.unwrap_or(session.settings().ai_strategy.as_str());
        let policy = jetons_ai::create_ai(name)
            .ok_or_else(|| SessionError::UnknownStrategy(name.to_string()))?;
        session.add_cpu(policy)
    }

    pub fn leave(&self, room: &str, player: PlayerId) -> Result<bool, SessionError> {
        self.table(room)?.leave(player)
    }

    pub fn start_hand(&self, room: &str) -> Result<(), SessionError> {
        self.table(room)?.start_hand()
    }

    pub fn act(&self, room: &str, player: PlayerId, action: PlayerAction) -> Result<Chips, SessionError> {
        self.table(room)?.act(player, action)
    }

    pub fn reset(&self, room: &str) -> Result<(), SessionError> {
        self.table(room)?.reset()
    }

    pub fn snapshot(&self, room: &str) -> Result<TableSnapshot, SessionError> {
        self.table(room)?.snapshot()
    }

    /// Aborts any running hand (refunding it) and forgets the table.
    pub fn close_table(&self, room: &str) -> Result<(), SessionError> {
        let session = self
            .remove_session(room)?
            .ok_or_else(|| SessionError::NotFound(room.to_string()))?;
        self.shut_down(&session, "closed");
        Ok(())
    }

    /// Closes every table idle for longer than its TTL. Returns their ids.
    pub fn cleanup_expired_sessions(&self) -> Vec<SessionId> {
        let mut expired = Vec::new();
        {
            let mut guard = match self.sessions.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.retain(|_, session| {
                if session.is_expired() {
                    expired.push(Arc::clone(session));
                    false
                } else {
                    true
                }
            });
        }

        for session in &expired {
            self.shut_down(session, "expired");
        }
        expired.iter().map(|s| s.id().clone()).collect()
    }

    pub fn active_tables(&self) -> Vec<SessionId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn shut_down(&self, session: &TableSession, reason: &str) {
        if let Err(err) = session.shutdown() {
            tracing::error!(
                session_id = %session.id(),
                error = %err,
                "failed to abort hand while closing table"
            );
        }
        tracing::info!(session_id = %session.id(), reason, "table closed");
        self.presenter.notify(
            session.id(),
            GameEvent::TableClosed {
                session_id: session.id().clone(),
                reason: reason.to_string(),
            },
        );
    }

    fn remove_session(&self, room: &str) -> Result<Option<Arc<TableSession>>, SessionError> {
        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        Ok(guard.remove(room))
    }
}

struct TableState {
    controller: GameController,
    timer: Option<TurnTimer>,
}

/// One chat room's table: the controller, its turn timer and the finished
/// hand history. Every operation runs under the table's mutex, one at a
/// time.
pub struct TableSession {
    id: SessionId,
    table_id: Uuid,
    opened_at: DateTime<Utc>,
    settings: TableSettings,
    presenter: Arc<dyn Presenter>,
    state: Mutex<TableState>,
    history: Mutex<Vec<HandRecord>>,
    last_active: Mutex<Instant>,
    me: Weak<TableSession>,
}

impl std::fmt::Debug for TableSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableSession")
            .field("id", &self.id)
            .field("table_id", &self.table_id)
            .field("opened_at", &self.opened_at)
            .field("settings", &self.settings)
            .finish()
    }
}

impl TableSession {
    fn new(
        id: SessionId,
        settings: TableSettings,
        balances: Arc<dyn BalanceStore>,
        presenter: Arc<dyn Presenter>,
    ) -> Arc<Self> {
        let controller = GameController::new(settings.rules.clone(), balances);
        Arc::new_cyclic(|me| Self {
            id,
            table_id: Uuid::new_v4(),
            opened_at: Utc::now(),
            settings,
            presenter,
            state: Mutex::new(TableState {
                controller,
                timer: None,
            }),
            history: Mutex::new(Vec::new()),
            last_active: Mutex::new(Instant::now()),
            me: me.clone(),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn table_id(&self) -> Uuid {
        self.table_id
    }

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    pub fn status(&self) -> Result<GameStatus, SessionError> {
        Ok(self.lock()?.controller.status())
    }

    /// Read-only access to the controller.
    pub fn with_controller<R>(&self, f: impl FnOnce(&GameController) -> R) -> Result<R, SessionError> {
        let state = self.lock()?;
        Ok(f(&state.controller))
    }

    pub fn hole_cards(&self, player: PlayerId) -> Result<Option<Vec<Card>>, SessionError> {
        let state = self.lock()?;
        Ok(state.controller.hole_cards(player).map(<[Card]>::to_vec))
    }

    /// Records of the hands finished at this table, oldest first.
    pub fn history(&self) -> Result<Vec<HandRecord>, SessionError> {
        self.history
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| SessionError::StoragePoisoned)
    }

    fn reopen(&self) -> Result<(), SessionError> {
        let mut state = self.lock()?;
        if state.controller.status() == GameStatus::Off {
            state.controller.initialize()?;
        }
        Ok(())
    }

    pub fn join(&self, player: PlayerId, name: &str) -> Result<bool, SessionError> {
        let mut state = self.lock()?;
        let seated = state.controller.add_player(Player::human(player, name));
        tracing::debug!(session_id = %self.id, player_id = %player, seated, "join");
        Ok(seated)
    }

    pub fn add_cpu(&self, policy: Arc<dyn AiPolicy>) -> Result<Option<PlayerId>, SessionError> {
        let mut state = self.lock()?;
        let id = state.controller.add_cpu_player(policy);
        tracing::debug!(session_id = %self.id, player_id = ?id, "cpu seated");
        Ok(id)
    }

    pub fn leave(&self, player: PlayerId) -> Result<bool, SessionError> {
        let mut state = self.lock()?;
        let result = state.controller.leave(player);
        self.sync(&mut state);
        Ok(result?)
    }

    pub fn start_hand(&self) -> Result<(), SessionError> {
        let mut state = self.lock()?;
        let result = state.controller.start_game();
        if result.is_ok() {
            tracing::info!(
                session_id = %self.id,
                hand_number = state.controller.hand_number(),
                players = state.controller.players().len(),
                "hand started"
            );
        }
        self.sync(&mut state);
        Ok(result?)
    }

    /// Applies a player's action. Fails with [`SessionError::TurnExpired`]
    /// when their turn timer already fired and the fold is on its way.
    pub fn act(&self, player: PlayerId, action: PlayerAction) -> Result<Chips, SessionError> {
        let mut state = self.lock()?;
        if let Some(timer) = &state.timer {
            if timer.ticket().player_id == player && timer.is_resolved() {
                tracing::warn!(session_id = %self.id, player_id = %player, "action after timeout");
                return Err(SessionError::TurnExpired(player));
            }
        }
        let street = state.controller.street();
        let result = state.controller.act(player, action);
        match &result {
            Ok(paid) => tracing::debug!(
                session_id = %self.id,
                player_id = %player,
                street = ?street,
                action = %action,
                paid,
                "action applied"
            ),
            Err(err) => tracing::debug!(
                session_id = %self.id,
                player_id = %player,
                error = %err,
                "action rejected"
            ),
        }
        self.sync(&mut state);
        Ok(result?)
    }

    pub fn reset(&self) -> Result<(), SessionError> {
        let mut state = self.lock()?;
        let result = state.controller.reset_game();
        self.sync(&mut state);
        Ok(result?)
    }

    pub fn snapshot(&self) -> Result<TableSnapshot, SessionError> {
        let state = self.lock()?;
        let c = &state.controller;
        let seats = c
            .players()
            .iter()
            .map(|seat| SeatSnapshot {
                player_id: seat.id(),
                name: seat.player.name().to_string(),
                stack: seat.stack,
                contribution: c.contribution(seat.id()),
                folded: c.is_folded(seat.id()),
                is_ai: seat.player.is_ai(),
                leaving: seat.leaving,
            })
            .collect();
        Ok(TableSnapshot {
            session_id: self.id.clone(),
            table_id: self.table_id,
            opened_at: self.opened_at,
            status: c.status(),
            hand_number: c.hand_number(),
            street: c.street(),
            pot: c.pot(),
            target: c.target(),
            board: c.community_cards().to_vec(),
            current_player: c.current_player(),
            seats,
            winners: c.winners().to_vec(),
        })
    }

    fn shutdown(&self) -> Result<(), SessionError> {
        let mut state = self.lock()?;
        if let Some(timer) = state.timer.take() {
            timer.cancel();
        }
        let result = if state.controller.status() == GameStatus::Running {
            state.controller.abort_hand()
        } else {
            Ok(())
        };
        self.flush_events(&mut state);
        Ok(result?)
    }

    fn on_timeout(&self, ticket: TurnTicket) {
        let mut state = match self.lock() {
            Ok(state) => state,
            Err(err) => {
                tracing::error!(session_id = %self.id, error = %err, "turn timeout dropped");
                return;
            }
        };
        if state.timer.as_ref().map(TurnTimer::ticket) == Some(ticket) {
            state.timer = None;
        }
        match state.controller.timeout_fold(ticket) {
            Ok(true) => {
                tracing::info!(
                    session_id = %self.id,
                    player_id = %ticket.player_id,
                    "player folded on timeout"
                );
                self.presenter.notify(
                    &self.id,
                    GameEvent::TurnTimedOut {
                        session_id: self.id.clone(),
                        player_id: ticket.player_id,
                    },
                );
            }
            Ok(false) => {
                tracing::debug!(session_id = %self.id, seq = ticket.seq, "stale turn timer");
            }
            Err(err) => {
                tracing::error!(session_id = %self.id, error = %err, "timeout fold failed");
                self.presenter.notify(
                    &self.id,
                    GameEvent::Error {
                        session_id: self.id.clone(),
                        message: err.to_string(),
                    },
                );
            }
        }
        self.sync(&mut state);
    }

    /// Publishes what the controller queued, then makes sure the human who
    /// holds the turn (if any) has a running timer.
    fn sync(&self, state: &mut TableState) {
        self.flush_events(state);
        self.rearm(state);
    }

    fn flush_events(&self, state: &mut TableState) {
        for event in state.controller.take_events() {
            if let TableEvent::HandEnded { outcome } = &event {
                tracing::info!(
                    session_id = %self.id,
                    hand_number = outcome.hand_number,
                    pot = outcome.pot,
                    winners = ?outcome.winners,
                    "hand finished"
                );
                if let Some(record) = state.controller.hand_record() {
                    match self.history.lock() {
                        Ok(mut history) => history.push(record),
                        Err(_) => tracing::error!(session_id = %self.id, "hand history poisoned"),
                    }
                }
            }
            self.presenter.notify(
                &self.id,
                GameEvent::Table {
                    session_id: self.id.clone(),
                    event,
                },
            );
        }
    }

    fn rearm(&self, state: &mut TableState) {
        let turn = state.controller.current_turn().filter(|t| {
            state
                .controller
                .seat(t.player_id)
                .is_some_and(|seat| !seat.player.is_ai())
        });
        if state.timer.as_ref().map(TurnTimer::ticket) == turn {
            return;
        }
        if let Some(old) = state.timer.take() {
            old.cancel();
        }
        let Some(ticket) = turn else {
            return;
        };

        let me = self.me.clone();
        let timeout = self.settings.turn_timeout();
        state.timer = Some(TurnTimer::start(ticket, timeout, move |ticket| {
            if let Some(session) = me.upgrade() {
                session.on_timeout(ticket);
            }
        }));
        self.presenter
            .prompt_action(&self.id, ticket.player_id, ticket.seq, timeout);
    }

    fn touch(&self) {
        if let Ok(mut last) = self.last_active.lock() {
            *last = Instant::now();
        }
    }

    fn is_expired(&self) -> bool {
        match self.last_active.lock() {
            Ok(last) => last.elapsed() > self.settings.session_ttl(),
            Err(_) => true,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TableState>, SessionError> {
        self.state.lock().map_err(|_| SessionError::StoragePoisoned)
    }
}

/// Serializable view of a table for the chat front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub session_id: SessionId,
    pub table_id: Uuid,
    pub opened_at: DateTime<Utc>,
    pub status: GameStatus,
    pub hand_number: u64,
    pub street: Street,
    pub pot: Chips,
    pub target: Chips,
    pub board: Vec<Card>,
    pub current_player: Option<PlayerId>,
    pub seats: Vec<SeatSnapshot>,
    pub winners: Vec<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSnapshot {
    pub player_id: PlayerId,
    pub name: String,
    pub stack: Chips,
    pub contribution: Chips,
    pub folded: bool,
    pub is_ai: bool,
    pub leaving: bool,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No table in room {0}")]
    NotFound(SessionId),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Player {0} ran out of time for this turn")]
    TurnExpired(PlayerId),
    #[error("Unknown AI strategy: {0}")]
    UnknownStrategy(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Session storage poisoned")]
    StoragePoisoned,
}

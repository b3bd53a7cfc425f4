use crate::session::SessionId;
use jetons_engine::events::TableEvent;
use jetons_engine::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::mpsc;

// Bounded so a stalled chat client cannot grow memory without limit;
// subscribers whose buffer is full are dropped.
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<GameEvent>;
pub type EventReceiver = mpsc::Receiver<GameEvent>;

/// What the table layer hands to the chat front end.
///
/// `prompt_action` asks a player to act; the answer comes back later through
/// [`SessionManager::act`](crate::session::SessionManager::act) or not at all,
/// in which case the turn timer folds them. `notify` is fire-and-forget.
pub trait Presenter: Send + Sync {
    fn prompt_action(&self, session_id: &SessionId, player_id: PlayerId, seq: u64, timeout: Duration);

    fn notify(&self, session_id: &SessionId, event: GameEvent);
}

pub struct EventSubscription {
    bus: EventBus,
    session_id: SessionId,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }

    /// Everything queued so far, without waiting.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.session_id, self.subscriber_id);
    }
}

/// Fan-out of [`GameEvent`]s to every subscriber of a table.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<HashMap<SessionId, Vec<(usize, EventSender)>>>,
    next_id: AtomicUsize,
}

impl EventBusInner {
    // A panicking subscriber must not silence the other tables.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<SessionId, Vec<(usize, EventSender)>>> {
        self.subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, Vec<(usize, EventSender)>>> {
        self.subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, session_id: SessionId) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw(session_id.clone());
        EventSubscription {
            bus: self.clone(),
            session_id,
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self, session_id: SessionId) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.inner
            .write()
            .entry(session_id.clone())
            .or_default()
            .push((id, tx));

        tracing::info!(
            session_id = %session_id,
            subscriber_id = id,
            "subscribed to table events"
        );

        (id, rx)
    }

    pub fn broadcast(&self, session_id: &SessionId, event: GameEvent) {
        tracing::debug!(
            session_id = %session_id,
            event_type = event.kind(),
            "broadcasting table event"
        );

        let subscribers = self.inner.read().get(session_id).cloned();
        let Some(list) = subscribers else {
            tracing::trace!(session_id = %session_id, "no subscribers for table");
            return;
        };

        let mut failed = Vec::new();
        for (id, sender) in list {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    session_id = %session_id,
                    subscriber_id = id,
                    error = ?e,
                    "dropping subscriber"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(session_id, &failed);
        }
    }

    pub fn unsubscribe(&self, session_id: &SessionId, subscriber_id: usize) {
        self.remove_subscribers(session_id, &[subscriber_id]);
    }

    pub fn drop_session(&self, session_id: &SessionId) {
        self.inner.write().remove(session_id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.read().values().map(|list| list.len()).sum()
    }

    fn remove_subscribers(&self, session_id: &SessionId, ids: &[usize]) {
        let mut guard = self.inner.write();
        if let Some(list) = guard.get_mut(session_id) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(session_id);
            }
        }
    }
}

impl Presenter for EventBus {
    fn prompt_action(&self, session_id: &SessionId, player_id: PlayerId, seq: u64, timeout: Duration) {
        self.broadcast(
            session_id,
            GameEvent::TurnPrompt {
                session_id: session_id.clone(),
                player_id,
                seq,
                timeout_secs: timeout.as_secs(),
            },
        );
    }

    fn notify(&self, session_id: &SessionId, event: GameEvent) {
        let closing = matches!(event, GameEvent::TableClosed { .. });
        self.broadcast(session_id, event);
        if closing {
            self.drop_session(session_id);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Something happened at the table.
    Table {
        session_id: SessionId,
        event: TableEvent,
    },
    /// A human holds the turn and has `timeout_secs` to act.
    TurnPrompt {
        session_id: SessionId,
        player_id: PlayerId,
        seq: u64,
        timeout_secs: u64,
    },
    TurnTimedOut {
        session_id: SessionId,
        player_id: PlayerId,
    },
    TableClosed {
        session_id: SessionId,
        reason: String,
    },
    Error {
        session_id: SessionId,
        message: String,
    },
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::Table { event, .. } => match event {
                TableEvent::HandStarted { .. } => "hand_started",
                TableEvent::CardsDealt { .. } => "cards_dealt",
                TableEvent::TurnChanged { .. } => "turn_changed",
                TableEvent::PlayerActed { .. } => "player_acted",
                TableEvent::PlayerLeft { .. } => "player_left",
                TableEvent::RoundClosed { .. } => "round_closed",
                TableEvent::StreetRevealed { .. } => "street_revealed",
                TableEvent::HandEnded { .. } => "hand_ended",
                TableEvent::HandAborted { .. } => "hand_aborted",
            },
            GameEvent::TurnPrompt { .. } => "turn_prompt",
            GameEvent::TurnTimedOut { .. } => "turn_timed_out",
            GameEvent::TableClosed { .. } => "table_closed",
            GameEvent::Error { .. } => "error",
        }
    }
}

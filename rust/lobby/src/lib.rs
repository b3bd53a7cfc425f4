//! # jetons-lobby: one poker table per chat room
//!
//! Wraps [`jetons_engine::GameController`] for a chat bot: rooms get their
//! own table on first use, every table event is fanned out to subscribers
//! through the [`EventBus`], and humans who hold the turn get a countdown
//! that folds them when it runs out.
//!
//! ```rust
//! use std::sync::Arc;
//! use jetons_engine::balance::InMemoryBalanceStore;
//! use jetons_engine::GameStatus;
//! use jetons_lobby::{EventBus, SessionManager};
//!
//! let bus = Arc::new(EventBus::new());
//! let lobby = SessionManager::new(bus.clone(), Arc::new(InMemoryBalanceStore::new()));
//!
//! lobby.add_cpu("room", Some("passive")).unwrap();
//! lobby.add_cpu("room", Some("passive")).unwrap();
//! lobby.start_hand("room").unwrap();
//!
//! // Computer-only hands play out immediately.
//! assert_eq!(lobby.snapshot("room").unwrap().status, GameStatus::Ended);
//! ```

pub mod events;
pub mod logging;
pub mod session;
pub mod settings;
pub mod timer;

pub use events::{EventBus, EventSubscription, GameEvent, Presenter};
pub use logging::{init_json_logging, init_logging, init_test_logging, LogEntry, TestLogSubscriber};
pub use session::{SeatSnapshot, SessionError, SessionId, SessionManager, TableSession, TableSnapshot};
pub use settings::{SettingsError, SettingsStore, TableSettings};
pub use timer::{TurnGuard, TurnTimer};

//! # jetons-engine: table rules for a chat-room poker economy
//!
//! A multi-player Texas Hold'em engine for chat tables. Up to nine humans and
//! computer players share a table; human chips come from a persistent
//! [`balance::BalanceStore`] and go back to it when pots are paid.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation, display (`10♥`) and parsing
//! - [`deck`] - Seedable shuffled deck (ChaCha20)
//! - [`hand`] - Hand category evaluation
//! - [`player`] - Player identity, seat kinds and actions
//! - [`registry`] - Roster, table stacks, hole cards and folds
//! - [`betting`] - Contributions, target and turn order of a betting round
//! - [`engine`] - [`engine::GameController`], the hand lifecycle
//! - [`strategy`] - Interface for computer players
//! - [`balance`] - Balance store contract and in-memory store
//! - [`events`] - Events emitted for the presentation layer
//! - [`logger`] - Hand history records and JSONL writer
//! - [`roulette`] - Russian roulette minigame
//! - [`errors`] - Error types for table operations
//!
//! ## Quick Start
//!
//! ```rust
//! use jetons_engine::cards::parse_cards;
//! use jetons_engine::hand::{best_category, Category};
//!
//! let cards = parse_cards("A♥ K♥ Q♥ J♥ 10♥ 2♣ 3♦").unwrap();
//! let category = best_category(&cards);
//! assert_eq!(category, Category::StraightFlush);
//! assert_eq!(category.label(), "Quinte flush");
//! ```
//!
//! ## Deterministic Gameplay
//!
//! ```rust
//! use jetons_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(42);
//! let mut b = Deck::new_with_seed(42);
//! assert_eq!(a.draw().unwrap(), b.draw().unwrap());
//! ```

pub mod balance;
pub mod betting;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod registry;
pub mod roulette;
pub mod strategy;

pub use engine::GameController;
pub use errors::{GameError, RulesError};
pub use game::{GameStatus, TableRules, TurnTicket};
pub use player::{Chips, Player, PlayerAction, PlayerId};

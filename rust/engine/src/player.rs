use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::strategy::AiPolicy;

/// Chip amounts inside a hand (bets, contributions, pot, table stacks).
pub type Chips = u64;

/// First id handed out to computer-controlled seats; the n-th CPU gets
/// `CPU_ID_BASE + n`.
pub const CPU_ID_BASE: u64 = 9000;

/// Identity of a seat at the table. Human ids come from the chat platform.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A seated participant. AI seats carry the policy that plays for them;
/// their chips never touch the balance store.
#[derive(Clone)]
pub enum Player {
    Human {
        id: PlayerId,
        name: String,
    },
    Ai {
        id: PlayerId,
        name: String,
        policy: Arc<dyn AiPolicy>,
    },
}

impl Player {
    pub fn human(id: PlayerId, name: impl Into<String>) -> Self {
        Player::Human {
            id,
            name: name.into(),
        }
    }

    pub fn ai(id: PlayerId, name: impl Into<String>, policy: Arc<dyn AiPolicy>) -> Self {
        Player::Ai {
            id,
            name: name.into(),
            policy,
        }
    }

    pub fn id(&self) -> PlayerId {
        match self {
            Player::Human { id, .. } | Player::Ai { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Player::Human { name, .. } | Player::Ai { name, .. } => name,
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Player::Ai { .. })
    }

    pub fn policy(&self) -> Option<&Arc<dyn AiPolicy>> {
        match self {
            Player::Ai { policy, .. } => Some(policy),
            Player::Human { .. } => None,
        }
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Human { id, name } => f
                .debug_struct("Human")
                .field("id", id)
                .field("name", name)
                .finish(),
            Player::Ai { id, name, policy } => f
                .debug_struct("Ai")
                .field("id", id)
                .field("name", name)
                .field("policy", &policy.name())
                .finish(),
        }
    }
}

/// A betting decision.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Give up the hand; chips already contributed stay in the pot.
    Fold,
    /// Match the current target (a plain check when nothing is owed).
    Check,
    /// Raise the target by the given number of chips.
    Bet(Chips),
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Fold => f.write_str("fold"),
            PlayerAction::Check => f.write_str("check"),
            PlayerAction::Bet(n) => write!(f, "bet {}", n),
        }
    }
}

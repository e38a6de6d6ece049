//! Engine errors and their request-layer mapping.

use derive_more::{Display, Error};
use ghost_rules::RuleError;
use ghost_store::StoreError;
use serde::{Deserialize, Serialize};

/// Failure of a [`GhostService`](crate::GhostService) operation.
#[derive(Debug, Clone, Display, Error)]
pub enum GhostError {
    /// No game exists for the room code.
    #[display("Game '{}' does not exist", room_code)]
    GameDoesNotExist {
        /// Requested room.
        room_code: String,
    },

    /// A game already exists for the room code.
    #[display("Game '{}' already exists", room_code)]
    GameAlreadyExists {
        /// Requested room.
        room_code: String,
    },

    /// The transition was rejected by the game rules.
    #[display("{}", _0)]
    Rule(RuleError),

    /// Concurrent writers kept winning the race for this room.
    #[display(
        "Game '{}' is busy, gave up after {} conflicting attempts",
        room_code,
        attempts
    )]
    Unavailable {
        /// Contended room.
        room_code: String,
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// The store failed.
    #[display("{}", _0)]
    Store(StoreError),
}

impl GhostError {
    /// HTTP-style status for the error class.
    ///
    /// Missing games are 404, rule violations and duplicates 409, exhausted
    /// retries 503, and store failures 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::GameDoesNotExist { .. } => 404,
            Self::GameAlreadyExists { .. } | Self::Rule(_) => 409,
            Self::Unavailable { .. } => 503,
            Self::Store(_) => 500,
        }
    }

    /// True for a lost compare-and-swap race.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_conflict())
    }
}

impl From<RuleError> for GhostError {
    fn from(err: RuleError) -> Self {
        Self::Rule(err)
    }
}

impl From<StoreError> for GhostError {
    fn from(err: StoreError) -> Self {
        match err {
            // A game deleted between read and write.
            StoreError::NotFound { room_code } => Self::GameDoesNotExist { room_code },
            other => Self::Store(other),
        }
    }
}

/// Serializable error body returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Human-readable reason.
    pub message: String,
}

impl From<&GhostError> for ErrorMessage {
    fn from(err: &GhostError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

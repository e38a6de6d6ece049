//! Store error types.

use derive_more::{Display, Error};
use ghost_rules::GameField;
use tracing::instrument;

/// Failure talking to a game store.
#[derive(Debug, Clone, Display, Error)]
pub enum StoreError {
    /// No row exists for the room code.
    #[display("Game '{}' does not exist", room_code)]
    NotFound {
        /// Room that was looked up.
        room_code: String,
    },

    /// A conditional write found guarded fields changed since they were read.
    ///
    /// Retryable: re-read the game and re-run the transition.
    #[display("Conditional write on '{}' rejected, changed fields: {:?}", room_code, fields)]
    Conflict {
        /// Room that was written.
        room_code: String,
        /// Guarded fields that no longer matched.
        fields: Vec<GameField>,
    },

    /// A stored row could not be decoded into a game.
    #[display("Stored game '{}' is corrupt: {}", room_code, message)]
    Decode {
        /// Room whose row failed to decode.
        room_code: String,
        /// Decoder message.
        message: String,
    },

    /// The backing store failed.
    #[display("Store error: {} at {}:{}", message, file, line)]
    Backend {
        /// Error message.
        message: String,
        /// Line number where error occurred.
        line: u32,
        /// Source file where error occurred.
        file: &'static str,
    },
}

impl StoreError {
    /// Creates a backend error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn backend(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self::Backend {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Creates a decode error for a room.
    pub fn decode(room_code: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            room_code: room_code.to_string(),
            message: err.to_string(),
        }
    }

    /// Creates a backend error for a game that could not be serialized.
    #[track_caller]
    pub fn encode(room_code: &str, err: impl std::fmt::Display) -> Self {
        Self::backend(format!("Failed to encode game '{}': {}", room_code, err))
    }

    /// True for write conflicts, which callers should retry.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::backend(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::backend(format!("Connection error: {}", err))
    }
}

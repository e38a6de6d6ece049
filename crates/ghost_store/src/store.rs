//! The store contract consumed by the engine.

use crate::StoreError;
use ghost_rules::{GameInfo, GameUpdate};

/// Read consistency requested from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum ReadConsistency {
    /// May return a slightly stale replica.
    #[default]
    Eventual,
    /// Must reflect every acknowledged write.
    Strong,
}

impl ReadConsistency {
    /// Strong when `consistent` is set.
    pub fn from_flag(consistent: bool) -> Self {
        if consistent { Self::Strong } else { Self::Eventual }
    }
}

/// Keyed storage of one [`GameInfo`] per room code.
///
/// Implementations must make [`GameStore::conditional_update`] atomic per
/// row: either every change lands with every guard matching, or nothing does.
pub trait GameStore: Send + Sync {
    /// Reads a game, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails or the row is corrupt.
    fn get(
        &self,
        room_code: &str,
        consistency: ReadConsistency,
    ) -> Result<Option<GameInfo>, StoreError>;

    /// Creates or replaces a game unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn put(&self, game: &GameInfo) -> Result<(), StoreError>;

    /// Removes a game. Removing an absent game succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn delete(&self, room_code: &str) -> Result<(), StoreError>;

    /// Applies `update.changes()` if every field in `update.guard()` still
    /// holds its expected value, returning the updated game.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the game is absent
    /// - [`StoreError::Conflict`] if a guarded field changed
    /// - [`StoreError::Backend`] if the backend fails
    fn conditional_update(
        &self,
        room_code: &str,
        update: &GameUpdate,
    ) -> Result<GameInfo, StoreError>;
}

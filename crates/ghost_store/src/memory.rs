//! In-process store backed by a shared map.

use crate::{GameStore, ReadConsistency, StoreError};
use ghost_rules::{GameInfo, GameUpdate};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

/// Thread-safe in-memory store. Clones share the same games.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    games: Arc<Mutex<HashMap<String, GameInfo>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        debug!("Creating memory store");
        Self::default()
    }

    /// Lists stored room codes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the map lock is poisoned.
    #[instrument(skip(self))]
    pub fn room_codes(&self) -> Result<Vec<String>, StoreError> {
        let games = self.lock()?;
        let mut codes: Vec<_> = games.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, GameInfo>>, StoreError> {
        self.games
            .lock()
            .map_err(|_| StoreError::backend("Memory store lock poisoned"))
    }
}

impl GameStore for MemoryStore {
    #[instrument(skip(self))]
    fn get(
        &self,
        room_code: &str,
        consistency: ReadConsistency,
    ) -> Result<Option<GameInfo>, StoreError> {
        let games = self.lock()?;
        Ok(games.get(room_code).cloned())
    }

    #[instrument(skip(self, game), fields(room_code = %game.room_code()))]
    fn put(&self, game: &GameInfo) -> Result<(), StoreError> {
        let mut games = self.lock()?;
        games.insert(game.room_code().clone(), game.clone());
        debug!("Game stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete(&self, room_code: &str) -> Result<(), StoreError> {
        let mut games = self.lock()?;
        if games.remove(room_code).is_none() {
            debug!("Game already absent");
        }
        Ok(())
    }

    #[instrument(skip(self, update), fields(changes = ?update.changes().fields()))]
    fn conditional_update(
        &self,
        room_code: &str,
        update: &GameUpdate,
    ) -> Result<GameInfo, StoreError> {
        let mut games = self.lock()?;
        let game = games.get_mut(room_code).ok_or_else(|| StoreError::NotFound {
            room_code: room_code.to_string(),
        })?;

        let mismatches = update.guard().mismatches(game);
        if !mismatches.is_empty() {
            warn!(fields = ?mismatches, "Guard mismatch, rejecting write");
            return Err(StoreError::Conflict {
                room_code: room_code.to_string(),
                fields: mismatches,
            });
        }

        game.apply(update.changes());
        debug!("Conditional write applied");
        Ok(game.clone())
    }
}

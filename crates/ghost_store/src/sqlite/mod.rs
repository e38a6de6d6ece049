//! SQLite-backed store.
//!
//! Each operation opens its own connection. Conditional updates run inside
//! an `IMMEDIATE` transaction so the guard check and the write see the same
//! row.

mod models;
mod schema;

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use derive_getters::Getters;
use ghost_rules::{GameInfo, GameUpdate};
use tracing::{debug, info, instrument, warn};

use crate::{GameStore, ReadConsistency, StoreError};
use models::{GameChangeset, GameRow};
use schema::games;

/// Schema migrations bundled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Game store over a SQLite database file.
#[derive(Debug, Clone, Getters)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens the database at `db_path`, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref()))]
    pub fn open(db_path: impl AsRef<str>) -> Result<Self, StoreError> {
        let store = Self {
            db_path: db_path.as_ref().to_string(),
        };
        store.migrate()?;
        info!("SQLite store ready");
        Ok(store)
    }

    /// Applies pending migrations, returning how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a migration fails.
    #[instrument(skip(self), fields(db_path = %self.db_path))]
    pub fn migrate(&self) -> Result<usize, StoreError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::backend(format!("Migration failed: {}", e)))?;
        if !applied.is_empty() {
            info!(count = applied.len(), "Applied migrations");
        }
        Ok(applied.len())
    }

    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::backend(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS))
            .execute(&mut conn)?;
        Ok(conn)
    }

    fn load(conn: &mut SqliteConnection, room_code: &str) -> Result<Option<GameInfo>, StoreError> {
        games::table
            .find(room_code)
            .select(GameRow::as_select())
            .first(conn)
            .optional()?
            .map(GameRow::decode)
            .transpose()
    }
}

impl GameStore for SqliteStore {
    // A single SQLite file has no replicas, so every read is strong.
    #[instrument(skip(self))]
    fn get(
        &self,
        room_code: &str,
        consistency: ReadConsistency,
    ) -> Result<Option<GameInfo>, StoreError> {
        let mut conn = self.connection()?;
        let game = Self::load(&mut conn, room_code)?;
        debug!(found = game.is_some(), "Game lookup");
        Ok(game)
    }

    #[instrument(skip(self, game), fields(room_code = %game.room_code()))]
    fn put(&self, game: &GameInfo) -> Result<(), StoreError> {
        let row = GameRow::encode(game)?;
        let mut conn = self.connection()?;
        diesel::replace_into(games::table)
            .values(&row)
            .execute(&mut conn)?;
        debug!("Game stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete(&self, room_code: &str) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let removed = diesel::delete(games::table.find(room_code)).execute(&mut conn)?;
        debug!(removed, "Game deleted");
        Ok(())
    }

    #[instrument(skip(self, update), fields(changes = ?update.changes().fields()))]
    fn conditional_update(
        &self,
        room_code: &str,
        update: &GameUpdate,
    ) -> Result<GameInfo, StoreError> {
        let changeset = GameChangeset::encode(room_code, update.changes())?;
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            let current = Self::load(conn, room_code)?.ok_or_else(|| StoreError::NotFound {
                room_code: room_code.to_string(),
            })?;

            let mismatches = update.guard().mismatches(&current);
            if !mismatches.is_empty() {
                warn!(fields = ?mismatches, "Guard mismatch, rejecting write");
                return Err(StoreError::Conflict {
                    room_code: room_code.to_string(),
                    fields: mismatches,
                });
            }

            if update.changes().is_empty() {
                debug!("Empty change set, nothing to write");
                return Ok(current);
            }

            diesel::update(games::table.find(room_code))
                .set(&changeset)
                .execute(conn)?;
            debug!("Conditional write applied");
            Ok(current.patched(update.changes()))
        })
    }
}

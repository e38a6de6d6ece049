//! Row and changeset models for the `games` table.
//!
//! List-valued and nested fields are stored as JSON text.

use diesel::prelude::*;
use ghost_rules::{GameInfo, GamePatch};
use serde_json::{from_str, to_string};

use super::schema;
use crate::StoreError;

/// One stored game.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRow {
    room_code: String,
    started: bool,
    winner: Option<String>,
    players: String,
    losers: String,
    turn_player_name: Option<String>,
    moves: String,
    challenge: Option<String>,
}

impl GameRow {
    /// Encodes a game as a row.
    pub fn encode(game: &GameInfo) -> Result<Self, StoreError> {
        let room = game.room_code();
        let json = |value: Result<String, serde_json::Error>| {
            value.map_err(|e| StoreError::encode(room, e))
        };
        Ok(Self {
            room_code: room.clone(),
            started: *game.started(),
            winner: game.winner().as_ref().map(|w| json(to_string(w))).transpose()?,
            players: json(to_string(game.players()))?,
            losers: json(to_string(game.losers()))?,
            turn_player_name: game.turn_player_name().clone(),
            moves: json(to_string(game.moves()))?,
            challenge: game
                .challenge()
                .as_ref()
                .map(|c| json(to_string(c)))
                .transpose()?,
        })
    }

    /// Decodes this row into a game.
    pub fn decode(self) -> Result<GameInfo, StoreError> {
        let room = self.room_code.as_str();
        let bad = |e: serde_json::Error| StoreError::decode(room, e);
        let patch = GamePatch::default()
            .with_started(self.started)
            .with_winner(self.winner.as_deref().map(from_str).transpose().map_err(bad)?)
            .with_players(from_str(&self.players).map_err(bad)?)
            .with_losers(from_str(&self.losers).map_err(bad)?)
            .with_turn_player_name(self.turn_player_name.clone())
            .with_moves(from_str(&self.moves).map_err(bad)?)
            .with_challenge(self.challenge.as_deref().map(from_str).transpose().map_err(bad)?);
        Ok(GameInfo::new(self.room_code.clone()).patched(&patch))
    }
}

/// Sparse column update. `None` columns are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = schema::games)]
pub struct GameChangeset {
    started: Option<bool>,
    winner: Option<Option<String>>,
    players: Option<String>,
    losers: Option<String>,
    turn_player_name: Option<Option<String>>,
    moves: Option<String>,
    challenge: Option<Option<String>>,
}

impl GameChangeset {
    /// Encodes the fields present in `patch`.
    pub fn encode(room_code: &str, patch: &GamePatch) -> Result<Self, StoreError> {
        fn json<T: serde::Serialize + ?Sized>(room: &str, value: &T) -> Result<String, StoreError> {
            to_string(value).map_err(|e| StoreError::encode(room, e))
        }
        fn nullable<T: serde::Serialize>(
            room: &str,
            value: &Option<T>,
        ) -> Result<Option<String>, StoreError> {
            value.as_ref().map(|v| json(room, v)).transpose()
        }

        Ok(Self {
            started: patch.started,
            winner: patch.winner.as_ref().map(|w| nullable(room_code, w)).transpose()?,
            players: patch.players.as_ref().map(|p| json(room_code, p)).transpose()?,
            losers: patch.losers.as_ref().map(|l| json(room_code, l)).transpose()?,
            turn_player_name: patch.turn_player_name.clone(),
            moves: patch.moves.as_ref().map(|m| json(room_code, m)).transpose()?,
            challenge: patch
                .challenge
                .as_ref()
                .map(|c| nullable(room_code, c))
                .transpose()?,
        })
    }
}

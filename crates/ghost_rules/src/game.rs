//! The per-room game aggregate.

use crate::{Challenge, GamePatch, Move, Player, Position};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Full state of one room, keyed by `room_code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    /// Room code (primary key).
    room_code: String,
    /// Whether the game has started.
    started: bool,
    /// Sole remaining player once the game has started.
    winner: Option<Player>,
    /// Players in turn order.
    players: Vec<Player>,
    /// Players eliminated by lost challenges.
    losers: Vec<Player>,
    /// Player whose turn it is.
    turn_player_name: Option<String>,
    /// Move history, in play order.
    moves: Vec<Move>,
    /// The open challenge, if any.
    challenge: Option<Challenge>,
}

impl GameInfo {
    /// Creates a fresh, unstarted game with no players.
    #[instrument]
    pub fn new(room_code: String) -> Self {
        Self {
            room_code,
            started: false,
            winner: None,
            players: Vec::new(),
            losers: Vec::new(),
            turn_player_name: None,
            moves: Vec::new(),
            challenge: None,
        }
    }

    /// Index of the named player in turn order.
    pub fn player_index(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name() == name)
    }

    /// Looks up an active player by name.
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == name)
    }

    /// True when the named player is still in the game.
    pub fn has_player(&self, name: &str) -> bool {
        self.player_index(name).is_some()
    }

    /// True when the named player was eliminated by a challenge.
    pub fn has_lost(&self, name: &str) -> bool {
        self.losers.iter().any(|p| p.name() == name)
    }

    /// The most recent move.
    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// True when a letter already occupies `position`.
    pub fn is_position_taken(&self, position: &Position) -> bool {
        self.moves.iter().any(|m| m.position() == position)
    }

    /// True when the given name holds the turn.
    pub fn is_turn_of(&self, name: &str) -> bool {
        self.turn_player_name.as_deref() == Some(name)
    }

    /// Overwrites every field present in `patch`.
    pub fn apply(&mut self, patch: &GamePatch) {
        if let Some(started) = patch.started {
            self.started = started;
        }
        if let Some(winner) = &patch.winner {
            self.winner = winner.clone();
        }
        if let Some(players) = &patch.players {
            self.players = players.clone();
        }
        if let Some(losers) = &patch.losers {
            self.losers = losers.clone();
        }
        if let Some(turn_player_name) = &patch.turn_player_name {
            self.turn_player_name = turn_player_name.clone();
        }
        if let Some(moves) = &patch.moves {
            self.moves = moves.clone();
        }
        if let Some(challenge) = &patch.challenge {
            self.challenge = challenge.clone();
        }
    }

    /// Returns a copy of this game with `patch` applied.
    pub fn patched(&self, patch: &GamePatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

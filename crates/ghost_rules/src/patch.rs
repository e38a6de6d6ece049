//! Field-level updates and compare-and-swap guards.
//!
//! A transition never mutates a game directly. It produces a [`GameUpdate`]:
//! the fields to overwrite plus the values those fields must still hold in
//! the store for the write to land.

use crate::{Challenge, GameInfo, Move, Player};
use derive_getters::Getters;
use derive_new::new;
use derive_setters::Setters;

/// One mutable field of [`GameInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum GameField {
    /// `started`
    Started,
    /// `winner`
    Winner,
    /// `players`
    Players,
    /// `losers`
    Losers,
    /// `turn_player_name`
    TurnPlayerName,
    /// `moves`
    Moves,
    /// `challenge`
    Challenge,
}

/// A sparse set of field values. `None` means "not part of this patch".
///
/// Nullable fields nest: `Some(None)` writes (or expects) a null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Setters)]
#[setters(strip_option, prefix = "with_")]
pub struct GamePatch {
    /// New or expected `started`.
    pub started: Option<bool>,
    /// New or expected `winner`.
    pub winner: Option<Option<Player>>,
    /// New or expected `players`.
    pub players: Option<Vec<Player>>,
    /// New or expected `losers`.
    pub losers: Option<Vec<Player>>,
    /// New or expected `turn_player_name`.
    pub turn_player_name: Option<Option<String>>,
    /// New or expected `moves`.
    pub moves: Option<Vec<Move>>,
    /// New or expected `challenge`.
    pub challenge: Option<Option<Challenge>>,
}

impl GamePatch {
    /// Captures the current value of each listed field.
    pub fn snapshot(game: &GameInfo, fields: &[GameField]) -> Self {
        let mut patch = Self::default();
        for field in fields {
            match field {
                GameField::Started => patch.started = Some(*game.started()),
                GameField::Winner => patch.winner = Some(game.winner().clone()),
                GameField::Players => patch.players = Some(game.players().clone()),
                GameField::Losers => patch.losers = Some(game.losers().clone()),
                GameField::TurnPlayerName => {
                    patch.turn_player_name = Some(game.turn_player_name().clone())
                }
                GameField::Moves => patch.moves = Some(game.moves().clone()),
                GameField::Challenge => patch.challenge = Some(game.challenge().clone()),
            }
        }
        patch
    }

    /// Fields present in this patch.
    pub fn fields(&self) -> Vec<GameField> {
        let present = [
            (GameField::Started, self.started.is_some()),
            (GameField::Winner, self.winner.is_some()),
            (GameField::Players, self.players.is_some()),
            (GameField::Losers, self.losers.is_some()),
            (GameField::TurnPlayerName, self.turn_player_name.is_some()),
            (GameField::Moves, self.moves.is_some()),
            (GameField::Challenge, self.challenge.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(field, set)| set.then_some(field))
            .collect()
    }

    /// True when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Fields whose value in `game` differs from this patch, read as a guard.
    pub fn mismatches(&self, game: &GameInfo) -> Vec<GameField> {
        fn differs<T: PartialEq>(expected: &Option<T>, actual: &T) -> bool {
            expected.as_ref().is_some_and(|e| e != actual)
        }

        let mut fields = Vec::new();
        if differs(&self.started, game.started()) {
            fields.push(GameField::Started);
        }
        if differs(&self.winner, game.winner()) {
            fields.push(GameField::Winner);
        }
        if differs(&self.players, game.players()) {
            fields.push(GameField::Players);
        }
        if differs(&self.losers, game.losers()) {
            fields.push(GameField::Losers);
        }
        if differs(&self.turn_player_name, game.turn_player_name()) {
            fields.push(GameField::TurnPlayerName);
        }
        if differs(&self.moves, game.moves()) {
            fields.push(GameField::Moves);
        }
        if differs(&self.challenge, game.challenge()) {
            fields.push(GameField::Challenge);
        }
        fields
    }

    /// True when every field in this patch, read as a guard, matches `game`.
    pub fn matches(&self, game: &GameInfo) -> bool {
        self.mismatches(game).is_empty()
    }
}

/// A conditional write: apply `changes` only if `guard` still matches.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameUpdate {
    /// Fields to overwrite.
    changes: GamePatch,
    /// Expected current values.
    guard: GamePatch,
}

impl GameUpdate {
    /// Builds an update guarded on the current value of `guarded` fields.
    pub fn guarded(game: &GameInfo, changes: GamePatch, guarded: &[GameField]) -> Self {
        Self::new(changes, GamePatch::snapshot(game, guarded))
    }

    /// An update with no precondition.
    pub fn unconditional(changes: GamePatch) -> Self {
        Self::new(changes, GamePatch::default())
    }
}

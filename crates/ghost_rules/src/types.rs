//! Core domain types for Ghost.
//!
//! Every wire-facing type serializes with camelCase field names.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A player in a room, identified by display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Display name, unique within a game.
    name: String,
    /// Avatar image URL.
    image_url: String,
}

impl Player {
    /// Creates a new player.
    #[instrument(skip_all)]
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: image_url.into(),
        }
    }
}

/// Zero-indexed grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, new)]
pub struct Position {
    /// Column.
    x: i64,
    /// Row.
    y: i64,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single letter placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    /// Name of the player who made the move.
    player_name: String,
    /// Where the letter was placed.
    position: Position,
    /// The letter played.
    letter: String,
}

impl Move {
    /// Creates a new move.
    #[instrument(skip_all)]
    pub fn new(player_name: impl Into<String>, position: Position, letter: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            position,
            letter: letter.into(),
        }
    }

    /// True when the letter is exactly one character.
    pub fn has_single_letter(&self) -> bool {
        self.letter.chars().count() == 1
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} plays '{}' at {}", self.player_name, self.letter, self.position)
    }
}

/// What a challenger claims about the challenged move.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ChallengeType {
    /// The move completed a word in its row or column.
    CompleteWord,
    /// No valid word can be formed through the move's row or column.
    NoValidWords,
}

/// Wire-level state of a challenge.
///
/// `Success` and `Failed` are verdicts; they are reported by the vote tally
/// but never stored, since completing a challenge clears it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeState {
    /// Waiting for the challenged player to name words.
    AwaitingResponse,
    /// Waiting for every player to vote.
    Voting,
    /// The challenge was upheld; the mover loses.
    Success,
    /// The challenge was rejected; the challenger loses.
    Failed,
}

/// A single player's vote on an open challenge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeVote {
    /// Name of the voting player.
    voter_name: String,
    /// Whether the vote supports the challenge.
    pro_challenge: bool,
}

impl ChallengeVote {
    /// Creates a new vote.
    pub fn new(voter_name: impl Into<String>, pro_challenge: bool) -> Self {
        Self {
            voter_name: voter_name.into(),
            pro_challenge,
        }
    }
}

/// Words claimed by the challenged player in answer to `NO_VALID_WORDS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    /// Claimed word through the move's row.
    row_word: String,
    /// Claimed word through the move's column.
    col_word: String,
}

impl ChallengeResponse {
    /// Creates a new challenge response.
    pub fn new(row_word: impl Into<String>, col_word: impl Into<String>) -> Self {
        Self {
            row_word: row_word.into(),
            col_word: col_word.into(),
        }
    }
}

/// Challenge as posted by the challenging player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct NewChallenge {
    /// Player issuing the challenge.
    challenger_name: String,
    /// The move being challenged.
    #[serde(rename = "move")]
    challenged_move: Move,
    /// What the challenger claims.
    #[serde(rename = "type")]
    challenge_type: ChallengeType,
}

impl NewChallenge {
    /// Creates a new challenge request.
    pub fn new(
        challenger_name: impl Into<String>,
        challenged_move: Move,
        challenge_type: ChallengeType,
    ) -> Self {
        Self {
            challenger_name: challenger_name.into(),
            challenged_move,
            challenge_type,
        }
    }
}

//! Domain errors raised by transition validation.

use crate::{ChallengeState, Position};
use derive_more::{Display, Error};

/// Why a move, challenge, response or vote was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum InvalidMoveKind {
    /// Moves and new challenges are blocked while a challenge is open.
    #[display("Game '{}' has an open challenge", _0)]
    OpenChallenge(String),

    /// The named player is not in the game.
    #[display("'{}' is not a player in this game", _0)]
    NotAPlayer(String),

    /// A letter already occupies the position.
    #[display("Position {} is already taken", _0)]
    PositionTaken(Position),

    /// The submitted letter is not exactly one character.
    #[display("Moves must place exactly one letter, got '{}'", _0)]
    BadLetter(String),

    /// There is no move to challenge.
    #[display("Game '{}' has no moves to challenge", _0)]
    NoMoves(String),

    /// Only the most recent move can be challenged.
    #[display("Only the most recent move can be challenged")]
    NotLastMove,

    /// There is no open challenge to respond to or vote on.
    #[display("Game '{}' has no open challenge", _0)]
    NoChallenge(String),

    /// The challenge is not in the state the action requires.
    #[display("Challenge is {} but the action requires {}", actual, expected)]
    WrongChallengeState {
        /// State the action requires.
        expected: ChallengeState,
        /// State the challenge is in.
        actual: ChallengeState,
    },

    /// The voter has already cast a vote on this challenge.
    #[display("'{}' has already voted", _0)]
    AlreadyVoted(String),
}

/// A rejected state transition.
///
/// These are never retried: the caller receives the message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RuleError {
    /// Players cannot join a game that has started.
    #[display("Game '{}' has already started", room_code)]
    GameStarted {
        /// Room of the rejected join.
        room_code: String,
    },

    /// Moves are only accepted once the game has started.
    #[display("Game '{}' has not started", room_code)]
    GameNotStarted {
        /// Room of the rejected move.
        room_code: String,
    },

    /// Someone other than the turn player tried to move.
    #[display(
        "Turn player is '{}' but '{}' tried to move",
        turn_player.as_deref().unwrap_or("nobody"),
        mover
    )]
    WrongPlayer {
        /// Whose turn it is.
        turn_player: Option<String>,
        /// Who tried to move.
        mover: String,
    },

    /// Any other invalid move, challenge, response or vote.
    #[display("{}", kind)]
    InvalidMove {
        /// The specific reason.
        kind: InvalidMoveKind,
    },
}

impl From<InvalidMoveKind> for RuleError {
    fn from(kind: InvalidMoveKind) -> Self {
        Self::InvalidMove { kind }
    }
}

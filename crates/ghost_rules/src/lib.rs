//! Ghost rules - the game aggregate and its pure state transitions.
//!
//! Players take turns placing one letter on a shared grid. Any player may
//! challenge the most recent move, which starts a response/vote sub-protocol
//! that eliminates either the challenger or the mover.
//!
//! # Architecture
//!
//! - **Types**: players, positions, moves and challenge requests
//! - **Challenge**: the nested challenge state machine
//! - **GameInfo**: the per-room aggregate
//! - **Patch**: field-level changes and compare-and-swap guards
//! - **Transitions**: validation from `(aggregate, input)` to a guarded update
//! - **Invariants**: properties every committed aggregate satisfies
//!
//! # Example
//!
//! ```
//! use ghost_rules::{GameInfo, Move, Player, Position, transitions};
//!
//! let game = GameInfo::new("ABCD".to_string());
//! let join = transitions::join(&game, Player::new("P1", "")).unwrap().unwrap();
//! let game = game.patched(join.changes());
//! let game = game.patched(transitions::start(&game).changes());
//!
//! let update = transitions::place_move(&game, Move::new("P1", Position::new(0, 0), "Z")).unwrap();
//! assert_eq!(game.patched(update.changes()).moves().len(), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod challenge;
mod error;
mod game;
mod patch;
mod turn;
mod types;

pub mod invariants;
pub mod transitions;

pub use challenge::{Challenge, ChallengeDecodeError, ChallengePhase};
pub use error::{InvalidMoveKind, RuleError};
pub use game::GameInfo;
pub use invariants::{GhostInvariants, Invariant, InvariantSet, InvariantViolation};
pub use patch::{GameField, GamePatch, GameUpdate};
pub use turn::{detect_winner, next_turn_player, turn_after_removal};
pub use types::{
    ChallengeResponse, ChallengeState, ChallengeType, ChallengeVote, Move, NewChallenge, Player,
    Position,
};

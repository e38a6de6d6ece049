//! Ghost - a rules engine for the Ghost word game.
//!
//! Players in a room take turns placing single letters on an unbounded
//! grid. Any player may challenge the latest move; the challenge is settled
//! by a vote and the loser is eliminated. The last player standing wins.
//!
//! # Architecture
//!
//! - **Rules** ([`ghost_rules`]): the aggregate and pure transitions
//! - **Store** ([`ghost_store`]): keyed persistence with conditional writes
//! - **Service**: read-validate-write operations with conflict retry
//! - **Config**: database path and retry policy
//!
//! # Example
//!
//! ```
//! use ghost::{GhostService, Move, Player, Position, RetryPolicy};
//! use ghost_store::MemoryStore;
//!
//! let service = GhostService::new(MemoryStore::new(), RetryPolicy::default());
//! service.create_game("ABCD").unwrap();
//! service.add_player("ABCD", Player::new("P1", "")).unwrap();
//! service.add_player("ABCD", Player::new("P2", "")).unwrap();
//! service.start_game("ABCD").unwrap();
//!
//! let game = service
//!     .add_move("ABCD", Move::new("P1", Position::new(0, 0), "G"))
//!     .unwrap();
//! assert_eq!(game.turn_player_name().as_deref(), Some("P2"));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod service;

pub use config::{ConfigError, DB_PATH_ENV, EngineConfig, RetryPolicy};
pub use error::{ErrorMessage, GhostError};
pub use service::GhostService;

// Re-exported so callers need only this crate for requests and responses.
pub use ghost_rules::{
    Challenge, ChallengeResponse, ChallengeState, ChallengeType, ChallengeVote, GameInfo, Move,
    NewChallenge, Player, Position, RuleError,
};

//! Invariants over `moves` and `challenge`.

use super::Invariant;
use crate::GameInfo;
use std::collections::HashSet;

/// Invariant: no two moves share a position.
pub struct UniquePositions;

impl Invariant<GameInfo> for UniquePositions {
    fn holds(game: &GameInfo) -> bool {
        let mut seen = HashSet::new();
        game.moves().iter().all(|m| seen.insert(*m.position()))
    }

    fn description() -> &'static str {
        "No two moves share a position"
    }
}

/// Invariant: an open challenge disputes the most recent move.
///
/// Moves are blocked while a challenge is open, so the challenged move stays
/// the last one for the challenge's whole life.
pub struct ChallengeTargetsLastMove;

impl Invariant<GameInfo> for ChallengeTargetsLastMove {
    fn holds(game: &GameInfo) -> bool {
        game.challenge()
            .as_ref()
            .is_none_or(|c| game.last_move() == Some(c.challenged_move()))
    }

    fn description() -> &'static str {
        "An open challenge targets the last move"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Challenge, ChallengeType, GamePatch, Move, NewChallenge, Position};

    #[test]
    fn test_duplicate_positions_detected() {
        let pos = Position::new(1, 1);
        let game = GameInfo::new("ABCD".to_string()).patched(
            &GamePatch::default().with_moves(vec![Move::new("a", pos, "A"), Move::new("b", pos, "B")]),
        );
        assert!(!UniquePositions::holds(&game));
    }

    #[test]
    fn test_challenge_without_moves_detected() {
        let mv = Move::new("a", Position::new(0, 0), "A");
        let challenge = Challenge::open(NewChallenge::new("b", mv, ChallengeType::CompleteWord));
        let game = GameInfo::new("ABCD".to_string())
            .patched(&GamePatch::default().with_challenge(Some(challenge)));
        assert!(!ChallengeTargetsLastMove::holds(&game));
    }
}

//! Invariants over `players`, `losers`, `turn_player_name` and `winner`.

use super::Invariant;
use crate::{GameInfo, Player};
use std::collections::HashSet;

/// Invariant: the turn player, if any, is an active player.
pub struct TurnPlayerIsMember;

impl Invariant<GameInfo> for TurnPlayerIsMember {
    fn holds(game: &GameInfo) -> bool {
        game.turn_player_name()
            .as_deref()
            .is_none_or(|name| game.has_player(name))
    }

    fn description() -> &'static str {
        "Turn player is null or one of the players"
    }
}

/// Invariant: no name appears twice in `players`, nor twice in `losers`.
pub struct UniqueNames;

fn all_unique(players: &[Player]) -> bool {
    let mut seen = HashSet::new();
    players.iter().all(|p| seen.insert(p.name()))
}

impl Invariant<GameInfo> for UniqueNames {
    fn holds(game: &GameInfo) -> bool {
        all_unique(game.players()) && all_unique(game.losers())
    }

    fn description() -> &'static str {
        "Player and loser names are unique"
    }
}

/// Invariant: a winner exists exactly when a started game has one player left.
pub struct WinnerIsLastPlayer;

impl Invariant<GameInfo> for WinnerIsLastPlayer {
    fn holds(game: &GameInfo) -> bool {
        match (game.winner(), game.players().as_slice()) {
            (Some(winner), [last]) => *game.started() && winner == last,
            (Some(_), _) => false,
            (None, [_]) => !*game.started(),
            (None, _) => true,
        }
    }

    fn description() -> &'static str {
        "Winner is set iff the game started and exactly one player remains"
    }
}

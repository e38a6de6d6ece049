//! Turn order and winner detection shared by several transitions.

use crate::Player;

/// Player who moves after `current`.
///
/// With no current turn player (or one who has left), the turn goes to the
/// first player in join order.
pub fn next_turn_player(players: &[Player], current: Option<&str>) -> Option<String> {
    let index = current.and_then(|name| players.iter().position(|p| p.name() == name));
    match index {
        Some(index) => Some(players[(index + 1) % players.len()].name().clone()),
        None => players.first().map(|p| p.name().clone()),
    }
}

/// Turn player after `players[removed]` leaves.
///
/// If the leaver held the turn, the turn goes to whoever now occupies the
/// vacated slot, wrapping to the front. Otherwise the turn is unchanged.
pub fn turn_after_removal(
    players: &[Player],
    removed: usize,
    current: Option<&str>,
) -> Option<String> {
    let leaver = players[removed].name();
    if current != Some(leaver.as_str()) {
        return current.map(str::to_string);
    }
    let remaining: Vec<&Player> = players
        .iter()
        .enumerate()
        .filter_map(|(i, p)| (i != removed).then_some(p))
        .collect();
    if remaining.is_empty() {
        None
    } else {
        Some(remaining[removed % remaining.len()].name().clone())
    }
}

/// The winner, if exactly one player remains in a started game.
pub fn detect_winner(started: bool, players: &[Player]) -> Option<Player> {
    match players {
        [last] if started => Some(last.clone()),
        _ => None,
    }
}

//! Scenario tests for the game service over the in-memory store.

use ghost::{
    ChallengeResponse, ChallengeState, ChallengeType, ChallengeVote, GameInfo, GhostError,
    GhostService, Move, NewChallenge, Player, Position, RetryPolicy, RuleError,
};
use ghost_rules::{GhostInvariants, InvalidMoveKind, InvariantSet};
use ghost_store::MemoryStore;

const ROOM: &str = "ABCD";

fn service() -> GhostService<MemoryStore> {
    GhostService::new(MemoryStore::new(), RetryPolicy::default())
}

/// Creates `ROOM` with the named players joined in order.
fn lobby(names: &[&str]) -> GhostService<MemoryStore> {
    let service = service();
    service.create_game(ROOM).expect("Create failed");
    for name in names {
        service
            .add_player(ROOM, Player::new(*name, format!("{name}.png")))
            .expect("Join failed");
    }
    service
}

fn started(names: &[&str]) -> GhostService<MemoryStore> {
    let service = lobby(names);
    service.start_game(ROOM).expect("Start failed");
    service
}

fn letter(player: &str, x: i64, y: i64, letter: &str) -> Move {
    Move::new(player, Position::new(x, y), letter)
}

fn names(players: &[Player]) -> Vec<&str> {
    players.iter().map(|p| p.name().as_str()).collect()
}

fn read(service: &GhostService<MemoryStore>) -> GameInfo {
    let game = service.read_game(ROOM, true).expect("Read failed");
    assert!(GhostInvariants::check_all(&game).is_ok(), "Invariants broken: {game:?}");
    game
}

fn challenge(service: &GhostService<MemoryStore>, challenger: &str, kind: ChallengeType) -> GameInfo {
    let last = read(service).last_move().cloned().expect("No move to challenge");
    service
        .create_challenge(ROOM, NewChallenge::new(challenger, last, kind))
        .expect("Challenge failed")
}

fn assert_invalid_move(result: Result<GameInfo, GhostError>) -> InvalidMoveKind {
    match result {
        Err(GhostError::Rule(RuleError::InvalidMove { kind })) => kind,
        other => panic!("Expected invalid move, got {other:?}"),
    }
}

// ─── Lifecycle ──────────────────────────────────────────────

#[test]
fn test_create_then_read_returns_same_game() {
    let service = service();
    let created = service.create_game(ROOM).expect("Create failed");
    assert_eq!(service.read_game(ROOM, false).expect("Read failed"), created);
    assert!(!*created.started());
    assert!(created.players().is_empty());
}

#[test]
fn test_double_create_fails_and_keeps_first_game() {
    let service = lobby(&["P1"]);
    let before = read(&service);

    let err = service.create_game(ROOM).unwrap_err();
    assert!(matches!(err, GhostError::GameAlreadyExists { .. }));
    assert_eq!(err.to_string(), "Game 'ABCD' already exists");
    assert_eq!(read(&service), before);
}

#[test]
fn test_operations_on_missing_game() {
    let service = service();
    let missing = |result: Result<GameInfo, GhostError>| {
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Game 'NOPE' does not exist");
        assert_eq!(err.status_code(), 404);
    };
    missing(service.read_game("NOPE", true));
    missing(service.start_game("NOPE"));
    missing(service.add_player("NOPE", Player::new("P1", "")));
    missing(service.remove_player("NOPE", "P1"));
    missing(service.add_move("NOPE", letter("P1", 0, 0, "A")));
    missing(service.create_challenge(
        "NOPE",
        NewChallenge::new("P2", letter("P1", 0, 0, "A"), ChallengeType::CompleteWord),
    ));
    missing(service.create_challenge_response("NOPE", ChallengeResponse::new("A", "B")));
    missing(service.add_challenge_vote("NOPE", ChallengeVote::new("P1", true)));
}

#[test]
fn test_delete_is_idempotent() {
    let service = lobby(&["P1"]);
    service.delete_game(ROOM).expect("Delete failed");
    service.delete_game(ROOM).expect("Second delete failed");
    assert!(matches!(
        service.read_game(ROOM, true),
        Err(GhostError::GameDoesNotExist { .. })
    ));
}

// ─── Joining and leaving ────────────────────────────────────

#[test]
fn test_first_joiner_holds_turn() {
    let service = lobby(&["P3", "P1", "P2"]);
    let game = read(&service);
    assert_eq!(game.turn_player_name().as_deref(), Some("P3"));
    assert_eq!(names(game.players()), vec!["P3", "P1", "P2"]);
}

#[test]
fn test_duplicate_join_is_a_no_op() {
    let service = lobby(&["P1"]);
    let before = read(&service);
    let after = service
        .add_player(ROOM, Player::new("P1", "other.png"))
        .expect("Join failed");
    assert_eq!(after, before);
}

#[test]
fn test_join_after_start_fails() {
    let service = started(&["P1", "P2"]);
    let err = service.add_player(ROOM, Player::new("P3", "")).unwrap_err();
    assert!(matches!(err, GhostError::Rule(RuleError::GameStarted { .. })));
    assert_eq!(err.status_code(), 409);
}

#[test]
fn test_removing_absent_player_is_a_no_op() {
    let service = started(&["P1", "P2"]);
    let before = read(&service);
    assert_eq!(service.remove_player(ROOM, "P9").expect("Remove failed"), before);
}

#[test]
fn test_removing_turn_player_passes_turn_to_vacated_slot() {
    let service = started(&["P1", "P2", "P3"]);
    service.add_move(ROOM, letter("P1", 0, 0, "A")).expect("Move failed");

    let game = service.remove_player(ROOM, "P2").expect("Remove failed");
    assert_eq!(names(game.players()), vec!["P1", "P3"]);
    assert_eq!(game.turn_player_name().as_deref(), Some("P3"));
}

#[test]
fn test_removing_sole_player_after_start() {
    let service = started(&["P1"]);
    let game = service.remove_player(ROOM, "P1").expect("Remove failed");
    assert!(game.players().is_empty());
    assert!(game.turn_player_name().is_none());
    assert!(game.winner().is_none());
}

#[test]
fn test_emptied_lobby_hands_turn_to_next_joiner() {
    let service = lobby(&["P1"]);
    service.remove_player(ROOM, "P1").expect("Remove failed");
    assert!(read(&service).turn_player_name().is_none());

    let game = service.add_player(ROOM, Player::new("P2", "")).expect("Join failed");
    assert_eq!(game.turn_player_name().as_deref(), Some("P2"));
}

#[test]
fn test_leaving_down_to_one_player_declares_winner() {
    let service = started(&["P1", "P2"]);
    let game = service.remove_player(ROOM, "P1").expect("Remove failed");
    assert_eq!(game.winner().as_ref().map(|w| w.name().as_str()), Some("P2"));
}

#[test]
fn test_leaving_before_start_declares_no_winner() {
    let service = lobby(&["P1", "P2"]);
    let game = service.remove_player(ROOM, "P1").expect("Remove failed");
    assert!(game.winner().is_none());
}

#[test]
fn test_start_twice_is_allowed() {
    let service = started(&["P1", "P2"]);
    let game = service.start_game(ROOM).expect("Restart failed");
    assert!(*game.started());
}

// ─── Moves ──────────────────────────────────────────────────

#[test]
fn test_first_move_passes_turn() {
    let service = started(&["P1", "P2"]);
    let mv = letter("P1", 0, 0, "Z");
    let game = service.add_move(ROOM, mv.clone()).expect("Move failed");
    assert_eq!(game.turn_player_name().as_deref(), Some("P2"));
    assert_eq!(game.moves(), &vec![mv]);
}

#[test]
fn test_move_before_start_fails() {
    let service = lobby(&["P1", "P2"]);
    let err = service.add_move(ROOM, letter("P1", 0, 0, "Z")).unwrap_err();
    assert!(matches!(err, GhostError::Rule(RuleError::GameNotStarted { .. })));
}

#[test]
fn test_wrong_player_move_leaves_game_unchanged() {
    let service = started(&["P1", "P2"]);
    let before = read(&service);

    let err = service.add_move(ROOM, letter("P2", 0, 0, "Z")).unwrap_err();
    assert_eq!(err.to_string(), "Turn player is 'P1' but 'P2' tried to move");

    let after = read(&service);
    assert_eq!(after.moves(), before.moves());
    assert_eq!(after.turn_player_name(), before.turn_player_name());
}

#[test]
fn test_duplicate_position_rejected() {
    let service = started(&["P1", "P2"]);
    service.add_move(ROOM, letter("P1", 4, -2, "A")).expect("Move failed");

    let kind = assert_invalid_move(service.add_move(ROOM, letter("P2", 4, -2, "B")));
    assert_eq!(kind, InvalidMoveKind::PositionTaken(Position::new(4, -2)));
    assert_eq!(read(&service).moves().len(), 1);
}

#[test]
fn test_move_must_be_one_letter() {
    let service = started(&["P1", "P2"]);
    assert_invalid_move(service.add_move(ROOM, letter("P1", 0, 0, "AB")));
    assert_invalid_move(service.add_move(ROOM, letter("P1", 0, 0, "")));
    assert!(read(&service).moves().is_empty());
}

#[test]
fn test_move_blocked_by_open_challenge() {
    let service = started(&["P1", "P2"]);
    service.add_move(ROOM, letter("P1", 0, 0, "A")).expect("Move failed");
    challenge(&service, "P2", ChallengeType::NoValidWords);

    let kind = assert_invalid_move(service.add_move(ROOM, letter("P1", 1, 0, "B")));
    assert_eq!(kind.to_string(), "Game 'ABCD' has an open challenge");
}

// ─── Challenges ─────────────────────────────────────────────

#[test]
fn test_no_valid_words_challenge_awaits_response_and_passes_turn() {
    let service = started(&["P1", "P2"]);
    service.add_move(ROOM, letter("P1", 0, 0, "Z")).expect("Move failed");

    let game = challenge(&service, "P2", ChallengeType::NoValidWords);
    let open = game.challenge().as_ref().expect("Challenge missing");
    assert_eq!(open.state(), ChallengeState::AwaitingResponse);
    assert_eq!(game.turn_player_name().as_deref(), Some("P1"));
}

#[test]
fn test_challenge_requires_last_move() {
    let service = started(&["P1", "P2"]);
    let first = letter("P1", 0, 0, "A");
    service.add_move(ROOM, first.clone()).expect("Move failed");
    service.add_move(ROOM, letter("P2", 1, 0, "B")).expect("Move failed");

    let kind = assert_invalid_move(service.create_challenge(
        ROOM,
        NewChallenge::new("P1", first, ChallengeType::CompleteWord),
    ));
    assert_eq!(kind, InvalidMoveKind::NotLastMove);
}

#[test]
fn test_challenge_without_moves_fails() {
    let service = started(&["P1", "P2"]);
    let kind = assert_invalid_move(service.create_challenge(
        ROOM,
        NewChallenge::new("P2", letter("P1", 0, 0, "A"), ChallengeType::CompleteWord),
    ));
    assert!(matches!(kind, InvalidMoveKind::NoMoves(_)));
}

#[test]
fn test_response_opens_voting() {
    let service = started(&["P1", "P2"]);
    service.add_move(ROOM, letter("P1", 0, 0, "Z")).expect("Move failed");
    challenge(&service, "P2", ChallengeType::NoValidWords);

    let game = service
        .create_challenge_response(ROOM, ChallengeResponse::new("ZEBRA", "ZOO"))
        .expect("Response failed");
    let open = game.challenge().as_ref().expect("Challenge missing");
    assert_eq!(open.state(), ChallengeState::Voting);
    assert_eq!(open.response().map(|r| r.row_word().as_str()), Some("ZEBRA"));

    // A second response is out of order.
    assert_invalid_move(
        service.create_challenge_response(ROOM, ChallengeResponse::new("ZAP", "ZIP")),
    );
}

#[test]
fn test_vote_before_response_rejected() {
    let service = started(&["P1", "P2"]);
    service.add_move(ROOM, letter("P1", 0, 0, "Z")).expect("Move failed");
    challenge(&service, "P2", ChallengeType::NoValidWords);

    let kind = assert_invalid_move(service.add_challenge_vote(ROOM, ChallengeVote::new("P1", true)));
    assert!(matches!(kind, InvalidMoveKind::WrongChallengeState { .. }));
}

#[test]
fn test_double_vote_and_outsider_vote_rejected() {
    let service = started(&["P1", "P2", "P3"]);
    service.add_move(ROOM, letter("P1", 0, 0, "Z")).expect("Move failed");
    challenge(&service, "P2", ChallengeType::CompleteWord);
    service
        .add_challenge_vote(ROOM, ChallengeVote::new("P1", true))
        .expect("Vote failed");

    let kind = assert_invalid_move(service.add_challenge_vote(ROOM, ChallengeVote::new("P1", false)));
    assert_eq!(kind, InvalidMoveKind::AlreadyVoted("P1".to_string()));
    let kind = assert_invalid_move(service.add_challenge_vote(ROOM, ChallengeVote::new("P9", true)));
    assert_eq!(kind, InvalidMoveKind::NotAPlayer("P9".to_string()));

    let game = read(&service);
    assert_eq!(game.challenge().as_ref().map(|c| c.votes().len()), Some(1));
}

#[test]
fn test_upheld_challenge_eliminates_mover() {
    let service = started(&["P1", "P2", "P3"]);
    service.add_move(ROOM, letter("P1", 0, 0, "Z")).expect("Move failed");
    let game = challenge(&service, "P2", ChallengeType::CompleteWord);
    assert_eq!(
        game.challenge().as_ref().map(|c| c.state()),
        Some(ChallengeState::Voting)
    );

    service
        .add_challenge_vote(ROOM, ChallengeVote::new("P1", true))
        .expect("Vote failed");
    service
        .add_challenge_vote(ROOM, ChallengeVote::new("P2", true))
        .expect("Vote failed");
    let game = service
        .add_challenge_vote(ROOM, ChallengeVote::new("P3", false))
        .expect("Vote failed");

    assert!(game.challenge().is_none());
    assert_eq!(names(game.losers()), vec!["P1"]);
    assert_eq!(names(game.players()), vec!["P2", "P3"]);
    assert_eq!(game.turn_player_name().as_deref(), Some("P3"));
    assert!(game.winner().is_none());
    assert_eq!(read(&service), game);
}

#[test]
fn test_rejected_challenge_eliminates_challenger_and_declares_winner() {
    let service = started(&["P1", "P2"]);
    service.add_move(ROOM, letter("P1", 0, 0, "Z")).expect("Move failed");
    challenge(&service, "P2", ChallengeType::CompleteWord);
    // Turn is back with P1; P2 loses with no votes in favour.
    service
        .add_challenge_vote(ROOM, ChallengeVote::new("P1", false))
        .expect("Vote failed");
    let game = service
        .add_challenge_vote(ROOM, ChallengeVote::new("P2", false))
        .expect("Vote failed");

    assert_eq!(names(game.losers()), vec!["P2"]);
    assert_eq!(names(game.players()), vec!["P1"]);
    assert_eq!(game.winner().as_ref().map(|w| w.name().as_str()), Some("P1"));
    assert_eq!(game.turn_player_name().as_deref(), Some("P1"));
}

#[test]
fn test_losing_turn_player_passes_turn() {
    let service = started(&["P1", "P2", "P3"]);
    service.add_move(ROOM, letter("P1", 0, 0, "Z")).expect("Move failed");
    // P3 challenges out of turn; the turn moves from P2 to P3.
    challenge(&service, "P3", ChallengeType::CompleteWord);
    for voter in ["P1", "P2", "P3"] {
        service
            .add_challenge_vote(ROOM, ChallengeVote::new(voter, voter == "P3"))
            .expect("Vote failed");
    }

    let game = read(&service);
    assert_eq!(names(game.losers()), vec!["P3"]);
    assert_eq!(names(game.players()), vec!["P1", "P2"]);
    assert_eq!(game.turn_player_name().as_deref(), Some("P1"));
}

#[test]
fn test_tied_vote_upholds_challenge() {
    let service = started(&["P1", "P2"]);
    service.add_move(ROOM, letter("P1", 0, 0, "Z")).expect("Move failed");
    challenge(&service, "P2", ChallengeType::CompleteWord);
    service
        .add_challenge_vote(ROOM, ChallengeVote::new("P1", false))
        .expect("Vote failed");
    let game = service
        .add_challenge_vote(ROOM, ChallengeVote::new("P2", true))
        .expect("Vote failed");

    assert_eq!(names(game.losers()), vec!["P1"]);
    assert_eq!(game.winner().as_ref().map(|w| w.name().as_str()), Some("P2"));
}

#[test]
fn test_loser_cannot_rejoin() {
    let service = lobby(&["P1", "P2", "P3"]);
    service.start_game(ROOM).expect("Start failed");
    service.add_move(ROOM, letter("P1", 0, 0, "Z")).expect("Move failed");
    challenge(&service, "P2", ChallengeType::CompleteWord);
    for voter in ["P1", "P2", "P3"] {
        service
            .add_challenge_vote(ROOM, ChallengeVote::new(voter, true))
            .expect("Vote failed");
    }
    // Joining is closed after start, and a loser is never re-added.
    assert!(service.add_player(ROOM, Player::new("P1", "")).is_err());
    assert_eq!(names(read(&service).losers()), vec!["P1"]);
}

#[test]
fn test_wire_format_after_challenge() {
    let service = started(&["P1", "P2"]);
    service.add_move(ROOM, letter("P1", 0, 0, "Z")).expect("Move failed");
    let game = challenge(&service, "P2", ChallengeType::NoValidWords);

    let json = serde_json::to_value(&game).expect("Serialize failed");
    assert_eq!(json["turnPlayerName"], "P1");
    assert_eq!(json["challenge"]["state"], "AWAITING_RESPONSE");
    assert_eq!(json["challenge"]["type"], "NO_VALID_WORDS");
    assert_eq!(json["moves"][0]["position"]["x"], 0);
}

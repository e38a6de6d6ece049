//! Pure state transitions.
//!
//! Each function validates a request against the current aggregate and
//! returns the conditional write that carries it out. Nothing here touches a
//! store, so the whole rule set is testable on plain values.
//!
//! Derived steps (turn advancement, winner detection, challenge completion)
//! are folded into the write of the transition that triggers them, so every
//! transition is exactly one atomic update.

use crate::turn::{detect_winner, next_turn_player, turn_after_removal};
use crate::{
    Challenge, ChallengeResponse, ChallengeState, ChallengeVote, GameField, GameInfo, GamePatch,
    GameUpdate, InvalidMoveKind, Move, NewChallenge, Player, RuleError,
};
use tracing::{debug, instrument};

/// Marks the game as started.
///
/// Calling this on a started game rewrites the same values. A game started
/// with a single player has that player as its winner.
#[instrument(skip(game), fields(room_code = %game.room_code()))]
pub fn start(game: &GameInfo) -> GameUpdate {
    let changes = GamePatch::default()
        .with_started(true)
        .with_winner(detect_winner(true, game.players()));
    GameUpdate::guarded(game, changes, &[GameField::Players])
}

/// Adds a player to an unstarted game.
///
/// Returns `Ok(None)` when the name is already taken by a current player or
/// a loser: joining is idempotent. The first joiner takes the turn.
///
/// # Errors
///
/// Returns [`RuleError::GameStarted`] once the game has started.
#[instrument(skip(game), fields(room_code = %game.room_code()))]
pub fn join(game: &GameInfo, player: Player) -> Result<Option<GameUpdate>, RuleError> {
    if *game.started() {
        return Err(RuleError::GameStarted {
            room_code: game.room_code().clone(),
        });
    }
    if game.has_player(player.name()) || game.has_lost(player.name()) {
        debug!(player = %player.name(), "Player already known, join is a no-op");
        return Ok(None);
    }

    let turn_player_name = game
        .turn_player_name()
        .clone()
        .or_else(|| Some(player.name().clone()));
    let mut players = game.players().clone();
    players.push(player);

    let changes = GamePatch::default()
        .with_players(players)
        .with_turn_player_name(turn_player_name);
    Ok(Some(GameUpdate::guarded(
        game,
        changes,
        &[GameField::Started, GameField::Players, GameField::TurnPlayerName],
    )))
}

/// Removes a player, passing the turn on if they held it.
///
/// Returns `None` when the player is not in the game.
#[instrument(skip(game), fields(room_code = %game.room_code()))]
pub fn leave(game: &GameInfo, player_name: &str) -> Option<GameUpdate> {
    let index = game.player_index(player_name)?;
    let turn_player_name = turn_after_removal(
        game.players(),
        index,
        game.turn_player_name().as_deref(),
    );
    let mut players = game.players().clone();
    players.remove(index);
    let winner = detect_winner(*game.started(), &players);

    let changes = GamePatch::default()
        .with_players(players)
        .with_turn_player_name(turn_player_name)
        .with_winner(winner);
    Some(GameUpdate::guarded(
        game,
        changes,
        &[
            GameField::Started,
            GameField::Players,
            GameField::TurnPlayerName,
            GameField::Winner,
        ],
    ))
}

/// Appends a move and passes the turn.
///
/// # Errors
///
/// - [`RuleError::GameNotStarted`] before the game starts
/// - [`RuleError::InvalidMove`] while a challenge is open
/// - [`RuleError::WrongPlayer`] if the mover does not hold the turn
/// - [`RuleError::InvalidMove`] if the mover left, the position is taken, or
///   the letter is not a single character
#[instrument(skip(game), fields(room_code = %game.room_code()))]
pub fn place_move(game: &GameInfo, mv: Move) -> Result<GameUpdate, RuleError> {
    if !*game.started() {
        return Err(RuleError::GameNotStarted {
            room_code: game.room_code().clone(),
        });
    }
    if game.challenge().is_some() {
        return Err(InvalidMoveKind::OpenChallenge(game.room_code().clone()).into());
    }
    if !game.is_turn_of(mv.player_name()) {
        return Err(RuleError::WrongPlayer {
            turn_player: game.turn_player_name().clone(),
            mover: mv.player_name().clone(),
        });
    }
    if !game.has_player(mv.player_name()) {
        return Err(InvalidMoveKind::NotAPlayer(mv.player_name().clone()).into());
    }
    if game.is_position_taken(mv.position()) {
        return Err(InvalidMoveKind::PositionTaken(*mv.position()).into());
    }
    if !mv.has_single_letter() {
        return Err(InvalidMoveKind::BadLetter(mv.letter().clone()).into());
    }

    let turn_player_name =
        next_turn_player(game.players(), game.turn_player_name().as_deref());
    let mut moves = game.moves().clone();
    moves.push(mv);

    let changes = GamePatch::default()
        .with_moves(moves)
        .with_turn_player_name(turn_player_name);
    Ok(GameUpdate::guarded(
        game,
        changes,
        &[
            GameField::Moves,
            GameField::Players,
            GameField::TurnPlayerName,
            GameField::Challenge,
        ],
    ))
}

/// Opens a challenge against the most recent move and passes the turn.
///
/// # Errors
///
/// Returns [`RuleError::InvalidMove`] if a challenge is already open, the
/// challenger is not a player, there are no moves, or the challenged move is
/// not the last one.
#[instrument(skip(game), fields(room_code = %game.room_code()))]
pub fn open_challenge(game: &GameInfo, request: NewChallenge) -> Result<GameUpdate, RuleError> {
    if game.challenge().is_some() {
        return Err(InvalidMoveKind::OpenChallenge(game.room_code().clone()).into());
    }
    if !game.has_player(request.challenger_name()) {
        return Err(InvalidMoveKind::NotAPlayer(request.challenger_name().clone()).into());
    }
    let last = game
        .last_move()
        .ok_or_else(|| InvalidMoveKind::NoMoves(game.room_code().clone()))?;
    if last != request.challenged_move() {
        return Err(InvalidMoveKind::NotLastMove.into());
    }

    let challenge = Challenge::open(request);
    debug!(state = %challenge.state(), "Challenge opened");
    let turn_player_name =
        next_turn_player(game.players(), game.turn_player_name().as_deref());

    let changes = GamePatch::default()
        .with_challenge(Some(challenge))
        .with_turn_player_name(turn_player_name);
    Ok(GameUpdate::guarded(
        game,
        changes,
        &[
            GameField::Challenge,
            GameField::Moves,
            GameField::Players,
            GameField::TurnPlayerName,
        ],
    ))
}

/// Records the challenged player's words and opens voting.
///
/// # Errors
///
/// Returns [`RuleError::InvalidMove`] if there is no challenge or it is not
/// awaiting a response.
#[instrument(skip(game), fields(room_code = %game.room_code()))]
pub fn respond_to_challenge(
    game: &GameInfo,
    response: ChallengeResponse,
) -> Result<GameUpdate, RuleError> {
    let challenge = open_challenge_of(game)?;
    let answered = challenge.with_response(response).ok_or_else(|| {
        InvalidMoveKind::WrongChallengeState {
            expected: ChallengeState::AwaitingResponse,
            actual: challenge.state(),
        }
    })?;

    let changes = GamePatch::default().with_challenge(Some(answered));
    Ok(GameUpdate::guarded(game, changes, &[GameField::Challenge]))
}

/// Records a vote. The last vote resolves the challenge in the same write.
///
/// # Errors
///
/// Returns [`RuleError::InvalidMove`] if there is no challenge, it is not
/// voting, the voter already voted, or the voter is not a player.
#[instrument(skip(game), fields(room_code = %game.room_code()))]
pub fn cast_vote(game: &GameInfo, vote: ChallengeVote) -> Result<GameUpdate, RuleError> {
    let challenge = open_challenge_of(game)?;
    if challenge.state() != ChallengeState::Voting {
        return Err(InvalidMoveKind::WrongChallengeState {
            expected: ChallengeState::Voting,
            actual: challenge.state(),
        }
        .into());
    }
    if challenge.has_voted(vote.voter_name()) {
        return Err(InvalidMoveKind::AlreadyVoted(vote.voter_name().clone()).into());
    }
    if !game.has_player(vote.voter_name()) {
        return Err(InvalidMoveKind::NotAPlayer(vote.voter_name().clone()).into());
    }

    let voted = challenge
        .with_vote(vote)
        .ok_or_else(|| InvalidMoveKind::WrongChallengeState {
            expected: ChallengeState::Voting,
            actual: challenge.state(),
        })?;

    if voted.votes().len() >= game.players().len() {
        debug!(votes = voted.votes().len(), "Final vote cast, resolving challenge");
        let changes = resolve_challenge(game, &voted);
        return Ok(GameUpdate::guarded(
            game,
            changes,
            &[
                GameField::Challenge,
                GameField::Players,
                GameField::Losers,
                GameField::TurnPlayerName,
                GameField::Winner,
                GameField::Started,
            ],
        ));
    }

    // Finality depends on the player count, so a concurrent leave must
    // invalidate a vote judged non-final.
    let changes = GamePatch::default().with_challenge(Some(voted));
    Ok(GameUpdate::guarded(
        game,
        changes,
        &[GameField::Challenge, GameField::Players],
    ))
}

/// Verdict of a completed vote.
///
/// [`ChallengeState::Failed`] (the challenger loses) when strictly fewer than
/// half the votes support the challenge, otherwise
/// [`ChallengeState::Success`] (the mover loses).
pub fn tally(votes: &[ChallengeVote]) -> ChallengeState {
    let pro = votes.iter().filter(|v| *v.pro_challenge()).count();
    if pro * 2 < votes.len() {
        ChallengeState::Failed
    } else {
        ChallengeState::Success
    }
}

/// Eliminates the loser of a fully voted challenge and clears it.
///
/// If the loser holds the turn, the turn passes on before they are removed.
/// A loser who already left the game is not recorded; the challenge is
/// simply cleared.
#[instrument(skip(game, challenge), fields(room_code = %game.room_code()))]
pub fn resolve_challenge(game: &GameInfo, challenge: &Challenge) -> GamePatch {
    let verdict = tally(challenge.votes());
    let loser_name = match verdict {
        ChallengeState::Failed => challenge.challenger_name().as_str(),
        _ => challenge.mover_name(),
    };
    debug!(%verdict, loser = %loser_name, "Challenge resolved");

    let patch = GamePatch::default().with_challenge(None);
    let Some(index) = game.player_index(loser_name) else {
        debug!(loser = %loser_name, "Loser already left the game");
        return patch;
    };

    let current = game.turn_player_name().as_deref();
    let turn_player_name = if game.is_turn_of(loser_name) {
        next_turn_player(game.players(), current)
    } else {
        current.map(str::to_string)
    };

    let mut players = game.players().clone();
    let loser = players.remove(index);
    let turn_player_name =
        turn_player_name.filter(|name| players.iter().any(|p| p.name() == name));

    let mut losers = game.losers().clone();
    if !game.has_lost(loser.name()) {
        losers.push(loser);
    }
    let winner = detect_winner(*game.started(), &players);

    patch
        .with_players(players)
        .with_losers(losers)
        .with_turn_player_name(turn_player_name)
        .with_winner(winner)
}

fn open_challenge_of(game: &GameInfo) -> Result<&Challenge, RuleError> {
    game.challenge()
        .as_ref()
        .ok_or_else(|| InvalidMoveKind::NoChallenge(game.room_code().clone()).into())
}

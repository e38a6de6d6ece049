//! The game service: every public operation on a room.
//!
//! Operations read the game, validate the request with
//! [`ghost_rules::transitions`], and commit the result with one conditional
//! write. A write that loses a race is retried from the read under the
//! configured [`RetryPolicy`].

use crate::{GhostError, RetryPolicy};
use ghost_rules::{
    ChallengeResponse, ChallengeVote, GameInfo, GameUpdate, GhostInvariants, InvariantSet, Move,
    NewChallenge, Player, RuleError, transitions,
};
use ghost_store::{GameStore, ReadConsistency};
use tracing::{debug, info, instrument, warn};

/// Rules engine over a [`GameStore`].
///
/// Holds no per-room state, so any number of threads may share one service
/// (or many services may share one store).
#[derive(Debug, Clone)]
pub struct GhostService<S> {
    store: S,
    retry: RetryPolicy,
}

impl<S: GameStore> GhostService<S> {
    /// Creates a service over `store`.
    #[instrument(skip(store))]
    pub fn new(store: S, retry: RetryPolicy) -> Self {
        info!("Creating game service");
        Self { store, retry }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The conflict retry policy.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Creates an empty, unstarted game.
    ///
    /// The existence check and the write are separate, so two racing creates
    /// may both succeed; the games they write are identical.
    ///
    /// # Errors
    ///
    /// Returns [`GhostError::GameAlreadyExists`] if the room is taken.
    #[instrument(skip(self))]
    pub fn create_game(&self, room_code: &str) -> Result<GameInfo, GhostError> {
        if self.store.get(room_code, ReadConsistency::Eventual)?.is_some() {
            debug!("Room already taken");
            return Err(GhostError::GameAlreadyExists {
                room_code: room_code.to_string(),
            });
        }
        let game = GameInfo::new(room_code.to_string());
        self.store.put(&game)?;
        info!("Game created");
        Ok(game)
    }

    /// Reads a game. `consistent` requests a strongly consistent read.
    ///
    /// # Errors
    ///
    /// Returns [`GhostError::GameDoesNotExist`] if the room is empty.
    #[instrument(skip(self))]
    pub fn read_game(&self, room_code: &str, consistent: bool) -> Result<GameInfo, GhostError> {
        self.load(room_code, ReadConsistency::from_flag(consistent))
    }

    /// Deletes a game. Deleting an absent game succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`GhostError::Store`] if the store fails.
    #[instrument(skip(self))]
    pub fn delete_game(&self, room_code: &str) -> Result<(), GhostError> {
        self.store.delete(room_code)?;
        info!("Game deleted");
        Ok(())
    }

    /// Starts the game.
    ///
    /// # Errors
    ///
    /// Returns [`GhostError::GameDoesNotExist`] if the room is empty.
    #[instrument(skip(self))]
    pub fn start_game(&self, room_code: &str) -> Result<GameInfo, GhostError> {
        let game = self.transition(room_code, |game| Ok(Some(transitions::start(game))))?;
        info!(players = game.players().len(), "Game started");
        Ok(game)
    }

    /// Adds a player. Re-adding a current player or a loser is a no-op.
    ///
    /// # Errors
    ///
    /// - [`GhostError::GameDoesNotExist`] if the room is empty
    /// - [`GhostError::Rule`] if the game has started
    #[instrument(skip(self, player), fields(player = %player.name()))]
    pub fn add_player(&self, room_code: &str, player: Player) -> Result<GameInfo, GhostError> {
        let game = self.transition(room_code, |game| transitions::join(game, player.clone()))?;
        info!(players = game.players().len(), "Player joined");
        Ok(game)
    }

    /// Removes a player. Removing an absent player is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GhostError::GameDoesNotExist`] if the room is empty.
    #[instrument(skip(self))]
    pub fn remove_player(&self, room_code: &str, player_name: &str) -> Result<GameInfo, GhostError> {
        let game = self.transition(room_code, |game| Ok(transitions::leave(game, player_name)))?;
        info!(
            players = game.players().len(),
            winner = ?game.winner().as_ref().map(|w| w.name()),
            "Player left"
        );
        Ok(game)
    }

    /// Places a letter and passes the turn.
    ///
    /// # Errors
    ///
    /// - [`GhostError::GameDoesNotExist`] if the room is empty
    /// - [`GhostError::Rule`] if the move breaks a rule
    #[instrument(skip(self, mv), fields(mv = %mv))]
    pub fn add_move(&self, room_code: &str, mv: Move) -> Result<GameInfo, GhostError> {
        let game = self.transition(room_code, |game| {
            transitions::place_move(game, mv.clone()).map(Some)
        })?;
        info!(moves = game.moves().len(), "Move placed");
        Ok(game)
    }

    /// Challenges the most recent move and passes the turn.
    ///
    /// # Errors
    ///
    /// - [`GhostError::GameDoesNotExist`] if the room is empty
    /// - [`GhostError::Rule`] if the challenge is not allowed
    #[instrument(
        skip(self, request),
        fields(challenger = %request.challenger_name(), kind = %request.challenge_type())
    )]
    pub fn create_challenge(
        &self,
        room_code: &str,
        request: NewChallenge,
    ) -> Result<GameInfo, GhostError> {
        let game = self.transition(room_code, |game| {
            transitions::open_challenge(game, request.clone()).map(Some)
        })?;
        info!("Challenge opened");
        Ok(game)
    }

    /// Answers an open challenge, moving it to voting.
    ///
    /// # Errors
    ///
    /// - [`GhostError::GameDoesNotExist`] if the room is empty
    /// - [`GhostError::Rule`] if no challenge awaits a response
    #[instrument(skip(self, response))]
    pub fn create_challenge_response(
        &self,
        room_code: &str,
        response: ChallengeResponse,
    ) -> Result<GameInfo, GhostError> {
        let game = self.transition(room_code, |game| {
            transitions::respond_to_challenge(game, response.clone()).map(Some)
        })?;
        info!("Challenge answered");
        Ok(game)
    }

    /// Casts a vote. The final vote resolves the challenge.
    ///
    /// The returned game comes from a strongly consistent read taken after
    /// the vote lands.
    ///
    /// # Errors
    ///
    /// - [`GhostError::GameDoesNotExist`] if the room is empty
    /// - [`GhostError::Rule`] if the vote is not allowed
    #[instrument(
        skip(self, vote),
        fields(voter = %vote.voter_name(), pro = *vote.pro_challenge())
    )]
    pub fn add_challenge_vote(
        &self,
        room_code: &str,
        vote: ChallengeVote,
    ) -> Result<GameInfo, GhostError> {
        let voted = self.transition(room_code, |game| {
            transitions::cast_vote(game, vote.clone()).map(Some)
        })?;
        if voted.challenge().is_none() {
            info!(losers = voted.losers().len(), "Challenge resolved");
        } else {
            info!("Vote recorded");
        }
        self.load(room_code, ReadConsistency::Strong)
    }

    fn load(&self, room_code: &str, consistency: ReadConsistency) -> Result<GameInfo, GhostError> {
        self.store
            .get(room_code, consistency)?
            .ok_or_else(|| GhostError::GameDoesNotExist {
                room_code: room_code.to_string(),
            })
    }

    /// Read, validate and conditionally write, retrying lost races.
    ///
    /// `validate` returning `Ok(None)` means the request is already satisfied
    /// and the game is returned as read.
    fn transition<F>(&self, room_code: &str, validate: F) -> Result<GameInfo, GhostError>
    where
        F: Fn(&GameInfo) -> Result<Option<GameUpdate>, RuleError>,
    {
        self.with_retry(room_code, |consistency| {
            let game = self.load(room_code, consistency)?;
            let Some(update) = validate(&game)? else {
                debug!("Nothing to write");
                return Ok(game);
            };
            let next = self.store.conditional_update(room_code, &update)?;
            check_invariants(&next);
            Ok(next)
        })
    }

    /// Runs `attempt` until it stops conflicting or attempts run out.
    ///
    /// The first attempt reads with eventual consistency; a retry has just
    /// lost a race, so it reads strongly.
    fn with_retry<F>(&self, room_code: &str, mut attempt: F) -> Result<GameInfo, GhostError>
    where
        F: FnMut(ReadConsistency) -> Result<GameInfo, GhostError>,
    {
        let max_attempts = (*self.retry.max_attempts()).max(1);
        let mut attempts = 1;
        loop {
            let consistency = if attempts == 1 {
                ReadConsistency::Eventual
            } else {
                ReadConsistency::Strong
            };
            match attempt(consistency) {
                Err(err) if err.is_conflict() => {
                    if attempts >= max_attempts {
                        warn!(attempts, "Write conflicts exhausted retries");
                        return Err(GhostError::Unavailable {
                            room_code: room_code.to_string(),
                            attempts,
                        });
                    }
                    let delay = self.retry.delay(attempts);
                    warn!(attempts, delay_ms = delay.as_millis() as u64, %err, "Write conflict, retrying");
                    std::thread::sleep(delay);
                    attempts += 1;
                }
                result => return result,
            }
        }
    }
}

fn check_invariants(game: &GameInfo) {
    if !cfg!(debug_assertions) {
        return;
    }
    if let Err(violations) = GhostInvariants::check_all(game) {
        for violation in violations {
            warn!(room_code = %game.room_code(), %violation, "Invariant violated after write");
        }
    }
}

//! Challenge sub-state machine.
//!
//! Internally a challenge is a tagged phase so that votes or a response can
//! never exist while the challenge is still awaiting a response. On the wire
//! the phase flattens into `state`, `response` and `votes`.

use crate::{ChallengeResponse, ChallengeState, ChallengeType, ChallengeVote, Move, NewChallenge};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Progress of an open challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengePhase {
    /// Waiting for the challenged player to name a row and column word.
    AwaitingResponse,
    /// Collecting one vote per player.
    Voting {
        /// Words named by the challenged player, if the challenge asked for them.
        response: Option<ChallengeResponse>,
        /// Votes cast so far, in arrival order.
        votes: Vec<ChallengeVote>,
    },
}

/// An open dispute over the most recent move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(into = "ChallengeRecord", try_from = "ChallengeRecord")]
pub struct Challenge {
    challenger_name: String,
    challenged_move: Move,
    challenge_type: ChallengeType,
    phase: ChallengePhase,
}

impl Challenge {
    /// Opens a challenge from a request.
    ///
    /// `NO_VALID_WORDS` waits for a response; `COMPLETE_WORD` needs no
    /// factual answer and goes straight to a vote.
    pub fn open(request: NewChallenge) -> Self {
        let phase = match request.challenge_type() {
            ChallengeType::NoValidWords => ChallengePhase::AwaitingResponse,
            ChallengeType::CompleteWord => ChallengePhase::Voting {
                response: None,
                votes: Vec::new(),
            },
        };
        Self {
            challenger_name: request.challenger_name().clone(),
            challenged_move: request.challenged_move().clone(),
            challenge_type: *request.challenge_type(),
            phase,
        }
    }

    /// Wire-level state of this challenge.
    pub fn state(&self) -> ChallengeState {
        match self.phase {
            ChallengePhase::AwaitingResponse => ChallengeState::AwaitingResponse,
            ChallengePhase::Voting { .. } => ChallengeState::Voting,
        }
    }

    /// Response recorded for the challenge, if any.
    pub fn response(&self) -> Option<&ChallengeResponse> {
        match &self.phase {
            ChallengePhase::Voting { response, .. } => response.as_ref(),
            ChallengePhase::AwaitingResponse => None,
        }
    }

    /// Votes cast so far.
    pub fn votes(&self) -> &[ChallengeVote] {
        match &self.phase {
            ChallengePhase::Voting { votes, .. } => votes,
            ChallengePhase::AwaitingResponse => &[],
        }
    }

    /// True when `voter_name` has already voted.
    pub fn has_voted(&self, voter_name: &str) -> bool {
        self.votes().iter().any(|v| v.voter_name() == voter_name)
    }

    /// Name of the player whose move is disputed.
    pub fn mover_name(&self) -> &str {
        self.challenged_move.player_name()
    }

    /// Returns this challenge moved to voting with `response` recorded.
    ///
    /// Returns `None` unless the challenge is awaiting a response.
    pub fn with_response(&self, response: ChallengeResponse) -> Option<Self> {
        match self.phase {
            ChallengePhase::AwaitingResponse => Some(Self {
                phase: ChallengePhase::Voting {
                    response: Some(response),
                    votes: Vec::new(),
                },
                ..self.clone()
            }),
            ChallengePhase::Voting { .. } => None,
        }
    }

    /// Returns this challenge with `vote` appended.
    ///
    /// Returns `None` unless the challenge is voting.
    pub fn with_vote(&self, vote: ChallengeVote) -> Option<Self> {
        match &self.phase {
            ChallengePhase::Voting { response, votes } => {
                let mut votes = votes.clone();
                votes.push(vote);
                Some(Self {
                    phase: ChallengePhase::Voting {
                        response: response.clone(),
                        votes,
                    },
                    ..self.clone()
                })
            }
            ChallengePhase::AwaitingResponse => None,
        }
    }
}

/// A stored or transmitted challenge that cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid challenge record: {}", reason)]
pub struct ChallengeDecodeError {
    /// What was wrong with the record.
    pub reason: String,
}

/// Flat wire form of [`Challenge`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChallengeRecord {
    challenger_name: String,
    #[serde(rename = "move")]
    challenged_move: Move,
    #[serde(rename = "type")]
    challenge_type: ChallengeType,
    state: ChallengeState,
    #[serde(default)]
    response: Option<ChallengeResponse>,
    #[serde(default)]
    votes: Vec<ChallengeVote>,
}

impl From<Challenge> for ChallengeRecord {
    fn from(challenge: Challenge) -> Self {
        let state = challenge.state();
        let (response, votes) = match challenge.phase {
            ChallengePhase::AwaitingResponse => (None, Vec::new()),
            ChallengePhase::Voting { response, votes } => (response, votes),
        };
        Self {
            challenger_name: challenge.challenger_name,
            challenged_move: challenge.challenged_move,
            challenge_type: challenge.challenge_type,
            state,
            response,
            votes,
        }
    }
}

impl TryFrom<ChallengeRecord> for Challenge {
    type Error = ChallengeDecodeError;

    fn try_from(record: ChallengeRecord) -> Result<Self, Self::Error> {
        let phase = match record.state {
            ChallengeState::AwaitingResponse => {
                if record.response.is_some() || !record.votes.is_empty() {
                    return Err(ChallengeDecodeError {
                        reason: "awaiting a response but already has a response or votes".into(),
                    });
                }
                ChallengePhase::AwaitingResponse
            }
            ChallengeState::Voting => ChallengePhase::Voting {
                response: record.response,
                votes: record.votes,
            },
            terminal @ (ChallengeState::Success | ChallengeState::Failed) => {
                return Err(ChallengeDecodeError {
                    reason: format!("{terminal} challenges are cleared, not stored"),
                });
            }
        };
        Ok(Self {
            challenger_name: record.challenger_name,
            challenged_move: record.challenged_move,
            challenge_type: record.challenge_type,
            phase,
        })
    }
}

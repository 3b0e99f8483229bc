//! # Ballot Errors
//!
//! Business-rule rejections. None of them is transient: a rejected
//! operation leaves no ledger entry and no counter change, and retrying the
//! same request yields the same rejection.

use meeple_core::{DurationCategory, ParticipantId, ProposalId, RoundId, ValidationError};
use thiserror::Error;

use crate::round::RoundStatus;

/// Rejection of a proposal, vote or round transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BallotError {
    /// Missing or malformed input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The voter already voted for this proposal in this round.
    #[error("participant {voter} already voted for proposal {proposal} in round {round}")]
    DuplicateVote {
        round: RoundId,
        voter: ParticipantId,
        proposal: ProposalId,
    },

    /// The voter exhausted their allowance for the proposal's category.
    #[error("participant {voter} already cast {limit} {category} votes in round {round}")]
    CategoryLimit {
        round: RoundId,
        voter: ParticipantId,
        category: DurationCategory,
        limit: usize,
    },

    /// A referenced round or proposal does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Mutation attempted against a round that is no longer active.
    #[error("round {round} is {status}, not active")]
    RoundClosed { round: RoundId, status: RoundStatus },

    /// Round state machine rejected a transition.
    #[error("invalid round transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: RoundStatus,
        to: RoundStatus,
        reason: String,
    },
}

impl BallotError {
    /// Construct a not-found error for a round.
    pub fn round_not_found(id: RoundId) -> Self {
        Self::NotFound(format!("round {id}"))
    }

    /// Construct a not-found error for a proposal.
    pub fn proposal_not_found(id: ProposalId) -> Self {
        Self::NotFound(format!("proposal {id}"))
    }
}

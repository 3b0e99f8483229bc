//! # Vote Admission
//!
//! Decides whether a ballot may be recorded. The check is pure: the store
//! loads the round, the proposal and the voter's prior votes for the round
//! inside the same transaction that will record the vote, so no other
//! writer can slip a vote in between the check and the insert.

use meeple_core::{DurationCategory, ParticipantId, Proposal, ProposalId, RoundId, ValidationError};

use crate::error::BallotError;
use crate::round::Round;

/// Votes a participant may cast per duration category in one round.
pub const MAX_VOTES_PER_CATEGORY: usize = 2;

/// A validated request to vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    pub round_id: RoundId,
    pub voter_id: ParticipantId,
    pub proposal_id: ProposalId,
}

impl Ballot {
    /// Validate raw caller input.
    pub fn new(round_id: i64, voter_id: &str, proposal_id: i64) -> Result<Self, ValidationError> {
        let voter_id =
            ParticipantId::new(voter_id).map_err(|_| ValidationError::EmptyField("voter"))?;
        Ok(Self {
            round_id: RoundId::new(round_id)?,
            voter_id,
            proposal_id: ProposalId::new(proposal_id)?,
        })
    }
}

/// A vote already recorded for the same voter and round, joined with the
/// category of the proposal it went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorVote {
    pub proposal_id: ProposalId,
    pub category: DurationCategory,
}

/// Per-round voting limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteRules {
    pub per_category_limit: usize,
}

impl Default for VoteRules {
    fn default() -> Self {
        Self {
            per_category_limit: MAX_VOTES_PER_CATEGORY,
        }
    }
}

impl VoteRules {
    /// Admit or reject `ballot`.
    ///
    /// `prior` must contain every vote `ballot.voter_id` has cast in
    /// `round`. Checks run in a fixed order: round still active, proposal
    /// belongs to the round, no duplicate, category allowance left.
    pub fn check_ballot(
        &self,
        ballot: &Ballot,
        round: &Round,
        proposal: &Proposal,
        prior: &[PriorVote],
    ) -> Result<(), BallotError> {
        round.ensure_active()?;

        if proposal.round_id != round.id {
            return Err(ValidationError::ProposalNotInRound {
                proposal: proposal.id.get(),
                expected: round.id.get(),
                actual: proposal.round_id.get(),
            }
            .into());
        }

        if prior.iter().any(|v| v.proposal_id == ballot.proposal_id) {
            return Err(BallotError::DuplicateVote {
                round: round.id,
                voter: ballot.voter_id.clone(),
                proposal: ballot.proposal_id,
            });
        }

        let used = prior
            .iter()
            .filter(|v| v.category == proposal.category)
            .count();
        if used >= self.per_category_limit {
            return Err(BallotError::CategoryLimit {
                round: round.id,
                voter: ballot.voter_id.clone(),
                category: proposal.category,
                limit: self.per_category_limit,
            });
        }

        Ok(())
    }
}

//! # Ballot Records
//!
//! Row-shaped records shared by the store implementations, the rule crate
//! and the HTTP layer. Proposals are owned by exactly one round and are
//! never deleted; a non-winning proposal is copied into the next round as a
//! fresh record with its vote count reset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::DurationCategory;
use crate::error::ValidationError;
use crate::identity::{ParticipantId, ProposalId, RoundId, VoteId};

/// A game proposed for a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub round_id: RoundId,
    pub name: String,
    pub proposer_id: ParticipantId,
    pub category: DurationCategory,
    /// Votes received in this round. Starts at zero.
    pub votes: u32,
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    /// The summary stored in a finished round's winners map.
    pub fn summary(&self) -> WinnerSummary {
        WinnerSummary {
            id: self.id,
            name: self.name.clone(),
            proposer_id: self.proposer_id.clone(),
        }
    }
}

/// A validated proposal that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProposal {
    pub round_id: RoundId,
    pub name: String,
    pub proposer_id: ParticipantId,
    pub category: DurationCategory,
}

impl NewProposal {
    /// Validate raw caller input. Every field is required; no duplicate-name
    /// check is performed.
    pub fn new(
        round_id: i64,
        name: &str,
        proposer_id: &str,
        category: &str,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        let proposer_id = ParticipantId::new(proposer_id)
            .map_err(|_| ValidationError::EmptyField("proposer"))?;
        Ok(Self {
            round_id: RoundId::new(round_id)?,
            name: name.to_string(),
            proposer_id,
            category: category.parse()?,
        })
    }

    /// Copy of an existing proposal for a successor round.
    pub fn carried_from(proposal: &Proposal, round_id: RoundId) -> Self {
        Self {
            round_id,
            name: proposal.name.clone(),
            proposer_id: proposal.proposer_id.clone(),
            category: proposal.category,
        }
    }
}

/// A single recorded vote. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub round_id: RoundId,
    pub voter_id: ParticipantId,
    pub proposal_id: ProposalId,
    pub cast_at: DateTime<Utc>,
}

/// The winning proposal of one category, as recorded on a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSummary {
    pub id: ProposalId,
    pub name: String,
    pub proposer_id: ParticipantId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_proposal_requires_every_field() {
        assert_eq!(
            NewProposal::new(1, "  ", "2", "long"),
            Err(ValidationError::EmptyField("name"))
        );
        assert_eq!(
            NewProposal::new(1, "Brass", "", "long"),
            Err(ValidationError::EmptyField("proposer"))
        );
        assert_eq!(
            NewProposal::new(1, "Brass", "2", ""),
            Err(ValidationError::EmptyField("duration"))
        );
        assert!(matches!(
            NewProposal::new(0, "Brass", "2", "long"),
            Err(ValidationError::InvalidId { field: "round", .. })
        ));
    }

    #[test]
    fn new_proposal_normalizes_input() {
        let p = NewProposal::new(3, " Brass: Birmingham ", " 2 ", "largo").unwrap();
        assert_eq!(p.round_id.get(), 3);
        assert_eq!(p.name, "Brass: Birmingham");
        assert_eq!(p.proposer_id.as_str(), "2");
        assert_eq!(p.category, DurationCategory::Long);
    }

    #[test]
    fn carried_copy_keeps_identity_fields() {
        let original = Proposal {
            id: ProposalId::new(9).unwrap(),
            round_id: RoundId::new(1).unwrap(),
            name: "Azul".into(),
            proposer_id: ParticipantId::new("5").unwrap(),
            category: DurationCategory::Short,
            votes: 4,
            created_at: Utc::now(),
        };
        let next = RoundId::new(2).unwrap();
        let copy = NewProposal::carried_from(&original, next);
        assert_eq!(copy.round_id, next);
        assert_eq!(copy.name, "Azul");
        assert_eq!(copy.proposer_id, original.proposer_id);
        assert_eq!(copy.category, DurationCategory::Short);
    }
}

//! # Tally
//!
//! Listing order, winner selection and carry-over for closing rounds.
//!
//! Winner selection is an explicit per-category reduction. Ties on vote
//! count go to the lowest proposal id, i.e. the proposal submitted first.

use std::cmp::Ordering;

use meeple_core::{DurationCategory, Proposal, ProposalId};

use crate::error::BallotError;
use crate::round::{Round, Winners};

/// Listing order: category, then votes descending, then insertion order.
pub fn ballot_order(a: &Proposal, b: &Proposal) -> Ordering {
    a.category
        .cmp(&b.category)
        .then_with(|| b.votes.cmp(&a.votes))
        .then_with(|| a.id.cmp(&b.id))
}

/// One winner per category that has at least one proposal.
pub fn select_winners(proposals: &[Proposal]) -> Winners {
    DurationCategory::ALL
        .iter()
        .filter_map(|category| {
            proposals
                .iter()
                .filter(|p| p.category == *category)
                .min_by(|a, b| ballot_order(a, b))
                .map(|p| (*category, p.summary()))
        })
        .collect()
}

/// Proposals to re-create in the successor round: everything that did not
/// win its category, in insertion order.
pub fn carry_over<'a>(proposals: &'a [Proposal], winners: &Winners) -> Vec<&'a Proposal> {
    let mut losers: Vec<&Proposal> = proposals
        .iter()
        .filter(|p| {
            winners
                .get(&p.category)
                .map_or(true, |winner| winner.id != p.id)
        })
        .collect();
    losers.sort_by_key(|p| p.id);
    losers
}

/// Everything a store needs to persist when closing `round`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosePlan<'a> {
    pub winners: Winners,
    pub carried: Vec<&'a Proposal>,
}

/// Decide the outcome of closing `round` with its `proposals`.
///
/// Fails with `RoundClosed` if the round is already finished and with
/// `NotFound` if it has no proposals.
pub fn plan_close<'a>(round: &Round, proposals: &'a [Proposal]) -> Result<ClosePlan<'a>, BallotError> {
    round.ensure_active()?;
    if proposals.is_empty() {
        return Err(BallotError::NotFound(format!("proposals for round {}", round.id)));
    }
    let winners = select_winners(proposals);
    let carried = carry_over(proposals, &winners);
    Ok(ClosePlan { winners, carried })
}

/// Result of a completed close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    /// The round that was closed, now finished.
    pub closed: Round,
    pub winners: Winners,
    /// The freshly opened active round.
    pub new_round: Round,
    /// Identifiers of the carried copies in the new round.
    pub carried_over: Vec<ProposalId>,
}

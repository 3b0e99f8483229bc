//! In-memory [`BallotStore`].
//!
//! All relations sit behind one `parking_lot` mutex that every operation
//! holds from first read to last write, so check-then-act sequences never
//! interleave. The lock is never held across an `.await`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meeple_core::{
    NewProposal, Participant, ParticipantId, Proposal, ProposalId, Roster, RoundId, Vote, VoteId,
};
use meeple_state::{
    ballot_order, plan_close, Ballot, BallotError, PriorVote, Round, RoundOutcome, RoundPlan,
    RoundSchedule, RoundStatus, VoteRules,
};
use parking_lot::Mutex;

use super::{BallotStore, CastReceipt, StoreError};

#[derive(Debug, Default)]
struct Tables {
    participants: BTreeMap<ParticipantId, Participant>,
    rounds: Vec<Round>,
    proposals: Vec<Proposal>,
    votes: Vec<Vote>,
    last_round_id: i64,
    last_proposal_id: i64,
    last_vote_id: i64,
}

impl Tables {
    fn round(&self, id: RoundId) -> Result<&Round, BallotError> {
        self.rounds
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| BallotError::round_not_found(id))
    }

    fn open_round(&mut self, plan: RoundPlan) -> Result<Round, StoreError> {
        self.last_round_id += 1;
        let round = Round {
            id: RoundId::new(self.last_round_id)?,
            sequence: plan.sequence,
            starts_at: plan.starts_at,
            ends_at: plan.ends_at,
            status: RoundStatus::Active,
            winners: None,
        };
        self.rounds.push(round.clone());
        Ok(round)
    }

    fn insert_proposal(&mut self, new: NewProposal, now: DateTime<Utc>) -> Result<Proposal, StoreError> {
        self.last_proposal_id += 1;
        let proposal = Proposal {
            id: ProposalId::new(self.last_proposal_id)?,
            round_id: new.round_id,
            name: new.name,
            proposer_id: new.proposer_id,
            category: new.category,
            votes: 0,
            created_at: now,
        };
        self.proposals.push(proposal.clone());
        Ok(proposal)
    }
}

/// Volatile store; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Participants recorded by [`BallotStore::bootstrap`].
    pub fn participants(&self) -> Vec<Participant> {
        self.tables.lock().participants.values().cloned().collect()
    }
}

#[async_trait]
impl BallotStore for MemoryStore {
    async fn bootstrap(&self, roster: &Roster, schedule: &RoundSchedule) -> Result<Round, StoreError> {
        let mut guard = self.tables.lock();
        let t = &mut *guard;
        for p in roster.iter() {
            t.participants.insert(p.id.clone(), p.clone());
        }
        if let Some(active) = t.rounds.iter().find(|r| r.is_active()) {
            return Ok(active.clone());
        }
        let now = Utc::now();
        let plan = match t.rounds.iter().max_by_key(|r| r.sequence) {
            Some(last) => schedule.successor(last, now),
            None => schedule.opening(now),
        };
        let round = t.open_round(plan)?;
        tracing::info!(round_id = %round.id, sequence = round.sequence, "round opened");
        Ok(round)
    }

    async fn current_round(&self) -> Result<Option<Round>, StoreError> {
        Ok(self.tables.lock().rounds.iter().find(|r| r.is_active()).cloned())
    }

    async fn round(&self, id: RoundId) -> Result<Option<Round>, StoreError> {
        Ok(self.tables.lock().rounds.iter().find(|r| r.id == id).cloned())
    }

    async fn rounds(&self) -> Result<Vec<Round>, StoreError> {
        let mut rounds = self.tables.lock().rounds.clone();
        rounds.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        Ok(rounds)
    }

    async fn propose(&self, proposal: NewProposal) -> Result<Proposal, StoreError> {
        let mut guard = self.tables.lock();
        guard.round(proposal.round_id)?.ensure_active()?;
        let created = guard.insert_proposal(proposal, Utc::now())?;
        tracing::info!(
            round_id = %created.round_id,
            proposal_id = %created.id,
            category = %created.category,
            "proposal created"
        );
        Ok(created)
    }

    async fn proposals(&self, round: RoundId) -> Result<Vec<Proposal>, StoreError> {
        let guard = self.tables.lock();
        guard.round(round)?;
        let mut proposals: Vec<Proposal> = guard
            .proposals
            .iter()
            .filter(|p| p.round_id == round)
            .cloned()
            .collect();
        proposals.sort_by(ballot_order);
        Ok(proposals)
    }

    async fn cast_vote(&self, ballot: Ballot, rules: VoteRules) -> Result<CastReceipt, StoreError> {
        let mut guard = self.tables.lock();
        let t = &mut *guard;

        let round = t.round(ballot.round_id)?.clone();
        let idx = t
            .proposals
            .iter()
            .position(|p| p.id == ballot.proposal_id)
            .ok_or_else(|| BallotError::proposal_not_found(ballot.proposal_id))?;
        let prior: Vec<PriorVote> = t
            .votes
            .iter()
            .filter(|v| v.round_id == round.id && v.voter_id == ballot.voter_id)
            .filter_map(|v| {
                t.proposals
                    .iter()
                    .find(|p| p.id == v.proposal_id)
                    .map(|p| PriorVote {
                        proposal_id: p.id,
                        category: p.category,
                    })
            })
            .collect();

        rules.check_ballot(&ballot, &round, &t.proposals[idx], &prior)?;

        t.last_vote_id += 1;
        let vote = Vote {
            id: VoteId::new(t.last_vote_id)?,
            round_id: ballot.round_id,
            voter_id: ballot.voter_id,
            proposal_id: ballot.proposal_id,
            cast_at: Utc::now(),
        };
        t.votes.push(vote.clone());
        let proposal = &mut t.proposals[idx];
        proposal.votes += 1;

        tracing::info!(
            round_id = %vote.round_id,
            proposal_id = %vote.proposal_id,
            voter = %vote.voter_id,
            votes = proposal.votes,
            "vote recorded"
        );
        Ok(CastReceipt {
            vote,
            proposal: proposal.clone(),
        })
    }

    async fn votes_by(&self, round: RoundId, voter: &ParticipantId) -> Result<Vec<Vote>, StoreError> {
        let guard = self.tables.lock();
        guard.round(round)?;
        Ok(guard
            .votes
            .iter()
            .filter(|v| v.round_id == round && &v.voter_id == voter)
            .cloned()
            .collect())
    }

    async fn close_round(&self, round: RoundId, schedule: &RoundSchedule) -> Result<RoundOutcome, StoreError> {
        let mut guard = self.tables.lock();
        let t = &mut *guard;
        let now = Utc::now();

        let pos = t
            .rounds
            .iter()
            .position(|r| r.id == round)
            .ok_or_else(|| BallotError::round_not_found(round))?;
        let proposals: Vec<Proposal> = t
            .proposals
            .iter()
            .filter(|p| p.round_id == round)
            .cloned()
            .collect();
        let plan = plan_close(&t.rounds[pos], &proposals)?;

        let mut closed = t.rounds[pos].clone();
        closed.finish(plan.winners.clone())?;
        let successor = schedule.successor(&closed, now);
        t.rounds[pos] = closed.clone();

        let new_round = t.open_round(successor)?;
        let mut carried_over = Vec::with_capacity(plan.carried.len());
        for original in &plan.carried {
            let copy = t.insert_proposal(NewProposal::carried_from(original, new_round.id), now)?;
            carried_over.push(copy.id);
        }

        tracing::info!(
            round_id = %closed.id,
            new_round_id = %new_round.id,
            winners = plan.winners.len(),
            carried_over = carried_over.len(),
            "round closed"
        );
        Ok(RoundOutcome {
            closed,
            winners: plan.winners,
            new_round,
            carried_over,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

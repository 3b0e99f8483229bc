//! # Vote Coordinator
//!
//! The operations of the proposal store, the vote ledger and the round
//! controller, as one service over an injected [`BallotStore`]. HTTP
//! handlers, the relay and the CLI all go through this type; none of them
//! touch a store directly.
//!
//! The coordinator adds what is not a storage concern: roster enforcement,
//! round defaulting, rejection logging, and the winners broadcast after a
//! round closes.

use std::sync::Arc;

use tokio::task::JoinSet;

use meeple_core::{NewProposal, ParticipantId, Proposal, Roster, RoundId, ValidationError, Vote};
use meeple_state::{Ballot, BallotError, Round, RoundOutcome, RoundSchedule, VoteRules};

use crate::relay::notifier::Notifier;
use crate::relay::render::render_winners;
use crate::store::{BallotStore, CastReceipt, StoreError};

/// Service facade over the ballot store.
#[derive(Clone)]
pub struct VoteCoordinator {
    store: Arc<dyn BallotStore>,
    roster: Arc<Roster>,
    notifier: Arc<dyn Notifier>,
    schedule: RoundSchedule,
    rules: VoteRules,
    enforce_roster: bool,
}

impl std::fmt::Debug for VoteCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoteCoordinator")
            .field("roster", &self.roster.len())
            .field("schedule", &self.schedule)
            .field("rules", &self.rules)
            .field("enforce_roster", &self.enforce_roster)
            .finish_non_exhaustive()
    }
}

impl VoteCoordinator {
    pub fn new(store: Arc<dyn BallotStore>, roster: Roster, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            roster: Arc::new(roster),
            notifier,
            schedule: RoundSchedule::default(),
            rules: VoteRules::default(),
            enforce_roster: false,
        }
    }

    pub fn with_schedule(mut self, schedule: RoundSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Require proposers and voters to be roster members.
    pub fn with_roster_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_roster = enforce;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn schedule(&self) -> RoundSchedule {
        self.schedule
    }

    /// Seed the store and make sure a round is active.
    pub async fn bootstrap(&self) -> Result<Round, StoreError> {
        self.store.bootstrap(&self.roster, &self.schedule).await
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    // ── Round controller ────────────────────────────────────────────

    pub async fn current_round(&self) -> Result<Option<Round>, StoreError> {
        self.store.current_round().await
    }

    /// A round by id, `NotFound` if absent.
    pub async fn round(&self, id: RoundId) -> Result<Round, StoreError> {
        self.store
            .round(id)
            .await?
            .ok_or_else(|| BallotError::round_not_found(id).into())
    }

    /// Round history, newest first.
    pub async fn rounds(&self) -> Result<Vec<Round>, StoreError> {
        self.store.rounds().await
    }

    /// The most recently finished round, if any.
    pub async fn latest_finished_round(&self) -> Result<Option<Round>, StoreError> {
        Ok(self.store.rounds().await?.into_iter().find(|r| !r.is_active()))
    }

    /// `requested` if given, otherwise the active round.
    pub async fn resolve_round(&self, requested: Option<i64>) -> Result<RoundId, StoreError> {
        match requested {
            Some(raw) => Ok(RoundId::new(raw)?),
            None => self
                .current_round()
                .await?
                .map(|r| r.id)
                .ok_or_else(|| BallotError::NotFound("active round".to_string()).into()),
        }
    }

    /// Close `round` and hand the winners broadcast to a background task,
    /// so a slow relay never holds up the caller. Delivery failures are
    /// logged only.
    pub async fn close_round(&self, round: RoundId) -> Result<RoundOutcome, StoreError> {
        let outcome = self.store.close_round(round, &self.schedule).await?;
        self.spawn_broadcast(outcome.closed.clone());
        Ok(outcome)
    }

    fn spawn_broadcast(&self, closed: Round) {
        let coordinator = self.clone();
        tokio::spawn(async move { coordinator.broadcast_winners(&closed).await });
    }

    /// Send the winners of `closed` to every roster member with a contact
    /// handle, all deliveries in flight at once.
    pub(crate) async fn broadcast_winners(&self, closed: &Round) {
        let text = render_winners(closed, &self.roster);
        let mut deliveries = JoinSet::new();
        for participant in self.roster.iter().filter(|p| !p.contact.is_empty()) {
            let notifier = Arc::clone(&self.notifier);
            let text = text.clone();
            let participant = participant.clone();
            deliveries.spawn(async move {
                let result = notifier.send(&participant.contact, &text).await;
                (participant, result)
            });
        }
        while let Some(joined) = deliveries.join_next().await {
            match joined {
                Ok((participant, Ok(()))) => tracing::info!(
                    round_id = %closed.id,
                    participant = %participant.id,
                    "winners notification sent"
                ),
                Ok((participant, Err(e))) => tracing::warn!(
                    round_id = %closed.id,
                    participant = %participant.id,
                    error = %e,
                    "winners notification failed"
                ),
                Err(e) => tracing::warn!(round_id = %closed.id, error = %e, "winners notification task failed"),
            }
        }
    }

    // ── Proposal store ──────────────────────────────────────────────

    pub async fn propose(&self, proposal: NewProposal) -> Result<Proposal, StoreError> {
        self.check_member(&proposal.proposer_id)?;
        self.store.propose(proposal).await
    }

    /// Proposals of `round`, ordered by category then votes descending.
    pub async fn list_proposals(&self, round: RoundId) -> Result<Vec<Proposal>, StoreError> {
        self.store.proposals(round).await
    }

    // ── Vote ledger ─────────────────────────────────────────────────

    pub async fn cast_vote(&self, ballot: Ballot) -> Result<CastReceipt, StoreError> {
        self.check_member(&ballot.voter_id)?;
        let round = ballot.round_id;
        let voter = ballot.voter_id.clone();
        let proposal = ballot.proposal_id;
        let result = self.store.cast_vote(ballot, self.rules).await;
        if let Some(rejection) = result.as_ref().err().and_then(StoreError::as_ballot) {
            tracing::debug!(
                round_id = %round,
                proposal_id = %proposal,
                voter = %voter,
                reason = %rejection,
                "vote rejected"
            );
        }
        result
    }

    pub async fn votes_by(&self, round: RoundId, voter: &ParticipantId) -> Result<Vec<Vote>, StoreError> {
        self.store.votes_by(round, voter).await
    }

    fn check_member(&self, id: &ParticipantId) -> Result<(), ValidationError> {
        if self.enforce_roster && !self.roster.contains(id) {
            return Err(ValidationError::UnknownParticipant(id.to_string()));
        }
        Ok(())
    }
}

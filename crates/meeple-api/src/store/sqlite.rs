//! SQLite-backed [`BallotStore`].
//!
//! Mutations acquire the writer gate, open a transaction, load what the
//! ballot rules need, decide, write and commit. The gate serializes all
//! writers of this process, so the duplicate and category-limit checks of
//! `cast_vote` always see every committed vote. Reads go straight to the
//! pool.

use async_trait::async_trait;
use chrono::Utc;
use meeple_core::{NewProposal, Participant, ParticipantId, Proposal, Roster, RoundId, Vote};
use meeple_state::{
    ballot_order, plan_close, Ballot, BallotError, Round, RoundOutcome, RoundSchedule, VoteRules,
};
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use super::{BallotStore, CastReceipt, StoreError};
use crate::db::{self, participants, proposals, rounds, votes};

/// Persistent store over an SQLite pool.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    writer: Mutex<()>,
}

impl SqliteStore {
    /// Connect to `url` and apply migrations.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = db::init_pool(url).await?;
        Ok(Self::from_pool(pool))
    }

    /// Wrap an already migrated pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            writer: Mutex::new(()),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Participants recorded by [`BallotStore::bootstrap`].
    pub async fn participants(&self) -> Result<Vec<Participant>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        participants::list(&mut conn).await
    }
}

#[async_trait]
impl BallotStore for SqliteStore {
    async fn bootstrap(&self, roster: &Roster, schedule: &RoundSchedule) -> Result<Round, StoreError> {
        let _gate = self.writer.lock().await;
        let mut tx = self.pool.begin().await?;

        for participant in roster.iter() {
            participants::upsert(&mut tx, participant).await?;
        }

        let round = match rounds::active(&mut tx).await? {
            Some(active) => active,
            None => {
                let now = Utc::now();
                let plan = match rounds::list(&mut tx).await?.first() {
                    Some(last) => schedule.successor(last, now),
                    None => schedule.opening(now),
                };
                let round = rounds::insert(&mut tx, &plan).await?;
                tracing::info!(round_id = %round.id, sequence = round.sequence, "round opened");
                round
            }
        };

        tx.commit().await?;
        Ok(round)
    }

    async fn current_round(&self) -> Result<Option<Round>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        rounds::active(&mut conn).await
    }

    async fn round(&self, id: RoundId) -> Result<Option<Round>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        rounds::get(&mut conn, id).await
    }

    async fn rounds(&self) -> Result<Vec<Round>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        rounds::list(&mut conn).await
    }

    async fn propose(&self, proposal: NewProposal) -> Result<Proposal, StoreError> {
        let _gate = self.writer.lock().await;
        let mut tx = self.pool.begin().await?;

        rounds::get(&mut tx, proposal.round_id)
            .await?
            .ok_or_else(|| BallotError::round_not_found(proposal.round_id))?
            .ensure_active()?;
        let created = proposals::insert(&mut tx, &proposal, Utc::now()).await?;

        tx.commit().await?;
        tracing::info!(
            round_id = %created.round_id,
            proposal_id = %created.id,
            category = %created.category,
            "proposal created"
        );
        Ok(created)
    }

    async fn proposals(&self, round: RoundId) -> Result<Vec<Proposal>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        if rounds::get(&mut conn, round).await?.is_none() {
            return Err(BallotError::round_not_found(round).into());
        }
        let mut listed = proposals::list_for_round(&mut conn, round).await?;
        listed.sort_by(ballot_order);
        Ok(listed)
    }

    async fn cast_vote(&self, ballot: Ballot, rules: VoteRules) -> Result<CastReceipt, StoreError> {
        let _gate = self.writer.lock().await;
        let mut tx = self.pool.begin().await?;

        let round = rounds::get(&mut tx, ballot.round_id)
            .await?
            .ok_or_else(|| BallotError::round_not_found(ballot.round_id))?;
        let mut proposal = proposals::get(&mut tx, ballot.proposal_id)
            .await?
            .ok_or_else(|| BallotError::proposal_not_found(ballot.proposal_id))?;
        let prior = votes::prior_for_voter(&mut tx, round.id, &ballot.voter_id).await?;

        rules.check_ballot(&ballot, &round, &proposal, &prior)?;

        let vote = votes::insert(&mut tx, &ballot, Utc::now()).await?;
        proposals::increment_votes(&mut tx, proposal.id).await?;
        tx.commit().await?;

        proposal.votes += 1;
        tracing::info!(
            round_id = %vote.round_id,
            proposal_id = %vote.proposal_id,
            voter = %vote.voter_id,
            votes = proposal.votes,
            "vote recorded"
        );
        Ok(CastReceipt { vote, proposal })
    }

    async fn votes_by(&self, round: RoundId, voter: &ParticipantId) -> Result<Vec<Vote>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        if rounds::get(&mut conn, round).await?.is_none() {
            return Err(BallotError::round_not_found(round).into());
        }
        votes::list_by_voter(&mut conn, round, voter).await
    }

    async fn close_round(&self, round: RoundId, schedule: &RoundSchedule) -> Result<RoundOutcome, StoreError> {
        let _gate = self.writer.lock().await;
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let current = rounds::get(&mut tx, round)
            .await?
            .ok_or_else(|| BallotError::round_not_found(round))?;
        let listed = proposals::list_for_round(&mut tx, round).await?;
        let plan = plan_close(&current, &listed)?;

        let mut closed = current;
        closed.finish(plan.winners.clone())?;
        if !rounds::finish(&mut tx, &closed).await? {
            return Err(StoreError::Corrupt(format!(
                "round {} changed status during close",
                closed.id
            )));
        }

        let new_round = rounds::insert(&mut tx, &schedule.successor(&closed, now)).await?;
        let mut carried_over = Vec::with_capacity(plan.carried.len());
        for original in &plan.carried {
            let copy =
                proposals::insert(&mut tx, &NewProposal::carried_from(original, new_round.id), now)
                    .await?;
            carried_over.push(copy.id);
        }

        tx.commit().await?;
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
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

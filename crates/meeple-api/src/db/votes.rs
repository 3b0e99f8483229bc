//! Vote ledger operations on the `votes` table.

use chrono::{DateTime, Utc};
use meeple_core::{ParticipantId, ProposalId, RoundId, Vote, VoteId};
use meeple_state::{Ballot, BallotError, PriorVote};
use sqlx::SqliteConnection;

use super::corrupt;
use crate::store::StoreError;

/// Record a vote.
///
/// The `UNIQUE (round_id, voter_id, proposal_id)` constraint backs up the
/// duplicate rule; a violation surfaces as [`BallotError::DuplicateVote`].
pub async fn insert(
    conn: &mut SqliteConnection,
    ballot: &Ballot,
    cast_at: DateTime<Utc>,
) -> Result<Vote, StoreError> {
    let result = sqlx::query(
        "INSERT INTO votes (round_id, voter_id, proposal_id, cast_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(ballot.round_id.get())
    .bind(ballot.voter_id.as_str())
    .bind(ballot.proposal_id.get())
    .bind(cast_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return StoreError::Ballot(BallotError::DuplicateVote {
                    round: ballot.round_id,
                    voter: ballot.voter_id.clone(),
                    proposal: ballot.proposal_id,
                });
            }
        }
        StoreError::Database(e)
    })?;

    let id = result.last_insert_rowid();
    Ok(Vote {
        id: VoteId::new(id).map_err(|e| corrupt("votes", id, e))?,
        round_id: ballot.round_id,
        voter_id: ballot.voter_id.clone(),
        proposal_id: ballot.proposal_id,
        cast_at,
    })
}

/// The voter's votes in `round`, joined with each proposal's category.
pub async fn prior_for_voter(
    conn: &mut SqliteConnection,
    round: RoundId,
    voter: &ParticipantId,
) -> Result<Vec<PriorVote>, StoreError> {
    let rows: Vec<(i64, String)> = sqlx::query_as(
        "SELECT v.proposal_id, p.category
         FROM votes v JOIN proposals p ON p.id = v.proposal_id
         WHERE v.round_id = ?1 AND v.voter_id = ?2",
    )
    .bind(round.get())
    .bind(voter.as_str())
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter()
        .map(|(proposal_id, category)| {
            Ok(PriorVote {
                proposal_id: ProposalId::new(proposal_id)
                    .map_err(|e| corrupt("proposals", proposal_id, e))?,
                category: category
                    .parse()
                    .map_err(|e| corrupt("proposals", proposal_id, e))?,
            })
        })
        .collect()
}

/// Votes cast by `voter` in `round`, oldest first.
pub async fn list_by_voter(
    conn: &mut SqliteConnection,
    round: RoundId,
    voter: &ParticipantId,
) -> Result<Vec<Vote>, StoreError> {
    let rows = sqlx::query_as::<_, VoteRow>(
        "SELECT id, round_id, voter_id, proposal_id, cast_at
         FROM votes WHERE round_id = ?1 AND voter_id = ?2 ORDER BY id",
    )
    .bind(round.get())
    .bind(voter.as_str())
    .fetch_all(&mut *conn)
    .await?;
    rows.into_iter().map(VoteRow::into_record).collect()
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct VoteRow {
    id: i64,
    round_id: i64,
    voter_id: String,
    proposal_id: i64,
    cast_at: DateTime<Utc>,
}

impl VoteRow {
    fn into_record(self) -> Result<Vote, StoreError> {
        let id = self.id;
        Ok(Vote {
            id: VoteId::new(id).map_err(|e| corrupt("votes", id, e))?,
            round_id: RoundId::new(self.round_id).map_err(|e| corrupt("votes", id, e))?,
            voter_id: ParticipantId::new(&self.voter_id).map_err(|e| corrupt("votes", id, e))?,
            proposal_id: ProposalId::new(self.proposal_id).map_err(|e| corrupt("votes", id, e))?,
            cast_at: self.cast_at,
        })
    }
}

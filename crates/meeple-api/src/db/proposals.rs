//! Proposal persistence operations on the `proposals` table.

use chrono::{DateTime, Utc};
use meeple_core::{NewProposal, ParticipantId, Proposal, ProposalId, RoundId};
use sqlx::SqliteConnection;

use super::corrupt;
use crate::store::StoreError;

const COLUMNS: &str = "id, round_id, name, proposer_id, category, votes, created_at";

/// Insert a proposal with zero votes.
pub async fn insert(
    conn: &mut SqliteConnection,
    new: &NewProposal,
    created_at: DateTime<Utc>,
) -> Result<Proposal, StoreError> {
    let result = sqlx::query(
        "INSERT INTO proposals (round_id, name, proposer_id, category, votes, created_at)
         VALUES (?1, ?2, ?3, ?4, 0, ?5)",
    )
    .bind(new.round_id.get())
    .bind(&new.name)
    .bind(new.proposer_id.as_str())
    .bind(new.category.as_str())
    .bind(created_at)
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    Ok(Proposal {
        id: ProposalId::new(id).map_err(|e| corrupt("proposals", id, e))?,
        round_id: new.round_id,
        name: new.name.clone(),
        proposer_id: new.proposer_id.clone(),
        category: new.category,
        votes: 0,
        created_at,
    })
}

/// Fetch a proposal by ID.
pub async fn get(conn: &mut SqliteConnection, id: ProposalId) -> Result<Option<Proposal>, StoreError> {
    let row = sqlx::query_as::<_, ProposalRow>(&format!(
        "SELECT {COLUMNS} FROM proposals WHERE id = ?1"
    ))
    .bind(id.get())
    .fetch_optional(&mut *conn)
    .await?;
    row.map(ProposalRow::into_record).transpose()
}

/// Proposals of a round in insertion order.
pub async fn list_for_round(
    conn: &mut SqliteConnection,
    round: RoundId,
) -> Result<Vec<Proposal>, StoreError> {
    let rows = sqlx::query_as::<_, ProposalRow>(&format!(
        "SELECT {COLUMNS} FROM proposals WHERE round_id = ?1 ORDER BY id"
    ))
    .bind(round.get())
    .fetch_all(&mut *conn)
    .await?;
    rows.into_iter().map(ProposalRow::into_record).collect()
}

/// Add one vote to a proposal's counter.
pub async fn increment_votes(conn: &mut SqliteConnection, id: ProposalId) -> Result<(), StoreError> {
    sqlx::query("UPDATE proposals SET votes = votes + 1 WHERE id = ?1")
        .bind(id.get())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ProposalRow {
    id: i64,
    round_id: i64,
    name: String,
    proposer_id: String,
    category: String,
    votes: i64,
    created_at: DateTime<Utc>,
}

impl ProposalRow {
    fn into_record(self) -> Result<Proposal, StoreError> {
        let id = self.id;
        Ok(Proposal {
            id: ProposalId::new(id).map_err(|e| corrupt("proposals", id, e))?,
            round_id: RoundId::new(self.round_id).map_err(|e| corrupt("proposals", id, e))?,
            name: self.name,
            proposer_id: ParticipantId::new(&self.proposer_id)
                .map_err(|e| corrupt("proposals", id, e))?,
            category: self.category.parse().map_err(|e| corrupt("proposals", id, e))?,
            votes: u32::try_from(self.votes).map_err(|e| corrupt("proposals", id, e))?,
            created_at: self.created_at,
        })
    }
}

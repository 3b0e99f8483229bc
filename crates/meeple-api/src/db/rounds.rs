//! Round persistence operations on the `rounds` table.

use chrono::{DateTime, Utc};
use meeple_core::RoundId;
use meeple_state::{Round, RoundPlan, RoundStatus, Winners};
use sqlx::SqliteConnection;

use super::corrupt;
use crate::store::StoreError;

const COLUMNS: &str = "id, sequence, starts_at, ends_at, status, winners";

/// Insert a new active round.
pub async fn insert(conn: &mut SqliteConnection, plan: &RoundPlan) -> Result<Round, StoreError> {
    let result = sqlx::query(
        "INSERT INTO rounds (sequence, starts_at, ends_at, status, winners)
         VALUES (?1, ?2, ?3, ?4, NULL)",
    )
    .bind(i64::from(plan.sequence))
    .bind(plan.starts_at)
    .bind(plan.ends_at)
    .bind(RoundStatus::Active.as_str())
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    Ok(Round {
        id: RoundId::new(id).map_err(|e| corrupt("rounds", id, e))?,
        sequence: plan.sequence,
        starts_at: plan.starts_at,
        ends_at: plan.ends_at,
        status: RoundStatus::Active,
        winners: None,
    })
}

/// Persist the finished status and winners of `round`.
///
/// Only an active row is updated; `false` means the row was not active.
pub async fn finish(conn: &mut SqliteConnection, round: &Round) -> Result<bool, StoreError> {
    let winners = serde_json::to_string(round.winners.as_ref().unwrap_or(&Winners::new()))
        .map_err(|e| StoreError::Corrupt(format!("failed to serialize winners: {e}")))?;

    let result = sqlx::query(
        "UPDATE rounds SET status = ?1, winners = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(RoundStatus::Finished.as_str())
    .bind(&winners)
    .bind(round.id.get())
    .bind(RoundStatus::Active.as_str())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Fetch a round by ID.
pub async fn get(conn: &mut SqliteConnection, id: RoundId) -> Result<Option<Round>, StoreError> {
    let row = sqlx::query_as::<_, RoundRow>(&format!("SELECT {COLUMNS} FROM rounds WHERE id = ?1"))
        .bind(id.get())
        .fetch_optional(&mut *conn)
        .await?;
    row.map(RoundRow::into_record).transpose()
}

/// The active round, if any.
pub async fn active(conn: &mut SqliteConnection) -> Result<Option<Round>, StoreError> {
    let row = sqlx::query_as::<_, RoundRow>(&format!(
        "SELECT {COLUMNS} FROM rounds WHERE status = ?1 LIMIT 1"
    ))
    .bind(RoundStatus::Active.as_str())
    .fetch_optional(&mut *conn)
    .await?;
    row.map(RoundRow::into_record).transpose()
}

/// Every round, newest first.
pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Round>, StoreError> {
    let rows = sqlx::query_as::<_, RoundRow>(&format!(
        "SELECT {COLUMNS} FROM rounds ORDER BY sequence DESC"
    ))
    .fetch_all(&mut *conn)
    .await?;
    rows.into_iter().map(RoundRow::into_record).collect()
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct RoundRow {
    id: i64,
    sequence: i64,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    status: String,
    winners: Option<String>,
}

impl RoundRow {
    fn into_record(self) -> Result<Round, StoreError> {
        let id = self.id;
        let status: RoundStatus = self.status.parse().map_err(|e| corrupt("rounds", id, e))?;
        let winners = self
            .winners
            .map(|raw| serde_json::from_str::<Winners>(&raw))
            .transpose()
            .map_err(|e| corrupt("rounds", id, e))?;
        Ok(Round {
            id: RoundId::new(id).map_err(|e| corrupt("rounds", id, e))?,
            sequence: u32::try_from(self.sequence).map_err(|e| corrupt("rounds", id, e))?,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            status,
            winners,
        })
    }
}

//! Roster persistence on the `participants` table.
//!
//! The roster file (or built-in group) is authoritative; startup upserts it
//! so the table always mirrors the running configuration.

use meeple_core::{Participant, ParticipantId};
use sqlx::SqliteConnection;

use super::corrupt;
use crate::store::StoreError;

/// Insert or refresh one participant.
pub async fn upsert(conn: &mut SqliteConnection, participant: &Participant) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO participants (id, name, contact) VALUES (?1, ?2, ?3)
         ON CONFLICT (id) DO UPDATE SET name = excluded.name, contact = excluded.contact",
    )
    .bind(participant.id.as_str())
    .bind(&participant.name)
    .bind(&participant.contact)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Every stored participant, ordered by identifier.
pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Participant>, StoreError> {
    let rows: Vec<(String, String, String)> =
        sqlx::query_as("SELECT id, name, contact FROM participants ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;
    rows.into_iter()
        .enumerate()
        .map(|(i, (id, name, contact))| {
            Ok(Participant {
                id: ParticipantId::new(&id).map_err(|e| corrupt("participants", i as i64, e))?,
                name,
                contact,
            })
        })
        .collect()
}

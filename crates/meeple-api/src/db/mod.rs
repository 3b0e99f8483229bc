//! # Database Persistence Layer
//!
//! SQLite persistence via SQLx. The functions in the submodules take a
//! `&mut SqliteConnection` so the same code runs on a pooled connection
//! for reads and inside a transaction for mutations.
//!
//! Ballot rules are enforced at the application layer (`meeple-state`);
//! the schema only backs them up with `CHECK` and `UNIQUE` constraints.

pub mod participants;
pub mod proposals;
pub mod rounds;
pub mod votes;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::store::StoreError;

/// Connect to `url`, creating the database file if needed, and run the
/// embedded migrations.
///
/// In-memory URLs (`sqlite::memory:`) get a single connection that is
/// never recycled, since every SQLite connection to `:memory:` is its own
/// database.
pub async fn init_pool(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let in_memory = url.contains(":memory:") || url.contains("mode=memory");

    let mut options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?
    };

    tracing::info!(in_memory, "connected to SQLite");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok(pool)
}

/// Map a stored value that fails validation to [`StoreError::Corrupt`].
pub(crate) fn corrupt(table: &str, id: i64, err: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt(format!("{table} row {id}: {err}"))
}

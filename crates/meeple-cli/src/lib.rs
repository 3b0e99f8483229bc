//! # meeple-cli: Operator Tool for Game-Night Voting
//!
//! The `meeple` command works directly on the service's SQLite database,
//! through the same [`VoteCoordinator`] the HTTP service uses, so every
//! rule (two votes per category, one vote per game, carry-over on close)
//! applies unchanged.
//!
//! ## Subcommands
//!
//! - `meeple round`: Show, list and close rounds.
//! - `meeple game`: List and propose games.
//! - `meeple vote`: Cast votes and list a voter's ballots.
//! - `meeple roster`: Print the participant roster.
//!
//! ```bash
//! meeple --database sqlite://meeple.db round status
//! meeple game propose --name Brass --proposer 2 --duration long
//! meeple vote cast --voter 1 --game 7
//! meeple round close
//! ```

pub mod game;
pub mod roster;
pub mod round;
pub mod vote;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use meeple_api::relay::LogNotifier;
use meeple_api::store::SqliteStore;
use meeple_api::VoteCoordinator;
use meeple_core::Roster;
use meeple_state::RoundSchedule;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Session {
    pub database: String,
    pub round_days: u32,
    pub roster: Option<std::path::PathBuf>,
    pub format: OutputFormat,
}

impl Session {
    /// Open the database, load the roster and make sure a round is active.
    pub async fn open(&self) -> Result<VoteCoordinator> {
        let roster = load_roster(self.roster.as_deref())?;
        let schedule = RoundSchedule::from_days(self.round_days)
            .with_context(|| format!("--round-days must be at least 1, got {}", self.round_days))?;
        let store = SqliteStore::connect(&self.database)
            .await
            .with_context(|| format!("failed to open database {}", self.database))?;
        let coordinator = VoteCoordinator::new(Arc::new(store), roster, Arc::new(LogNotifier))
            .with_schedule(schedule);
        coordinator
            .bootstrap()
            .await
            .context("failed to bootstrap the store")?;
        Ok(coordinator)
    }
}

pub(crate) fn load_roster(path: Option<&Path>) -> Result<Roster> {
    match path {
        Some(path) => Roster::load(path).with_context(|| format!("failed to load roster {}", path.display())),
        None => Ok(Roster::default_group()),
    }
}

/// Print `value` as pretty JSON.
pub(crate) fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

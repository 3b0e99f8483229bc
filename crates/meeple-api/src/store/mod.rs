//! # Ballot Store
//!
//! The persistence seam. Handlers and the coordinator talk to a
//! [`BallotStore`] trait object; two implementations exist:
//!
//! - [`SqliteStore`]: the production store (sqlx over SQLite). Every
//!   mutation runs in one transaction behind a store-wide writer gate.
//! - [`MemoryStore`]: all four relations behind one mutex. Used when
//!   `DATABASE_URL` is unset and by tests.
//!
//! Both stores delegate every decision to `meeple-state`; they only load
//! the rows a decision needs and persist the result, and both load and
//! persist inside the same critical section.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use meeple_core::{NewProposal, ParticipantId, Proposal, Roster, RoundId, ValidationError, Vote};
use meeple_state::{Ballot, BallotError, Round, RoundOutcome, RoundSchedule, VoteRules};
use thiserror::Error;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Failure of a store operation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The operation was rejected by a ballot rule.
    #[error(transparent)]
    Ballot(#[from] BallotError),

    /// Connection, query or migration failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back to a record.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        Self::Ballot(err.into())
    }
}

impl StoreError {
    /// The ballot rejection, if this is one.
    pub fn as_ballot(&self) -> Option<&BallotError> {
        match self {
            Self::Ballot(err) => Some(err),
            _ => None,
        }
    }
}

/// A recorded vote together with the proposal it went to, counter
/// already incremented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastReceipt {
    pub vote: Vote,
    pub proposal: Proposal,
}

/// Persistence for rounds, proposals and the vote ledger.
#[async_trait]
pub trait BallotStore: Send + Sync {
    /// Upsert the roster and open round 1 if no round is active. Returns
    /// the active round.
    async fn bootstrap(&self, roster: &Roster, schedule: &RoundSchedule) -> Result<Round, StoreError>;

    /// The single active round, if any.
    async fn current_round(&self) -> Result<Option<Round>, StoreError>;

    async fn round(&self, id: RoundId) -> Result<Option<Round>, StoreError>;

    /// Every round, newest first.
    async fn rounds(&self) -> Result<Vec<Round>, StoreError>;

    /// Register a proposal with zero votes under an active round.
    async fn propose(&self, proposal: NewProposal) -> Result<Proposal, StoreError>;

    /// Proposals of a round in listing order. `NotFound` if the round
    /// does not exist.
    async fn proposals(&self, round: RoundId) -> Result<Vec<Proposal>, StoreError>;

    /// Admit and record a vote, incrementing the proposal's counter, as
    /// one atomic step.
    async fn cast_vote(&self, ballot: Ballot, rules: VoteRules) -> Result<CastReceipt, StoreError>;

    /// Votes cast by `voter` in `round`, oldest first.
    async fn votes_by(&self, round: RoundId, voter: &ParticipantId) -> Result<Vec<Vote>, StoreError>;

    /// Finish `round`, record its winners and open the successor with the
    /// carried-over proposals.
    async fn close_round(&self, round: RoundId, schedule: &RoundSchedule) -> Result<RoundOutcome, StoreError>;

    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}

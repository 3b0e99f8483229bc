//! # Round Lifecycle
//!
//! A round is a bounded voting period. Exactly one round is active at a
//! time; closing it is the only transition and always opens a successor,
//! so the invariant holds everywhere except inside the closing transaction.
//! Rounds are never deleted.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use meeple_core::{DurationCategory, RoundId, WinnerSummary};
use serde::{Deserialize, Serialize};

use crate::error::BallotError;

/// Default length of a round in days.
pub const DEFAULT_ROUND_DAYS: u32 = 7;

/// Per-category winners of a finished round. Categories without proposals
/// have no entry.
pub type Winners = BTreeMap<DurationCategory, WinnerSummary>;

/// Lifecycle state of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    /// Accepting proposals and votes.
    Active,
    /// Closed; winners recorded. Terminal state.
    Finished,
}

impl RoundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl std::fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "finished" => Ok(Self::Finished),
            other => Err(format!("unknown round status '{other}'")),
        }
    }
}

/// A stored round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    /// 1 for the first round, previous + 1 for each successor.
    pub sequence: u32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: RoundStatus,
    /// Populated only once the round is finished.
    pub winners: Option<Winners>,
}

impl Round {
    pub fn is_active(&self) -> bool {
        self.status == RoundStatus::Active
    }

    /// Reject mutations of a round that is no longer active.
    pub fn ensure_active(&self) -> Result<(), BallotError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(BallotError::RoundClosed {
                round: self.id,
                status: self.status,
            })
        }
    }

    /// Transition `Active → Finished`, recording the winners.
    pub fn finish(&mut self, winners: Winners) -> Result<(), BallotError> {
        if self.status.is_terminal() {
            return Err(BallotError::InvalidTransition {
                from: self.status,
                to: RoundStatus::Finished,
                reason: format!("round {} is already finished", self.id),
            });
        }
        self.status = RoundStatus::Finished;
        self.winners = Some(winners);
        Ok(())
    }
}

/// A round that has been planned but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPlan {
    pub sequence: u32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Timing policy for newly opened rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSchedule {
    length: Duration,
}

impl RoundSchedule {
    /// Schedule with rounds of the given number of days. Zero days is
    /// rejected since a round must have a non-empty window.
    pub fn from_days(days: u32) -> Option<Self> {
        if days == 0 {
            return None;
        }
        Some(Self {
            length: Duration::days(i64::from(days)),
        })
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    /// The very first round, opened when the store is empty.
    pub fn opening(&self, now: DateTime<Utc>) -> RoundPlan {
        RoundPlan {
            sequence: 1,
            starts_at: now,
            ends_at: now + self.length,
        }
    }

    /// The round that replaces `closed`.
    pub fn successor(&self, closed: &Round, now: DateTime<Utc>) -> RoundPlan {
        RoundPlan {
            sequence: closed.sequence + 1,
            starts_at: now,
            ends_at: now + self.length,
        }
    }
}

impl Default for RoundSchedule {
    fn default() -> Self {
        Self {
            length: Duration::days(i64::from(DEFAULT_ROUND_DAYS)),
        }
    }
}

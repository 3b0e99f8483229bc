//! # Validation Errors
//!
//! Raised when caller input is missing or malformed. Never retried; the
//! caller is expected to fix the request.

use thiserror::Error;

/// Input rejected before any state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or blank after trimming.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// The duration category is not one of the fixed enumeration.
    #[error("unknown duration category '{0}' (expected one of: long, short)")]
    UnknownCategory(String),

    /// The participant is not part of the roster.
    #[error("participant '{0}' is not on the roster")]
    UnknownParticipant(String),

    /// A numeric identifier was zero or negative.
    #[error("{field} must be a positive integer, got {value}")]
    InvalidId {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// The proposal belongs to a different round than the one referenced.
    #[error("proposal {proposal} belongs to round {actual}, not round {expected}")]
    ProposalNotInRound {
        /// The proposal that was referenced.
        proposal: i64,
        /// The round named by the caller.
        expected: i64,
        /// The round the proposal actually belongs to.
        actual: i64,
    },
}

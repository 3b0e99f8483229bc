//! # Identity Newtypes
//!
//! Integer identifiers are assigned by the store on insertion and are always
//! positive. Participant identifiers are short strings taken from the roster
//! and are validated to be non-blank at construction time.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Implements the shared surface of an integer row identifier.
macro_rules! row_id {
    ($(#[$meta:meta])* $ty:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $ty(i64);

        impl $ty {
            /// Wrap a store-assigned identifier, rejecting non-positive values.
            pub fn new(raw: i64) -> Result<Self, ValidationError> {
                if raw <= 0 {
                    return Err(ValidationError::InvalidId { field: $field, value: raw });
                }
                Ok(Self(raw))
            }

            /// The underlying integer.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Identifier of a voting round.
    RoundId,
    "round"
);

row_id!(
    /// Identifier of a game proposal.
    ProposalId,
    "proposal"
);

row_id!(
    /// Identifier of a recorded vote.
    VoteId,
    "vote"
);

/// Identifier of a participant (voter or proposer).
///
/// Deserialization routes through [`ParticipantId::new`] so blank values
/// are rejected at the boundary instead of reaching the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a participant identifier. Surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("participant"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ParticipantId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

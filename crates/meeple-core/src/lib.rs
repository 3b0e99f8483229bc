//! # meeple-core: Foundational Types for Game-Night Voting
//!
//! Leaf crate of the meeple workspace. Every other crate depends on it; it
//! depends on nothing internal.
//!
//! ## Contents
//!
//! - [`identity`]: newtypes for round, proposal, vote and participant
//!   identifiers. A [`ProposalId`] cannot be passed where a [`RoundId`] is
//!   expected.
//! - [`category`]: the closed [`DurationCategory`] enumeration that
//!   partitions proposals and per-voter vote limits.
//! - [`roster`]: the static group of [`Participant`]s.
//! - [`record`]: proposal, vote and winner records as they are persisted.
//! - [`error`]: [`ValidationError`] for malformed input.
//!
//! ## Crate Policy
//!
//! - No I/O beyond reading a roster file.
//! - No `.unwrap()` outside tests.

pub mod category;
pub mod error;
pub mod identity;
pub mod record;
pub mod roster;

pub use category::DurationCategory;
pub use error::ValidationError;
pub use identity::{ParticipantId, ProposalId, RoundId, VoteId};
pub use record::{NewProposal, Proposal, Vote, WinnerSummary};
pub use roster::{Participant, Roster, RosterError};

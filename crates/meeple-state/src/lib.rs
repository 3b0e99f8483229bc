//! # meeple-state: Round Lifecycle and Ballot Rules
//!
//! All decision logic of the voting coordinator, free of I/O. Store
//! implementations load the rows a decision needs, call into this crate
//! inside their transaction, and persist whatever it returns.
//!
//! ## Modules
//!
//! - [`round`]: the `active → finished` round state machine and the
//!   schedule that opens successor rounds.
//! - [`ballot`]: vote admission (no duplicate votes, at most
//!   [`MAX_VOTES_PER_CATEGORY`] votes per voter and category).
//! - [`tally`]: ballot ordering, per-category winner selection and the
//!   carry-over of losing proposals.
//!
//! ## Round State Machine
//!
//! ```text
//! Active ──close──▶ Finished      (one way; closing opens the successor)
//! ```

pub mod ballot;
pub mod error;
pub mod round;
pub mod tally;

pub use ballot::{Ballot, PriorVote, VoteRules, MAX_VOTES_PER_CATEGORY};
pub use error::BallotError;
pub use round::{Round, RoundPlan, RoundSchedule, RoundStatus, Winners, DEFAULT_ROUND_DAYS};
pub use tally::{ballot_order, carry_over, plan_close, select_winners, ClosePlan, RoundOutcome};

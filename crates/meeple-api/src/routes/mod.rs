//! # API Route Modules
//!
//! - `roster`: the participant list.
//! - `rounds`: current round, round history, and closing a round (admin).
//! - `proposals`: listing and proposing games.
//! - `votes`: casting votes and reading a voter's ballots.
//! - `relay`: the inbound messaging webhook.
//!
//! JSON field names (`round`, `proposer`, `duration`, `game_id`,
//! `start_date`, ...) are those the browser front-end already consumes.

pub mod proposals;
pub mod relay;
pub mod roster;
pub mod rounds;
pub mod votes;

//! Plain-text rendering for the messaging relay.
//!
//! Output uses WhatsApp-style `*bold*` markup and stays under a few hundred
//! characters for a typical round.

use std::fmt::Write;

use meeple_core::{Proposal, Roster, Vote};
use meeple_state::Round;

use super::command::RelayCommand;

pub fn render_menu() -> String {
    let mut out = String::from("*GAME NIGHT VOTING*\n\n");
    for (code, command) in RelayCommand::MENU {
        let _ = writeln!(out, "{code}. {}", command.label());
    }
    out.push_str("\nReply with the number of an option.");
    out
}

/// Proposals of `round` in listing order.
pub fn render_proposal_list(round: &Round, proposals: &[Proposal], roster: &Roster) -> String {
    let mut out = format!("*GAMES, ROUND {}*\n", round.sequence);
    if proposals.is_empty() {
        out.push_str("\nNo games proposed yet. Send 4 to propose one.");
        return out;
    }
    for p in proposals {
        let _ = write!(
            out,
            "\nID: {}\n{} ({})\nProposed by: {}\nVotes: {}\n",
            p.id,
            p.name,
            p.category,
            roster.display_name(&p.proposer_id),
            p.votes
        );
    }
    out
}

/// Winners of a finished round.
pub fn render_winners(round: &Round, roster: &Roster) -> String {
    let mut out = format!("*WINNERS, ROUND {}*\n", round.sequence);
    match round.winners.as_ref().filter(|w| !w.is_empty()) {
        Some(winners) => {
            for (category, winner) in winners {
                let _ = write!(
                    out,
                    "\n{}: {} (proposed by {})",
                    category,
                    winner.name,
                    roster.display_name(&winner.proposer_id)
                );
            }
        }
        None => out.push_str("\nNo winners were recorded."),
    }
    out
}

/// A voter's ballots in `round`, with proposal names resolved from
/// `proposals`.
pub fn render_votes(round: &Round, votes: &[Vote], proposals: &[Proposal]) -> String {
    let mut out = format!("*YOUR VOTES, ROUND {}*\n", round.sequence);
    if votes.is_empty() {
        out.push_str("\nYou have not voted yet. Send 2 to vote.");
        return out;
    }
    for vote in votes {
        match proposals.iter().find(|p| p.id == vote.proposal_id) {
            Some(p) => {
                let _ = write!(out, "\n{} ({})", p.name, p.category);
            }
            None => {
                let _ = write!(out, "\nproposal {}", vote.proposal_id);
            }
        }
    }
    out
}

pub fn render_vote_usage(round: &Round) -> String {
    format!(
        "To vote in round {}, send POST /api/vote with your player id and the game ID \
         from option 1. You have two votes per duration (long, short).",
        round.sequence
    )
}

pub fn render_propose_usage(round: &Round) -> String {
    format!(
        "To propose a game for round {}, send POST /api/add-game with the name, \
         your player id and the duration (long or short).",
        round.sequence
    )
}

pub fn render_no_active_round() -> String {
    "There is no active round right now.".to_string()
}

pub fn render_no_winners_yet() -> String {
    "No round has finished yet.".to_string()
}

pub fn render_unknown_sender() -> String {
    "This number is not on the roster, so there are no votes to show.".to_string()
}

pub fn render_unknown_command() -> String {
    "Sorry, I did not understand that. Send *menu* to see the options.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use meeple_core::{DurationCategory, ParticipantId, ProposalId, RoundId, VoteId};
    use meeple_state::{RoundStatus, Winners};

    fn round() -> Round {
        let now = Utc::now();
        Round {
            id: RoundId::new(3).unwrap(),
            sequence: 2,
            starts_at: now,
            ends_at: now + Duration::days(7),
            status: RoundStatus::Active,
            winners: None,
        }
    }

    fn proposal(id: i64, name: &str, proposer: &str, votes: u32) -> Proposal {
        Proposal {
            id: ProposalId::new(id).unwrap(),
            round_id: RoundId::new(3).unwrap(),
            name: name.to_string(),
            proposer_id: ParticipantId::new(proposer).unwrap(),
            category: DurationCategory::Long,
            votes,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn menu_lists_every_option() {
        let menu = render_menu();
        for (code, command) in RelayCommand::MENU {
            assert!(menu.contains(&format!("{code}. {}", command.label())));
        }
    }

    #[test]
    fn proposal_list_shows_names_and_votes() {
        let text = render_proposal_list(
            &round(),
            &[proposal(7, "Brass", "2", 3)],
            &Roster::default_group(),
        );
        assert!(text.contains("ROUND 2"));
        assert!(text.contains("ID: 7"));
        assert!(text.contains("Brass (long)"));
        assert!(text.contains("Proposed by: Fercho"));
        assert!(text.contains("Votes: 3"));
    }

    #[test]
    fn empty_proposal_list_points_to_propose() {
        let text = render_proposal_list(&round(), &[], &Roster::default_group());
        assert!(text.contains("No games proposed yet"));
    }

    #[test]
    fn winners_render_per_category() {
        let mut r = round();
        let mut winners = Winners::new();
        winners.insert(DurationCategory::Long, proposal(7, "Brass", "2", 3).summary());
        r.finish(winners).unwrap();
        let text = render_winners(&r, &Roster::default_group());
        assert!(text.contains("long: Brass (proposed by Fercho)"));
    }

    #[test]
    fn votes_resolve_proposal_names() {
        let r = round();
        let vote = Vote {
            id: VoteId::new(1).unwrap(),
            round_id: r.id,
            voter_id: ParticipantId::new("1").unwrap(),
            proposal_id: ProposalId::new(7).unwrap(),
            cast_at: Utc::now(),
        };
        let text = render_votes(&r, &[vote], &[proposal(7, "Brass", "2", 1)]);
        assert!(text.contains("Brass (long)"));
        assert!(render_votes(&r, &[], &[]).contains("not voted yet"));
    }
}

//! # Vote Subcommand
//!
//! Cast a vote, or list the votes a participant has cast in a round.

use anyhow::Result;
use clap::{Args, Subcommand};

use meeple_api::routes::votes::VoteView;
use meeple_api::VoteCoordinator;
use meeple_core::ParticipantId;
use meeple_state::Ballot;

use crate::{print_json, OutputFormat};

/// Arguments for the `meeple vote` subcommand.
#[derive(Args, Debug)]
pub struct VoteArgs {
    #[command(subcommand)]
    pub command: VoteCommand,
}

#[derive(Subcommand, Debug)]
pub enum VoteCommand {
    /// Cast a vote for a game.
    Cast {
        /// Participant id of the voter.
        #[arg(long)]
        voter: String,
        /// Game (proposal) id.
        #[arg(long)]
        game: i64,
        /// Round id; defaults to the active round.
        #[arg(long)]
        round: Option<i64>,
    },

    /// List the votes a participant has cast.
    List {
        #[arg(long)]
        voter: String,
        /// Round id; defaults to the active round.
        #[arg(long)]
        round: Option<i64>,
    },
}

/// Execute the vote subcommand.
pub async fn run_vote(args: &VoteArgs, coordinator: &VoteCoordinator, format: OutputFormat) -> Result<u8> {
    match &args.command {
        VoteCommand::Cast { voter, game, round } => {
            let round = coordinator.resolve_round(*round).await?;
            let receipt = coordinator
                .cast_vote(Ballot::new(round.get(), voter, *game)?)
                .await?;
            if format == OutputFormat::Json {
                print_json(&VoteView::from(&receipt.vote))?;
            } else {
                println!(
                    "OK: {voter} voted for {} ({} votes)",
                    receipt.proposal.name, receipt.proposal.votes
                );
            }
            Ok(0)
        }
        VoteCommand::List { voter, round } => {
            let voter = ParticipantId::new(voter)?;
            let round = coordinator.resolve_round(*round).await?;
            let votes = coordinator.votes_by(round, &voter).await?;
            if format == OutputFormat::Json {
                print_json(&votes.iter().map(VoteView::from).collect::<Vec<_>>())?;
                return Ok(0);
            }
            if votes.is_empty() {
                println!("{voter} has not voted in round {round}.");
                return Ok(0);
            }
            let proposals = coordinator.list_proposals(round).await?;
            println!("Votes by {voter} ({}):", votes.len());
            for vote in &votes {
                let name = proposals
                    .iter()
                    .find(|p| p.id == vote.proposal_id)
                    .map_or("?", |p| p.name.as_str());
                println!("  [{}] {name}", vote.proposal_id);
            }
            Ok(0)
        }
    }
}

//! # Game Subcommand
//!
//! List the games of a round or propose a new one.

use anyhow::Result;
use clap::{Args, Subcommand};

use meeple_api::routes::proposals::ProposalView;
use meeple_api::VoteCoordinator;
use meeple_core::{DurationCategory, NewProposal};

use crate::{print_json, OutputFormat};

/// Arguments for the `meeple game` subcommand.
#[derive(Args, Debug)]
pub struct GameArgs {
    #[command(subcommand)]
    pub command: GameCommand,
}

#[derive(Subcommand, Debug)]
pub enum GameCommand {
    /// List games, grouped by duration and sorted by votes.
    List {
        /// Round id; defaults to the active round.
        #[arg(long)]
        round: Option<i64>,
    },

    /// Propose a game.
    Propose {
        #[arg(long)]
        name: String,
        /// Participant id of the proposer.
        #[arg(long)]
        proposer: String,
        /// `long` or `short`.
        #[arg(long)]
        duration: String,
        /// Round id; defaults to the active round.
        #[arg(long)]
        round: Option<i64>,
    },
}

/// Execute the game subcommand.
pub async fn run_game(args: &GameArgs, coordinator: &VoteCoordinator, format: OutputFormat) -> Result<u8> {
    match &args.command {
        GameCommand::List { round } => {
            let round = coordinator.resolve_round(*round).await?;
            let proposals = coordinator.list_proposals(round).await?;
            let roster = coordinator.roster();
            if format == OutputFormat::Json {
                let views: Vec<ProposalView> = proposals.iter().map(|p| ProposalView::new(p, roster)).collect();
                print_json(&views)?;
                return Ok(0);
            }
            if proposals.is_empty() {
                println!("No games proposed in round {round}.");
                return Ok(0);
            }
            for category in DurationCategory::ALL {
                let in_category: Vec<_> = proposals.iter().filter(|p| p.category == category).collect();
                if in_category.is_empty() {
                    continue;
                }
                println!("{category}:");
                for p in in_category {
                    println!(
                        "  [{}] {} ({} votes, proposed by {})",
                        p.id,
                        p.name,
                        p.votes,
                        roster.display_name(&p.proposer_id)
                    );
                }
            }
            Ok(0)
        }
        GameCommand::Propose {
            name,
            proposer,
            duration,
            round,
        } => {
            let round = coordinator.resolve_round(*round).await?;
            let proposal = coordinator
                .propose(NewProposal::new(round.get(), name, proposer, duration)?)
                .await?;
            if format == OutputFormat::Json {
                print_json(&ProposalView::new(&proposal, coordinator.roster()))?;
            } else {
                println!(
                    "OK: proposed {} ({}) as game {}",
                    proposal.name, proposal.category, proposal.id
                );
            }
            Ok(0)
        }
    }
}

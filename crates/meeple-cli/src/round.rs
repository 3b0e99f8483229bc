//! # Round Subcommand
//!
//! - `status`: the active round.
//! - `list`: every round, newest first, with winners.
//! - `close`: close a round (the active one by default) and open the next.

use anyhow::Result;
use clap::{Args, Subcommand};

use meeple_api::routes::rounds::{winner_views, RoundView};
use meeple_api::VoteCoordinator;
use meeple_core::RoundId;
use meeple_state::Round;

use crate::{print_json, OutputFormat};

/// Arguments for the `meeple round` subcommand.
#[derive(Args, Debug)]
pub struct RoundArgs {
    #[command(subcommand)]
    pub command: RoundCommand,
}

#[derive(Subcommand, Debug)]
pub enum RoundCommand {
    /// Show the active round.
    Status,

    /// List every round, newest first.
    List,

    /// Show one round.
    Show {
        /// Round id.
        id: i64,
    },

    /// Close a round: record winners, open the next round, carry the
    /// other games over.
    Close {
        /// Round id; defaults to the active round.
        #[arg(long)]
        round: Option<i64>,
    },
}

/// Execute the round subcommand.
pub async fn run_round(args: &RoundArgs, coordinator: &VoteCoordinator, format: OutputFormat) -> Result<u8> {
    match &args.command {
        RoundCommand::Status => match coordinator.current_round().await? {
            Some(round) => print_round(&round, format),
            None => {
                println!("No active round.");
                Ok(1)
            }
        },
        RoundCommand::List => {
            let rounds = coordinator.rounds().await?;
            if format == OutputFormat::Json {
                print_json(&rounds.iter().map(RoundView::from).collect::<Vec<_>>())?;
                return Ok(0);
            }
            println!("Rounds ({}):", rounds.len());
            for round in &rounds {
                println!("  {}", summary_line(round));
            }
            Ok(0)
        }
        RoundCommand::Show { id } => {
            let round = coordinator.round(RoundId::new(*id)?).await?;
            print_round(&round, format)
        }
        RoundCommand::Close { round } => {
            let round = coordinator.resolve_round(*round).await?;
            let outcome = coordinator.close_round(round).await?;
            if format == OutputFormat::Json {
                print_json(&serde_json::json!({
                    "round": outcome.closed.id.get(),
                    "winners": winner_views(&outcome.winners),
                    "new_round": outcome.new_round.id.get(),
                    "new_round_number": outcome.new_round.sequence,
                    "carried_over": outcome.carried_over.iter().map(|id| id.get()).collect::<Vec<_>>(),
                }))?;
                return Ok(0);
            }
            println!("OK: closed round {}", outcome.closed.sequence);
            if outcome.winners.is_empty() {
                println!("  No winners.");
            }
            for (category, winner) in &outcome.winners {
                println!(
                    "  {category}: {} (id {}, proposed by {})",
                    winner.name,
                    winner.id,
                    coordinator.roster().display_name(&winner.proposer_id)
                );
            }
            println!(
                "  Opened round {} (id {}), {} game(s) carried over",
                outcome.new_round.sequence,
                outcome.new_round.id,
                outcome.carried_over.len()
            );
            Ok(0)
        }
    }
}

fn summary_line(round: &Round) -> String {
    format!(
        "#{} (id {}): {}, {} to {}",
        round.sequence,
        round.id,
        round.status,
        round.starts_at.format("%Y-%m-%d"),
        round.ends_at.format("%Y-%m-%d")
    )
}

fn print_round(round: &Round, format: OutputFormat) -> Result<u8> {
    if format == OutputFormat::Json {
        print_json(&RoundView::from(round))?;
        return Ok(0);
    }
    println!("Round {}", summary_line(round));
    if let Some(winners) = &round.winners {
        for (category, winner) in winners {
            println!("  {category}: {} (id {})", winner.name, winner.id);
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Session;
    use meeple_core::NewProposal;

    async fn session() -> (tempfile::TempDir, VoteCoordinator) {
        let dir = tempfile::tempdir().unwrap();
        let session = Session {
            database: format!("sqlite://{}", dir.path().join("meeple.db").display()),
            round_days: 7,
            roster: None,
            format: OutputFormat::Text,
        };
        let coordinator = session.open().await.unwrap();
        (dir, coordinator)
    }

    #[tokio::test]
    async fn status_reports_active_round() {
        let (_dir, c) = session().await;
        let args = RoundArgs {
            command: RoundCommand::Status,
        };
        assert_eq!(run_round(&args, &c, OutputFormat::Text).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn close_opens_next_round() {
        let (_dir, c) = session().await;
        let round = c.resolve_round(None).await.unwrap();
        c.propose(NewProposal::new(round.get(), "Brass", "1", "long").unwrap())
            .await
            .unwrap();

        let args = RoundArgs {
            command: RoundCommand::Close { round: None },
        };
        assert_eq!(run_round(&args, &c, OutputFormat::Json).await.unwrap(), 0);
        assert_eq!(c.current_round().await.unwrap().unwrap().sequence, 2);

        let again = RoundArgs {
            command: RoundCommand::Close {
                round: Some(round.get()),
            },
        };
        assert!(run_round(&again, &c, OutputFormat::Text).await.is_err());
    }

    #[tokio::test]
    async fn show_unknown_round_fails() {
        let (_dir, c) = session().await;
        let args = RoundArgs {
            command: RoundCommand::Show { id: 99 },
        };
        let err = run_round(&args, &c, OutputFormat::Text).await.unwrap_err();
        assert!(err.to_string().contains("round 99 not found"));
    }
}

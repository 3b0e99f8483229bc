//! # meeple CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use meeple_cli::game::{run_game, GameArgs};
use meeple_cli::roster::{run_roster, RosterArgs};
use meeple_cli::round::{run_round, RoundArgs};
use meeple_cli::vote::{run_vote, VoteArgs};
use meeple_cli::{OutputFormat, Session};

/// Game-night voting: inspect and close rounds, propose games, vote.
#[derive(Parser, Debug)]
#[command(name = "meeple", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// SQLite database URL or path.
    #[arg(long, env = "DATABASE_URL", global = true)]
    database: Option<String>,

    /// Length in days of rounds opened by `round close`.
    #[arg(long, env = "MEEPLE_ROUND_DAYS", default_value_t = meeple_state::DEFAULT_ROUND_DAYS, global = true)]
    round_days: u32,

    /// YAML roster file; defaults to the built-in group.
    #[arg(long, env = "MEEPLE_ROSTER", global = true)]
    roster: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show, list and close rounds.
    Round(RoundArgs),

    /// List and propose games.
    Game(GameArgs),

    /// Cast votes and list a voter's votes.
    Vote(VoteArgs),

    /// Print the participant roster.
    Roster(RosterArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    if let Commands::Roster(args) = &cli.command {
        return run_roster(args, cli.roster.as_deref(), cli.format);
    }

    let Some(database) = cli.database else {
        anyhow::bail!("no database given; pass --database or set DATABASE_URL");
    };
    let session = Session {
        database,
        round_days: cli.round_days,
        roster: cli.roster,
        format: cli.format,
    };
    tracing::debug!(database = %session.database, "opening store");
    let coordinator = session.open().await?;

    match &cli.command {
        Commands::Round(args) => run_round(args, &coordinator, session.format).await,
        Commands::Game(args) => run_game(args, &coordinator, session.format).await,
        Commands::Vote(args) => run_vote(args, &coordinator, session.format).await,
        Commands::Roster(_) => Ok(0),
    }
}

//! # Roster Subcommand
//!
//! Prints the participant roster: the `--roster` file when given, the
//! built-in group otherwise. Needs no database.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use meeple_api::routes::roster::PlayerView;

use crate::{load_roster, print_json, OutputFormat};

/// Arguments for the `meeple roster` subcommand.
#[derive(Args, Debug)]
pub struct RosterArgs {
    /// Also print messaging contact handles.
    #[arg(long)]
    pub contacts: bool,
}

/// Execute the roster subcommand.
pub fn run_roster(args: &RosterArgs, roster_path: Option<&Path>, format: OutputFormat) -> Result<u8> {
    let roster = load_roster(roster_path)?;
    if format == OutputFormat::Json {
        print_json(&roster.iter().map(PlayerView::from).collect::<Vec<_>>())?;
        return Ok(0);
    }
    println!("Roster ({}):", roster.len());
    for p in roster.iter() {
        if args.contacts && !p.contact.is_empty() {
            println!("  {}: {} <{}>", p.id, p.name, p.contact);
        } else {
            println!("  {}: {}", p.id, p.name);
        }
    }
    Ok(0)
}

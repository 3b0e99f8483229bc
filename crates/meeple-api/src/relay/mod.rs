//! # Notification Gateway
//!
//! The messaging side of the service. Inbound messages arrive on
//! `POST /relay/inbound` and are answered by [`handle_inbound`]; outbound
//! broadcasts go through a [`Notifier`].
//!
//! - `command`: inbound code table.
//! - `render`: plain-text replies.
//! - `notifier`: outbound delivery (log-only or webhook).

pub mod command;
pub mod notifier;
pub mod render;

pub use command::RelayCommand;
pub use notifier::{LogNotifier, Notifier, NotifyError, WebhookNotifier};

use crate::coordinator::VoteCoordinator;
use crate::store::StoreError;

/// Answer one inbound message from `sender`.
pub async fn handle_inbound(
    coordinator: &VoteCoordinator,
    body: &str,
    sender: &str,
) -> Result<String, StoreError> {
    let Some(command) = RelayCommand::parse(body) else {
        tracing::debug!(sender, "unrecognized relay message");
        return Ok(render::render_unknown_command());
    };
    tracing::debug!(?command, sender, "relay command");

    let reply = match command {
        RelayCommand::Menu => render::render_menu(),
        RelayCommand::ListProposals => match coordinator.current_round().await? {
            Some(round) => {
                let proposals = coordinator.list_proposals(round.id).await?;
                render::render_proposal_list(&round, &proposals, coordinator.roster())
            }
            None => render::render_no_active_round(),
        },
        RelayCommand::Vote => match coordinator.current_round().await? {
            Some(round) => render::render_vote_usage(&round),
            None => render::render_no_active_round(),
        },
        RelayCommand::Propose => match coordinator.current_round().await? {
            Some(round) => render::render_propose_usage(&round),
            None => render::render_no_active_round(),
        },
        RelayCommand::MyVotes => {
            let Some(participant) = coordinator.roster().by_contact(sender) else {
                return Ok(render::render_unknown_sender());
            };
            match coordinator.current_round().await? {
                Some(round) => {
                    let votes = coordinator.votes_by(round.id, &participant.id).await?;
                    let proposals = coordinator.list_proposals(round.id).await?;
                    render::render_votes(&round, &votes, &proposals)
                }
                None => render::render_no_active_round(),
            }
        }
        RelayCommand::Winners => match coordinator.latest_finished_round().await? {
            Some(round) => render::render_winners(&round, coordinator.roster()),
            None => render::render_no_winners_yet(),
        },
    };
    Ok(reply)
}

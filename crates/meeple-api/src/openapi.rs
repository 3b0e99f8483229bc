//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented handlers into one OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Registers the admin bearer token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Admin token for closing rounds. Set via MEEPLE_ADMIN_TOKEN.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "meeple API",
        description = "Weekly game-night coordination: members propose board games, vote with two votes per duration category, and each round closes with one winner per category. Unwinning proposals carry over to the next round.\n\nOnly `POST /api/finish-round` needs a bearer token, and only when `MEEPLE_ADMIN_TOKEN` is set.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server"),
    ),
    paths(
        // ── Roster ───────────────────────────────────────────────────
        crate::routes::roster::list_players,
        // ── Rounds ───────────────────────────────────────────────────
        crate::routes::rounds::current_round,
        crate::routes::rounds::list_rounds,
        crate::routes::rounds::get_round,
        crate::routes::rounds::finish_round,
        // ── Proposals ────────────────────────────────────────────────
        crate::routes::proposals::list_games,
        crate::routes::proposals::add_game,
        // ── Votes ────────────────────────────────────────────────────
        crate::routes::votes::cast_vote,
        crate::routes::votes::list_votes,
        // ── Relay ────────────────────────────────────────────────────
        crate::routes::relay::inbound,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            crate::routes::roster::PlayerView,
            crate::routes::rounds::WinnerView,
            crate::routes::rounds::RoundView,
            crate::routes::rounds::CurrentRoundResponse,
            crate::routes::rounds::FinishRoundRequest,
            crate::routes::rounds::FinishRoundResponse,
            crate::routes::proposals::ProposalView,
            crate::routes::proposals::AddGameRequest,
            crate::routes::votes::VoteRequest,
            crate::routes::votes::VoteResponse,
            crate::routes::votes::VoteView,
            crate::routes::relay::InboundMessage,
            crate::routes::relay::RelayReply,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "roster", description = "Participants"),
        (name = "rounds", description = "Round lifecycle"),
        (name = "proposals", description = "Game proposals"),
        (name = "votes", description = "Vote ledger"),
        (name = "relay", description = "Messaging webhook"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

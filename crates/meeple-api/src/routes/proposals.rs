//! # Proposal Routes
//!
//! `GET /api/games` lists the proposals of a round (the active one unless
//! `?round=` names another); `POST /api/add-game` registers a proposal.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use meeple_core::{NewProposal, Proposal, Roster, RoundId};

use crate::error::AppError;
use crate::extractors::{extract_query, extract_validated_json, require_non_blank, Validate};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/games", get(list_games))
        .route("/api/add-game", post(add_game))
}

// ── DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProposalView {
    pub id: i64,
    /// Id of the round the proposal belongs to.
    pub round: i64,
    pub name: String,
    pub proposer: String,
    /// Display name of the proposer, or the raw id if not on the roster.
    pub proposer_name: String,
    /// `long` or `short`.
    pub duration: String,
    pub votes: u32,
    pub created_at: DateTime<Utc>,
}

impl ProposalView {
    pub fn new(p: &Proposal, roster: &Roster) -> Self {
        Self {
            id: p.id.get(),
            round: p.round_id.get(),
            name: p.name.clone(),
            proposer: p.proposer_id.to_string(),
            proposer_name: roster.display_name(&p.proposer_id).to_string(),
            duration: p.category.as_str().to_string(),
            votes: p.votes,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct GamesQuery {
    /// Round id; defaults to the active round.
    pub round: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddGameRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub proposer: String,
    /// `long` or `short` (`largo`/`corto` are accepted too).
    #[serde(default)]
    pub duration: String,
    /// Round id; defaults to the active round.
    #[serde(default)]
    pub round: Option<i64>,
}

impl Validate for AddGameRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("name", &self.name)?;
        require_non_blank("proposer", &self.proposer)?;
        require_non_blank("duration", &self.duration)
    }
}

// ── Handlers ────────────────────────────────────────────────────────

/// Proposals of a round, ordered by duration and then votes descending.
/// Empty when no round is named and none is active.
#[utoipa::path(
    get,
    path = "/api/games",
    params(GamesQuery),
    responses(
        (status = 200, description = "Proposals in listing order", body = Vec<ProposalView>),
        (status = 404, description = "Round not found", body = crate::error::ErrorBody),
    ),
    tag = "proposals"
)]
pub(crate) async fn list_games(
    State(state): State<AppState>,
    query: Result<Query<GamesQuery>, QueryRejection>,
) -> Result<Json<Vec<ProposalView>>, AppError> {
    let query = extract_query(query)?;
    let round = match query.round {
        Some(raw) => RoundId::new(raw)?,
        None => match state.coordinator.current_round().await? {
            Some(round) => round.id,
            None => return Ok(Json(Vec::new())),
        },
    };
    let proposals = state.coordinator.list_proposals(round).await?;
    let roster = state.coordinator.roster();
    Ok(Json(
        proposals.iter().map(|p| ProposalView::new(p, roster)).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/add-game",
    request_body = AddGameRequest,
    responses(
        (status = 201, description = "Proposal registered", body = ProposalView),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 404, description = "Round not found", body = crate::error::ErrorBody),
        (status = 409, description = "Round already finished", body = crate::error::ErrorBody),
        (status = 422, description = "Missing field or unknown duration", body = crate::error::ErrorBody),
    ),
    tag = "proposals"
)]
pub(crate) async fn add_game(
    State(state): State<AppState>,
    body: Result<Json<AddGameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProposalView>), AppError> {
    let req = extract_validated_json(body)?;
    let round = state.coordinator.resolve_round(req.round).await?;
    let new = NewProposal::new(round.get(), &req.name, &req.proposer, &req.duration)?;
    let proposal = state.coordinator.propose(new).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProposalView::new(&proposal, state.coordinator.roster())),
    ))
}

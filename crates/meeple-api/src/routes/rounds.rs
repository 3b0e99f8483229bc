//! # Round Routes
//!
//! | Method | Path                 | Purpose                                     |
//! |--------|----------------------|---------------------------------------------|
//! | GET    | `/api/current-round` | The active round, or `status: "no_active"`  |
//! | GET    | `/api/rounds`        | Round history, newest first                 |
//! | GET    | `/api/rounds/{id}`   | One round                                   |
//! | POST   | `/api/finish-round`  | Close a round (admin token when configured) |

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use meeple_core::{RoundId, WinnerSummary};
use meeple_state::{Round, Winners};

use crate::error::AppError;
use crate::state::AppState;

/// Public round routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/current-round", get(current_round))
        .route("/api/rounds", get(list_rounds))
        .route("/api/rounds/{id}", get(get_round))
}

/// Routes that sit behind the admin token.
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/api/finish-round", post(finish_round))
}

// ── DTOs ────────────────────────────────────────────────────────────

/// Winning proposal of one duration category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WinnerView {
    pub id: i64,
    pub name: String,
    pub proposer: String,
}

impl From<&WinnerSummary> for WinnerView {
    fn from(w: &WinnerSummary) -> Self {
        Self {
            id: w.id.get(),
            name: w.name.clone(),
            proposer: w.proposer_id.to_string(),
        }
    }
}

/// Winners keyed by category name (`long`, `short`).
pub fn winner_views(winners: &Winners) -> BTreeMap<String, WinnerView> {
    winners
        .iter()
        .map(|(category, w)| (category.as_str().to_string(), WinnerView::from(w)))
        .collect()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoundView {
    pub id: i64,
    /// Sequence number, 1 for the first round.
    pub round: u32,
    pub status: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winners: Option<BTreeMap<String, WinnerView>>,
}

impl From<&Round> for RoundView {
    fn from(r: &Round) -> Self {
        Self {
            id: r.id.get(),
            round: r.sequence,
            status: r.status.as_str().to_string(),
            start_date: r.starts_at,
            end_date: r.ends_at,
            winners: r.winners.as_ref().map(winner_views),
        }
    }
}

/// The active round; every field but `status` is null when there is none.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentRoundResponse {
    pub id: Option<i64>,
    pub round: Option<u32>,
    /// `active` or `no_active`.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl CurrentRoundResponse {
    fn none() -> Self {
        Self {
            id: None,
            round: None,
            status: "no_active".to_string(),
            start_date: None,
            end_date: None,
        }
    }
}

impl From<&Round> for CurrentRoundResponse {
    fn from(r: &Round) -> Self {
        Self {
            id: Some(r.id.get()),
            round: Some(r.sequence),
            status: r.status.as_str().to_string(),
            start_date: Some(r.starts_at),
            end_date: Some(r.ends_at),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct FinishRoundRequest {
    /// Round to close; defaults to the active round.
    #[serde(default)]
    pub round: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FinishRoundResponse {
    pub success: bool,
    /// Id of the round that was closed.
    pub round: i64,
    pub winners: BTreeMap<String, WinnerView>,
    /// Id of the newly opened round.
    pub new_round: i64,
    pub new_round_number: u32,
    /// Ids of the carried-over copies in the new round.
    pub carried_over: Vec<i64>,
}

// ── Handlers ────────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/current-round",
    responses(
        (status = 200, description = "Active round, or status no_active", body = CurrentRoundResponse),
    ),
    tag = "rounds"
)]
pub(crate) async fn current_round(
    State(state): State<AppState>,
) -> Result<Json<CurrentRoundResponse>, AppError> {
    let response = match state.coordinator.current_round().await? {
        Some(round) => CurrentRoundResponse::from(&round),
        None => CurrentRoundResponse::none(),
    };
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/rounds",
    responses(
        (status = 200, description = "Every round, newest first", body = Vec<RoundView>),
    ),
    tag = "rounds"
)]
pub(crate) async fn list_rounds(State(state): State<AppState>) -> Result<Json<Vec<RoundView>>, AppError> {
    let rounds = state.coordinator.rounds().await?;
    Ok(Json(rounds.iter().map(RoundView::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/rounds/{id}",
    params(("id" = i64, Path, description = "Round id")),
    responses(
        (status = 200, description = "Round", body = RoundView),
        (status = 404, description = "Round not found", body = crate::error::ErrorBody),
    ),
    tag = "rounds"
)]
pub(crate) async fn get_round(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RoundView>, AppError> {
    let round = state.coordinator.round(RoundId::new(id)?).await?;
    Ok(Json(RoundView::from(&round)))
}

/// Close a round: record per-category winners, open the next round and
/// carry the other proposals over. The body is optional.
#[utoipa::path(
    post,
    path = "/api/finish-round",
    request_body(content = FinishRoundRequest, description = "Optional; defaults to the active round"),
    responses(
        (status = 200, description = "Round closed", body = FinishRoundResponse),
        (status = 401, description = "Missing or invalid admin token", body = crate::error::ErrorBody),
        (status = 404, description = "No such round, or it has no proposals", body = crate::error::ErrorBody),
        (status = 409, description = "Round already finished", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "rounds"
)]
pub(crate) async fn finish_round(
    State(state): State<AppState>,
    body: Result<Json<FinishRoundRequest>, JsonRejection>,
) -> Result<Json<FinishRoundResponse>, AppError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => FinishRoundRequest::default(),
        Err(err) => return Err(AppError::BadRequest(err.body_text())),
    };
    let round = state.coordinator.resolve_round(request.round).await?;
    let outcome = state.coordinator.close_round(round).await?;
    Ok(Json(FinishRoundResponse {
        success: true,
        round: outcome.closed.id.get(),
        winners: winner_views(&outcome.winners),
        new_round: outcome.new_round.id.get(),
        new_round_number: outcome.new_round.sequence,
        carried_over: outcome.carried_over.iter().map(|id| id.get()).collect(),
    }))
}

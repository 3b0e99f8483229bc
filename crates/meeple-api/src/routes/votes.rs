//! # Vote Routes
//!
//! `POST /api/vote` casts a vote; `GET /api/votes` lists what a voter has
//! cast in a round. Each voter gets at most two votes per duration category
//! and one vote per game.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use meeple_core::{ParticipantId, Vote};
use meeple_state::Ballot;

use crate::error::AppError;
use crate::extractors::{extract_query, extract_validated_json, require_non_blank, Validate};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/vote", post(cast_vote))
        .route("/api/votes", get(list_votes))
}

// ── DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteRequest {
    #[serde(default)]
    pub voter: String,
    /// Proposal id.
    #[serde(default)]
    pub game_id: i64,
    /// Round id; defaults to the active round.
    #[serde(default)]
    pub round: Option<i64>,
}

impl Validate for VoteRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("voter", &self.voter)?;
        if self.game_id == 0 {
            return Err("game_id is required".to_string());
        }
        if self.game_id < 0 {
            return Err(format!("game_id must be a positive id, got {}", self.game_id));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteResponse {
    pub success: bool,
    pub vote_id: i64,
    pub game_id: i64,
    /// The proposal's vote count after this vote.
    pub votes: u32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct VotesQuery {
    pub voter: String,
    /// Round id; defaults to the active round.
    pub round: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteView {
    pub id: i64,
    pub round: i64,
    pub voter: String,
    pub game_id: i64,
    pub cast_at: DateTime<Utc>,
}

impl From<&Vote> for VoteView {
    fn from(v: &Vote) -> Self {
        Self {
            id: v.id.get(),
            round: v.round_id.get(),
            voter: v.voter_id.to_string(),
            game_id: v.proposal_id.get(),
            cast_at: v.cast_at,
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/api/vote",
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote recorded", body = VoteResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 404, description = "Round or game not found", body = crate::error::ErrorBody),
        (status = 409, description = "Duplicate vote, category limit reached, or round finished", body = crate::error::ErrorBody),
        (status = 422, description = "Missing field or game from another round", body = crate::error::ErrorBody),
    ),
    tag = "votes"
)]
pub(crate) async fn cast_vote(
    State(state): State<AppState>,
    body: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let round = state.coordinator.resolve_round(req.round).await?;
    let ballot = Ballot::new(round.get(), &req.voter, req.game_id)?;
    let receipt = state.coordinator.cast_vote(ballot).await?;
    Ok(Json(VoteResponse {
        success: true,
        vote_id: receipt.vote.id.get(),
        game_id: receipt.proposal.id.get(),
        votes: receipt.proposal.votes,
    }))
}

#[utoipa::path(
    get,
    path = "/api/votes",
    params(VotesQuery),
    responses(
        (status = 200, description = "Votes cast by the voter, oldest first", body = Vec<VoteView>),
        (status = 400, description = "Missing voter parameter", body = crate::error::ErrorBody),
        (status = 404, description = "No active round", body = crate::error::ErrorBody),
    ),
    tag = "votes"
)]
pub(crate) async fn list_votes(
    State(state): State<AppState>,
    query: Result<Query<VotesQuery>, QueryRejection>,
) -> Result<Json<Vec<VoteView>>, AppError> {
    let query = extract_query(query)?;
    let voter = ParticipantId::new(&query.voter)?;
    let round = state.coordinator.resolve_round(query.round).await?;
    let votes = state.coordinator.votes_by(round, &voter).await?;
    Ok(Json(votes.iter().map(VoteView::from).collect()))
}

//! `GET /api/players`

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use meeple_core::Participant;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/players", get(list_players))
}

/// A roster member. Contact handles are not exposed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlayerView {
    pub id: String,
    pub name: String,
}

impl From<&Participant> for PlayerView {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
        }
    }
}

/// List the roster, ordered by id.
#[utoipa::path(
    get,
    path = "/api/players",
    responses(
        (status = 200, description = "Roster members", body = Vec<PlayerView>),
    ),
    tag = "roster"
)]
pub(crate) async fn list_players(State(state): State<AppState>) -> Json<Vec<PlayerView>> {
    Json(state.coordinator.roster().iter().map(PlayerView::from).collect())
}

//! # meeple-api: Game-Night Voting Service
//!
//! Axum service for a weekly board-game night. Members propose games into
//! the active round, vote with two votes per duration category, and an
//! organizer closes the round; the top game of each category wins and the
//! rest carry over.
//!
//! ## API Surface
//!
//! | Prefix                 | Module                 | Domain              |
//! |------------------------|------------------------|---------------------|
//! | `/api/players`         | [`routes::roster`]     | Roster              |
//! | `/api/current-round`, `/api/rounds*` | [`routes::rounds`] | Round controller |
//! | `/api/finish-round`    | [`routes::rounds`]     | Round close (admin) |
//! | `/api/games`, `/api/add-game` | [`routes::proposals`] | Proposal store |
//! | `/api/vote`, `/api/votes` | [`routes::votes`]   | Vote ledger         |
//! | `/relay/inbound`       | [`routes::relay`]      | Messaging webhook   |
//! | `/health/*`            | this module            | Probes              |
//! | `/openapi.json`        | [`openapi`]            | OpenAPI document    |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → AdminAuth (finish-round only) → Handler
//! ```
//!
//! ## Layers
//!
//! Handlers parse and shape JSON only. Every operation goes through
//! [`coordinator::VoteCoordinator`], which applies the rules from
//! `meeple-state` over a [`store::BallotStore`].

pub mod auth;
pub mod config;
pub mod coordinator;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod relay;
pub mod routes;
pub mod state;
pub mod store;

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;

pub use config::AppConfig;
pub use coordinator::VoteCoordinator;
pub use error::AppError;
pub use state::AppState;

/// Assemble the application router.
///
/// Health probes sit outside the trace layer. Only
/// `POST /api/finish-round` passes through the admin token middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.admin_token.clone(),
    };

    let admin = routes::rounds::admin_router().route_layer(from_fn(auth::admin_middleware));

    let api = Router::new()
        .merge(routes::roster::router())
        .merge(routes::rounds::router())
        .merge(routes::proposals::router())
        .merge(routes::votes::router())
        .merge(routes::relay::router())
        .merge(openapi::router())
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(auth_config))
        .with_state(state.clone());

    let probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new().merge(probes).merge(api).layer(cors)
}

/// Liveness probe: 200 whenever the process is serving.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 "ready" when the store answers, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> Response {
    match state.coordinator.ping().await {
        Ok(()) => (StatusCode::OK, "ready").into_response(),
        Err(e) => {
            tracing::warn!("store health check failed: {e}");
            AppError::ServiceUnavailable("store unreachable".into()).into_response()
        }
    }
}

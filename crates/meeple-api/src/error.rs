//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps ballot and store errors to HTTP status codes and JSON bodies of the
//! form `{"error": {"code", "message"}}`. Storage failure details are logged,
//! never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use meeple_core::ValidationError;
use meeple_state::BallotError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::store::StoreError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "CATEGORY_LIMIT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Round or proposal not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid admin token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Voter already voted for this proposal (409).
    #[error("duplicate vote: {0}")]
    DuplicateVote(String),

    /// Voter used up the category allowance (409).
    #[error("category limit reached: {0}")]
    CategoryLimit(String),

    /// Conflict with the current round state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Store unreachable (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::DuplicateVote(_) => (StatusCode::CONFLICT, "DUPLICATE_VOTE"),
            Self::CategoryLimit(_) => (StatusCode::CONFLICT, "CATEGORY_LIMIT"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<BallotError> for AppError {
    fn from(err: BallotError) -> Self {
        match &err {
            BallotError::Validation(inner) => Self::Validation(inner.to_string()),
            BallotError::DuplicateVote { .. } => Self::DuplicateVote(err.to_string()),
            BallotError::CategoryLimit { .. } => Self::CategoryLimit(err.to_string()),
            BallotError::NotFound(what) => Self::NotFound(what.clone()),
            BallotError::RoundClosed { .. } | BallotError::InvalidTransition { .. } => {
                Self::Conflict(err.to_string())
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Ballot(inner) => inner.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meeple_core::{DurationCategory, ParticipantId, ProposalId, RoundId};
    use meeple_state::RoundStatus;

    #[test]
    fn ballot_errors_map_to_distinct_codes() {
        let round = RoundId::new(1).unwrap();
        let voter = ParticipantId::new("v1").unwrap();

        let dup = AppError::from(BallotError::DuplicateVote {
            round,
            voter: voter.clone(),
            proposal: ProposalId::new(3).unwrap(),
        });
        assert_eq!(dup.status_and_code(), (StatusCode::CONFLICT, "DUPLICATE_VOTE"));

        let limit = AppError::from(BallotError::CategoryLimit {
            round,
            voter,
            category: DurationCategory::Short,
            limit: 2,
        });
        assert_eq!(limit.status_and_code(), (StatusCode::CONFLICT, "CATEGORY_LIMIT"));

        let closed = AppError::from(BallotError::RoundClosed {
            round,
            status: RoundStatus::Finished,
        });
        assert_eq!(closed.status_and_code(), (StatusCode::CONFLICT, "CONFLICT"));

        let missing = AppError::from(BallotError::round_not_found(round));
        assert_eq!(missing.status_and_code(), (StatusCode::NOT_FOUND, "NOT_FOUND"));
    }

    #[test]
    fn validation_maps_to_422() {
        let err = AppError::from(BallotError::Validation(ValidationError::EmptyField("name")));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
        );
        assert!(err.to_string().contains("name must not be empty"));
    }

    #[test]
    fn storage_errors_are_internal() {
        let err = AppError::from(StoreError::Corrupt("bad status".into()));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        );
    }

    #[test]
    fn error_body_skips_empty_details() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "TEST".to_string(),
                message: "test message".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("TEST"));
        assert!(!json.contains("details"));
    }

    // ── into_response ────────────────────────────────────────────

    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_category_limit() {
        let (status, body) = response_parts(AppError::CategoryLimit("two short votes".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error.code, "CATEGORY_LIMIT");
        assert!(body.error.message.contains("two short votes"));
    }

    #[tokio::test]
    async fn into_response_hides_internal_message() {
        let (status, body) = response_parts(AppError::Internal("disk on fire".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert!(!body.error.message.contains("disk"));
    }
}

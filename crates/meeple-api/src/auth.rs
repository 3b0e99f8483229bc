//! # Admin Token Middleware
//!
//! Closing a round is the only operation behind a credential. When
//! `MEEPLE_ADMIN_TOKEN` is set, the admin routes require
//! `Authorization: Bearer <token>`; when unset, they are open.

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Admin token injected into request extensions.
///
/// Custom `Debug` redacts the token value.
#[derive(Clone, Default)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Constant-time comparison of bearer tokens.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Check the `Authorization` header against the configured admin token.
pub fn check_admin(config: &AuthConfig, authorization: Option<&str>) -> Result<(), AppError> {
    let Some(expected) = config.token.as_deref() else {
        return Ok(());
    };
    match authorization {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(provided) if constant_time_token_eq(provided.trim(), expected) => Ok(()),
            Some(_) => Err(AppError::Unauthorized("invalid bearer token".into())),
            None => Err(AppError::Unauthorized(
                "authorization header must use Bearer scheme".into(),
            )),
        },
        None => Err(AppError::Unauthorized("missing authorization header".into())),
    }
}

/// Route layer for admin-only routes.
pub async fn admin_middleware(request: Request, next: Next) -> Response {
    let config = request
        .extensions()
        .get::<AuthConfig>()
        .cloned()
        .unwrap_or_default();
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match check_admin(&config, authorization) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::warn!(path = %request.uri().path(), reason = %err, "admin request rejected");
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    fn test_app(token: Option<&str>) -> Router {
        Router::new()
            .route("/close", post(|| async { "closed" }))
            .route_layer(from_fn(admin_middleware))
            .layer(axum::Extension(AuthConfig {
                token: token.map(String::from),
            }))
    }

    async fn status(app: Router, auth: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().method("POST").uri("/close");
        if let Some(value) = auth {
            builder = builder.header("authorization", value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn open_when_no_token_configured() {
        assert_eq!(status(test_app(None), None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn valid_token_accepted() {
        assert_eq!(
            status(test_app(Some("s3cret")), Some("Bearer s3cret")).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn missing_or_wrong_token_rejected() {
        assert_eq!(
            status(test_app(Some("s3cret")), None).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(test_app(Some("s3cret")), Some("Bearer nope")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(test_app(Some("s3cret")), Some("Basic s3cret")).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn token_comparison_handles_length_mismatch() {
        assert!(constant_time_token_eq("abc", "abc"));
        assert!(!constant_time_token_eq("abc", "abcd"));
        assert!(!constant_time_token_eq("", "abc"));
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = AuthConfig {
            token: Some("s3cret".into()),
        };
        assert!(!format!("{cfg:?}").contains("s3cret"));
    }
}

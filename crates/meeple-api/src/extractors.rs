//! # Request Extraction
//!
//! Handlers take `Result<Json<T>, JsonRejection>` (or the form equivalent)
//! and pass it through these helpers, so malformed bodies surface as
//! [`AppError::BadRequest`] with the standard error body instead of axum's
//! plain-text rejection.

use axum::extract::rejection::{FormRejection, JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::{Form, Json};

use crate::error::AppError;

/// Request bodies with field rules beyond what serde checks.
pub trait Validate {
    /// Returns a message naming the offending field on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON body.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Unwrap a JSON body and run its [`Validate`] rules.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Unwrap a url-encoded form body, as posted by messaging webhooks.
pub fn extract_form<T>(result: Result<Form<T>, FormRejection>) -> Result<T, AppError> {
    result
        .map(|Form(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Unwrap query parameters.
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Reject blank strings with the field name in the message.
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected_with_field_name() {
        assert_eq!(
            require_non_blank("voter", "   "),
            Err("voter must not be empty".to_string())
        );
        assert!(require_non_blank("voter", "v1").is_ok());
    }
}

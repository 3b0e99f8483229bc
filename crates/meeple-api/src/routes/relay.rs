//! `POST /relay/inbound`: webhook for the messaging relay.
//!
//! The relay posts url-encoded `Body` and `From` fields (the shape Twilio
//! and similar gateways use). The reply is returned as JSON for the relay
//! to forward.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_form;
use crate::relay::handle_inbound;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/relay/inbound", post(inbound))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InboundMessage {
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RelayReply {
    /// Handle the reply goes to.
    pub to: String,
    pub reply: String,
}

#[utoipa::path(
    post,
    path = "/relay/inbound",
    request_body(content = InboundMessage, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Reply text for the sender", body = RelayReply),
        (status = 400, description = "Malformed form body", body = crate::error::ErrorBody),
    ),
    tag = "relay"
)]
pub(crate) async fn inbound(
    State(state): State<AppState>,
    form: Result<Form<InboundMessage>, FormRejection>,
) -> Result<Json<RelayReply>, AppError> {
    let message = extract_form(form)?;
    let reply = handle_inbound(&state.coordinator, &message.body, &message.from).await?;
    Ok(Json(RelayReply {
        to: message.from,
        reply,
    }))
}

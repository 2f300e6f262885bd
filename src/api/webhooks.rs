//! Compliance webhook delivery route.
//!
//! # Purpose
//! The single inbound path for the platform's mandatory compliance
//! webhooks. Authentication failures are the only rejection: once the
//! envelope is verified, the dispatcher acknowledges with 200 and an empty
//! body no matter what the handler did.
use crate::api::error::{ApiError, api_unauthorized};
use crate::app::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

#[utoipa::path(
    post,
    path = "/webhooks/compliance",
    tag = "webhooks",
    request_body(content = Vec<u8>, description = "Raw webhook payload"),
    responses(
        (status = 200, description = "Delivery acknowledged (empty body), regardless of handler outcome"),
        (status = 401, description = "Unverified delivery", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn compliance_webhook(
    headers: HeaderMap,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let envelope = state
        .webhook_auth
        .authenticate(&headers, &body)
        .await
        .map_err(|err| api_unauthorized(&err))?;
    let outcome = state.dispatcher.dispatch(envelope).await;
    // Empty 200 body is the protocol contract with the delivering platform.
    Ok(outcome.status())
}

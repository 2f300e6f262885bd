//! Session summary handler for the embedded admin UI.
use crate::api::error::{ApiError, api_unauthorized};
use crate::api::types::SessionSummary;
use crate::app::AppState;
use crate::scopes::split_scope_grant;
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;

#[utoipa::path(
    get,
    path = "/v1/session",
    tag = "admin",
    responses(
        (status = 200, description = "Authenticated session summary", body = SessionSummary),
        (status = 401, description = "Missing or unknown session", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn session_summary(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<SessionSummary>, ApiError> {
    let session = state
        .session_auth
        .authenticate(&headers)
        .await
        .map_err(|err| api_unauthorized(&err))?;
    Ok(Json(SessionSummary {
        token_preview: session.token_preview(),
        scopes: split_scope_grant(session.scope.as_deref()),
        shop: session.shop,
    }))
}

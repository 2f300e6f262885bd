//! Scope status handler: the reconciler's read path.
use crate::api::error::{ApiError, api_unauthorized};
use crate::api::types::ScopeStatusResponse;
use crate::app::AppState;
use crate::scopes::{reconcile, split_scope_grant};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;

#[utoipa::path(
    get,
    path = "/v1/scopes",
    tag = "admin",
    responses(
        (status = 200, description = "Granted vs. required scope report", body = ScopeStatusResponse),
        (status = 401, description = "Missing or unknown session", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn scope_status(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<ScopeStatusResponse>, ApiError> {
    let session = state
        .session_auth
        .authenticate(&headers)
        .await
        .map_err(|err| api_unauthorized(&err))?;
    let granted = split_scope_grant(session.scope.as_deref());
    let report = reconcile(&granted, &state.required_scopes);
    Ok(Json(ScopeStatusResponse {
        shop: session.shop,
        complete: report.complete(),
        report,
    }))
}

//! Product creation relay to the upstream admin API.
use crate::admin_api::{ProductSummary, demo_product_title};
use crate::api::error::{ApiError, api_internal_message, api_unauthorized};
use crate::api::types::ProductCreateRequest;
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

#[utoipa::path(
    post,
    path = "/v1/products",
    tag = "admin",
    request_body = ProductCreateRequest,
    responses(
        (status = 201, description = "Product created upstream", body = ProductSummary),
        (status = 401, description = "Missing or unknown session", body = crate::api::types::ErrorResponse),
        (status = 500, description = "Upstream mutation failed", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_product(
    headers: HeaderMap,
    State(state): State<AppState>,
    body: Option<Json<ProductCreateRequest>>,
) -> Result<(StatusCode, Json<ProductSummary>), ApiError> {
    let session = state
        .session_auth
        .authenticate(&headers)
        .await
        .map_err(|err| api_unauthorized(&err))?;
    let title = body
        .and_then(|Json(request)| request.title)
        .unwrap_or_else(demo_product_title);
    let product = state
        .admin_api
        .create_product(&session, &title)
        .await
        .map_err(|err| {
            tracing::error!(shop = %session.shop, error = %err, "productCreate relay failed");
            api_internal_message("failed to create product")
        })?;
    Ok((StatusCode::CREATED, Json(product)))
}

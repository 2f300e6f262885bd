//! HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and
//! testable. The compliance webhook route sits on the same router as the
//! admin routes; the two paths share nothing but the process boundary.
use crate::admin_api::AdminApi;
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::auth::{SessionAuthenticator, WebhookAuthenticator};
use crate::observability;
use crate::store::ShopStore;
use crate::webhooks::ComplianceDispatcher;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub app_url: String,
    pub api_version: String,
    pub required_scopes: Arc<Vec<String>>,
    pub store: Arc<dyn ShopStore>,
    pub session_auth: Arc<dyn SessionAuthenticator>,
    pub webhook_auth: Arc<dyn WebhookAuthenticator>,
    pub admin_api: Arc<dyn AdminApi>,
    pub dispatcher: ComplianceDispatcher,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route(
            "/v1/system/info",
            axum::routing::get(api::system::system_info),
        )
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route(
            "/v1/session",
            axum::routing::get(api::session::session_summary),
        )
        .route("/v1/scopes", axum::routing::get(api::scopes::scope_status))
        .route(
            "/v1/products",
            axum::routing::post(api::products::create_product),
        )
        .route(
            "/webhooks/compliance",
            axum::routing::post(api::webhooks::compliance_webhook),
        )
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/v1/openapi.json", ApiDoc::openapi()),
        )
        .layer(trace_layer)
        .with_state(state)
}

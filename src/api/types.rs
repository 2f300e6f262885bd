//! HTTP API request/response types.
//!
//! # Purpose
//! Defines shared payload shapes for the admin REST API and OpenAPI schema
//! generation.
use crate::scopes::ScopeReport;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub app_url: String,
    pub api_version: String,
    /// Name of the configured storage backend.
    pub storage_backend: String,
    pub durable_storage: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Session summary for the embedded admin UI. The access token is never
/// returned whole; only a display preview.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SessionSummary {
    pub shop: String,
    pub scopes: Vec<String>,
    pub token_preview: String,
}

/// Scope reconciliation result plus the binary completeness signal the UI
/// keys dependent actions on.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ScopeStatusResponse {
    pub shop: String,
    #[serde(flatten)]
    #[schema(inline)]
    pub report: ScopeReport,
    pub complete: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct ProductCreateRequest {
    /// Optional title; a demo title is generated when absent.
    pub title: Option<String>,
}

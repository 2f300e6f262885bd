//! OpenAPI schema aggregation.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for
//! docs and client generation.
use crate::admin_api::ProductSummary;
use crate::api::{
    products, scopes, session, system, webhooks,
    types::{
        ErrorResponse, HealthStatus, ProductCreateRequest, ScopeStatusResponse, SessionSummary,
        SystemInfo,
    },
};
use crate::model::{CustomerRecord, CustomerRef, OrderRecord, PurgeSummary, RedactionSummary, Session};
use crate::scopes::ScopeReport;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "shopbridge",
        version = "v1",
        description = "Embedded merchant-admin HTTP API"
    ),
    paths(
        system::system_info,
        system::system_health,
        session::session_summary,
        scopes::scope_status,
        products::create_product,
        webhooks::compliance_webhook
    ),
    components(schemas(
        SystemInfo,
        HealthStatus,
        ErrorResponse,
        SessionSummary,
        ScopeStatusResponse,
        ScopeReport,
        ProductCreateRequest,
        ProductSummary,
        Session,
        CustomerRef,
        CustomerRecord,
        OrderRecord,
        RedactionSummary,
        PurgeSummary
    )),
    tags(
        (name = "system", description = "System and health endpoints"),
        (name = "admin", description = "Authenticated merchant admin endpoints"),
        (name = "webhooks", description = "Platform compliance webhook deliveries")
    )
)]
pub struct ApiDoc;

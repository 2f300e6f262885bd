//! Embedded merchant-admin service library crate.
//!
//! # Purpose
//! Exposes the HTTP API surface, authentication boundaries, configuration,
//! the scope reconciler, the compliance webhook dispatcher, and storage
//! implementations for use by the binary and tests.
//!
//! # Notes
//! Module boundaries mirror the request paths: admin reads flow through
//! `scopes`, webhook deliveries flow through `webhooks`, and both meet the
//! persistence collaborator behind `store`.
pub mod admin_api;
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod model;
pub mod observability;
pub mod scopes;
pub mod store;
pub mod webhooks;

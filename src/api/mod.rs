//! HTTP API handlers.
//!
//! # Purpose
//! Groups the route handlers for the admin read path (session, scopes,
//! product relay), the compliance webhook delivery path, system probes, and
//! the shared error/response types.
pub mod error;
pub mod openapi;
pub mod products;
pub mod scopes;
pub mod session;
pub mod system;
pub mod types;
pub mod webhooks;

//! Authentication collaborator boundaries.
//!
//! # Purpose
//! Groups the webhook and admin-session authenticators. Both are trait
//! boundaries: the platform framework (or a fronting verifier) owns token
//! issuance and webhook signature verification, and this service consumes
//! the verified identity it hands over. Requests that fail here are rejected
//! with a 401 before any handler runs.
mod session;
mod webhook;

pub use session::{SessionAuthenticator, StoreSessionAuthenticator};
pub use webhook::{HeaderAuthenticator, WebhookAuthenticator};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),
    #[error("invalid webhook body: {0}")]
    InvalidBody(String),
    #[error("unknown or expired session")]
    UnknownSession,
}

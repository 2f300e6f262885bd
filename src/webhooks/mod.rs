//! Compliance webhook types and dispatch.
//!
//! # Purpose
//! Defines the webhook envelope produced by the authentication boundary, the
//! per-topic payload schemas, and the dispatcher that routes verified
//! deliveries to the data-lifecycle handlers.
mod compliance;
mod envelope;

pub use compliance::{
    ComplianceDispatcher, ComplianceOutcome, DataExportBundle, DataExportSink, HandlerAction,
    HandlerError, LoggingExportSink,
};
pub use envelope::{
    ComplianceTopic, CompliancePayload, CustomerRedactPayload, DataRequestPayload,
    ShopRedactPayload, WebhookEnvelope,
};

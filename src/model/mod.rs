//! Domain model module.
//!
//! # Purpose
//! Re-exports the session and shop-data records shared by the store, the
//! authentication boundary, and the compliance handlers.
mod records;
mod session;

pub use records::{CustomerRecord, CustomerRef, OrderRecord, PurgeSummary, RedactionSummary};
pub use session::Session;

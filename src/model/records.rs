//! Shop-scoped customer and order records.
//!
//! # Purpose
//! Defines the rows the compliance handlers export or redact, plus the
//! summaries those handlers report back for logging.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity of the customer a compliance request refers to.
///
/// The platform may supply any combination of id, email, and phone; a record
/// matches when any supplied field matches.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default, PartialEq, Eq)]
pub struct CustomerRef {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerRef {
    pub fn matches(&self, record: &CustomerRecord) -> bool {
        let by_id = match self.id {
            Some(id) => record.customer_id == id,
            None => false,
        };
        let by_email = match (&self.email, &record.email) {
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
            _ => false,
        };
        let by_phone = match (&self.phone, &record.phone) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => false,
        };
        by_id || by_email || by_phone
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    pub shop: String,
    pub customer_id: i64,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Set when a legal retention obligation overrides redaction.
    pub legal_hold: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub shop: String,
    pub order_id: i64,
    pub customer_id: i64,
    pub legal_hold: bool,
}

/// Counts reported by a customer redaction pass.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default, PartialEq, Eq)]
pub struct RedactionSummary {
    pub customers_deleted: u64,
    pub orders_deleted: u64,
    /// Rows matched but kept because of a legal hold.
    pub retained: u64,
}

/// Counts reported by a full shop purge.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    pub sessions_deleted: u64,
    pub customers_deleted: u64,
    pub orders_deleted: u64,
}

//! Persistence collaborator for sessions and shop-scoped data.
//!
//! # Purpose
//! Defines the `ShopStore` trait the compliance handlers and admin routes
//! depend on, with an in-memory backend for development/tests and a Postgres
//! backend for durable deployments.
use crate::model::{CustomerRecord, CustomerRef, OrderRecord, PurgeSummary, RedactionSummary, Session};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unexpected(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Data gathered for a customer data request, delivered to the store owner
/// out-of-band by a [`crate::webhooks::DataExportSink`].
#[derive(Debug, Clone, Default)]
pub struct CustomerData {
    pub customers: Vec<CustomerRecord>,
    pub orders: Vec<OrderRecord>,
}

#[async_trait]
pub trait ShopStore: Send + Sync {
    async fn put_session(&self, session: Session) -> StoreResult<()>;
    async fn get_session(&self, session_id: &str) -> StoreResult<Session>;
    /// Delete every session row for the shop. Idempotent: absent rows yield
    /// a zero count, never an error.
    async fn delete_sessions(&self, shop: &str) -> StoreResult<u64>;

    async fn put_customer(&self, record: CustomerRecord) -> StoreResult<()>;
    async fn put_order(&self, record: OrderRecord) -> StoreResult<()>;
    /// Gather all customer rows matching `customer` and all order rows for
    /// the enumerated ids (or belonging to a matched customer).
    async fn customer_data(
        &self,
        shop: &str,
        customer: &CustomerRef,
        order_ids: &[i64],
    ) -> StoreResult<CustomerData>;
    /// Delete matching customer and order rows, skipping rows under legal
    /// hold. Idempotent for repeated deliveries of the same request.
    async fn redact_customer(
        &self,
        shop: &str,
        customer: &CustomerRef,
        order_ids: &[i64],
    ) -> StoreResult<RedactionSummary>;
    /// Delete all persisted state scoped to the shop domain: sessions,
    /// customers, and orders. Idempotent.
    async fn purge_shop_data(&self, shop: &str) -> StoreResult<PurgeSummary>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

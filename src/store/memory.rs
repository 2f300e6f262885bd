//! In-memory implementation of the shop store.
//!
//! # Purpose
//! Implements `ShopStore` entirely in memory using `HashMap`s guarded by
//! `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no external dependencies)
//! - deployments where durability is not required
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: mutations take write locks, reads take
//!   read locks, so concurrent duplicate webhook deliveries for the same
//!   shop serialize and converge on the same end state.
//!
//! # Idempotence
//! Every delete scans by predicate and counts removed rows; deleting rows
//! that are already gone is a zero-count success, which is what the
//! at-least-once compliance delivery contract requires.
use super::{CustomerData, ShopStore, StoreError, StoreResult};
use crate::model::{CustomerRecord, CustomerRef, OrderRecord, PurgeSummary, RedactionSummary, Session};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory shop store.
///
/// Sessions are keyed by session id, customers by `(shop, customer_id)`,
/// orders by `(shop, order_id)`. All maps are wrapped in `Arc<RwLock<...>>`
/// so the store can be cloned and shared across async request handlers.
#[derive(Default)]
pub struct InMemoryStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    customers: Arc<RwLock<HashMap<(String, i64), CustomerRecord>>>,
    orders: Arc<RwLock<HashMap<(String, i64), OrderRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShopStore for InMemoryStore {
    async fn put_session(&self, session: Session) -> StoreResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session);
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> StoreResult<Session> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("session".into()))
    }

    async fn delete_sessions(&self, shop: &str) -> StoreResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.shop != shop);
        Ok((before - sessions.len()) as u64)
    }

    async fn put_customer(&self, record: CustomerRecord) -> StoreResult<()> {
        self.customers
            .write()
            .await
            .insert((record.shop.clone(), record.customer_id), record);
        Ok(())
    }

    async fn put_order(&self, record: OrderRecord) -> StoreResult<()> {
        self.orders
            .write()
            .await
            .insert((record.shop.clone(), record.order_id), record);
        Ok(())
    }

    async fn customer_data(
        &self,
        shop: &str,
        customer: &CustomerRef,
        order_ids: &[i64],
    ) -> StoreResult<CustomerData> {
        let customers: Vec<CustomerRecord> = self
            .customers
            .read()
            .await
            .values()
            .filter(|record| record.shop == shop && customer.matches(record))
            .cloned()
            .collect();
        let matched_ids: Vec<i64> = customers
            .iter()
            .map(|record| record.customer_id)
            .collect();
        let orders: Vec<OrderRecord> = self
            .orders
            .read()
            .await
            .values()
            .filter(|order| {
                order.shop == shop
                    && (order_ids.contains(&order.order_id)
                        || matched_ids.contains(&order.customer_id))
            })
            .cloned()
            .collect();
        Ok(CustomerData { customers, orders })
    }

    async fn redact_customer(
        &self,
        shop: &str,
        customer: &CustomerRef,
        order_ids: &[i64],
    ) -> StoreResult<RedactionSummary> {
        let mut summary = RedactionSummary::default();

        // Customers first so the matched ids can widen the order predicate.
        let mut customers = self.customers.write().await;
        let matched: Vec<(String, i64)> = customers
            .iter()
            .filter(|(_, record)| record.shop == shop && customer.matches(record))
            .map(|(key, _)| key.clone())
            .collect();
        let mut matched_ids = Vec::new();
        for key in matched {
            matched_ids.push(key.1);
            let held = customers
                .get(&key)
                .map(|record| record.legal_hold)
                .unwrap_or(false);
            if held {
                summary.retained += 1;
            } else {
                customers.remove(&key);
                summary.customers_deleted += 1;
            }
        }
        drop(customers);

        let mut orders = self.orders.write().await;
        let matched: Vec<(String, i64)> = orders
            .iter()
            .filter(|(_, order)| {
                order.shop == shop
                    && (order_ids.contains(&order.order_id)
                        || matched_ids.contains(&order.customer_id))
            })
            .map(|(key, _)| key.clone())
            .collect();
        for key in matched {
            let held = orders
                .get(&key)
                .map(|order| order.legal_hold)
                .unwrap_or(false);
            if held {
                summary.retained += 1;
            } else {
                orders.remove(&key);
                summary.orders_deleted += 1;
            }
        }
        Ok(summary)
    }

    async fn purge_shop_data(&self, shop: &str) -> StoreResult<PurgeSummary> {
        let sessions_deleted = self.delete_sessions(shop).await?;

        let mut customers = self.customers.write().await;
        let before = customers.len();
        customers.retain(|(record_shop, _), _| record_shop != shop);
        let customers_deleted = (before - customers.len()) as u64;
        drop(customers);

        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|(record_shop, _), _| record_shop != shop);
        let orders_deleted = (before - orders.len()) as u64;

        Ok(PurgeSummary {
            sessions_deleted,
            customers_deleted,
            orders_deleted,
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

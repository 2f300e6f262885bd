//! Postgres-backed implementation of the shop store.
//!
//! # What this module is
//! Implements the `ShopStore` trait using Postgres (via `sqlx`) as the
//! durable backing store for session rows and shop-scoped customer/order
//! records. The compliance handlers depend on its deletes being idempotent:
//! a delete that matches no rows is a zero-count success.
//!
//! # Concurrency model
//! The store is shared across async handlers; `sqlx::PgPool` manages
//! connection concurrency. Duplicate webhook deliveries for the same shop
//! race harmlessly because every mutation is a predicate delete.
//!
//! # Operational notes
//! - Migrations run at startup via `sqlx::migrate!("./migrations")` so
//!   handlers can assume the schema exists.
//! - Connection acquisition is bounded; failing fast beats hanging on a
//!   broken database, and the dispatcher acknowledges regardless.
//! - Database URLs may contain credentials; never log them.
use super::{CustomerData, ShopStore, StoreError, StoreResult};
use crate::config::PostgresConfig;
use crate::model::{CustomerRecord, CustomerRef, OrderRecord, PurgeSummary, RedactionSummary, Session};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// Durable shop store backed by Postgres.
pub struct PostgresStore {
    pool: PgPool,
}

/// Row shape for the `sessions` table.
///
/// DB-facing structs are kept separate from the domain types so schema
/// details stay localized to this module.
#[derive(Debug, Clone, FromRow)]
struct DbSession {
    id: String,
    shop: String,
    access_token: String,
    scope: Option<String>,
    expires_at: Option<i64>,
}

impl From<DbSession> for Session {
    fn from(row: DbSession) -> Self {
        Session {
            id: row.id,
            shop: row.shop,
            access_token: row.access_token,
            scope: row.scope,
            expires_at: row.expires_at,
        }
    }
}

/// Row shape for the `customers` table.
#[derive(Debug, Clone, FromRow)]
struct DbCustomer {
    shop: String,
    customer_id: i64,
    email: Option<String>,
    phone: Option<String>,
    legal_hold: bool,
}

impl From<DbCustomer> for CustomerRecord {
    fn from(row: DbCustomer) -> Self {
        CustomerRecord {
            shop: row.shop,
            customer_id: row.customer_id,
            email: row.email,
            phone: row.phone,
            legal_hold: row.legal_hold,
        }
    }
}

/// Row shape for the `orders` table.
#[derive(Debug, Clone, FromRow)]
struct DbOrder {
    shop: String,
    order_id: i64,
    customer_id: i64,
    legal_hold: bool,
}

impl From<DbOrder> for OrderRecord {
    fn from(row: DbOrder) -> Self {
        OrderRecord {
            shop: row.shop,
            order_id: row.order_id,
            customer_id: row.customer_id,
            legal_hold: row.legal_hold,
        }
    }
}

// SQL fragment matching customer rows against an optional id/email/phone
// reference. NULL reference fields never match.
const CUSTOMER_MATCH: &str = "shop = $1 AND (
    ($2::bigint IS NOT NULL AND customer_id = $2)
    OR ($3::text IS NOT NULL AND email IS NOT NULL AND lower(email) = lower($3))
    OR ($4::text IS NOT NULL AND phone = $4)
)";

impl PostgresStore {
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        // Bound both connection count and acquisition time: the dispatcher
        // acknowledges deliveries regardless, so a hung pool only hides
        // failures without protecting anything.
        let connect_options = PgConnectOptions::from_str(&pg.url)?;
        let pool = PgPoolOptions::new()
            .max_connections(pg.max_connections)
            .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
            .connect_with(connect_options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|err| StoreError::Unexpected(err.into()))?;

        Ok(Self { pool })
    }

    async fn matched_customer_ids(&self, shop: &str, customer: &CustomerRef) -> StoreResult<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT customer_id FROM customers WHERE {CUSTOMER_MATCH}"
        ))
        .bind(shop)
        .bind(customer.id)
        .bind(customer.email.as_deref())
        .bind(customer.phone.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}

#[async_trait]
impl ShopStore for PostgresStore {
    async fn put_session(&self, session: Session) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO sessions (id, shop, access_token, scope, expires_at)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (id) DO UPDATE SET
                   shop = EXCLUDED.shop,
                   access_token = EXCLUDED.access_token,
                   scope = EXCLUDED.scope,
                   expires_at = EXCLUDED.expires_at"#,
        )
        .bind(&session.id)
        .bind(&session.shop)
        .bind(&session.access_token)
        .bind(&session.scope)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> StoreResult<Session> {
        let row = sqlx::query_as::<_, DbSession>(
            "SELECT id, shop, access_token, scope, expires_at FROM sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Session::from)
            .ok_or_else(|| StoreError::NotFound("session".into()))
    }

    async fn delete_sessions(&self, shop: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE shop = $1")
            .bind(shop)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn put_customer(&self, record: CustomerRecord) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO customers (shop, customer_id, email, phone, legal_hold)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (shop, customer_id) DO UPDATE SET
                   email = EXCLUDED.email,
                   phone = EXCLUDED.phone,
                   legal_hold = EXCLUDED.legal_hold"#,
        )
        .bind(&record.shop)
        .bind(record.customer_id)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(record.legal_hold)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn put_order(&self, record: OrderRecord) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO orders (shop, order_id, customer_id, legal_hold)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (shop, order_id) DO UPDATE SET
                   customer_id = EXCLUDED.customer_id,
                   legal_hold = EXCLUDED.legal_hold"#,
        )
        .bind(&record.shop)
        .bind(record.order_id)
        .bind(record.customer_id)
        .bind(record.legal_hold)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn customer_data(
        &self,
        shop: &str,
        customer: &CustomerRef,
        order_ids: &[i64],
    ) -> StoreResult<CustomerData> {
        let customers = sqlx::query_as::<_, DbCustomer>(&format!(
            "SELECT shop, customer_id, email, phone, legal_hold FROM customers WHERE {CUSTOMER_MATCH}"
        ))
        .bind(shop)
        .bind(customer.id)
        .bind(customer.email.as_deref())
        .bind(customer.phone.as_deref())
        .fetch_all(&self.pool)
        .await?;

        let matched_ids: Vec<i64> = customers.iter().map(|row| row.customer_id).collect();
        let orders = sqlx::query_as::<_, DbOrder>(
            r#"SELECT shop, order_id, customer_id, legal_hold FROM orders
               WHERE shop = $1 AND (order_id = ANY($2) OR customer_id = ANY($3))"#,
        )
        .bind(shop)
        .bind(order_ids)
        .bind(&matched_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(CustomerData {
            customers: customers.into_iter().map(CustomerRecord::from).collect(),
            orders: orders.into_iter().map(OrderRecord::from).collect(),
        })
    }

    async fn redact_customer(
        &self,
        shop: &str,
        customer: &CustomerRef,
        order_ids: &[i64],
    ) -> StoreResult<RedactionSummary> {
        // Resolve matched ids first so order deletion covers both the
        // enumerated orders and everything belonging to matched customers.
        let matched_ids = self.matched_customer_ids(shop, customer).await?;

        let mut tx = self.pool.begin().await?;

        let retained_customers = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM customers WHERE {CUSTOMER_MATCH} AND legal_hold"
        ))
        .bind(shop)
        .bind(customer.id)
        .bind(customer.email.as_deref())
        .bind(customer.phone.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        let customers_deleted = sqlx::query(&format!(
            "DELETE FROM customers WHERE {CUSTOMER_MATCH} AND NOT legal_hold"
        ))
        .bind(shop)
        .bind(customer.id)
        .bind(customer.email.as_deref())
        .bind(customer.phone.as_deref())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let retained_orders = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM orders
               WHERE shop = $1 AND (order_id = ANY($2) OR customer_id = ANY($3)) AND legal_hold"#,
        )
        .bind(shop)
        .bind(order_ids)
        .bind(&matched_ids)
        .fetch_one(&mut *tx)
        .await?;

        let orders_deleted = sqlx::query(
            r#"DELETE FROM orders
               WHERE shop = $1 AND (order_id = ANY($2) OR customer_id = ANY($3)) AND NOT legal_hold"#,
        )
        .bind(shop)
        .bind(order_ids)
        .bind(&matched_ids)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        Ok(RedactionSummary {
            customers_deleted,
            orders_deleted,
            retained: (retained_customers + retained_orders) as u64,
        })
    }

    async fn purge_shop_data(&self, shop: &str) -> StoreResult<PurgeSummary> {
        let mut tx = self.pool.begin().await?;
        let sessions_deleted = sqlx::query("DELETE FROM sessions WHERE shop = $1")
            .bind(shop)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let customers_deleted = sqlx::query("DELETE FROM customers WHERE shop = $1")
            .bind(shop)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let orders_deleted = sqlx::query("DELETE FROM orders WHERE shop = $1")
            .bind(shop)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;
        Ok(PurgeSummary {
            sessions_deleted,
            customers_deleted,
            orders_deleted,
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

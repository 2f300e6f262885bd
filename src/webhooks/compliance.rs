//! Compliance webhook dispatcher and handlers.
//!
//! # Purpose
//! Routes a verified webhook envelope to exactly one data-lifecycle handler
//! by topic, runs it against the persistence collaborator, and converts the
//! internal result into the transport acknowledgement.
//!
//! # Acknowledgement contract
//! The delivering platform retries indefinitely on non-200 responses, so the
//! dispatcher maps both handler success and handler failure to the same
//! 200/empty acknowledgement. The mapping is explicit: handlers return
//! `Result<HandlerAction, HandlerError>`, and [`ComplianceOutcome::status`]
//! collapses both variants at the boundary. Failures stay visible in logs
//! and metrics only.
//!
//! # Idempotence
//! Handlers run once per delivery with no internal retries and must tolerate
//! at-least-once redelivery; every store operation they invoke is a no-op on
//! already-absent rows.
use crate::model::PurgeSummary;
use crate::store::{CustomerData, ShopStore, StoreError};
use crate::webhooks::envelope::{CompliancePayload, ComplianceTopic, WebhookEnvelope};
use async_trait::async_trait;
use axum::http::StatusCode;
use std::sync::Arc;
use thiserror::Error;

/// Customer data gathered for out-of-band delivery to the store owner.
///
/// The regulatory window for fulfilling the request is 30 days; delivery
/// itself (mail, support ticket, export portal) happens outside this
/// service, behind [`DataExportSink`].
#[derive(Debug, Clone)]
pub struct DataExportBundle {
    pub shop: String,
    pub request_id: Option<i64>,
    pub data: CustomerData,
}

/// Out-of-band delivery collaborator for customer data requests.
#[async_trait]
pub trait DataExportSink: Send + Sync {
    async fn deliver(&self, bundle: DataExportBundle) -> anyhow::Result<()>;
}

/// Default sink: records the export obligation in the operational log.
///
/// Deployments wire a real delivery channel here; until then the log entry
/// is the operator's cue to fulfill the request manually.
pub struct LoggingExportSink;

#[async_trait]
impl DataExportSink for LoggingExportSink {
    async fn deliver(&self, bundle: DataExportBundle) -> anyhow::Result<()> {
        tracing::info!(
            shop = %bundle.shop,
            request_id = ?bundle.request_id,
            customers = bundle.data.customers.len(),
            orders = bundle.data.orders.len(),
            "customer data request gathered; deliver to store owner within 30 days"
        );
        Ok(())
    }
}

/// What a handler actually did, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerAction {
    DataExported { customers: u64, orders: u64 },
    CustomerRedacted { deleted: u64, retained: u64 },
    ShopRedacted(PurgeSummary),
    /// Unknown topic: logged and acknowledged, nothing touched.
    Ignored { topic: String },
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] anyhow::Error),
}

/// Terminal state of a dispatch: always acknowledged.
#[derive(Debug)]
pub struct ComplianceOutcome {
    pub topic: ComplianceTopic,
    pub shop: String,
    pub result: Result<HandlerAction, HandlerError>,
}

impl ComplianceOutcome {
    /// Transport acknowledgement for the delivering platform.
    ///
    /// Always 200 with an empty body, for success and failure alike; this
    /// exact pair is the compliance-protocol contract and must not change.
    pub fn status(&self) -> StatusCode {
        StatusCode::OK
    }
}

/// Stateless, request-scoped webhook dispatcher.
///
/// Single-shot state machine: Received -> Routed -> HandlerRan{ok|failed}
/// -> Acknowledged. There is no rejected terminal state for authenticated
/// deliveries.
#[derive(Clone)]
pub struct ComplianceDispatcher {
    store: Arc<dyn ShopStore>,
    exports: Arc<dyn DataExportSink>,
}

impl ComplianceDispatcher {
    pub fn new(store: Arc<dyn ShopStore>, exports: Arc<dyn DataExportSink>) -> Self {
        Self { store, exports }
    }

    /// Route one verified delivery and acknowledge it unconditionally.
    pub async fn dispatch(&self, envelope: WebhookEnvelope) -> ComplianceOutcome {
        let topic = envelope.topic.clone();
        let shop = envelope.shop.clone();
        tracing::info!(%topic, %shop, "received compliance webhook");

        let result = self.run_handler(envelope).await;
        let outcome_label = match &result {
            Ok(action) => {
                tracing::info!(%topic, %shop, ?action, "compliance webhook handled");
                "ok"
            }
            Err(err) => {
                // Swallowed by policy: a non-200 would make the platform
                // retry forever. The log line is the only failure signal.
                tracing::error!(%topic, %shop, error = %err, "compliance handler failed; acknowledging anyway");
                "failed"
            }
        };
        metrics::counter!(
            "compliance_webhooks_total",
            "topic" => topic.to_string(),
            "outcome" => outcome_label,
        )
        .increment(1);

        ComplianceOutcome { topic, shop, result }
    }

    async fn run_handler(&self, envelope: WebhookEnvelope) -> Result<HandlerAction, HandlerError> {
        let shop = envelope.shop.clone();
        match CompliancePayload::decode(&envelope)? {
            CompliancePayload::DataRequest(payload) => {
                let data = self
                    .store
                    .customer_data(&shop, &payload.customer, &payload.orders_requested)
                    .await?;
                let (customers, orders) = (data.customers.len() as u64, data.orders.len() as u64);
                self.exports
                    .deliver(DataExportBundle {
                        shop,
                        request_id: payload.data_request.and_then(|r| r.id),
                        data,
                    })
                    .await?;
                Ok(HandlerAction::DataExported { customers, orders })
            }
            CompliancePayload::CustomerRedact(payload) => {
                let summary = self
                    .store
                    .redact_customer(&shop, &payload.customer, &payload.orders_to_redact)
                    .await?;
                Ok(HandlerAction::CustomerRedacted {
                    deleted: summary.customers_deleted + summary.orders_deleted,
                    retained: summary.retained,
                })
            }
            CompliancePayload::ShopRedact(_) => {
                // The envelope's verified shop domain keys the purge; the
                // payload's shop_domain is informational.
                let summary = self.store.purge_shop_data(&shop).await?;
                Ok(HandlerAction::ShopRedacted(summary))
            }
            CompliancePayload::Unknown(_) => {
                tracing::warn!(topic = %envelope.topic, %shop, "unknown compliance webhook topic");
                Ok(HandlerAction::Ignored {
                    topic: envelope.topic.to_string(),
                })
            }
        }
    }
}

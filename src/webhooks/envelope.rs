//! Webhook envelope and per-topic payload schemas.
//!
//! # Purpose
//! The platform delivers compliance webhooks as an opaque JSON body plus
//! topic/shop identity. This module names the topics and gives each one an
//! explicit payload schema, decoded once at the dispatcher boundary so
//! handlers receive strongly-shaped input.
use crate::model::CustomerRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic of a compliance delivery, parsed from the platform topic string.
///
/// Unrecognized topics are carried through as `Unknown` rather than
/// rejected: the delivery contract requires acknowledging them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplianceTopic {
    DataRequest,
    CustomerRedact,
    ShopRedact,
    Unknown(String),
}

impl ComplianceTopic {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "customers/data_request" => Self::DataRequest,
            "customers/redact" => Self::CustomerRedact,
            "shop/redact" => Self::ShopRedact,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ComplianceTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataRequest => f.write_str("customers/data_request"),
            Self::CustomerRedact => f.write_str("customers/redact"),
            Self::ShopRedact => f.write_str("shop/redact"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Verified `(shop, topic, payload)` triple handed over by the
/// authentication boundary. The dispatcher never re-validates authenticity.
#[derive(Debug, Clone)]
pub struct WebhookEnvelope {
    pub shop: String,
    pub topic: ComplianceTopic,
    pub payload: serde_json::Value,
}

/// Payload of `customers/data_request`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataRequestPayload {
    pub shop_id: Option<i64>,
    pub shop_domain: Option<String>,
    #[serde(default)]
    pub customer: CustomerRef,
    #[serde(default)]
    pub orders_requested: Vec<i64>,
    pub data_request: Option<DataRequestRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataRequestRef {
    pub id: Option<i64>,
}

/// Payload of `customers/redact`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CustomerRedactPayload {
    pub shop_id: Option<i64>,
    pub shop_domain: Option<String>,
    #[serde(default)]
    pub customer: CustomerRef,
    #[serde(default)]
    pub orders_to_redact: Vec<i64>,
}

/// Payload of `shop/redact`, delivered ~48 hours after uninstall.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShopRedactPayload {
    pub shop_id: Option<i64>,
    pub shop_domain: Option<String>,
}

/// Per-topic tagged payload, decoded once from the envelope.
#[derive(Debug, Clone)]
pub enum CompliancePayload {
    DataRequest(DataRequestPayload),
    CustomerRedact(CustomerRedactPayload),
    ShopRedact(ShopRedactPayload),
    /// Unrecognized topic; the raw body is kept for the warning log only.
    Unknown(serde_json::Value),
}

impl CompliancePayload {
    /// Decode the envelope body according to its topic.
    pub fn decode(envelope: &WebhookEnvelope) -> Result<Self, serde_json::Error> {
        match &envelope.topic {
            ComplianceTopic::DataRequest => {
                serde_json::from_value(envelope.payload.clone()).map(Self::DataRequest)
            }
            ComplianceTopic::CustomerRedact => {
                serde_json::from_value(envelope.payload.clone()).map(Self::CustomerRedact)
            }
            ComplianceTopic::ShopRedact => {
                serde_json::from_value(envelope.payload.clone()).map(Self::ShopRedact)
            }
            ComplianceTopic::Unknown(_) => Ok(Self::Unknown(envelope.payload.clone())),
        }
    }
}

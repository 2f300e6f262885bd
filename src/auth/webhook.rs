//! Webhook delivery authentication boundary.
//!
//! # Purpose
//! Turns an inbound webhook request into a verified
//! `(shop, topic, payload)` envelope, or rejects it before the dispatcher
//! ever runs.
//!
//! # Notes
//! HMAC signature verification belongs to the fronting platform framework
//! or ingress verifier; the shipped [`HeaderAuthenticator`] consumes the
//! identity headers that verifier injects after a successful check. Swapping
//! in a self-verifying implementation is a matter of implementing
//! [`WebhookAuthenticator`].
use crate::auth::AuthError;
use crate::webhooks::{ComplianceTopic, WebhookEnvelope};
use async_trait::async_trait;
use axum::http::HeaderMap;

const TOPIC_HEADER: &str = "x-shopify-topic";
const SHOP_HEADER: &str = "x-shopify-shop-domain";

#[async_trait]
pub trait WebhookAuthenticator: Send + Sync {
    /// Authenticate one delivery and produce its verified envelope.
    async fn authenticate(&self, headers: &HeaderMap, body: &[u8])
    -> Result<WebhookEnvelope, AuthError>;
}

/// Authenticator that trusts the verified identity headers.
///
/// Requires both the topic and shop-domain headers and a JSON body; anything
/// less is a 401-equivalent rejection.
#[derive(Default)]
pub struct HeaderAuthenticator;

fn required_header<'a>(
    headers: &'a HeaderMap,
    name: &'static str,
) -> Result<&'a str, AuthError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingHeader(name))
}

#[async_trait]
impl WebhookAuthenticator for HeaderAuthenticator {
    async fn authenticate(
        &self,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<WebhookEnvelope, AuthError> {
        let topic = required_header(headers, TOPIC_HEADER)?;
        let shop = required_header(headers, SHOP_HEADER)?;
        let payload: serde_json::Value = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(body).map_err(|err| AuthError::InvalidBody(err.to_string()))?
        };
        Ok(WebhookEnvelope {
            shop: shop.to_string(),
            topic: ComplianceTopic::parse(topic),
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(topic: Option<&str>, shop: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(topic) = topic {
            map.insert(TOPIC_HEADER, topic.parse().expect("topic"));
        }
        if let Some(shop) = shop {
            map.insert(SHOP_HEADER, shop.parse().expect("shop"));
        }
        map
    }

    #[tokio::test]
    async fn builds_envelope_from_verified_headers() {
        let auth = HeaderAuthenticator;
        let envelope = auth
            .authenticate(
                &headers(Some("shop/redact"), Some("test.myshopify.com")),
                br#"{"shop_domain":"test.myshopify.com"}"#,
            )
            .await
            .expect("envelope");
        assert_eq!(envelope.shop, "test.myshopify.com");
        assert_eq!(envelope.topic, ComplianceTopic::ShopRedact);
    }

    #[tokio::test]
    async fn rejects_missing_topic_header() {
        let auth = HeaderAuthenticator;
        let err = auth
            .authenticate(&headers(None, Some("test.myshopify.com")), b"{}")
            .await
            .expect_err("rejected");
        assert!(matches!(err, AuthError::MissingHeader(TOPIC_HEADER)));
    }

    #[tokio::test]
    async fn rejects_missing_shop_header() {
        let auth = HeaderAuthenticator;
        let err = auth
            .authenticate(&headers(Some("shop/redact"), None), b"{}")
            .await
            .expect_err("rejected");
        assert!(matches!(err, AuthError::MissingHeader(SHOP_HEADER)));
    }

    #[tokio::test]
    async fn rejects_non_json_body() {
        let auth = HeaderAuthenticator;
        let err = auth
            .authenticate(
                &headers(Some("shop/redact"), Some("test.myshopify.com")),
                b"not json",
            )
            .await
            .expect_err("rejected");
        assert!(matches!(err, AuthError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn empty_body_becomes_null_payload() {
        let auth = HeaderAuthenticator;
        let envelope = auth
            .authenticate(
                &headers(Some("shop/redact"), Some("test.myshopify.com")),
                b"",
            )
            .await
            .expect("envelope");
        assert!(envelope.payload.is_null());
    }
}

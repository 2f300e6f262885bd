//! Admin session authentication boundary.
//!
//! # Purpose
//! Resolves the bearer session reference on interactive admin requests into
//! a verified session record, or rejects with a 401-equivalent before any
//! admin handler runs.
use crate::auth::AuthError;
use crate::model::Session;
use crate::store::{ShopStore, StoreError};
use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use std::sync::Arc;

#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Session, AuthError>;
}

/// Authenticator that resolves `Authorization: Bearer <session-id>` against
/// the session store. Token issuance happens upstream at install/auth time;
/// this boundary only proves the reference maps to a live session row.
pub struct StoreSessionAuthenticator {
    store: Arc<dyn ShopStore>,
}

impl StoreSessionAuthenticator {
    pub fn new(store: Arc<dyn ShopStore>) -> Self {
        Self { store }
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingHeader("authorization"))
}

#[async_trait]
impl SessionAuthenticator for StoreSessionAuthenticator {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Session, AuthError> {
        let session_id = bearer_token(headers)?;
        match self.store.get_session(session_id).await {
            Ok(session) => Ok(session),
            Err(StoreError::NotFound(_)) => Err(AuthError::UnknownSession),
            Err(err) => {
                tracing::error!(error = %err, "session lookup failed");
                Err(AuthError::UnknownSession)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn bearer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().expect("header"));
        headers
    }

    #[tokio::test]
    async fn resolves_known_session() {
        let store = Arc::new(InMemoryStore::new());
        store
            .put_session(Session {
                id: "sess-1".to_string(),
                shop: "test.myshopify.com".to_string(),
                access_token: "shpat_token".to_string(),
                scope: Some("read_products".to_string()),
                expires_at: None,
            })
            .await
            .expect("put");
        let auth = StoreSessionAuthenticator::new(store);

        let session = auth
            .authenticate(&bearer("Bearer sess-1"))
            .await
            .expect("session");
        assert_eq!(session.shop, "test.myshopify.com");
    }

    #[tokio::test]
    async fn rejects_unknown_session() {
        let auth = StoreSessionAuthenticator::new(Arc::new(InMemoryStore::new()));
        let err = auth
            .authenticate(&bearer("Bearer missing"))
            .await
            .expect_err("rejected");
        assert!(matches!(err, AuthError::UnknownSession));
    }

    #[tokio::test]
    async fn rejects_missing_or_malformed_authorization() {
        let auth = StoreSessionAuthenticator::new(Arc::new(InMemoryStore::new()));
        let err = auth
            .authenticate(&HeaderMap::new())
            .await
            .expect_err("rejected");
        assert!(matches!(err, AuthError::MissingHeader(_)));

        let err = auth
            .authenticate(&bearer("Token sess-1"))
            .await
            .expect_err("rejected");
        assert!(matches!(err, AuthError::MissingHeader(_)));
    }
}

use shopbridge::admin_api::{AdminApi, ProductSummary};
use shopbridge::app::AppState;
use shopbridge::auth::{HeaderAuthenticator, StoreSessionAuthenticator};
use shopbridge::model::Session;
use shopbridge::store::ShopStore;
use shopbridge::store::memory::InMemoryStore;
use shopbridge::webhooks::{ComplianceDispatcher, LoggingExportSink};
use async_trait::async_trait;
use std::sync::Arc;

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_body(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

/// Admin API stub that echoes the requested title back.
pub struct StubAdminApi;

#[async_trait]
impl AdminApi for StubAdminApi {
    async fn create_product(
        &self,
        session: &Session,
        title: &str,
    ) -> anyhow::Result<ProductSummary> {
        let _ = session;
        Ok(ProductSummary {
            id: "gid://shopify/Product/1".to_string(),
            title: title.to_string(),
            handle: None,
            status: Some("ACTIVE".to_string()),
        })
    }
}

/// State wired against a shared in-memory store so tests can inspect the
/// side effects of webhook deliveries.
pub fn app_state(required_scopes: Vec<String>) -> (AppState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let shared: Arc<dyn ShopStore> = store.clone();
    let state = AppState {
        app_url: "https://app.example.com".to_string(),
        api_version: "2025-10".to_string(),
        required_scopes: Arc::new(required_scopes),
        session_auth: Arc::new(StoreSessionAuthenticator::new(shared.clone())),
        webhook_auth: Arc::new(HeaderAuthenticator),
        admin_api: Arc::new(StubAdminApi),
        dispatcher: ComplianceDispatcher::new(shared.clone(), Arc::new(LoggingExportSink)),
        store: shared,
    };
    (state, store)
}

pub fn session(id: &str, shop: &str, scope: &str) -> Session {
    Session {
        id: id.to_string(),
        shop: shop.to_string(),
        access_token: "shpat_abcdef012345".to_string(),
        scope: Some(scope.to_string()),
        expires_at: None,
    }
}

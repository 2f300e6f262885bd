//! shopbridge HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, storage, the authentication boundaries, and the
//! compliance dispatcher, then starts the API server and metrics endpoint.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup
//! logic.
mod admin_api;
mod api;
mod app;
mod auth;
mod config;
mod model;
mod observability;
mod scopes;
mod store;
mod webhooks;

use admin_api::GraphqlAdminApi;
use anyhow::Context;
use app::{AppState, build_router};
use auth::{HeaderAuthenticator, StoreSessionAuthenticator};
use std::future::Future;
use std::sync::Arc;
use store::{ShopStore, memory::InMemoryStore, postgres::PostgresStore};
use webhooks::{ComplianceDispatcher, LoggingExportSink};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::AppConfig::from_env_or_yaml()?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: config::AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("shopbridge");
    let state = build_state(&config).await?;
    tracing::info!(
        backend = state.store.backend_name(),
        app_url = %state.app_url,
        "starting shopbridge"
    );
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);

    let addr = config.bind_addr;
    tracing::info!(%addr, "admin service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

async fn build_state(config: &config::AppConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn ShopStore> = match config.storage {
        config::StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        config::StorageBackend::Postgres => {
            let pg = config
                .postgres
                .as_ref()
                .context("postgres configuration missing")?;
            Arc::new(PostgresStore::connect(pg).await?)
        }
    };

    Ok(AppState {
        app_url: config.app_url.clone(),
        api_version: config.api_version.clone(),
        required_scopes: Arc::new(config.required_scopes.clone()),
        session_auth: Arc::new(StoreSessionAuthenticator::new(store.clone())),
        webhook_auth: Arc::new(HeaderAuthenticator),
        admin_api: Arc::new(GraphqlAdminApi::new(config.api_version.clone())),
        dispatcher: ComplianceDispatcher::new(store.clone(), Arc::new(LoggingExportSink)),
        store,
    })
}

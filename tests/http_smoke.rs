mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{app_state, read_json, session};
use http_helpers::{authorized_get, json_request};
use shopbridge::app::build_router;
use shopbridge::store::ShopStore;
use tower::ServiceExt;

fn scopes(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[tokio::test]
async fn system_endpoints_report_identity_and_health() {
    let (state, _store) = app_state(scopes(&["read_products"]));
    let app = build_router(state).into_service();

    let info = Request::builder()
        .uri("/v1/system/info")
        .body(Body::empty())
        .expect("info");
    let response = app.clone().oneshot(info).await.expect("info");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["app_url"], "https://app.example.com");
    assert_eq!(payload["api_version"], "2025-10");
    assert_eq!(payload["storage_backend"], "memory");
    assert_eq!(payload["durable_storage"], false);

    let health = Request::builder()
        .uri("/v1/system/health")
        .body(Body::empty())
        .expect("health");
    let response = app.clone().oneshot(health).await.expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "ok");
}

#[tokio::test]
async fn admin_routes_require_a_session() {
    let (state, _store) = app_state(scopes(&["read_products"]));
    let app = build_router(state).into_service();

    for uri in ["/v1/session", "/v1/scopes"] {
        let request = Request::builder().uri(uri).body(Body::empty()).expect("get");
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let payload = read_json(response).await;
        assert_eq!(payload["code"], "unauthorized");
    }

    let create = json_request("POST", "/v1/products", serde_json::json!({}));
    let response = app.clone().oneshot(create).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_summary_previews_the_token() {
    let (state, store) = app_state(scopes(&["read_products"]));
    store
        .put_session(session("sess-1", "test.myshopify.com", "read_products"))
        .await
        .expect("put");
    let app = build_router(state).into_service();

    let response = app
        .clone()
        .oneshot(authorized_get("/v1/session", "sess-1"))
        .await
        .expect("session");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["shop"], "test.myshopify.com");
    assert_eq!(payload["scopes"], serde_json::json!(["read_products"]));
    assert_eq!(payload["token_preview"], "shpat_abcd...");
}

#[tokio::test]
async fn scope_status_reports_granted_and_missing() {
    let (state, store) = app_state(scopes(&[
        "read_all_orders",
        "read_products",
        "read_customers",
        "read_orders",
        "read_inventory",
    ]));
    store
        .put_session(session(
            "sess-1",
            "test.myshopify.com",
            "read_products,read_orders",
        ))
        .await
        .expect("put");
    let app = build_router(state).into_service();

    let response = app
        .clone()
        .oneshot(authorized_get("/v1/scopes", "sess-1"))
        .await
        .expect("scopes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(
        payload["granted"],
        serde_json::json!(["read_products", "read_orders"])
    );
    assert_eq!(
        payload["missing"],
        serde_json::json!(["read_all_orders", "read_customers", "read_inventory"])
    );
    assert_eq!(payload["granted_count"], 2);
    assert_eq!(payload["total_required"], 5);
    assert_eq!(payload["complete"], false);
}

#[tokio::test]
async fn scope_status_is_complete_when_everything_is_granted() {
    let (state, store) = app_state(scopes(&["read_products"]));
    store
        .put_session(session("sess-1", "test.myshopify.com", "read_products"))
        .await
        .expect("put");
    let app = build_router(state).into_service();

    let response = app
        .clone()
        .oneshot(authorized_get("/v1/scopes", "sess-1"))
        .await
        .expect("scopes");
    let payload = read_json(response).await;
    assert_eq!(payload["complete"], true);
    assert_eq!(payload["missing"], serde_json::json!([]));
}

#[tokio::test]
async fn product_relay_returns_the_created_product() {
    let (state, store) = app_state(scopes(&["write_products"]));
    store
        .put_session(session("sess-1", "test.myshopify.com", "write_products"))
        .await
        .expect("put");
    let app = build_router(state).into_service();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/products")
        .header("authorization", "Bearer sess-1")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "title": "Blue Snowboard" }).to_string(),
        ))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json(response).await;
    assert_eq!(payload["title"], "Blue Snowboard");
    assert_eq!(payload["id"], "gid://shopify/Product/1");
}

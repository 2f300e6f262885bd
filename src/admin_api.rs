//! Upstream admin GraphQL API collaborator.
//!
//! # Purpose
//! Relays the demo `productCreate` mutation to the platform's admin GraphQL
//! endpoint using the authenticated session's access token. The transport is
//! behind the [`AdminApi`] trait so tests and alternative backends can stub
//! it.
use crate::model::Session;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use utoipa::ToSchema;

const PRODUCT_CREATE_MUTATION: &str = r#"
mutation populateProduct($product: ProductCreateInput!) {
  productCreate(product: $product) {
    product {
      id
      title
      handle
      status
    }
  }
}"#;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    pub handle: Option<String>,
    pub status: Option<String>,
}

#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Create a product titled `title` in the session's shop.
    async fn create_product(&self, session: &Session, title: &str)
    -> anyhow::Result<ProductSummary>;
}

/// Admin API client speaking GraphQL over HTTPS to the session's shop.
pub struct GraphqlAdminApi {
    client: reqwest::Client,
    api_version: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<ProductCreateData>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductCreateData {
    product_create: Option<ProductCreatePayload>,
}

#[derive(Debug, Deserialize)]
struct ProductCreatePayload {
    product: Option<ProductSummary>,
}

impl GraphqlAdminApi {
    pub fn new(api_version: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_version,
        }
    }

    fn endpoint(&self, shop: &str) -> String {
        format!(
            "https://{shop}/admin/api/{version}/graphql.json",
            version = self.api_version
        )
    }
}

#[async_trait]
impl AdminApi for GraphqlAdminApi {
    async fn create_product(
        &self,
        session: &Session,
        title: &str,
    ) -> anyhow::Result<ProductSummary> {
        let body = serde_json::json!({
            "query": PRODUCT_CREATE_MUTATION,
            "variables": { "product": { "title": title } }
        });
        let response = self
            .client
            .post(self.endpoint(&session.shop))
            .header("X-Shopify-Access-Token", &session.access_token)
            .json(&body)
            .send()
            .await
            .with_context(|| "send productCreate mutation")?
            .error_for_status()
            .with_context(|| "productCreate response status")?;

        let parsed: GraphqlResponse = response
            .json()
            .await
            .with_context(|| "decode productCreate response")?;
        if !parsed.errors.is_empty() {
            return Err(anyhow!("admin API returned errors: {:?}", parsed.errors));
        }
        parsed
            .data
            .and_then(|data| data.product_create)
            .and_then(|payload| payload.product)
            .ok_or_else(|| anyhow!("admin API returned no product"))
    }
}

/// Demo product title, rotating through a small palette like the scaffold
/// action this relay replaces.
pub fn demo_product_title() -> String {
    const COLORS: [&str; 4] = ["Red", "Orange", "Yellow", "Green"];
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos())
        .unwrap_or(0);
    format!("{} Snowboard", COLORS[(nanos as usize) % COLORS.len()])
}

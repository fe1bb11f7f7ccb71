use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trolley_cart::Metadata;
use trolley_core::ProductId;

use crate::error::ServiceError;

/// Product metadata as served by the catalog: the id plus whatever opaque
/// fields the catalog carries (name, price, image, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// Read access to the product catalog, queried once per product when it
/// first enters the cart.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn product_of(&self, product_id: ProductId) -> Result<ProductRecord, ServiceError>;
}

/// Catalog backed by an HTTP API: `GET {base_url}/products/{product_id}`.
#[derive(Debug, Clone)]
pub struct HttpCatalogService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalogService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    async fn product_of(&self, product_id: ProductId) -> Result<ProductRecord, ServiceError> {
        let url = format!("{}/products/{}", self.base_url, product_id);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(product_id = %product_id, status, "catalog lookup failed");
            return Err(ServiceError::Api(status, body));
        }

        resp.json::<ProductRecord>()
            .await
            .map_err(|e| ServiceError::Parse(format!("invalid product response: {e}")))
    }
}

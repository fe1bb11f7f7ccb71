use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trolley_core::ProductId;

use crate::error::ServiceError;

/// Available quantity of a product, as reported by the stock source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub amount: u32,
}

/// Source of truth for how many units of a product can still be purchased.
#[async_trait]
pub trait StockService: Send + Sync {
    async fn stock_of(&self, product_id: ProductId) -> Result<StockLevel, ServiceError>;
}

/// Stock source backed by an HTTP API: `GET {base_url}/stock/{product_id}`.
#[derive(Debug, Clone)]
pub struct HttpStockService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStockService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl StockService for HttpStockService {
    async fn stock_of(&self, product_id: ProductId) -> Result<StockLevel, ServiceError> {
        let url = format!("{}/stock/{}", self.base_url, product_id);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(product_id = %product_id, status, "stock lookup failed");
            return Err(ServiceError::Api(status, body));
        }

        resp.json::<StockLevel>()
            .await
            .map_err(|e| ServiceError::Parse(format!("invalid stock response: {e}")))
    }
}

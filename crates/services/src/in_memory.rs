//! In-memory stock/catalog fakes for tests/dev.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use trolley_cart::Metadata;
use trolley_core::ProductId;

use crate::catalog::{CatalogService, ProductRecord};
use crate::error::ServiceError;
use crate::stock::{StockLevel, StockService};

/// In-memory stock source.
///
/// - No IO / no async suspension
/// - Can be switched into a failing mode to exercise error paths
#[derive(Debug, Default)]
pub struct InMemoryStock {
    levels: Mutex<HashMap<ProductId, u32>>,
    failing: AtomicBool,
}

impl InMemoryStock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stock(&self, product_id: ProductId, amount: u32) {
        if let Ok(mut levels) = self.levels.lock() {
            levels.insert(product_id, amount);
        }
    }

    /// While failing, every lookup returns a network error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl StockService for InMemoryStock {
    async fn stock_of(&self, product_id: ProductId) -> Result<StockLevel, ServiceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ServiceError::Network("stock service unreachable".into()));
        }

        let levels = self
            .levels
            .lock()
            .map_err(|_| ServiceError::Network("stock state poisoned".into()))?;

        match levels.get(&product_id) {
            Some(amount) => Ok(StockLevel { amount: *amount }),
            None => Err(ServiceError::Api(404, format!("no stock for {product_id}"))),
        }
    }
}

/// In-memory product catalog.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: Mutex<HashMap<ProductId, ProductRecord>>,
    failing: AtomicBool,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product_id: ProductId, metadata: Metadata) {
        if let Ok(mut products) = self.products.lock() {
            products.insert(
                product_id,
                ProductRecord {
                    product_id,
                    metadata,
                },
            );
        }
    }

    /// While failing, every lookup returns a network error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn product_of(&self, product_id: ProductId) -> Result<ProductRecord, ServiceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ServiceError::Network("catalog service unreachable".into()));
        }

        let products = self
            .products
            .lock()
            .map_err(|_| ServiceError::Network("catalog state poisoned".into()))?;

        products
            .get(&product_id)
            .cloned()
            .ok_or_else(|| ServiceError::Api(404, format!("unknown product {product_id}")))
    }
}

//! Collaborator contracts of the cart manager: the stock source and the
//! product catalog, plus reqwest-backed clients and in-memory fakes for
//! tests/dev.

pub mod catalog;
pub mod error;
pub mod in_memory;
pub mod stock;

pub use catalog::{CatalogService, HttpCatalogService, ProductRecord};
pub use error::ServiceError;
pub use in_memory::{InMemoryCatalog, InMemoryStock};
pub use stock::{HttpStockService, StockLevel, StockService};

//! Durable storage for the cart collection.
//!
//! The cart lives under a single fixed key; `save` replaces the prior value
//! wholesale and `load` returns it (or nothing on first run). No schema
//! versioning or migration.

pub mod in_memory;
pub mod sqlite;

use async_trait::async_trait;
use trolley_cart::CartItem;

pub use in_memory::InMemoryCartStore;
pub use sqlite::SqliteCartStore;

/// Storage key for the cart collection, scoped to this application.
pub const CART_KEY: &str = "@trolley:cart";

/// Persistent key-value store for the cart.
///
/// `load` yields `None` when nothing was ever saved. Corrupt data surfaces
/// as an error; the manager degrades that to an empty cart.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Option<Vec<CartItem>>>;
    async fn save(&self, items: &[CartItem]) -> anyhow::Result<()>;
}

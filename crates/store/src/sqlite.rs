//! SQLite-backed cart store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;
use trolley_cart::CartItem;

use crate::{CartStore, CART_KEY};

/// SQLite-backed persistent store for the cart.
///
/// The pool is created lazily on first use so constructing the store is
/// infallible; the handle is cheap to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct SqliteCartStore {
    pool: Arc<Mutex<Option<SqlitePool>>>,
    db_path: Option<PathBuf>,
}

impl SqliteCartStore {
    /// Store at the default location, `{app_data_dir}/trolley/cart.db`.
    pub fn new() -> Self {
        Self {
            pool: Arc::new(Mutex::new(None)),
            db_path: None,
        }
    }

    /// Store at an explicit database path (tests, custom setups).
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            pool: Arc::new(Mutex::new(None)),
            db_path: Some(path.into()),
        }
    }

    /// Initialize the database connection (called lazily on first use).
    async fn ensure_initialized(&self) -> anyhow::Result<()> {
        let mut pool_guard = self.pool.lock().await;
        if pool_guard.is_some() {
            return Ok(());
        }

        let db_path = match &self.db_path {
            Some(path) => path.clone(),
            None => default_db_path()
                .context("failed to determine cart DB path - ensure app data directory is accessible")?,
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create cart store directory at {:?}", parent))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("failed to create SQLite pool for cart store at {:?}", db_path))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cart_state (
                store_key TEXT PRIMARY KEY,
                data      TEXT NOT NULL,
                saved_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create cart_state table")?;

        tracing::debug!(path = ?db_path, "cart store opened");
        *pool_guard = Some(pool);
        Ok(())
    }

    /// Get the pool, initializing if necessary.
    async fn get_pool(&self) -> anyhow::Result<SqlitePool> {
        self.ensure_initialized().await?;
        let pool_guard = self.pool.lock().await;
        pool_guard
            .as_ref()
            .cloned()
            .context("cart store pool missing after initialization")
    }
}

impl Default for SqliteCartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartStore for SqliteCartStore {
    async fn load(&self) -> anyhow::Result<Option<Vec<CartItem>>> {
        let pool = self.get_pool().await?;

        let row = sqlx::query(
            r#"
            SELECT data
            FROM cart_state
            WHERE store_key = ?1
            "#,
        )
        .bind(CART_KEY)
        .fetch_optional(&pool)
        .await
        .context("failed to fetch cart from store")?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let data: String = row.try_get("data")?;
        let items: Vec<CartItem> =
            serde_json::from_str(&data).context("failed to deserialize stored cart")?;

        Ok(Some(items))
    }

    async fn save(&self, items: &[CartItem]) -> anyhow::Result<()> {
        let pool = self.get_pool().await?;

        let payload =
            serde_json::to_string(items).context("failed to serialize cart for store")?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO cart_state (store_key, data, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(store_key)
            DO UPDATE SET
                data = excluded.data,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(CART_KEY)
        .bind(&payload)
        .bind(&now)
        .execute(&pool)
        .await
        .context("failed to upsert cart in store")?;

        Ok(())
    }
}

/// Resolve the default path to the SQLite database:
/// `{app_data_dir}/trolley/cart.db`.
fn default_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut dir = base;
    dir.push("trolley");
    dir.push("cart.db");

    Ok(dir)
}

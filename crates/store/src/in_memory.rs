//! In-memory cart store for tests/dev.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use trolley_cart::CartItem;

use crate::CartStore;

/// In-memory store.
///
/// - No IO
/// - Can be switched into a failing mode to exercise persist-failure paths
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    state: Mutex<Option<Vec<CartItem>>>,
    failing: AtomicBool,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store as if a previous session had saved `items`.
    pub fn seeded(items: Vec<CartItem>) -> Self {
        Self {
            state: Mutex::new(Some(items)),
            failing: AtomicBool::new(false),
        }
    }

    /// While failing, every load/save returns an error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// What is currently persisted (for assertions).
    pub fn persisted(&self) -> Option<Vec<CartItem>> {
        self.state.lock().ok().and_then(|s| s.clone())
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn load(&self) -> anyhow::Result<Option<Vec<CartItem>>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("store unavailable"));
        }
        let state = self
            .state
            .lock()
            .map_err(|_| anyhow!("store state poisoned"))?;
        Ok(state.clone())
    }

    async fn save(&self, items: &[CartItem]) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("store unavailable"));
        }
        let mut state = self
            .state
            .lock()
            .map_err(|_| anyhow!("store state poisoned"))?;
        *state = Some(items.to_vec());
        Ok(())
    }
}

//! The cart state manager: serialized read-validate-commit operations over
//! the in-memory cart, backed by the stock/catalog services and the
//! persistent store.

use std::sync::mpsc;
use std::sync::{Arc, Mutex as StdMutex, PoisonError, RwLock};

use tokio::sync::Mutex;

use trolley_cart::{Cart, CartIntegrityError, CartItem};
use trolley_core::{CartError, CartResult, ProductId};
use trolley_services::{CatalogService, StockService};
use trolley_store::CartStore;

use crate::notify::{Notice, Notifier, Operation};
use crate::subscription::Subscription;

/// Owns the authoritative cart collection and keeps it consistent with the
/// persistent store.
///
/// All three mutating operations run under a single mutation lock covering
/// the whole read-validate-commit sequence (service calls included), so
/// overlapping operations on the same product serialize and can never both
/// decide "not in cart yet" (see the concurrency tests below). Reads never
/// take that lock and never perform IO.
///
/// Commit policy is persist-first: the computed next cart is saved to the
/// store before it is swapped into memory and published, so a persistence
/// failure aborts the operation with no visible state change.
pub struct CartManager {
    state: RwLock<Cart>,
    mutation: Mutex<()>,
    stock: Arc<dyn StockService>,
    catalog: Arc<dyn CatalogService>,
    store: Arc<dyn CartStore>,
    notifier: Arc<dyn Notifier>,
    subscribers: StdMutex<Vec<mpsc::Sender<Cart>>>,
}

impl CartManager {
    /// Create a manager, restoring the cart from the persistent store.
    ///
    /// Absent, unreadable or invariant-violating stored data silently
    /// degrades to an empty cart; initialization never fails.
    pub async fn init(
        stock: Arc<dyn StockService>,
        catalog: Arc<dyn CatalogService>,
        store: Arc<dyn CartStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cart = match store.load().await {
            Ok(Some(items)) => match Cart::from_items(items) {
                Ok(cart) => {
                    tracing::debug!(items = cart.len(), "restored cart from store");
                    cart
                }
                Err(err) => {
                    tracing::warn!(%err, "stored cart violates invariants, starting empty");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(err) => {
                tracing::warn!("failed to load stored cart, starting empty: {err:#}");
                Cart::new()
            }
        };

        Self {
            state: RwLock::new(cart),
            mutation: Mutex::new(()),
            stock,
            catalog,
            store,
            notifier,
            subscribers: StdMutex::new(Vec::new()),
        }
    }

    /// Immutable snapshot of the current cart. Never performs IO.
    pub fn cart(&self) -> Cart {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Register for cart-changed notifications.
    ///
    /// The subscription receives a snapshot after every commit.
    pub fn subscribe(&self) -> Subscription<Cart> {
        let (tx, rx) = mpsc::channel();

        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }

    /// Drop all subscriptions (their receivers disconnect).
    ///
    /// The manager stays readable and operational afterwards; it just no
    /// longer fans out.
    pub fn dispose(&self) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.clear();
        }
    }

    /// Add one unit of a product to the cart.
    ///
    /// An item already in the cart gets its amount bumped by one; a new item
    /// is appended at the end with the catalog metadata captured at this
    /// moment and amount 1. The desired amount is validated against the
    /// stock source first.
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<()> {
        let _guard = self.mutation.lock().await;

        let current = self.cart();
        let planned = self.plan_add(&current, product_id).await;
        self.finish(Operation::Add, planned).await
    }

    /// Remove a product from the cart entirely. Purely local.
    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<()> {
        let _guard = self.mutation.lock().await;

        let current = self.cart();
        let planned = current.without(product_id).map_err(absence_aware);
        self.finish(Operation::Remove, planned).await
    }

    /// Overwrite the amount of a product already in the cart.
    ///
    /// A non-positive `amount` is a deliberate no-op (callers are expected
    /// to use [`CartManager::remove_product`] to delete an item).
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> CartResult<()> {
        if amount <= 0 {
            tracing::debug!(%product_id, amount, "ignoring non-positive amount update");
            return Ok(());
        }

        let _guard = self.mutation.lock().await;

        let current = self.cart();
        let planned = self.plan_update(&current, product_id, amount).await;
        self.finish(Operation::Update, planned).await
    }

    async fn plan_add(&self, current: &Cart, product_id: ProductId) -> CartResult<Cart> {
        let stock = self
            .stock
            .stock_of(product_id)
            .await
            .map_err(|e| CartError::operation_failed(format!("stock lookup failed: {e}")))?;

        // A cart amount already at the ceiling cannot go up one more, which
        // is a stock shortage like any other.
        let desired = match current.amount_of(product_id).unwrap_or(0).checked_add(1) {
            Some(desired) if desired <= stock.amount => desired,
            _ => return Err(CartError::InsufficientStock),
        };

        if current.contains(product_id) {
            current.with_amount(product_id, desired).map_err(integrity)
        } else {
            // Metadata is captured once, at first add, and never refetched.
            let record = self
                .catalog
                .product_of(product_id)
                .await
                .map_err(|e| CartError::operation_failed(format!("catalog lookup failed: {e}")))?;

            current
                .with_item(CartItem::new(product_id, 1, record.metadata))
                .map_err(integrity)
        }
    }

    async fn plan_update(
        &self,
        current: &Cart,
        product_id: ProductId,
        amount: i64,
    ) -> CartResult<Cart> {
        let stock = self
            .stock
            .stock_of(product_id)
            .await
            .map_err(|e| CartError::operation_failed(format!("stock lookup failed: {e}")))?;

        // An amount that does not fit the stock type exceeds any stock level.
        let amount = match u32::try_from(amount) {
            Ok(a) if a <= stock.amount => a,
            _ => return Err(CartError::InsufficientStock),
        };

        current.with_amount(product_id, amount).map_err(absence_aware)
    }

    /// Commit a planned cart or report the planning failure, in either case
    /// routing errors to the notifier.
    async fn finish(&self, op: Operation, planned: CartResult<Cart>) -> CartResult<()> {
        let result = match planned {
            Ok(next) => self.commit(next).await,
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            let notice = Notice::for_failure(op, err);
            tracing::warn!(?op, %err, "cart operation failed");
            self.notifier.notify(notice);
        }

        result
    }

    /// Persist the next cart, then swap it into memory and publish.
    async fn commit(&self, next: Cart) -> CartResult<()> {
        self.store
            .save(next.items())
            .await
            .map_err(|e| CartError::operation_failed(format!("failed to persist cart: {e:#}")))?;

        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            *state = next.clone();
        }

        tracing::debug!(items = next.len(), "cart committed");
        self.publish(next);
        Ok(())
    }

    fn publish(&self, snapshot: Cart) {
        if let Ok(mut subs) = self.subscribers.lock() {
            // Drop any dead subscribers while publishing.
            subs.retain(|tx| tx.send(snapshot.clone()).is_ok());
        }
    }
}

/// Map a structural cart error that can legitimately mean "item absent" onto
/// the caller-facing taxonomy.
fn absence_aware(err: CartIntegrityError) -> CartError {
    match err {
        CartIntegrityError::UnknownProduct(_) => CartError::ProductNotFound,
        other => integrity(other),
    }
}

/// Structural errors that should be unreachable given the manager's own
/// validation; folded into a generic failure rather than panicking.
fn integrity(err: CartIntegrityError) -> CartError {
    CartError::operation_failed(format!("cart integrity violation: {err}"))
}

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trolley_core::ProductId;

use crate::item::CartItem;

/// Structural violation of the cart invariants.
///
/// These are programming or data-corruption errors, not user-facing
/// conditions; the manager maps them onto its own error taxonomy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartIntegrityError {
    #[error("product {0} already in cart")]
    DuplicateProduct(ProductId),

    #[error("product {0} not in cart")]
    UnknownProduct(ProductId),

    #[error("amount for product {0} must be positive")]
    NonPositiveAmount(ProductId),
}

/// The ordered, product-unique collection of items a user intends to
/// purchase.
///
/// Invariants, upheld by construction:
/// - product ids are pairwise distinct,
/// - every amount is at least 1,
/// - insertion order is the order items were first added.
///
/// All mutation helpers are pure: they take `&self` and return a new `Cart`,
/// so a caller can run the full validate sequence on a local value and only
/// swap it into the authoritative slot once everything passed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from untrusted (e.g. persisted) items, validating both
    /// invariants. The whole collection is rejected on any violation.
    pub fn from_items(items: Vec<CartItem>) -> Result<Self, CartIntegrityError> {
        let mut cart = Cart::new();
        for item in items {
            cart = cart.with_item(item)?;
        }
        Ok(cart)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Current amount of a product, or `None` if it is not in the cart.
    pub fn amount_of(&self, product_id: ProductId) -> Option<u32> {
        self.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map(|i| i.amount)
    }

    /// New cart with `item` appended at the end.
    pub fn with_item(&self, item: CartItem) -> Result<Self, CartIntegrityError> {
        if item.amount == 0 {
            return Err(CartIntegrityError::NonPositiveAmount(item.product_id));
        }
        if self.contains(item.product_id) {
            return Err(CartIntegrityError::DuplicateProduct(item.product_id));
        }

        let mut items = self.items.clone();
        items.push(item);
        Ok(Self { items })
    }

    /// New cart with the amount of an existing item overwritten.
    pub fn with_amount(
        &self,
        product_id: ProductId,
        amount: u32,
    ) -> Result<Self, CartIntegrityError> {
        if amount == 0 {
            return Err(CartIntegrityError::NonPositiveAmount(product_id));
        }

        let mut items = self.items.clone();
        let item = items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or(CartIntegrityError::UnknownProduct(product_id))?;
        item.amount = amount;
        Ok(Self { items })
    }

    /// New cart without the given product.
    pub fn without(&self, product_id: ProductId) -> Result<Self, CartIntegrityError> {
        let index = self
            .items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or(CartIntegrityError::UnknownProduct(product_id))?;

        let mut items = self.items.clone();
        items.remove(index);
        Ok(Self { items })
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartIntegrityError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        Cart::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Metadata;

    fn item(id: u64, amount: u32) -> CartItem {
        CartItem::new(ProductId::new(id), amount, Metadata::new())
    }

    #[test]
    fn with_item_appends_in_insertion_order() {
        let cart = Cart::new()
            .with_item(item(10, 1))
            .unwrap()
            .with_item(item(20, 2))
            .unwrap();

        let ids: Vec<u64> = cart.items().iter().map(|i| i.product_id.as_u64()).collect();
        assert_eq!(ids, vec![10, 20]);
    }

    #[test]
    fn with_item_rejects_duplicate_product() {
        let cart = Cart::new().with_item(item(10, 1)).unwrap();
        let err = cart.with_item(item(10, 1)).unwrap_err();
        assert_eq!(err, CartIntegrityError::DuplicateProduct(ProductId::new(10)));
    }

    #[test]
    fn with_item_rejects_zero_amount() {
        let err = Cart::new().with_item(item(10, 0)).unwrap_err();
        assert_eq!(err, CartIntegrityError::NonPositiveAmount(ProductId::new(10)));
    }

    #[test]
    fn with_amount_overwrites_exactly() {
        let cart = Cart::new().with_item(item(10, 2)).unwrap();
        let updated = cart.with_amount(ProductId::new(10), 4).unwrap();

        assert_eq!(updated.amount_of(ProductId::new(10)), Some(4));
        // The original value is untouched.
        assert_eq!(cart.amount_of(ProductId::new(10)), Some(2));
    }

    #[test]
    fn with_amount_rejects_unknown_product() {
        let err = Cart::new().with_amount(ProductId::new(99), 1).unwrap_err();
        assert_eq!(err, CartIntegrityError::UnknownProduct(ProductId::new(99)));
    }

    #[test]
    fn without_removes_only_the_target() {
        let cart = Cart::new()
            .with_item(item(10, 1))
            .unwrap()
            .with_item(item(20, 1))
            .unwrap();

        let removed = cart.without(ProductId::new(10)).unwrap();
        assert_eq!(removed.len(), 1);
        assert!(removed.contains(ProductId::new(20)));
        assert!(!removed.contains(ProductId::new(10)));
    }

    #[test]
    fn without_rejects_unknown_product() {
        let err = Cart::new().without(ProductId::new(99)).unwrap_err();
        assert_eq!(err, CartIntegrityError::UnknownProduct(ProductId::new(99)));
    }

    #[test]
    fn from_items_rejects_duplicates_and_zero_amounts() {
        assert!(Cart::from_items(vec![item(1, 1), item(1, 2)]).is_err());
        assert!(Cart::from_items(vec![item(1, 1), item(2, 0)]).is_err());
        assert!(Cart::from_items(vec![item(1, 1), item(2, 2)]).is_ok());
    }

    #[test]
    fn serde_rejects_invariant_violations_in_persisted_data() {
        let json = r#"[{"product_id":1,"amount":1},{"product_id":1,"amount":2}]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());

        let json = r#"[{"product_id":1,"amount":0}]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn serde_round_trips_items_in_order() {
        let cart = Cart::new()
            .with_item(item(3, 1))
            .unwrap()
            .with_item(item(1, 5))
            .unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add { id: u64, amount: u32 },
            SetAmount { id: u64, amount: u32 },
            Remove { id: u64 },
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u64..16, 0u32..8).prop_map(|(id, amount)| Op::Add { id, amount }),
                (0u64..16, 0u32..8).prop_map(|(id, amount)| Op::SetAmount { id, amount }),
                (0u64..16).prop_map(|id| Op::Remove { id }),
            ]
        }

        proptest! {
            /// Any sequence of (possibly rejected) operations keeps product
            /// ids distinct and amounts strictly positive.
            #[test]
            fn invariants_hold_under_arbitrary_operations(
                ops in proptest::collection::vec(op_strategy(), 0..64)
            ) {
                let mut cart = Cart::new();
                for op in ops {
                    let next = match op {
                        Op::Add { id, amount } => {
                            cart.with_item(item(id, amount))
                        }
                        Op::SetAmount { id, amount } => {
                            cart.with_amount(ProductId::new(id), amount)
                        }
                        Op::Remove { id } => cart.without(ProductId::new(id)),
                    };
                    // Rejected operations leave the cart as-is.
                    if let Ok(next) = next {
                        cart = next;
                    }

                    let mut ids: Vec<_> =
                        cart.items().iter().map(|i| i.product_id).collect();
                    ids.sort_unstable();
                    ids.dedup();
                    prop_assert_eq!(ids.len(), cart.len());
                    prop_assert!(cart.items().iter().all(|i| i.amount >= 1));
                }
            }
        }
    }
}

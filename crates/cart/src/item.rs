use serde::{Deserialize, Serialize};
use trolley_core::ProductId;

/// Opaque product fields (name, price, image, ...) copied verbatim from the
/// catalog when the item was first added. Never refetched afterwards.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One entry in the cart: a product, how many of it, and the catalog
/// metadata captured at first add.
///
/// `metadata` is serde-flattened so the persisted shape stays the catalog
/// payload plus `product_id` and `amount`, with no extra nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub amount: u32,
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl CartItem {
    pub fn new(product_id: ProductId, amount: u32, metadata: Metadata) -> Self {
        Self {
            product_id,
            amount,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_flattens_into_the_item_object() {
        let mut metadata = Metadata::new();
        metadata.insert("title".into(), serde_json::json!("Sneaker"));
        metadata.insert("price".into(), serde_json::json!(179.9));

        let item = CartItem::new(ProductId::new(10), 2, metadata);
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["product_id"], serde_json::json!(10));
        assert_eq!(value["amount"], serde_json::json!(2));
        assert_eq!(value["title"], serde_json::json!("Sneaker"));
        assert_eq!(value["price"], serde_json::json!(179.9));
    }

    #[test]
    fn item_round_trips_through_json() {
        let mut metadata = Metadata::new();
        metadata.insert("title".into(), serde_json::json!("Sneaker"));

        let item = CartItem::new(ProductId::new(7), 3, metadata);
        let json = serde_json::to_string(&item).unwrap();
        let back: CartItem = serde_json::from_str(&json).unwrap();

        assert_eq!(back, item);
    }
}

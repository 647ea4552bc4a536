use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::store::{CartStore, ItemKind, LineItem};

#[derive(Debug, Serialize)]
pub struct CartOpened {
    pub cart_id: Uuid,
}

/// Candidate line item, shaped the way the storefront cards build it: the
/// caller owns the catalog lookup and, for bulk/party flows, the delivery
/// date that scopes the row.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    pub kind: ItemKind,
    pub quantity: u32,
    #[serde(default)]
    pub variant_date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

/// `?date=2024-05-01` selects the date-scoped variant of a product.
#[derive(Debug, Default, Deserialize)]
pub struct VariantQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub total_items: u64,
    pub total_price: f64,
}

impl CartView {
    pub fn snapshot(cart: &CartStore) -> Self {
        Self {
            items: cart.items().to_vec(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

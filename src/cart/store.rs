use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Date;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CartError {
    /// Addressing a cart that was never opened (or already closed) is a
    /// caller bug, not a recoverable condition. It must surface, never
    /// degrade into an empty cart.
    #[error("unknown cart {0}")]
    UnknownCart(Uuid),
    #[error("quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),
    #[error("price must be a finite, non-negative number, got {0}")]
    InvalidPrice(f64),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Identity of a cart row. The same product ordered for two different
/// delivery dates (party / bulk flows) is two distinct rows, so the date
/// is part of the key rather than smuggled into the product id string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub product_id: String,
    pub variant_date: Option<Date>,
}

impl ItemKey {
    pub fn product(id: impl Into<String>) -> Self {
        Self {
            product_id: id.into(),
            variant_date: None,
        }
    }

    pub fn dated(id: impl Into<String>, date: Date) -> Self {
        Self {
            product_id: id.into(),
            variant_date: Some(date),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant_date {
            Some(date) => write!(f, "{}@{}", self.product_id, date),
            None => write!(f, "{}", self.product_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Meal,
    Grocery,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub key: ItemKey,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub kind: ItemKind,
    pub quantity: u32,
}

impl LineItem {
    fn validate(&self) -> Result<(), CartError> {
        if self.key.product_id.trim().is_empty() {
            return Err(CartError::EmptyField("product_id"));
        }
        if self.name.trim().is_empty() {
            return Err(CartError::EmptyField("name"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CartError::InvalidPrice(self.price));
        }
        if self.quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        Ok(())
    }
}

/// One customer's cart: at most one row per [`ItemKey`], quantities always
/// positive, totals recomputed from the rows after every mutation so they
/// can never drift.
#[derive(Debug, Default)]
pub struct CartStore {
    items: Vec<LineItem>,
    total_items: u64,
    total_price: f64,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.items.iter().any(|i| &i.key == key)
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// Adds a candidate row. If a row with the same key already exists its
    /// quantity is incremented and the existing name/price/image are kept
    /// (first add wins); otherwise the candidate is appended as-is.
    pub fn add(&mut self, candidate: LineItem) -> Result<(), CartError> {
        candidate.validate()?;
        match self.items.iter_mut().find(|i| i.key == candidate.key) {
            // merged quantities saturate at u32::MAX, they never wrap
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(candidate.quantity)
            }
            None => self.items.push(candidate),
        }
        self.recompute_totals();
        Ok(())
    }

    /// Drops the row with the given key. Removing an absent key is a no-op,
    /// so double removal (e.g. a double-click) stays harmless.
    pub fn remove(&mut self, key: &ItemKey) {
        self.items.retain(|i| &i.key != key);
        self.recompute_totals();
    }

    /// Replaces a row's quantity. A quantity of zero or below means the row
    /// is deleted, never stored non-positive. Unknown keys are a no-op.
    pub fn set_quantity(&mut self, key: &ItemKey, quantity: i64) {
        if quantity <= 0 {
            self.remove(key);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| &i.key == key) {
            // quantities beyond u32::MAX are clamped
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            self.recompute_totals();
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute_totals();
    }

    fn recompute_totals(&mut self) {
        self.total_items = self.items.iter().map(|i| u64::from(i.quantity)).sum();
        self.total_price = self
            .items
            .iter()
            .map(|i| i.price * f64::from(i.quantity))
            .sum();
    }
}

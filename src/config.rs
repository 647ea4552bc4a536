use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CartConfig {
    /// Minimum quantity for date-scoped (bulk/party) orders, enforced at
    /// the HTTP boundary before the store sees the item.
    pub bulk_min_quantity: u32,
    /// Maximum number of distinct line items a single cart may hold. Adds
    /// that would open a new row beyond the cap are rejected at the HTTP
    /// boundary.
    pub max_cart_lines: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub cart: CartConfig,
    /// Optional path to a JSON catalog seed; the built-in catalog is used
    /// when unset.
    pub catalog_seed: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let cart = CartConfig {
            bulk_min_quantity: std::env::var("BULK_MIN_QUANTITY")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(20),
            max_cart_lines: std::env::var("MAX_CART_LINES")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(100),
        };
        let catalog_seed = std::env::var("CATALOG_SEED").ok();
        Ok(Self { cart, catalog_seed })
    }
}

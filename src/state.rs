use std::sync::Arc;

use crate::cart::registry::CartRegistry;
use crate::catalog::repo::Catalog;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<Catalog>,
    pub carts: Arc<CartRegistry>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let catalog = match &config.catalog_seed {
            Some(path) => Catalog::from_json_file(path)?,
            None => Catalog::seeded(),
        };

        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            carts: Arc::new(CartRegistry::new()),
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::CartConfig;

        Self {
            config: Arc::new(AppConfig {
                cart: CartConfig {
                    bulk_min_quantity: 20,
                    max_cart_lines: 100,
                },
                catalog_seed: None,
            }),
            catalog: Arc::new(Catalog::seeded()),
            carts: Arc::new(CartRegistry::new()),
        }
    }
}

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{debug, info};
use uuid::Uuid;

use super::store::{CartError, CartStore};

pub type CartId = Uuid;

/// Owns every open cart for the lifetime of the process. Consumers never
/// hold a cart directly; they address one by id and run their operation
/// under the registry's lock, which keeps each mutation atomic.
///
/// Addressing an id that is not open fails with [`CartError::UnknownCart`]
/// instead of handing back an empty cart, so integration bugs surface
/// immediately.
#[derive(Debug, Default)]
pub struct CartRegistry {
    carts: RwLock<HashMap<CartId, CartStore>>,
}

impl CartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new empty cart and returns its id.
    pub fn open(&self) -> CartId {
        let id = Uuid::new_v4();
        self.carts
            .write()
            .expect("cart registry poisoned")
            .insert(id, CartStore::new());
        info!(cart_id = %id, "cart opened");
        id
    }

    /// Destroys a cart. Closing twice is the usage error, not a no-op.
    pub fn close(&self, id: CartId) -> Result<(), CartError> {
        let removed = self
            .carts
            .write()
            .expect("cart registry poisoned")
            .remove(&id);
        match removed {
            Some(cart) => {
                debug!(cart_id = %id, abandoned_items = cart.total_items(), "cart closed");
                Ok(())
            }
            None => Err(CartError::UnknownCart(id)),
        }
    }

    /// Runs a mutating operation against the named cart.
    pub fn with_cart<R>(
        &self,
        id: CartId,
        f: impl FnOnce(&mut CartStore) -> R,
    ) -> Result<R, CartError> {
        let mut carts = self.carts.write().expect("cart registry poisoned");
        let cart = carts.get_mut(&id).ok_or(CartError::UnknownCart(id))?;
        Ok(f(cart))
    }

    /// Runs a read-only operation against the named cart.
    pub fn read_cart<R>(
        &self,
        id: CartId,
        f: impl FnOnce(&CartStore) -> R,
    ) -> Result<R, CartError> {
        let carts = self.carts.read().expect("cart registry poisoned");
        let cart = carts.get(&id).ok_or(CartError::UnknownCart(id))?;
        Ok(f(cart))
    }
}

//! # Cart Operations
//!
//! Synchronous cart mutations with write-through persistence.
//!
//! ## Mutation Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lock ──► clone current cart ──► apply change ──► persist ──► publish  │
//! │                                       │              │                  │
//! │                            invalid input/overflow storage error         │
//! │                                       └──────┬───────┘                  │
//! │                                              ▼                          │
//! │                                  Err, state and storage untouched       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart carries its own totals, computed when the change is applied, so
//! nothing left to fail runs between the storage write and the publish.
//! `cart` and `cart_totals` are always published together.

use tracing::{debug, warn};

use shopfront_core::{Cart, CartItem, CartTotals, Money, Product, ProductId};

use super::Store;
use crate::error::ClientResult;
use crate::storage::CART_KEY;

impl Store {
    /// Adds `quantity` of `product`, merging with an existing line.
    pub fn add_to_cart(&self, product: &Product, quantity: i64) -> ClientResult<()> {
        self.mutate_cart(|cart| {
            cart.add_item(product, quantity)?;
            Ok(())
        })?;
        debug!(product_id = %product.id, quantity, "Added to cart");
        Ok(())
    }

    /// Drops the line for `product_id`. Returns whether a line was removed.
    pub fn remove_from_cart(&self, product_id: ProductId) -> ClientResult<bool> {
        let removed = self.mutate_cart(|cart| Ok(cart.remove_item(product_id)))?;
        debug!(%product_id, removed, "Removed from cart");
        Ok(removed)
    }

    /// Sets a line's quantity; zero or less removes it. Unknown ids are a no-op.
    pub fn update_cart_quantity(&self, product_id: ProductId, quantity: i64) -> ClientResult<bool> {
        let changed = self.mutate_cart(|cart| Ok(cart.update_quantity(product_id, quantity)?))?;
        debug!(%product_id, quantity, changed, "Updated cart quantity");
        Ok(changed)
    }

    /// Empties the cart and deletes the saved copy.
    pub fn clear_cart(&self) -> ClientResult<()> {
        let _cart = self.cart_write_lock();
        self.storage.remove(CART_KEY)?;
        self.publish_cart(Cart::new());
        debug!("Cleared cart");
        Ok(())
    }

    /// Loads the saved cart, replacing the in-memory one.
    ///
    /// Data that does not parse as cart lines is discarded. Lines that break
    /// the cart invariants are dropped or merged, and the cleaned cart is
    /// written back.
    pub fn initialize_cart(&self) -> ClientResult<()> {
        let _cart = self.cart_write_lock();

        let cart = match self.storage.get(CART_KEY)? {
            None => Cart::new(),
            Some(raw) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => {
                    let cart = Cart::from_items(items.clone());
                    if cart.items() != items.as_slice() {
                        warn!(
                            saved = items.len(),
                            kept = cart.line_count(),
                            "Normalized saved cart"
                        );
                        self.persist_cart(&cart)?;
                    }
                    cart
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable saved cart");
                    self.storage.remove(CART_KEY)?;
                    Cart::new()
                }
            },
        };

        debug!(lines = cart.line_count(), "Cart restored");
        self.publish_cart(cart);
        Ok(())
    }

    pub fn cart_total(&self) -> Money {
        self.cart_totals.borrow().total
    }

    pub fn cart_item_count(&self) -> i64 {
        self.cart_totals.borrow().item_count
    }

    pub fn cart_totals(&self) -> CartTotals {
        *self.cart_totals.borrow()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn mutate_cart<R, F>(&self, change: F) -> ClientResult<R>
    where
        F: FnOnce(&mut Cart) -> ClientResult<R>,
    {
        let _cart = self.cart_write_lock();

        let mut next = self.cart.borrow().clone();
        let result = change(&mut next)?;

        self.persist_cart(&next)?;
        self.publish_cart(next);

        Ok(result)
    }

    /// Writes `cart` to storage; an empty cart removes the entry.
    fn persist_cart(&self, cart: &Cart) -> ClientResult<()> {
        if cart.is_empty() {
            self.storage.remove(CART_KEY)?;
        } else {
            self.storage.set(CART_KEY, &serde_json::to_string(cart)?)?;
        }
        Ok(())
    }

    /// Callers hold the cart write lock.
    pub(super) fn publish_cart(&self, cart: Cart) {
        let totals = CartTotals::from(&cart);
        self.cart.send_replace(cart);
        self.cart_totals.send_replace(totals);
    }
}

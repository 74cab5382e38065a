//! # Cart
//!
//! The shopping cart as a plain value: lines keyed by product id plus the two
//! derived numbers the UI shows (total and item count).
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Action                Store Function          Cart Change           │
//! │  ─────────                ──────────────          ───────────           │
//! │                                                                         │
//! │  Click Product ──────────► add_to_cart() ───────► push or qty += n     │
//! │                                                                         │
//! │  Change Quantity ────────► update_cart_quantity()► qty = n (n ≤ 0 drops)│
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► retain(id != x)      │
//! │                                                                         │
//! │  Checkout / Clear ───────► clear_cart() ────────► items.clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id
//! - Every quantity is > 0 and every unit price is >= 0
//! - The total and item count fit in an `i64`; a change that would overflow
//!   is rejected and the cart stays as it was

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Product, ProductId};
use crate::validation::{validate_price, validate_quantity};

/// A line in the cart.
///
/// Serialized as the product's own fields plus `quantity`, which is the
/// shape persisted carts have always had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,

    pub quantity: i64,
}

impl CartItem {
    pub fn new(product: Product, quantity: i64) -> Self {
        CartItem { product, quantity }
    }

    #[inline]
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price × quantity, `None` when it does not fit.
    pub fn line_total(&self) -> Option<Money> {
        self.product.price.checked_multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// Serialized as a bare array of lines. Deserializing goes through
/// [`Cart::from_items`], so a stored cart comes back with its invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
    totals: CartTotals,
}

fn quantity_too_large() -> ValidationError {
    ValidationError::TooLarge {
        field: "quantity".to_string(),
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Rebuilds a cart from stored lines, restoring the invariants.
    ///
    /// ## Dropped Lines
    /// - non-positive quantity
    /// - negative unit price
    /// - a line whose quantity or total would overflow the cart
    ///
    /// Repeated product ids are merged into the first occurrence.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            if item.quantity <= 0 || item.product.price.is_negative() {
                continue;
            }
            // An overflowing line is dropped; the rest of the cart is kept.
            let _ = cart.apply(|lines| merge_line(lines, item));
        }
        cart
    }

    /// Adds a product or increases its quantity if already present.
    ///
    /// ## Errors
    /// - `quantity` must be positive
    /// - the product price must not be negative
    /// - the resulting quantity and total must fit (`TooLarge`)
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> Result<(), ValidationError> {
        validate_quantity(quantity)?;
        validate_price(product.price)?;

        self.apply(|lines| merge_line(lines, CartItem::new(product.clone(), quantity)))
    }

    /// Removes the line for `product_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id() != product_id);
        if self.items.len() == initial_len {
            return false;
        }
        // Prices and quantities are non-negative, so a subset of a cart that
        // fits also fits.
        self.totals = CartTotals::of(&self.items).unwrap_or_default();
        true
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: removes the line
    /// - product not in cart: nothing changes
    ///
    /// Returns whether the cart changed.
    ///
    /// ## Errors
    /// `TooLarge` when the new quantity would overflow the cart total.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<bool, ValidationError> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        let index = match self.items.iter().position(|i| i.product_id() == product_id) {
            Some(index) if self.items[index].quantity != quantity => index,
            _ => return Ok(false),
        };

        self.apply(|lines| {
            lines[index].quantity = quantity;
            Ok(())
        })?;
        Ok(true)
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.totals = CartTotals::default();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id() == product_id)
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> i64 {
        self.totals.item_count
    }

    /// Sum of price × quantity.
    pub fn total(&self) -> Money {
        self.totals.total
    }

    pub fn totals(&self) -> CartTotals {
        self.totals
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Runs `change` on a copy of the lines and keeps the copy only when its
    /// totals fit.
    fn apply<F>(&mut self, change: F) -> Result<(), ValidationError>
    where
        F: FnOnce(&mut Vec<CartItem>) -> Result<(), ValidationError>,
    {
        let mut lines = self.items.clone();
        change(&mut lines)?;
        let totals = CartTotals::of(&lines).ok_or_else(quantity_too_large)?;

        self.items = lines;
        self.totals = totals;
        Ok(())
    }
}

fn merge_line(lines: &mut Vec<CartItem>, item: CartItem) -> Result<(), ValidationError> {
    match lines.iter_mut().find(|l| l.product_id() == item.product_id()) {
        Some(existing) => {
            existing.quantity = existing
                .quantity
                .checked_add(item.quantity)
                .ok_or_else(quantity_too_large)?;
        }
        None => lines.push(item),
    }
    Ok(())
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Cart::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

/// Derived cart numbers, recomputed after every mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub total: Money,
    pub item_count: i64,
    pub line_count: usize,
}

impl CartTotals {
    /// Sums `items`. Returns `None` if a line total or a sum overflows.
    pub fn of(items: &[CartItem]) -> Option<Self> {
        items.iter().try_fold(CartTotals::default(), |acc, item| {
            Some(CartTotals {
                total: acc.total.checked_add(item.line_total()?)?,
                item_count: acc.item_count.checked_add(item.quantity)?,
                line_count: acc.line_count + 1,
            })
        })
    }
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        cart.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: u64, price_cents: i64) -> Product {
        Product::new(
            ProductId::new(id),
            format!("Product {}", id),
            Money::from_cents(price_cents),
        )
    }

    #[test]
    fn test_add_same_product_increments() {
        let mut cart = Cart::new();
        let product = test_product(1, 1000);

        cart.add_item(&product, 2).unwrap();
        cart.add_item(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 5);
        assert_eq!(cart.total().cents(), 5000);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        let product = test_product(1, 1000);

        assert!(cart.add_item(&product, 0).is_err());
        assert!(cart.add_item(&product, -2).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_over_mixed_lines() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 2999), 2).unwrap();
        cart.add_item(&test_product(2, 4999), 1).unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.total.cents(), 2999 * 2 + 4999);
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.line_count, 2);
    }

    #[test]
    fn test_update_quantity_non_positive_removes() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 100), 4).unwrap();

        assert!(cart.update_quantity(ProductId::new(1), 0).unwrap());
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());

        cart.add_item(&test_product(1, 100), 4).unwrap();
        assert!(cart.update_quantity(ProductId::new(1), -3).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 100), 4).unwrap();

        assert!(cart.update_quantity(ProductId::new(1), 9).unwrap());
        assert_eq!(cart.item_count(), 9);
        assert_eq!(cart.total().cents(), 900);
        assert!(!cart.update_quantity(ProductId::new(1), 9).unwrap());
    }

    #[test]
    fn test_update_missing_product_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 100), 1).unwrap();

        assert!(!cart.update_quantity(ProductId::new(2), 5).unwrap());
        assert!(!cart.update_quantity(ProductId::new(2), 0).unwrap());
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 100), 1).unwrap();

        assert!(cart.remove_item(ProductId::new(1)));
        assert!(!cart.remove_item(ProductId::new(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_quantity_that_overflows_total() {
        let mut cart = Cart::new();
        let product = test_product(1, 1000);
        cart.add_item(&product, 2).unwrap();
        let before = cart.clone();

        let err = cart.add_item(&product, i64::MAX / 100).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
        assert_eq!(cart, before);

        let err = cart.add_item(&test_product(2, 1), i64::MAX).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_rejects_quantity_sum_overflow() {
        let mut cart = Cart::new();
        let free = test_product(1, 0);
        cart.add_item(&free, i64::MAX).unwrap();

        assert!(cart.add_item(&free, 1).is_err());
        assert!(cart.add_item(&test_product(2, 0), 1).is_err());
        assert_eq!(cart.item_count(), i64::MAX);
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_update_rejects_quantity_that_overflows_total() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 1000), 1).unwrap();

        assert!(cart.update_quantity(ProductId::new(1), i64::MAX).is_err());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total().cents(), 1000);
    }

    #[test]
    fn test_add_rejects_negative_price() {
        let mut cart = Cart::new();

        let err = cart.add_item(&test_product(1, -500), 1).unwrap_err();
        assert!(matches!(err, ValidationError::MustNotBeNegative { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_items_restores_invariants() {
        let items = vec![
            CartItem::new(test_product(1, 100), 2),
            CartItem::new(test_product(2, 100), 0),
            CartItem::new(test_product(1, 100), 3),
            CartItem::new(test_product(3, 100), -1),
        ];

        let cart = Cart::from_items(items);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.total().cents(), 500);
    }

    #[test]
    fn test_from_items_drops_unrepresentable_lines() {
        let items = vec![
            CartItem::new(test_product(1, 1000), 2),
            CartItem::new(test_product(2, 1000), i64::MAX / 100),
            CartItem::new(test_product(1, 1000), i64::MAX),
            CartItem::new(test_product(3, -250), 1),
            CartItem::new(test_product(4, 300), 1),
        ];

        let cart = Cart::from_items(items);
        let ids: Vec<u64> = cart.items().iter().map(|i| i.product_id().get()).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total().cents(), 2300);
    }

    #[test]
    fn test_deserialize_restores_invariants() {
        let stored = r#"[{"id":1,"name":"A","price":10,"quantity":2},
            {"id":1,"name":"A","price":10,"quantity":1},
            {"id":2,"name":"B","price":-5,"quantity":1},
            {"id":3,"name":"C","price":10,"quantity":92233720368547758}]"#;

        let cart: Cart = serde_json::from_str(stored).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(CartTotals::from(&cart).total.cents(), 3000);
    }

    #[test]
    fn test_wire_shape_is_flat() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 1000), 2).unwrap();

        let value = serde_json::to_value(&cart).unwrap();
        let line = &value[0];
        assert_eq!(line["id"], 1);
        assert_eq!(line["price"], 10);
        assert_eq!(line["quantity"], 2);

        let restored: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_reads_cart_written_by_web_client() {
        let stored = r#"[{"id":1,"name":"Producto Demo 1","price":29.99,
            "image":"https://picsum.photos/300/300?random=1",
            "description":"Descripción del producto demo",
            "category":"electronics","stock":10,"quantity":2}]"#;

        let cart: Cart = serde_json::from_str(stored).unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total().cents(), 5998);
    }
}

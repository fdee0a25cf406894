//! # Cart Ledger
//!
//! Owns the cart line items and every monetary total derived from them.
//!
//! ## Ledger Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Ledger Operations                               │
//! │                                                                         │
//! │  User Action            Ledger Call              Change                 │
//! │  ───────────            ───────────              ──────                 │
//! │                                                                         │
//! │  "Add to bag" ─────────► add_item(item) ───────► push or amount += n    │
//! │                                                                         │
//! │  Pick new amount ──────► edit_item(id, n) ─────► amount = n             │
//! │                                                                         │
//! │  "remove" ─────────────► remove_item(id) ──────► entry deleted          │
//! │                                                                         │
//! │  Order placed/logout ──► clear() ──────────────► empty default          │
//! │                                                                         │
//! │  Every mutation ends in recompute_totals():                             │
//! │     tax         = 10% of cart_total                                     │
//! │     order_total = cart_total + shipping + tax                           │
//! │                                                                         │
//! │  The ledger never persists itself. Each call returns a CartChange and   │
//! │  the owner commits the state when the change is real.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per `cart_id`
//! - `num_items_in_cart == Σ amount`
//! - `cart_total == Σ price × amount`
//! - `tax == 10% of cart_total`, `order_total == cart_total + shipping + tax`

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{self, Money};
use crate::types::{Product, TaxRate};
use crate::validation::validate_quantity;
use crate::{MAX_ITEM_QUANTITY, SHIPPING_CENTS};

// =============================================================================
// Cart Item
// =============================================================================

/// A purchasable line in the cart: one product in one colour.
///
/// ## Design Notes
/// Title, image, price and company are a snapshot taken when the line was
/// added, so the cart renders without refetching the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Product id followed by colour; unique within the cart.
    #[serde(rename = "cartID")]
    pub cart_id: String,

    #[serde(rename = "productID", deserialize_with = "id_as_string")]
    pub product_id: String,

    pub title: String,

    pub image: String,

    /// Unit price in cents (string-encoded on the wire).
    #[serde(with = "money::as_string")]
    #[ts(type = "string")]
    pub price: Money,

    /// Quantity, always >= 1.
    pub amount: u32,

    pub product_color: String,

    pub company: String,
}

impl CartItem {
    /// Builds the composite key of a product/colour line.
    ///
    /// ```rust
    /// use comfy_core::cart::CartItem;
    ///
    /// assert_eq!(CartItem::cart_id_for("3", "#FF5733"), "3#FF5733");
    /// ```
    pub fn cart_id_for(product_id: &str, color: &str) -> String {
        format!("{}{}", product_id, color)
    }

    /// Creates a cart line from a catalogue product.
    ///
    /// ## Behavior
    /// - `color: None` picks the product's first colour
    /// - A colour the product doesn't offer is rejected
    /// - Colours match case-insensitively; the line stores the product's spelling
    /// - `amount` must be within `1..=MAX_ITEM_QUANTITY`
    pub fn from_product(product: &Product, color: Option<&str>, amount: u32) -> CoreResult<Self> {
        validate_quantity(amount)?;

        let attrs = &product.attributes;
        let color = match color {
            // The product's own spelling keeps one cart_id per variant.
            Some(c) => attrs
                .colors
                .iter()
                .find(|offered| offered.eq_ignore_ascii_case(c))
                .cloned()
                .ok_or_else(|| ValidationError::NotAllowed {
                    field: "color".to_string(),
                    allowed: attrs.colors.clone(),
                })?,
            None => attrs
                .colors
                .first()
                .cloned()
                .ok_or_else(|| CoreError::NoColorOptions(product.id.to_string()))?,
        };

        let product_id = product.id.to_string();
        Ok(CartItem {
            cart_id: Self::cart_id_for(&product_id, &color),
            product_id,
            title: attrs.title.clone(),
            image: attrs.image.clone(),
            price: attrs.price,
            amount,
            product_color: color,
            company: attrs.company.clone(),
        })
    }

    /// Unit price × amount.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.amount as i64)
    }
}

/// Accepts the product id as either a JSON number or a string.
fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a product id as string or number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

// =============================================================================
// Cart Change
// =============================================================================

/// Outcome of a ledger operation.
///
/// The owner of the cart uses this to decide whether to commit the state and
/// which notice to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A line was appended, or an existing line's amount was increased.
    Added { cart_id: String, merged: bool },
    /// A line was deleted.
    Removed { cart_id: String },
    /// A line's amount was set.
    Updated { cart_id: String, amount: u32 },
    /// The cart was reset to its empty default.
    Cleared,
    /// Nothing changed (unknown id, or same amount).
    Unchanged,
}

impl CartChange {
    /// Whether the state differs from before the call.
    pub fn is_change(&self) -> bool {
        !matches!(self, CartChange::Unchanged)
    }

    /// User-facing notification for this change, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            CartChange::Added { .. } => Some("Item added to cart"),
            CartChange::Removed { .. } => Some("Item removed from the cart"),
            CartChange::Updated { .. } => Some("Amount Updated"),
            CartChange::Cleared | CartChange::Unchanged => None,
        }
    }
}

// =============================================================================
// Cart State
// =============================================================================

/// The cart ledger.
///
/// Serializes to the same `camelCase` record that is persisted under the
/// `cart` storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartState {
    /// Lines in insertion order.
    pub cart_items: Vec<CartItem>,

    /// Σ amount.
    pub num_items_in_cart: u32,

    /// Σ price × amount.
    pub cart_total: Money,

    /// Flat shipping charge.
    pub shipping: Money,

    pub tax: Money,

    pub order_total: Money,
}

impl Default for CartState {
    fn default() -> Self {
        CartState {
            cart_items: Vec::new(),
            num_items_in_cart: 0,
            cart_total: Money::zero(),
            shipping: Money::from_cents(SHIPPING_CENTS),
            tax: Money::zero(),
            order_total: Money::zero(),
        }
    }
}

impl CartState {
    /// Adds a line, merging into an existing line with the same `cart_id`.
    ///
    /// ## Behavior
    /// - Existing `cart_id`: its amount grows by `item.amount`
    /// - New `cart_id`: appended at the end
    /// - Amount outside `1..=999`, or a merge that would exceed 999: error,
    ///   state untouched
    pub fn add_item(&mut self, item: CartItem) -> CoreResult<CartChange> {
        validate_quantity(item.amount)?;

        let cart_id = item.cart_id.clone();
        let added = item.amount;

        let merged = match self.find_mut(&cart_id) {
            Some(existing) => {
                let new_amount = existing.amount + added;
                if new_amount > MAX_ITEM_QUANTITY {
                    return Err(CoreError::QuantityTooLarge {
                        requested: new_amount,
                        max: MAX_ITEM_QUANTITY,
                    });
                }
                existing.amount = new_amount;
                // The line keeps its original price snapshot.
                let price = existing.price;
                self.num_items_in_cart += added;
                self.cart_total += price.multiply_quantity(added as i64);
                true
            }
            None => {
                self.num_items_in_cart += added;
                self.cart_total += item.line_total();
                self.cart_items.push(item);
                false
            }
        };

        self.recompute_totals();
        Ok(CartChange::Added { cart_id, merged })
    }

    /// Removes the line with `cart_id`; unknown ids are a no-op.
    pub fn remove_item(&mut self, cart_id: &str) -> CartChange {
        let Some(index) = self.cart_items.iter().position(|i| i.cart_id == cart_id) else {
            return CartChange::Unchanged;
        };

        let removed = self.cart_items.remove(index);
        self.num_items_in_cart -= removed.amount;
        self.cart_total -= removed.line_total();

        self.recompute_totals();
        CartChange::Removed {
            cart_id: removed.cart_id,
        }
    }

    /// Sets the amount of the line with `cart_id`.
    ///
    /// ## Behavior
    /// - Unknown id: no-op
    /// - Same amount as now: no-op (repeating an edit changes nothing)
    /// - Amount outside `1..=999`: error, state untouched
    pub fn edit_item(&mut self, cart_id: &str, amount: u32) -> CoreResult<CartChange> {
        validate_quantity(amount)?;

        let Some(item) = self.find_mut(cart_id) else {
            return Ok(CartChange::Unchanged);
        };
        if item.amount == amount {
            return Ok(CartChange::Unchanged);
        }

        let old_amount = item.amount;
        let price = item.price;
        item.amount = amount;

        let delta = amount as i64 - old_amount as i64;
        self.num_items_in_cart = (self.num_items_in_cart as i64 + delta) as u32;
        self.cart_total += price.multiply_quantity(delta);

        self.recompute_totals();
        Ok(CartChange::Updated {
            cart_id: cart_id.to_string(),
            amount,
        })
    }

    /// Resets to the empty default state.
    pub fn clear(&mut self) -> CartChange {
        *self = CartState::default();
        CartChange::Cleared
    }

    /// Rebuilds every derived field from `cart_items`.
    ///
    /// ## When Used
    /// After restoring a persisted record: stored totals may come from an
    /// older client, so only the lines are trusted. Duplicate `cart_id`s are
    /// merged (first position wins), zero-amount lines are dropped and
    /// amounts are capped at `MAX_ITEM_QUANTITY`.
    pub fn reconcile(&mut self) {
        let mut lines: Vec<CartItem> = Vec::with_capacity(self.cart_items.len());
        for item in self.cart_items.drain(..) {
            match lines.iter_mut().find(|l| l.cart_id == item.cart_id) {
                Some(line) => line.amount = line.amount.saturating_add(item.amount),
                None => lines.push(item),
            }
        }
        lines.retain(|l| l.amount > 0);
        for line in &mut lines {
            line.amount = line.amount.min(MAX_ITEM_QUANTITY);
        }

        self.cart_items = lines;
        self.num_items_in_cart = self
            .cart_items
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.amount));
        self.cart_total = self.cart_items.iter().map(CartItem::line_total).sum();
        self.recompute_totals();
    }

    /// Checks every ledger invariant against the current lines.
    pub fn is_consistent(&self) -> bool {
        let amounts: u32 = self.cart_items.iter().map(|i| i.amount).sum();
        let total: Money = self.cart_items.iter().map(CartItem::line_total).sum();
        let unique = self
            .cart_items
            .iter()
            .enumerate()
            .all(|(i, a)| self.cart_items[i + 1..].iter().all(|b| b.cart_id != a.cart_id));

        unique
            && self.num_items_in_cart == amounts
            && self.cart_total == total
            && self.tax == total.calculate_tax(TaxRate::default())
            && self.order_total == total + self.shipping + self.tax
    }

    /// Looks up a line by `cart_id`.
    pub fn find(&self, cart_id: &str) -> Option<&CartItem> {
        self.cart_items.iter().find(|i| i.cart_id == cart_id)
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.cart_items.is_empty()
    }

    fn find_mut(&mut self, cart_id: &str) -> Option<&mut CartItem> {
        self.cart_items.iter_mut().find(|i| i.cart_id == cart_id)
    }

    fn recompute_totals(&mut self) {
        self.tax = self.cart_total.calculate_tax(TaxRate::default());
        self.order_total = self.cart_total + self.shipping + self.tax;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductAttributes;

    fn item(cart_id: &str, price_cents: i64, amount: u32) -> CartItem {
        CartItem {
            cart_id: cart_id.to_string(),
            product_id: cart_id.split('-').next().unwrap_or(cart_id).to_string(),
            title: format!("Product {}", cart_id),
            image: String::new(),
            price: Money::from_cents(price_cents),
            amount,
            product_color: "red".to_string(),
            company: "comfora".to_string(),
        }
    }

    fn product(colors: &[&str]) -> Product {
        Product {
            id: 7,
            attributes: ProductAttributes {
                title: "sofa".to_string(),
                company: "luxora".to_string(),
                description: String::new(),
                featured: false,
                category: "Sofas".to_string(),
                image: "sofa.jpg".to_string(),
                price: Money::from_cents(12999),
                shipping: true,
                colors: colors.iter().map(|c| c.to_string()).collect(),
            },
        }
    }

    #[test]
    fn test_worked_example() {
        let mut cart = CartState::default();

        cart.add_item(item("p1-red", 1000, 2)).unwrap();
        assert_eq!(cart.num_items_in_cart, 2);
        assert_eq!(cart.cart_total.cents(), 2000);
        assert_eq!(cart.tax.cents(), 200);
        assert_eq!(cart.order_total.cents(), 2700);

        cart.edit_item("p1-red", 1).unwrap();
        assert_eq!(cart.num_items_in_cart, 1);
        assert_eq!(cart.cart_total.cents(), 1000);
        assert_eq!(cart.tax.cents(), 100);
        assert_eq!(cart.order_total.cents(), 1600);
    }

    #[test]
    fn test_add_same_cart_id_merges() {
        let mut cart = CartState::default();

        cart.add_item(item("p1-red", 999, 2)).unwrap();
        let change = cart.add_item(item("p1-red", 999, 3)).unwrap();

        assert_eq!(
            change,
            CartChange::Added {
                cart_id: "p1-red".to_string(),
                merged: true
            }
        );
        assert_eq!(cart.cart_items.len(), 1);
        assert_eq!(cart.cart_items[0].amount, 5);
        assert_eq!(cart.num_items_in_cart, 5);
        assert!(cart.is_consistent());
    }

    #[test]
    fn test_merge_keeps_original_price_snapshot() {
        let mut cart = CartState::default();

        cart.add_item(item("p1-red", 1000, 1)).unwrap();
        cart.add_item(item("p1-red", 1500, 1)).unwrap();

        assert_eq!(cart.cart_total.cents(), 2000);
        assert!(cart.is_consistent());
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = CartState::default();
        cart.add_item(item("b-red", 100, 1)).unwrap();
        cart.add_item(item("a-red", 100, 1)).unwrap();
        cart.add_item(item("b-red", 100, 1)).unwrap();

        let ids: Vec<_> = cart.cart_items.iter().map(|i| i.cart_id.as_str()).collect();
        assert_eq!(ids, vec!["b-red", "a-red"]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut cart = CartState::default();
        cart.add_item(item("p1-red", 1000, 2)).unwrap();
        let before = cart.clone();

        assert_eq!(cart.remove_item("nope"), CartChange::Unchanged);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_subtracts_contribution() {
        let mut cart = CartState::default();
        cart.add_item(item("p1-red", 1000, 2)).unwrap();
        cart.add_item(item("p2-blue", 250, 4)).unwrap();

        let change = cart.remove_item("p1-red");

        assert_eq!(change.notice(), Some("Item removed from the cart"));
        assert_eq!(cart.num_items_in_cart, 4);
        assert_eq!(cart.cart_total.cents(), 1000);
        assert_eq!(cart.tax.cents(), 100);
        assert_eq!(cart.order_total.cents(), 1600);
    }

    #[test]
    fn test_edit_is_idempotent() {
        let mut cart = CartState::default();
        cart.add_item(item("p1-red", 1000, 2)).unwrap();

        let first = cart.edit_item("p1-red", 5).unwrap();
        let after_first = cart.clone();
        let second = cart.edit_item("p1-red", 5).unwrap();

        assert!(first.is_change());
        assert_eq!(second, CartChange::Unchanged);
        assert_eq!(cart, after_first);
    }

    #[test]
    fn test_edit_unknown_is_noop() {
        let mut cart = CartState::default();
        assert_eq!(cart.edit_item("nope", 3).unwrap(), CartChange::Unchanged);
        assert_eq!(cart, CartState::default());
    }

    #[test]
    fn test_invalid_amounts_leave_state_untouched() {
        let mut cart = CartState::default();
        cart.add_item(item("p1-red", 1000, 998)).unwrap();
        let before = cart.clone();

        assert!(cart.add_item(item("p2-red", 1000, 0)).is_err());
        assert!(cart.add_item(item("p1-red", 1000, 2)).is_err());
        assert!(cart.edit_item("p1-red", 0).is_err());
        assert!(cart.edit_item("p1-red", 1000).is_err());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_resets_to_default() {
        let mut cart = CartState::default();
        cart.add_item(item("p1-red", 1000, 2)).unwrap();

        assert_eq!(cart.clear(), CartChange::Cleared);
        assert_eq!(cart, CartState::default());
        assert_eq!(cart.shipping.cents(), 500);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_invariant_holds_after_every_operation() {
        // Deterministic pseudo-random walk over add/remove/edit.
        let mut cart = CartState::default();
        let mut seed: u64 = 0x5eed;
        let mut next = || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as u32
        };

        for _ in 0..500 {
            let id = format!("p{}-c", next() % 6);
            match next() % 3 {
                0 => {
                    let _ = cart.add_item(item(&id, (next() % 5000) as i64, next() % 4 + 1));
                }
                1 => {
                    cart.remove_item(&id);
                }
                _ => {
                    let _ = cart.edit_item(&id, next() % 10 + 1);
                }
            }
            assert!(cart.is_consistent(), "ledger drifted: {:?}", cart);
        }
    }

    #[test]
    fn test_reconcile_rebuilds_totals_and_merges_duplicates() {
        let mut cart = CartState {
            cart_items: vec![item("a-red", 100, 1), item("b-red", 200, 2), item("a-red", 100, 3)],
            num_items_in_cart: 99,
            cart_total: Money::from_cents(1),
            ..CartState::default()
        };

        cart.reconcile();

        assert_eq!(cart.cart_items.len(), 2);
        assert_eq!(cart.cart_items[0].amount, 4);
        assert_eq!(cart.num_items_in_cart, 6);
        assert_eq!(cart.cart_total.cents(), 800);
        assert!(cart.is_consistent());
    }

    #[test]
    fn test_reconcile_caps_oversized_amounts() {
        let mut cart = CartState {
            cart_items: vec![item("a-red", 100, u32::MAX), item("a-red", 100, 2), item("b-red", 50, 5000)],
            ..CartState::default()
        };

        cart.reconcile();

        assert_eq!(cart.cart_items.len(), 2);
        assert_eq!(cart.cart_items[0].amount, MAX_ITEM_QUANTITY);
        assert_eq!(cart.cart_items[1].amount, MAX_ITEM_QUANTITY);
        assert_eq!(cart.num_items_in_cart, 2 * MAX_ITEM_QUANTITY);
        assert_eq!(cart.cart_total.cents(), 150 * 999);
        assert!(cart.is_consistent());
    }

    #[test]
    fn test_from_product_builds_composite_key() {
        let line = CartItem::from_product(&product(&["#FF5733", "#33FF57"]), None, 2).unwrap();
        assert_eq!(line.cart_id, "7#FF5733");
        assert_eq!(line.product_id, "7");
        assert_eq!(line.price.cents(), 12999);

        let line = CartItem::from_product(&product(&["#FF5733", "#33FF57"]), Some("#33FF57"), 1).unwrap();
        assert_eq!(line.cart_id, "7#33FF57");
    }

    #[test]
    fn test_color_spelling_does_not_split_lines() {
        let sofa = product(&["#FF5733"]);
        let mut cart = CartState::default();

        cart.add_item(CartItem::from_product(&sofa, Some("#FF5733"), 1).unwrap()).unwrap();
        let change = cart
            .add_item(CartItem::from_product(&sofa, Some("#ff5733"), 2).unwrap())
            .unwrap();

        assert_eq!(
            change,
            CartChange::Added {
                cart_id: "7#FF5733".to_string(),
                merged: true
            }
        );
        assert_eq!(cart.cart_items.len(), 1);
        assert_eq!(cart.cart_items[0].product_color, "#FF5733");
        assert_eq!(cart.num_items_in_cart, 3);
    }

    #[test]
    fn test_from_product_rejects_unknown_color() {
        assert!(CartItem::from_product(&product(&["#FF5733"]), Some("#000000"), 1).is_err());
        assert!(matches!(
            CartItem::from_product(&product(&[]), None, 1),
            Err(CoreError::NoColorOptions(_))
        ));
    }

    #[test]
    fn test_persisted_record_shape() {
        let mut cart = CartState::default();
        cart.add_item(item("p1-red", 1000, 2)).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["numItemsInCart"], 2);
        assert_eq!(json["cartTotal"], 2000);
        assert_eq!(json["orderTotal"], 2700);
        assert_eq!(json["cartItems"][0]["cartID"], "p1-red");
        assert_eq!(json["cartItems"][0]["price"], "1000");

        let back: CartState = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_numeric_product_id_is_accepted() {
        let json = r##"{"cartID":"3#fff","productID":3,"title":"t","image":"i",
            "price":"100","amount":1,"productColor":"#fff","company":"c"}"##;
        let line: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(line.product_id, "3");
    }
}

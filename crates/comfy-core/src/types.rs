//! # Domain Types
//!
//! Data shapes exchanged with the store API and kept in local state.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (number)    │   │  id (number)    │   │  username       │       │
//! │  │  attributes     │   │  attributes     │   │  jwt            │       │
//! │  │   title, price  │   │   name, address │   └─────────────────┘       │
//! │  │   colors        │   │   cartItems     │                              │
//! │  └─────────────────┘   └─────────────────┘   ┌─────────────────┐       │
//! │                                               │ PaginationMeta  │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   │  page, pageSize │       │
//! │  │    TaxRate      │   │  CheckoutInfo   │   │  pageCount      │       │
//! │  │  bps (u32)      │   │  (order POST)   │   │  total          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The API wraps every entity as `{ id, attributes: { ... } }` and every list
//! as `{ data: [...], meta: { pagination, ... } }`. The types below mirror that
//! envelope so responses deserialize directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{CartItem, CartState};
use crate::money::{self, Money};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 1000 bps = 10%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::CART_TAX_RATE_BPS)
    }
}

// =============================================================================
// User
// =============================================================================

/// Username the API assigns to the shared demo account.
pub const GUEST_USERNAME: &str = "demo user";

/// The logged-in user as kept in local state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub username: String,
    /// Bearer token for authenticated API calls.
    pub jwt: String,
}

impl User {
    /// Whether this is the shared demo account.
    pub fn is_guest(&self) -> bool {
        self.username == GUEST_USERNAME
    }
}

// =============================================================================
// Products
// =============================================================================

/// A product from the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub attributes: ProductAttributes,
}

/// Catalogue fields of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttributes {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub category: String,
    pub image: String,
    /// Price in cents; the API sends it as a string.
    #[serde(with = "money::as_string")]
    pub price: Money,
    /// Free shipping flag.
    #[serde(default)]
    pub shipping: bool,
    /// Available colour variants (hex codes).
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaginationMeta {
    /// 1-based current page.
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u32,
}

/// Metadata of the product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsMeta {
    pub pagination: PaginationMeta,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub companies: Vec<String>,
}

/// `GET /products` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub data: Vec<Product>,
    pub meta: ProductsMeta,
}

impl ProductsResponse {
    /// Caption shown above the listing: `"1 product"`, `"22 products"`.
    pub fn count_caption(&self) -> String {
        let total = self.meta.pagination.total;
        if total == 1 {
            "1 product".to_string()
        } else {
            format!("{} products", total)
        }
    }

    /// True when the filters matched nothing.
    pub fn is_empty(&self) -> bool {
        self.meta.pagination.total == 0
    }
}

/// `GET /products/:id` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleProductResponse {
    pub data: Product,
}

// =============================================================================
// Orders
// =============================================================================

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub attributes: OrderAttributes,
}

/// Stored fields of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAttributes {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    pub num_items_in_cart: u32,
    /// Already formatted by the client at checkout (`"$27.00"`).
    pub order_total: String,
    pub created_at: DateTime<Utc>,
}

/// Metadata of the orders listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersMeta {
    pub pagination: PaginationMeta,
}

/// `GET /orders` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersResponse {
    pub data: Vec<Order>,
    pub meta: OrdersMeta,
}

/// Body of `POST /orders` (sent wrapped as `{ "data": ... }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInfo {
    pub name: String,
    pub address: String,
    /// Amount to charge, in cents.
    pub charge_total: Money,
    /// Display form of the same amount.
    pub order_total: String,
    pub cart_items: Vec<CartItem>,
    pub num_items_in_cart: u32,
}

impl CheckoutInfo {
    /// Snapshots the cart into an order request.
    pub fn from_cart(name: &str, address: &str, cart: &CartState) -> Self {
        CheckoutInfo {
            name: name.trim().to_string(),
            address: address.trim().to_string(),
            charge_total: cart.order_total,
            order_total: cart.order_total.format_usd(),
            cart_items: cart.cart_items.clone(),
            num_items_in_cart: cart.num_items_in_cart,
        }
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// A top-level navigation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    /// Only shown to a logged-in user.
    pub requires_user: bool,
}

/// Site navigation, in display order.
pub const NAV_LINKS: [NavLink; 6] = [
    NavLink { href: "/", label: "home", requires_user: false },
    NavLink { href: "about", label: "about", requires_user: false },
    NavLink { href: "products", label: "products", requires_user: false },
    NavLink { href: "cart", label: "cart", requires_user: false },
    NavLink { href: "checkout", label: "checkout", requires_user: true },
    NavLink { href: "orders", label: "orders", requires_user: true },
];

/// Links visible for the current login state.
pub fn visible_links(logged_in: bool) -> Vec<NavLink> {
    NAV_LINKS
        .iter()
        .filter(|link| logged_in || !link.requires_user)
        .copied()
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

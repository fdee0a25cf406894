//! # comfy-core: Pure Storefront Logic
//!
//! This crate holds every rule of the Comfy storefront that can be expressed
//! without touching the outside world: the cart ledger, the pagination and
//! listing-query codec, money formatting, theme resolution and form checks.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Comfy Store Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    comfy CLI (apps/cli)                         │   │
//! │  │    products ──► cart add ──► checkout ──► orders               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             comfy-client (Storefront session, REST)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ comfy-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌────────────┐ ┌──────────────┐   │   │
//! │  │   │  money   │ │   cart   │ │ pagination │ │    query     │   │   │
//! │  │   │  Money   │ │CartState │ │ page URLs  │ │ ProductQuery │   │   │
//! │  │   └──────────┘ └──────────┘ └────────────┘ └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - Cart ledger (line items and derived totals)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pagination`] - Page URL derivation and page-list layout
//! - [`query`] - Listing query-string contract
//! - [`theme`] - Colour theme preference
//! - [`types`] - API domain types (Product, Order, User, ...)
//! - [`validation`] - Form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use comfy_core::cart::{CartItem, CartState};
//! use comfy_core::money::Money;
//!
//! let mut cart = CartState::default();
//! let item = CartItem {
//!     cart_id: "p1-red".to_string(),
//!     product_id: "p1".to_string(),
//!     title: "lamp".to_string(),
//!     image: String::new(),
//!     price: Money::from_cents(1000),
//!     amount: 2,
//!     product_color: "red".to_string(),
//!     company: "comfora".to_string(),
//! };
//!
//! cart.add_item(item).unwrap();
//! assert_eq!(cart.cart_total.cents(), 2000);
//! assert_eq!(cart.tax.cents(), 200);
//! assert_eq!(cart.order_total.cents(), 2700);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pagination;
pub mod query;
pub mod theme;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartChange, CartItem, CartState};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pagination::{PageDirection, PageLink};
pub use query::{ProductQuery, SortOrder};
pub use theme::{ColorMode, Theme};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat shipping charge applied to every order, in cents.
pub const SHIPPING_CENTS: i64 = 500;

/// Sales tax applied to the cart subtotal, in basis points (1000 = 10%).
pub const CART_TAX_RATE_BPS: u32 = 1000;

/// Maximum quantity of a single line in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Storage key of the persisted cart record.
pub const CART_STORAGE_KEY: &str = "cart";

/// Storage key of the persisted user record.
pub const USER_STORAGE_KEY: &str = "user";

/// Storage key of the persisted theme preference.
pub const THEME_STORAGE_KEY: &str = "theme";

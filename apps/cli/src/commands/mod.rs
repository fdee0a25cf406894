//! Subcommand implementations.
//!
//! Each function drives one storefront operation and prints its result.
//! Notices (added to cart, order placed, ...) are printed by the notifier.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod orders;

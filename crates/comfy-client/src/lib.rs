//! # comfy-client: Store API Client and Storefront Session
//!
//! Connects the pure storefront logic of `comfy-core` to the outside world:
//! the store's REST API, persisted local state and user notices.
//!
//! ## Module Organization
//!
//! - [`config`] - API URL and timeout, with environment overrides
//! - [`error`] - `StoreError` and its machine-readable `ErrorCode`
//! - [`api`] - The `StoreApi` trait and its reqwest implementation
//! - [`notify`] - The `Notifier` trait (tracing and recording sinks)
//! - [`session`] - `Storefront`, the owner of cart, user and theme
//!
//! ## Usage
//!
//! ```rust,ignore
//! use comfy_client::{ClientConfig, HttpStoreApi, Storefront, TracingNotifier};
//! use comfy_db::{Database, DbConfig};
//!
//! let api = HttpStoreApi::new(&ClientConfig::from_env())?;
//! let db = Database::new(DbConfig::new("comfy.db")).await?;
//! let mut store = Storefront::restore(api, db, TracingNotifier).await?;
//!
//! store.add_product_to_cart(3, None, 2).await?;
//! println!("{}", store.cart().order_total);
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod session;

pub use api::{HttpStoreApi, StoreApi};
pub use config::ClientConfig;
pub use error::{ErrorCode, StoreError, StoreResult};
pub use notify::{NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use session::{OrderHistory, ProductListing, Storefront};

//! # comfy-db: Local State Persistence
//!
//! Stores the storefront's persisted local state (the `cart`, `user` and
//! `theme` records) as named text values in SQLite.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Comfy Store Data Flow                            │
//! │                                                                         │
//! │  Storefront::commit() (comfy-client)                                   │
//! │       │                                                                 │
//! │       │  store.set_item("cart", json)                                   │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     comfy-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │  KeyValueStore     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│  LocalStorageRepo  │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │  MemoryStore       │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ~/.local/share/comfy-store/comfy.db                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - The local-storage repository
//! - [`store`] - The `KeyValueStore` capability and its in-memory version
//!
//! ## Usage
//!
//! ```rust,ignore
//! use comfy_db::{Database, DbConfig, KeyValueStore};
//!
//! let db = Database::new(DbConfig::new("comfy.db")).await?;
//! let storage = db.local_storage();
//! storage.set_item("theme", "dark").await?;
//! assert_eq!(storage.get_item("theme").await?.as_deref(), Some("dark"));
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::local_storage::LocalStorageRepository;
pub use store::{KeyValueStore, MemoryStore};

//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront                                                             │
//! │       │                                                                 │
//! │       │  db.local_storage().set_item("cart", json)                      │
//! │       ▼                                                                 │
//! │  LocalStorageRepository                                                │
//! │  ├── get_item(&self, key)                                              │
//! │  ├── set_item(&self, key, value)                                       │
//! │  ├── remove_item(&self, key)                                           │
//! │  └── keys(&self)                                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database (local_storage table)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`local_storage::LocalStorageRepository`] - Named text values

pub mod local_storage;

//! # Key-Value Store Capability
//!
//! The storage seam the storefront is generic over.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront<A, S: KeyValueStore, N>                                     │
//! │                          │                                              │
//! │           ┌──────────────┼────────────────┐                             │
//! │           ▼              ▼                ▼                             │
//! │      Database   LocalStorageRepository  MemoryStore                     │
//! │      (SQLite)        (SQLite)           (HashMap, tests)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::local_storage::LocalStorageRepository;

/// Text values keyed by name.
///
/// Futures are awaited in place by a single command at a time, so the trait
/// does not require them to be `Send`.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    async fn get_item(&self, key: &str) -> DbResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> DbResult<()>;

    /// Removes `key`; absent keys are ignored.
    async fn remove_item(&self, key: &str) -> DbResult<()>;
}

impl KeyValueStore for LocalStorageRepository {
    async fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        LocalStorageRepository::get_item(self, key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        LocalStorageRepository::set_item(self, key, value).await
    }

    async fn remove_item(&self, key: &str) -> DbResult<()> {
        LocalStorageRepository::remove_item(self, key).await
    }
}

impl KeyValueStore for Database {
    async fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        self.local_storage().get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        self.local_storage().set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> DbResult<()> {
        self.local_storage().remove_item(key).await
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// A process-local store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `items`.
    pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        MemoryStore {
            items: Mutex::new(
                items
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Synchronous read for assertions.
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.items.lock().ok().and_then(|items| items.get(key).cloned())
    }

    fn lock(&self) -> DbResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| DbError::Internal("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> DbResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

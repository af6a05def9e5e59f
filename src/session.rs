//! Tab-scoped session storage and the cached user record

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::User,
};

/// Storage slot holding the JSON-serialized cached user
pub const USER_KEY: &str = "user";

/// String key/value storage that lives as long as the tab
pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String) -> AppResult<()>;
    fn remove_item(&self, key: &str);
}

/// In-process session storage
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) -> AppResult<()> {
        self.items.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.write().remove(key);
    }
}

/// Display-only copy of the signed-in user.
///
/// Never consulted for access decisions.
#[derive(Clone)]
pub struct UserCache {
    store: Arc<dyn SessionStore>,
}

impl UserCache {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Cached user, if any. A slot that does not parse is logged and ignored.
    pub fn load(&self) -> Option<User> {
        let raw = self.store.get_item(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::error!("Error parsing user from storage: {}", e);
                None
            }
        }
    }

    pub fn store(&self, user: &User) -> AppResult<()> {
        let raw = serde_json::to_string(user)?;
        self.store
            .set_item(USER_KEY, raw)
            .map_err(|e| AppError::Storage(format!("Failed to cache user: {}", e)))
    }

    pub fn clear(&self) {
        self.store.remove_item(USER_KEY);
    }
}

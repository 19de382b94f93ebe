//! In-memory response cache
//!
//! Provides a `MemoryCache` that keeps payloads in a map keyed by request URL.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::ResponseCache;

/// Process-local cache of response payloads keyed by URL
///
/// Writes to the same key simply replace each other; there is no eviction
/// and no size bound. Share one instance between controllers by wrapping it
/// in an `Arc`.
#[derive(Debug)]
pub struct MemoryCache<T> {
    entries: RwLock<HashMap<String, T>>,
}

impl<T> Default for MemoryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryCache<T> {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Whether an entry exists for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Number of cached URLs
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> ResponseCache<T> for MemoryCache<T> {
    fn get(&self, key: &str) -> Option<T> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: T) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}

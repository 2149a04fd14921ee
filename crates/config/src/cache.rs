//! Cache of materialized configuration instances.
//!
//! Responsibilities:
//! - Map (configuration type, configuration name) to a shared instance.
//! - Hand out the same `Arc` for every lookup of a key once it is stored.
//!
//! Does NOT handle:
//! - Resolving or validating configuration (see `loader`).
//! - Eviction or reload. Entries live as long as the cache.
//!
//! Invariants:
//! - Keys are typed: the same name under two types is two entries.
//! - The first insert for a key wins; later inserts get the stored instance back.
//! - A poisoned lock is recovered; the map is never left half-written.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::constants::CACHE_KEY_SEPARATOR;

/// Composite cache key: configuration type plus configuration name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    type_id: TypeId,
    type_name: &'static str,
    name: String,
}

impl CacheKey {
    pub fn of<T: 'static>(name: &str) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.type_name, CACHE_KEY_SEPARATOR, self.name)
    }
}

type Entry = Arc<dyn Any + Send + Sync>;

/// Thread-safe store of configuration instances keyed by type and name.
#[derive(Default)]
pub struct ConfigCache {
    entries: RwLock<HashMap<CacheKey, Entry>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache shared by every loader that opts into it.
    pub fn global() -> Arc<ConfigCache> {
        static GLOBAL: OnceLock<Arc<ConfigCache>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ConfigCache::new())))
    }

    /// Look up the instance stored for `T` under `name`.
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        let key = CacheKey::of::<T>(name);
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&key)
            .and_then(|entry| Arc::clone(entry).downcast::<T>().ok())
    }

    /// Store `value` for `T` under `name` unless an entry already exists.
    ///
    /// Returns the instance that ends up cached, which is the existing one when
    /// another caller got there first.
    pub fn insert<T: Send + Sync + 'static>(&self, name: &str, value: Arc<T>) -> Arc<T> {
        let key = CacheKey::of::<T>(name);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries
            .entry(key)
            .or_insert_with(|| value.clone() as Entry);
        // Keys embed the TypeId, so a stored entry always downcasts to T.
        Arc::clone(entry).downcast::<T>().unwrap_or(value)
    }

    pub fn contains<T: 'static>(&self, name: &str) -> bool {
        let key = CacheKey::of::<T>(name);
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Display forms (`type:name`) of every cached key, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .map(ToString::to_string)
            .collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for ConfigCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigCache")
            .field("keys", &self.keys())
            .finish()
    }
}

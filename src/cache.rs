//! Lazily populated, never invalidated table cache for one session.

use std::sync::Arc;

use ahash::AHashMap;
use anyhow::Result;

/// Maps a selection key to a loaded, immutable value.
#[derive(Debug)]
pub struct SessionCache<T> {
    entries: AHashMap<String, Arc<T>>,
}

impl<T> Default for SessionCache<T> {
    fn default() -> Self {
        Self { entries: AHashMap::new() }
    }
}

impl<T> SessionCache<T> {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.entries.get(key).cloned()
    }

    /// Return the cached value for `key`, loading it with `load` on first use.
    /// A failed load leaves the cache untouched.
    pub fn get_or_try_insert_with(&mut self, key: &str, load: impl FnOnce() -> Result<T>) -> Result<Arc<T>> {
        if let Some(value) = self.entries.get(key) {
            return Ok(Arc::clone(value));
        }
        let value = Arc::new(load()?);
        self.entries.insert(key.to_string(), Arc::clone(&value));
        log::debug!("[cache] stored {:?} ({} entries)", key, self.entries.len());
        Ok(value)
    }

    pub fn contains(&self, key: &str) -> bool { self.entries.contains_key(key) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

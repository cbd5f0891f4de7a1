use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::pull::{CacheInvalidator, CacheKey};

#[derive(Debug, Clone)]
struct PullEntry<R> {
    record: R,
    fetched_at: Instant,
    invalidated: bool,
}

/// Pull-side cache keyed by `CacheKey`. Entirely separate from the push
/// snapshot; the view merges the two through the overlay policy.
#[derive(Debug)]
pub struct PullCache<R> {
    entries: HashMap<CacheKey, PullEntry<R>>,
}

impl<R> Default for PullCache<R> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<R> PullCache<R> {
    pub fn insert(&mut self, key: CacheKey, record: R) {
        self.entries.insert(
            key,
            PullEntry {
                record,
                fetched_at: Instant::now(),
                invalidated: false,
            },
        );
    }

    /// Returns a hit only when the entry is neither invalidated nor older
    /// than `ttl`. A stale or invalidated entry means the caller refetches.
    pub fn fresh(&self, key: &CacheKey, ttl: Duration) -> Option<&R> {
        let entry = self.entries.get(key)?;
        if entry.invalidated || entry.fetched_at.elapsed() > ttl {
            return None;
        }
        Some(&entry.record)
    }

    pub fn invalidate(&mut self, key: &CacheKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.invalidated = true;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Clonable handle over a shared pull cache; the form the bridge and the
/// poll driver both hold.
#[derive(Debug)]
pub struct SharedPullCache<R> {
    inner: Arc<Mutex<PullCache<R>>>,
}

impl<R> Clone for SharedPullCache<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> Default for SharedPullCache<R> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PullCache::default())),
        }
    }
}

impl<R> SharedPullCache<R> {
    pub fn insert(&self, key: CacheKey, record: R) {
        self.inner
            .lock()
            .expect("pull cache lock poisoned")
            .insert(key, record);
    }

    pub fn fresh(&self, key: &CacheKey, ttl: Duration) -> Option<R>
    where
        R: Clone,
    {
        self.inner
            .lock()
            .expect("pull cache lock poisoned")
            .fresh(key, ttl)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("pull cache lock poisoned").len()
    }
}

impl<R: Send> CacheInvalidator for SharedPullCache<R> {
    fn invalidate(&self, key: &CacheKey) {
        self.inner
            .lock()
            .expect("pull cache lock poisoned")
            .invalidate(key);
    }
}

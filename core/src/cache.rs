//! Thread-safe bounded result cache with hit-count eviction (§4.7).
//!
//! The background eviction loop mirrors the reference implementation's
//! `SimpleTimer`: it wakes at a fixed granularity, accumulates elapsed time,
//! and only does work once a full `cleanup_secs` period has passed, so a
//! `Drop` never blocks longer than the granularity.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ahash::AHashMap;

const EVICTION_GRANULARITY: Duration = Duration::from_millis(500);
const EVICTION_TARGET_RATIO: f64 = 0.9;

struct Entry<V> {
    value: V,
    hits: u64,
}

struct Inner<V> {
    map: AHashMap<String, Entry<V>>,
    sets: u64,
    hits: u64,
    misses: u64,
}

/// A point-in-time snapshot of cache counters, for an external collector to
/// poll (§4.7); the cache itself never aggregates or publishes these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub count: usize,
    pub sets: u64,
    pub hits: u64,
    pub misses: u64,
}

/// A bounded `String -> V` map with a background thread that evicts the
/// lowest-hit entries once `count` exceeds `max_items`.
pub struct ResultCache<V> {
    shared: Arc<Mutex<Inner<V>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl<V> ResultCache<V>
where
    V: Clone + Send + 'static,
{
    /// Spawns the background eviction thread, trimming to `max_items` every
    /// `cleanup_secs` seconds.
    pub fn new(max_items: usize, cleanup_secs: u64) -> Self {
        let shared = Arc::new(Mutex::new(Inner {
            map: AHashMap::new(),
            sets: 0,
            hits: 0,
            misses: 0,
        }));
        let stop = Arc::new(AtomicBool::new(false));
        let thread_shared = Arc::clone(&shared);
        let thread_stop = Arc::clone(&stop);
        let period = Duration::from_secs(cleanup_secs.max(1));

        let handle = thread::spawn(move || {
            let mut elapsed = Duration::ZERO;
            while !thread_stop.load(Ordering::Relaxed) {
                thread::sleep(EVICTION_GRANULARITY);
                elapsed += EVICTION_GRANULARITY;
                if elapsed >= period {
                    elapsed = Duration::ZERO;
                    Self::evict_once(&thread_shared, max_items);
                }
            }
        });

        Self {
            shared,
            stop,
            handle: Some(handle),
        }
    }

    fn evict_once(shared: &Arc<Mutex<Inner<V>>>, max_items: usize) {
        let mut inner = shared.lock().unwrap();
        let before = inner.map.len();
        if before <= max_items {
            return;
        }
        let target = (max_items as f64 * EVICTION_TARGET_RATIO) as usize;
        let mut by_hits: Vec<(String, u64)> = inner.map.iter().map(|(k, e)| (k.clone(), e.hits)).collect();
        by_hits.sort_by_key(|(_, hits)| *hits);
        for (key, _) in by_hits.into_iter().take(before.saturating_sub(target)) {
            inner.map.remove(&key);
        }
        let after = inner.map.len();
        tracing::debug!(before, after, "cache eviction cycle");
    }

    /// Inserts or overwrites `key`. An existing entry has its hit count
    /// incremented rather than reset, matching the reference's `set`
    /// semantics of treating a re-set as a usage signal.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut inner = self.shared.lock().unwrap();
        inner.sets += 1;
        match inner.map.get_mut(&key) {
            Some(entry) => {
                entry.hits += 1;
                entry.value = value;
            }
            None => {
                inner.map.insert(key, Entry { value, hits: 1 });
            }
        }
    }

    /// Looks up `key`, incrementing its hit count on success.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.shared.lock().unwrap();
        if let Some(entry) = inner.map.get_mut(key) {
            entry.hits += 1;
            let value = entry.value.clone();
            inner.hits += 1;
            Some(value)
        } else {
            inner.misses += 1;
            None
        }
    }

    pub fn count(&self) -> usize {
        self.shared.lock().unwrap().map.len()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.shared.lock().unwrap();
        CacheStats {
            count: inner.map.len(),
            sets: inner.sets,
            hits: inner.hits,
            misses: inner.misses,
        }
    }
}

impl<V> Drop for ResultCache<V> {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

//! Per-host strategy memory.
//!
//! Remembers the last [`Strategy`] that produced text for each host so the
//! next fetch on that host tries it first. Entries are only ever a hint for
//! ordering; concurrent writers for the same host resolve last-writer-wins.

use std::collections::HashMap;
use std::sync::Mutex;

use super::Strategy;

#[derive(Debug)]
struct CacheEntry {
    strategy: Strategy,
    last_used: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    tick: u64,
}

impl CacheInner {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// Thread-safe, bounded host → strategy map with least-recently-used eviction.
#[derive(Debug)]
pub struct StrategyCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

impl StrategyCache {
    /// Create a cache holding at most `capacity` hosts. A capacity of zero
    /// stores nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            capacity,
        }
    }

    /// Strategy last recorded for `host`, marking the entry as recently used.
    pub fn get(&self, host: &str) -> Option<Strategy> {
        let key = host.to_ascii_lowercase();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let tick = inner.next_tick();
        inner.entries.get_mut(&key).map(|entry| {
            entry.last_used = tick;
            entry.strategy
        })
    }

    /// Record that `strategy` just produced text for `host`.
    pub fn put(&self, host: &str, strategy: Strategy) {
        if self.capacity == 0 {
            return;
        }

        let key = host.to_ascii_lowercase();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let tick = inner.next_tick();

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            if let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone())
            {
                inner.entries.remove(&oldest);
            }
        }

        inner.entries.insert(
            key,
            CacheEntry {
                strategy,
                last_used: tick,
            },
        );
    }

    /// Number of hosts currently remembered.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for StrategyCache {
    fn default() -> Self {
        Self::new(crate::config::CacheConfig::default().capacity)
    }
}

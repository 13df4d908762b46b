//! Operation counters recorded by [`LruStore`](crate::store::lru::LruStore).

/// Point-in-time copy of a store's counters plus its gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evicted_entries: u64,

    // gauges captured at snapshot time
    pub len: usize,
    pub capacity: usize,
}

impl CacheStatsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before any call.
    pub fn hit_ratio(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

/// Live counters owned by a store; only mutated under the store's `&mut`.
#[derive(Debug, Default, Clone)]
pub(crate) struct StoreCounters {
    pub(crate) get_hits: u64,
    pub(crate) get_misses: u64,
    pub(crate) insert_updates: u64,
    pub(crate) insert_new: u64,
    pub(crate) evicted_entries: u64,
}

impl StoreCounters {
    pub(crate) fn snapshot(&self, len: usize, capacity: usize) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            get_calls: self.get_hits + self.get_misses,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            insert_calls: self.insert_updates + self.insert_new,
            insert_updates: self.insert_updates,
            insert_new: self.insert_new,
            evicted_entries: self.evicted_entries,
            len,
            capacity,
        }
    }
}

//! Operation counters for the cache and pool (feature `metrics`).
//!
//! Counters are plain `u64`s recorded inline on the owning structure's
//! mutating paths; they add one increment per operation and nothing else.
//! Snapshots are plain `Copy` data, safe to ship across threads or diff
//! between two points in time.
//!
//! ## Example Usage
//!
//! ```
//! use collkit::lfu::LfuCache;
//!
//! let mut cache = LfuCache::new(2);
//! cache.put("a", 1);
//! cache.get(&"a");
//! cache.get(&"ghost");
//!
//! let snapshot = cache.metrics_snapshot();
//! assert_eq!(snapshot.get_hits, 1);
//! assert_eq!(snapshot.get_misses, 1);
//! assert_eq!(snapshot.put_inserts, 1);
//! ```

/// Counters recorded by [`LfuCache`](crate::lfu::LfuCache).
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LfuMetrics {
    pub(crate) get_calls: u64,
    pub(crate) get_hits: u64,
    pub(crate) get_misses: u64,
    pub(crate) put_calls: u64,
    pub(crate) put_inserts: u64,
    pub(crate) put_updates: u64,
    pub(crate) evictions: u64,
    pub(crate) pop_lfu_calls: u64,
    pub(crate) clears: u64,
}

/// Point-in-time view of a cache's counters.
///
/// `get_calls == get_hits + get_misses` and
/// `put_calls == put_inserts + put_updates` always hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LfuMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub put_calls: u64,
    pub put_inserts: u64,
    pub put_updates: u64,
    pub evictions: u64,
    pub pop_lfu_calls: u64,
    pub clears: u64,
    /// Entries live at snapshot time.
    pub len: usize,
    /// Fixed capacity.
    pub capacity: usize,
}

/// Counters recorded by [`ObjectPool`](crate::pool::ObjectPool).
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PoolMetrics {
    pub(crate) borrows: u64,
    pub(crate) reuses: u64,
    pub(crate) allocations: u64,
    pub(crate) recycles: u64,
    pub(crate) cleared: u64,
}

/// Point-in-time view of a pool's counters.
///
/// `borrows == reuses + allocations` always holds; the reuse ratio is the
/// number worth watching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolMetricsSnapshot {
    pub borrows: u64,
    pub reuses: u64,
    pub allocations: u64,
    pub recycles: u64,
    pub cleared: u64,
    /// Idle objects stored at snapshot time.
    pub idle: usize,
}

#[cfg(test)]
mod tests {
    use crate::pool::{ObjectPool, Pool};

    #[test]
    fn pool_counters_split_reuse_from_allocation() {
        let mut pool = ObjectPool::new(|| 0u32);
        pool.recycle(1);
        let _ = pool.borrow(); // reuse
        let _ = pool.borrow(); // allocation

        let snapshot = pool.metrics_snapshot();
        assert_eq!(snapshot.borrows, 2);
        assert_eq!(snapshot.reuses, 1);
        assert_eq!(snapshot.allocations, 1);
        assert_eq!(snapshot.recycles, 1);
        assert_eq!(snapshot.idle, 0);
    }

    #[test]
    fn clear_counts_discarded_objects() {
        let mut pool = ObjectPool::new(|| 0u32);
        pool.recycle_all([1, 2, 3]);
        pool.clear();

        let snapshot = pool.metrics_snapshot();
        assert_eq!(snapshot.cleared, 3);
        assert_eq!(snapshot.recycles, 3);
    }
}

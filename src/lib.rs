//! collkit: a bounded LFU cache and a reusable-object pool.
//!
//! Two independent, single-threaded-by-default primitives: [`lfu::LfuCache`]
//! evicts the least-frequently-used entry (ties broken by recency) in O(1)
//! amortized time; [`pool::ObjectPool`] hands out recycled instances before
//! allocating new ones, with an opt-in [`pool::SyncPool`] decorator for
//! concurrent use.

pub mod error;
pub mod lfu;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod pool;
pub mod prelude;

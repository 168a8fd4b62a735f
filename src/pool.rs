//! Reusable-object pool with bulk borrow/recycle and an opt-in
//! mutual-exclusion decorator.
//!
//! [`ObjectPool`] hands out previously recycled instances before invoking
//! its initializer, so steady-state workloads allocate nothing. Objects are
//! reset by a caller-supplied finalizer at recycle time and the pool grows
//! to the high-water mark of concurrently recycled objects; there is no
//! capacity bound.
//!
//! ## Key Components
//!
//! - [`Pool`]: the operation set shared by every pool flavor
//! - [`ObjectPool`]: unsynchronized base implementation (stack-backed)
//! - [`SyncPool`]: decorator serializing every call behind one lock
//!
//! ## Ownership discipline
//!
//! A borrowed object is owned by the caller until it is recycled; the pool
//! never reads or writes an outstanding object, and it does not verify that
//! a recycled object originally came from it. The internal store is never
//! aliased externally.
//!
//! ## Finalizer contract
//!
//! The finalizer must be idempotent, must not panic, and must have no side
//! effect beyond resetting the object's externally observable state. The
//! type system cannot enforce this; it is a caller obligation, and a
//! panicking finalizer aborts an in-flight [`scoped`](Pool::scoped) unwind.
//!
//! ## Example
//!
//! ```
//! use collkit::pool::{ObjectPool, Pool};
//!
//! let mut pool = ObjectPool::with_finalizer(Vec::new, Vec::clear);
//!
//! let mut buf: Vec<u8> = pool.borrow();
//! buf.extend_from_slice(b"scratch");
//! pool.recycle(buf);
//!
//! // The recycled buffer comes back reset.
//! let buf = pool.borrow();
//! assert!(buf.is_empty());
//! # pool.recycle(buf);
//! ```

use parking_lot::Mutex;

#[cfg(feature = "metrics")]
use crate::metrics::{PoolMetrics, PoolMetricsSnapshot};

/// Operations shared by every pool flavor.
///
/// Methods take `&mut self`; the base pool has a single logical owner, and
/// the synchronized decorator's interior mutability satisfies `&mut`
/// trivially. [`synchronized`](Self::synchronized) is the seam between the
/// two: it wraps an unsynchronized pool and is idempotent on an already
/// synchronized one.
pub trait Pool<E> {
    /// Takes one object out of the pool, invoking the initializer only if
    /// the pool is empty. Never fails.
    fn borrow(&mut self) -> E;

    /// Supplies exactly `count` objects into `destination`, drawing from
    /// the pool first and topping up with freshly initialized objects.
    ///
    /// `count == 0` is a no-op. The order in which objects are appended is
    /// unspecified.
    fn borrow_into<C: Extend<E>>(&mut self, destination: &mut C, count: usize);

    /// Resets `value` with the finalizer and stores it for future
    /// borrowing.
    fn recycle(&mut self, value: E);

    /// Recycles every element of `values` in iteration order.
    fn recycle_all<I: IntoIterator<Item = E>>(&mut self, values: I);

    /// Drops every stored object, returning how many were discarded.
    fn clear(&mut self) -> usize;

    /// Moves every stored object into `destination` (order unspecified),
    /// returning how many were moved.
    fn clear_into<C: Extend<E>>(&mut self, destination: &mut C) -> usize;

    /// Wraps the pool so every operation is serialized behind a single
    /// lock. Idempotent: a [`SyncPool`] returns itself unwrapped.
    fn synchronized(self) -> SyncPool<E>
    where
        Self: Sized;

    /// Borrows one object, runs `action` on it, and unconditionally
    /// recycles it afterward, including when `action` unwinds, so no
    /// borrowed object leaks on a panicking exit path.
    ///
    /// # Example
    ///
    /// ```
    /// use collkit::pool::{ObjectPool, Pool};
    ///
    /// let mut pool = ObjectPool::with_finalizer(String::new, String::clear);
    ///
    /// let len = pool.scoped(|s| {
    ///     s.push_str("borrowed");
    ///     s.len()
    /// });
    /// assert_eq!(len, 8);
    /// assert_eq!(pool.len(), 1); // returned to the pool
    /// ```
    fn scoped<R>(&mut self, action: impl FnOnce(&mut E) -> R) -> R
    where
        Self: Sized,
    {
        struct Restore<'a, P: Pool<E>, E> {
            pool: &'a mut P,
            value: Option<E>,
        }
        impl<P: Pool<E>, E> Drop for Restore<'_, P, E> {
            fn drop(&mut self) {
                if let Some(value) = self.value.take() {
                    self.pool.recycle(value);
                }
            }
        }

        let value = self.borrow();
        let mut restore = Restore {
            pool: self,
            value: Some(value),
        };
        action(restore.value.as_mut().expect("scoped object already recycled"))
    }

    /// Returns the number of idle objects currently stored.
    fn len(&self) -> usize;

    /// Returns `true` if no idle objects are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unsynchronized object pool backed by a stack.
///
/// `borrow` returns the most recently recycled object first (no ordering
/// guarantee is part of the contract). The initializer runs only when the
/// stack is empty.
///
/// # Example
///
/// ```
/// use collkit::pool::{ObjectPool, Pool};
///
/// let mut pool = ObjectPool::new(|| vec![0u8; 1024]);
///
/// let a = pool.borrow(); // freshly initialized
/// pool.recycle(a);
/// assert_eq!(pool.len(), 1);
///
/// let _b = pool.borrow(); // reused
/// assert_eq!(pool.len(), 0);
/// ```
pub struct ObjectPool<E> {
    store: Vec<E>,
    initializer: Box<dyn FnMut() -> E + Send>,
    finalizer: Box<dyn FnMut(&mut E) + Send>,
    #[cfg(feature = "metrics")]
    metrics: PoolMetrics,
}

impl<E> ObjectPool<E> {
    /// Creates an empty pool with a no-op finalizer.
    ///
    /// The initializer is invoked whenever a borrow finds the pool empty.
    pub fn new(initializer: impl FnMut() -> E + Send + 'static) -> Self {
        Self::with_finalizer(initializer, |_value| {})
    }

    /// Creates an empty pool whose `finalizer` resets every object at
    /// recycle time.
    ///
    /// See the [module docs](self) for the finalizer contract.
    pub fn with_finalizer(
        initializer: impl FnMut() -> E + Send + 'static,
        finalizer: impl FnMut(&mut E) + Send + 'static,
    ) -> Self {
        Self {
            store: Vec::new(),
            initializer: Box::new(initializer),
            finalizer: Box::new(finalizer),
            #[cfg(feature = "metrics")]
            metrics: PoolMetrics::default(),
        }
    }

    #[cfg(feature = "metrics")]
    /// Snapshots the operation counters recorded so far.
    pub fn metrics_snapshot(&self) -> PoolMetricsSnapshot {
        PoolMetricsSnapshot {
            borrows: self.metrics.borrows,
            reuses: self.metrics.reuses,
            allocations: self.metrics.allocations,
            recycles: self.metrics.recycles,
            cleared: self.metrics.cleared,
            idle: self.store.len(),
        }
    }
}

impl<E> Pool<E> for ObjectPool<E> {
    fn borrow(&mut self) -> E {
        #[cfg(feature = "metrics")]
        {
            self.metrics.borrows += 1;
        }
        match self.store.pop() {
            Some(value) => {
                #[cfg(feature = "metrics")]
                {
                    self.metrics.reuses += 1;
                }
                value
            },
            None => {
                #[cfg(feature = "metrics")]
                {
                    self.metrics.allocations += 1;
                }
                (self.initializer)()
            },
        }
    }

    fn borrow_into<C: Extend<E>>(&mut self, destination: &mut C, count: usize) {
        if count == 0 {
            return;
        }
        let reused = self.store.len().min(count);
        let start = self.store.len() - reused;
        destination.extend(self.store.drain(start..));
        destination.extend((reused..count).map(|_| (self.initializer)()));

        #[cfg(feature = "metrics")]
        {
            self.metrics.borrows += count as u64;
            self.metrics.reuses += reused as u64;
            self.metrics.allocations += (count - reused) as u64;
        }
    }

    fn recycle(&mut self, mut value: E) {
        (self.finalizer)(&mut value);
        self.store.push(value);

        #[cfg(feature = "metrics")]
        {
            self.metrics.recycles += 1;
        }
    }

    fn recycle_all<I: IntoIterator<Item = E>>(&mut self, values: I) {
        let values = values.into_iter();
        // Pre-size from the iterator's lower bound; purely an allocation
        // optimization, never observable.
        self.store.reserve(values.size_hint().0);
        for value in values {
            self.recycle(value);
        }
    }

    fn clear(&mut self) -> usize {
        let drained = self.store.len();
        self.store.clear();

        #[cfg(feature = "metrics")]
        {
            self.metrics.cleared += drained as u64;
        }
        drained
    }

    fn clear_into<C: Extend<E>>(&mut self, destination: &mut C) -> usize {
        let drained = self.store.len();
        destination.extend(self.store.drain(..));

        #[cfg(feature = "metrics")]
        {
            self.metrics.cleared += drained as u64;
        }
        drained
    }

    fn synchronized(self) -> SyncPool<E> {
        SyncPool {
            inner: Mutex::new(self),
        }
    }

    fn len(&self) -> usize {
        self.store.len()
    }
}

impl<E> std::fmt::Debug for ObjectPool<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("idle", &self.store.len())
            .finish_non_exhaustive()
    }
}

/// Thread-safe pool decorator.
///
/// Serializes every operation on the wrapped [`ObjectPool`] behind a single
/// `parking_lot::Mutex` held only for the duration of the delegate call.
/// The wrapped operations never call back into the pool, so the coarse
/// lock cannot self-deadlock. All methods take `&self`, so a `SyncPool` is
/// shared behind an `Arc` without external locking.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use collkit::pool::{ObjectPool, Pool};
///
/// let pool = Arc::new(ObjectPool::with_finalizer(Vec::new, Vec::clear).synchronized());
///
/// let workers: Vec<_> = (0..4)
///     .map(|worker| {
///         let pool = Arc::clone(&pool);
///         thread::spawn(move || {
///             let mut buf: Vec<u8> = pool.borrow();
///             buf.push(worker);
///             pool.recycle(buf);
///         })
///     })
///     .collect();
/// for worker in workers {
///     worker.join().unwrap();
/// }
///
/// assert!(pool.len() <= 4);
/// ```
pub struct SyncPool<E> {
    inner: Mutex<ObjectPool<E>>,
}

impl<E> SyncPool<E> {
    /// Takes one object out of the pool. See [`Pool::borrow`].
    pub fn borrow(&self) -> E {
        self.inner.lock().borrow()
    }

    /// Supplies exactly `count` objects into `destination`. See
    /// [`Pool::borrow_into`].
    pub fn borrow_into<C: Extend<E>>(&self, destination: &mut C, count: usize) {
        self.inner.lock().borrow_into(destination, count);
    }

    /// Resets and stores `value`. See [`Pool::recycle`].
    pub fn recycle(&self, value: E) {
        self.inner.lock().recycle(value);
    }

    /// Recycles every element of `values`. See [`Pool::recycle_all`].
    pub fn recycle_all<I: IntoIterator<Item = E>>(&self, values: I) {
        self.inner.lock().recycle_all(values);
    }

    /// Drops every stored object. See [`Pool::clear`].
    pub fn clear(&self) -> usize {
        self.inner.lock().clear()
    }

    /// Moves every stored object into `destination`. See
    /// [`Pool::clear_into`].
    pub fn clear_into<C: Extend<E>>(&self, destination: &mut C) -> usize {
        self.inner.lock().clear_into(destination)
    }

    /// Borrows one object, runs `action`, and unconditionally recycles it,
    /// including on an unwinding exit path.
    ///
    /// The lock is held only inside the borrow and recycle delegates, never
    /// across `action`, so the action may freely use this pool again.
    pub fn scoped<R>(&self, action: impl FnOnce(&mut E) -> R) -> R {
        struct Restore<'a, E> {
            pool: &'a SyncPool<E>,
            value: Option<E>,
        }
        impl<E> Drop for Restore<'_, E> {
            fn drop(&mut self) {
                if let Some(value) = self.value.take() {
                    self.pool.recycle(value);
                }
            }
        }

        let mut restore = Restore {
            pool: self,
            value: Some(self.borrow()),
        };
        action(restore.value.as_mut().expect("scoped object already recycled"))
    }

    /// Returns the number of idle objects currently stored.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if no idle objects are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(feature = "metrics")]
    /// Snapshots the wrapped pool's operation counters.
    pub fn metrics_snapshot(&self) -> PoolMetricsSnapshot {
        self.inner.lock().metrics_snapshot()
    }
}

impl<E> Pool<E> for SyncPool<E> {
    fn borrow(&mut self) -> E {
        SyncPool::borrow(self)
    }

    fn borrow_into<C: Extend<E>>(&mut self, destination: &mut C, count: usize) {
        SyncPool::borrow_into(self, destination, count);
    }

    fn recycle(&mut self, value: E) {
        SyncPool::recycle(self, value);
    }

    fn recycle_all<I: IntoIterator<Item = E>>(&mut self, values: I) {
        SyncPool::recycle_all(self, values);
    }

    fn clear(&mut self) -> usize {
        SyncPool::clear(self)
    }

    fn clear_into<C: Extend<E>>(&mut self, destination: &mut C) -> usize {
        SyncPool::clear_into(self, destination)
    }

    /// Already synchronized: returns itself rather than double-wrapping.
    fn synchronized(self) -> SyncPool<E> {
        self
    }

    fn len(&self) -> usize {
        SyncPool::len(self)
    }
}

impl<E> std::fmt::Debug for SyncPool<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncPool")
            .field("idle", &self.len())
            .finish_non_exhaustive()
    }
}

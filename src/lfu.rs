//! Bounded LFU (Least Frequently Used) cache.
//!
//! Evicts the entry with the lowest access count when an insertion would
//! exceed the fixed capacity, breaking ties by recency: among keys sharing
//! the minimum count, the one touched longest ago is discarded first.
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                         LfuCache<K, V>                             │
//!   │                                                                    │
//!   │   map:   FxHashMap<K, V>        values (primary map)               │
//!   │   index: FxHashMap<K, usize>    key → slot                         │
//!   │   slots: Vec<Option<Node<K>>>   count + intrusive list links       │
//!   │                                                                    │
//!   │   buckets: FxHashMap<u64, Bucket>   one bucket per live count      │
//!   │                                                                    │
//!   │   min_count = 1                                                    │
//!   │       │                                                            │
//!   │       ▼                                                            │
//!   │   count=1: head ─► [c] ◄─► [b] ◄─ tail     (tail = next victim)    │
//!   │   count=3: head ─► [a] ◄─ tail                                     │
//!   │                                                                    │
//!   │   bucket links: count=1 ─above─► count=3                           │
//!   │                 count=3 ─below─► count=1                           │
//!   └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The three structures are mutually consistent at every operation
//! boundary: the index's key set equals the primary map's, every key sits
//! in exactly one bucket (the one matching its current count), no bucket is
//! empty, and `min_count` always equals the smallest live count (0 only
//! when the cache is empty). Cross-structure updates happen only inside
//! `get`/`put`/eviction; none of the structures is externally mutable.
//!
//! ## Operations
//!
//! | Operation        | Time  | Notes                                    |
//! |------------------|-------|------------------------------------------|
//! | `get`            | O(1)  | Bumps the key's access count             |
//! | `put`            | O(1)* | May evict exactly one entry              |
//! | `get_or_put`     | O(1)* | Supplier runs only on a miss             |
//! | `pop_lfu`        | O(1)  | Remove and return the current victim     |
//! | `peek_lfu`       | O(1)  | Victim without removing                  |
//! | `access_count`   | O(1)  | Query a key's count without touching it  |
//! | `contains_value` | O(n)  | Linear scan over stored values           |
//! | `clear`          | O(n)  | Drops all entries, no discard callback   |
//!
//! ## Counting rules
//!
//! - A new key always enters with count 1 (and therefore becomes the
//!   minimum).
//! - Every touch of an existing key (a `get` hit or a `put` overwrite)
//!   increments its count by exactly one.
//! - A `get` miss mutates nothing: no phantom access is recorded.
//!
//! ## Thread Safety
//!
//! `LfuCache` is **not** thread-safe; even `get` takes `&mut self` because
//! it updates frequency state. Wrap the cache in `Arc<Mutex<_>>` for shared
//! access; every operation is synchronous and bounded, so critical sections
//! stay short.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::{LfuMetrics, LfuMetricsSnapshot};

/// Per-key metadata: current access count plus intrusive links into the
/// bucket list for that count.
#[derive(Debug)]
struct Node<K> {
    prev: Option<usize>,
    next: Option<usize>,
    count: u64,
    key: K,
}

/// One frequency level: a recency-ordered list of slots (head = most
/// recently touched, tail = eviction victim) plus links to the adjacent
/// occupied counts. `below`/`above` keep `min_count` exact without ever
/// scanning the bucket table.
#[derive(Debug, Default)]
struct Bucket {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    below: Option<u64>,
    above: Option<u64>,
}

/// A fixed-capacity cache evicting the least-frequently-used entry,
/// ties broken by recency.
///
/// Keys must be `Eq + Hash + Clone`; clones are kept in the internal count
/// index. Capacity is fixed at construction and must be positive.
///
/// # Example
///
/// ```
/// use collkit::lfu::LfuCache;
///
/// let mut cache = LfuCache::new(2);
/// cache.put("a", 1);
/// cache.put("b", 2);
///
/// cache.get(&"a"); // "a" now has count 2
/// cache.put("c", 3); // evicts "b" (count 1)
///
/// assert_eq!(cache.get(&"b"), None);
/// assert_eq!(cache.get(&"a"), Some(&1));
/// assert_eq!(cache.get(&"c"), Some(&3));
/// ```
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    map: FxHashMap<K, V>,
    index: FxHashMap<K, usize>,
    slots: Vec<Option<Node<K>>>,
    free: Vec<usize>,
    buckets: FxHashMap<u64, Bucket>,
    min_count: u64,
    capacity: usize,
    on_discard: Box<dyn FnMut(K, V) + Send>,
    #[cfg(feature = "metrics")]
    metrics: LfuMetrics,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) to
    /// validate without panicking.
    ///
    /// # Example
    ///
    /// ```
    /// use collkit::lfu::LfuCache;
    ///
    /// let cache: LfuCache<u64, String> = LfuCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a cache holding at most `capacity` entries, rejecting a zero
    /// capacity.
    ///
    /// # Example
    ///
    /// ```
    /// use collkit::lfu::LfuCache;
    ///
    /// assert!(LfuCache::<u64, u64>::try_new(0).is_err());
    /// assert!(LfuCache::<u64, u64>::try_new(8).is_ok());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_with_discard(capacity, |_key, _value| {})
    }

    /// Creates a cache that invokes `on_discard` with the owned key and
    /// value of every evicted entry.
    ///
    /// The callback fires only for capacity evictions; [`clear`](Self::clear)
    /// and [`pop_lfu`](Self::pop_lfu) do not count as evictions.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::mpsc;
    /// use collkit::lfu::LfuCache;
    ///
    /// let (tx, rx) = mpsc::channel();
    /// let mut cache = LfuCache::with_discard(1, move |key, value| {
    ///     tx.send((key, value)).unwrap();
    /// });
    ///
    /// cache.put("a", 1);
    /// cache.put("b", 2); // evicts "a"
    /// assert_eq!(rx.try_recv(), Ok(("a", 1)));
    /// ```
    pub fn with_discard(capacity: usize, on_discard: impl FnMut(K, V) + Send + 'static) -> Self {
        match Self::try_with_discard(capacity, on_discard) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible form of [`with_discard`](Self::with_discard).
    pub fn try_with_discard(
        capacity: usize,
        on_discard: impl FnMut(K, V) + Send + 'static,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be positive"));
        }
        Ok(Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            buckets: FxHashMap::default(),
            min_count: 0,
            capacity,
            on_discard: Box::new(on_discard),
            #[cfg(feature = "metrics")]
            metrics: LfuMetrics::default(),
        })
    }

    /// Returns the value for `key` and increments its access count.
    ///
    /// A miss returns `None` and leaves every structure untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use collkit::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(4);
    /// cache.put(1, "one");
    ///
    /// assert_eq!(cache.get(&1), Some(&"one"));
    /// assert_eq!(cache.get(&99), None);
    /// assert_eq!(cache.access_count(&1), Some(2)); // insert + hit
    /// ```
    pub fn get(&mut self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        {
            self.metrics.get_calls += 1;
        }

        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                #[cfg(feature = "metrics")]
                {
                    self.metrics.get_misses += 1;
                }
                return None;
            },
        };

        self.bump(idx);

        #[cfg(feature = "metrics")]
        {
            self.metrics.get_hits += 1;
        }

        self.map.get(key)
    }

    /// Inserts or overwrites `key`, returning the previous value if any.
    ///
    /// Overwriting an existing key bumps its access count exactly like a
    /// `get` hit and never changes the cache size. Inserting a new key into
    /// a full cache first evicts exactly one entry (the least recently
    /// touched member of the minimum-count bucket) and hands it to the
    /// discard callback; the new key then enters with count 1.
    ///
    /// # Example
    ///
    /// ```
    /// use collkit::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(2);
    /// assert_eq!(cache.put("a", 1), None);
    /// assert_eq!(cache.put("a", 10), Some(1));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        {
            self.metrics.put_calls += 1;
        }

        if let Some(&idx) = self.index.get(&key) {
            let previous = self
                .map
                .insert(key, value)
                .expect("key missing from primary map");
            self.bump(idx);

            #[cfg(feature = "metrics")]
            {
                self.metrics.put_updates += 1;
            }

            return Some(previous);
        }

        if self.map.len() == self.capacity {
            let (victim_key, victim_value) =
                self.take_lfu().expect("full cache has no victim");
            (self.on_discard)(victim_key, victim_value);

            #[cfg(feature = "metrics")]
            {
                self.metrics.evictions += 1;
            }
        }

        let idx = self.alloc_slot(Node {
            prev: None,
            next: None,
            count: 1,
            key: key.clone(),
        });
        self.index.insert(key.clone(), idx);
        self.map.insert(key, value);

        // A fresh key arrives at count 1, which is <= any live count.
        if !self.buckets.contains_key(&1) {
            let above = (self.min_count != 0).then_some(self.min_count);
            self.add_bucket(1, None, above);
        }
        let bucket = self.buckets.get_mut(&1).expect("count bucket missing");
        Self::attach_front(&mut self.slots, bucket, idx);
        self.min_count = 1;

        #[cfg(feature = "metrics")]
        {
            self.metrics.put_inserts += 1;
        }

        None
    }

    /// Returns the value for `key`, inserting `supplier()` on a miss.
    ///
    /// A hit behaves exactly like [`get`](Self::get) (the count is bumped);
    /// on a miss the supplier runs once and the fresh entry enters with
    /// count 1, evicting if necessary.
    ///
    /// # Example
    ///
    /// ```
    /// use collkit::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(4);
    /// assert_eq!(*cache.get_or_put("a", || 1), 1);
    /// // Present: supplier is not invoked
    /// assert_eq!(*cache.get_or_put("a", || unreachable!()), 1);
    /// ```
    pub fn get_or_put(&mut self, key: K, supplier: impl FnOnce() -> V) -> &V {
        if let Some(&idx) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            {
                self.metrics.get_calls += 1;
                self.metrics.get_hits += 1;
            }
            self.bump(idx);
            return self.map.get(&key).expect("key missing from primary map");
        }

        let value = supplier();
        self.put(key.clone(), value);
        self.map.get(&key).expect("key missing from primary map")
    }

    /// Removes and returns the current eviction victim, or `None` if the
    /// cache is empty.
    ///
    /// Ownership of the pair moves to the caller; the discard callback is
    /// not invoked.
    ///
    /// # Example
    ///
    /// ```
    /// use collkit::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(4);
    /// cache.put("hot", 1);
    /// cache.put("cold", 2);
    /// cache.get(&"hot");
    ///
    /// assert_eq!(cache.pop_lfu(), Some(("cold", 2)));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn pop_lfu(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        {
            self.metrics.pop_lfu_calls += 1;
        }
        self.take_lfu()
    }

    /// Returns the current eviction victim without removing it or touching
    /// its count.
    pub fn peek_lfu(&self) -> Option<(&K, &V)> {
        let bucket = self.buckets.get(&self.min_count)?;
        let idx = bucket.tail.expect("empty bucket retained");
        let node = self.slots[idx].as_ref().expect("slot vacated");
        let value = self.map.get(&node.key).expect("key missing from primary map");
        Some((&node.key, value))
    }

    /// Returns `key`'s current access count without registering an access.
    pub fn access_count(&self, key: &K) -> Option<u64> {
        self.index
            .get(key)
            .map(|&idx| self.slots[idx].as_ref().expect("slot vacated").count)
    }

    /// Checks if `key` is present without registering an access.
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Checks if any entry stores `value`.
    ///
    /// This is the one expensive query: a linear scan over all stored
    /// values. No access counts change.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.map.values().any(|stored| stored == value)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the cache holds no entries.
    ///
    /// Defined as "no live access count" (`min_count == 0`), which
    /// coincides with an empty primary map under the structural invariants.
    pub fn is_empty(&self) -> bool {
        self.min_count == 0
    }

    /// Returns the fixed maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes every entry and resets all frequency state.
    ///
    /// An explicit clear is not an eviction: the discard callback is not
    /// invoked.
    ///
    /// # Example
    ///
    /// ```
    /// use collkit::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(2);
    /// cache.put(1, "one");
    /// cache.clear();
    ///
    /// assert!(cache.is_empty());
    /// assert_eq!(cache.get(&1), None);
    /// assert_eq!(cache.capacity(), 2);
    /// ```
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        {
            self.metrics.clears += 1;
        }
        self.map.clear();
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.buckets.clear();
        self.min_count = 0;
    }

    /// Read-only view of the keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// Read-only view of the values, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.map.values()
    }

    /// Read-only view of the entries, in no particular order.
    ///
    /// Iteration borrows the cache, so no access counts change and the
    /// structures cannot be mutated through the view.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map.iter()
    }

    // -- internal machinery -----------------------------------------------

    fn alloc_slot(&mut self, node: Node<K>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    fn release_slot(&mut self, idx: usize) -> Node<K> {
        let node = self.slots[idx].take().expect("slot vacated");
        self.free.push(idx);
        node
    }

    fn attach_front(slots: &mut [Option<Node<K>>], bucket: &mut Bucket, idx: usize) {
        let old_head = bucket.head;
        {
            let node = slots[idx].as_mut().expect("slot vacated");
            node.prev = None;
            node.next = old_head;
        }
        if let Some(head) = old_head {
            slots[head].as_mut().expect("slot vacated").prev = Some(idx);
        } else {
            bucket.tail = Some(idx);
        }
        bucket.head = Some(idx);
        bucket.len += 1;
    }

    fn detach(slots: &mut [Option<Node<K>>], bucket: &mut Bucket, idx: usize) {
        let (prev, next) = {
            let node = slots[idx].as_ref().expect("slot vacated");
            (node.prev, node.next)
        };
        match prev {
            Some(p) => slots[p].as_mut().expect("slot vacated").next = next,
            None => bucket.head = next,
        }
        match next {
            Some(n) => slots[n].as_mut().expect("slot vacated").prev = prev,
            None => bucket.tail = prev,
        }
        let node = slots[idx].as_mut().expect("slot vacated");
        node.prev = None;
        node.next = None;
        bucket.len -= 1;
    }

    /// Inserts an empty bucket for `count` between `below` and `above` and
    /// rewires the neighbor links. A bucket with nothing below it is the
    /// new minimum.
    fn add_bucket(&mut self, count: u64, below: Option<u64>, above: Option<u64>) {
        self.buckets.insert(
            count,
            Bucket {
                head: None,
                tail: None,
                len: 0,
                below,
                above,
            },
        );
        if let Some(b) = below {
            self.buckets.get_mut(&b).expect("count bucket missing").above = Some(count);
        }
        if let Some(a) = above {
            self.buckets.get_mut(&a).expect("count bucket missing").below = Some(count);
        }
        if below.is_none() {
            self.min_count = count;
        }
    }

    /// Removes the emptied bucket for `count`, splices its neighbors
    /// together, and advances `min_count` past it if it was the minimum
    /// (0 when no bucket remains). Returns the former neighbors.
    fn drop_bucket(&mut self, count: u64) -> (Option<u64>, Option<u64>) {
        let bucket = self.buckets.remove(&count).expect("count bucket missing");
        debug_assert_eq!(bucket.len, 0, "dropping a non-empty bucket");
        if let Some(b) = bucket.below {
            self.buckets.get_mut(&b).expect("count bucket missing").above = bucket.above;
        }
        if let Some(a) = bucket.above {
            self.buckets.get_mut(&a).expect("count bucket missing").below = bucket.below;
        }
        if self.min_count == count {
            self.min_count = bucket.above.unwrap_or(0);
        }
        (bucket.below, bucket.above)
    }

    /// Moves the slot at `idx` from its current count bucket to the bucket
    /// one above, creating and deleting buckets as needed. The slot becomes
    /// the most recently touched member of its new bucket.
    fn bump(&mut self, idx: usize) {
        let old = self.slots[idx].as_ref().expect("slot vacated").count;
        let new = old.saturating_add(1);

        if new == old {
            // Count saturated: refresh recency within the same bucket.
            let bucket = self.buckets.get_mut(&old).expect("count bucket missing");
            Self::detach(&mut self.slots, bucket, idx);
            Self::attach_front(&mut self.slots, bucket, idx);
            return;
        }

        let (emptied, above) = {
            let bucket = self.buckets.get_mut(&old).expect("count bucket missing");
            Self::detach(&mut self.slots, bucket, idx);
            (bucket.len == 0, bucket.above)
        };

        self.slots[idx].as_mut().expect("slot vacated").count = new;

        if emptied {
            let (below, above) = self.drop_bucket(old);
            if above != Some(new) {
                self.add_bucket(new, below, above);
            }
        } else if above != Some(new) {
            self.add_bucket(new, Some(old), above);
        }

        let bucket = self.buckets.get_mut(&new).expect("count bucket missing");
        Self::attach_front(&mut self.slots, bucket, idx);
    }

    /// Unlinks and returns the least-recently-touched member of the
    /// minimum-count bucket, maintaining `min_count` exactly.
    fn take_lfu(&mut self) -> Option<(K, V)> {
        if self.min_count == 0 {
            return None;
        }
        let min = self.min_count;

        let (idx, emptied) = {
            let bucket = self.buckets.get_mut(&min).expect("count bucket missing");
            let idx = bucket.tail.expect("empty bucket retained");
            Self::detach(&mut self.slots, bucket, idx);
            (idx, bucket.len == 0)
        };
        if emptied {
            self.drop_bucket(min);
        }

        let node = self.release_slot(idx);
        self.index
            .remove(&node.key)
            .expect("key missing from count index");
        let value = self
            .map
            .remove(&node.key)
            .expect("key missing from primary map");
        Some((node.key, value))
    }

    // -- validation --------------------------------------------------------

    /// Walks every structure and reports the first inconsistency.
    ///
    /// Intended for tests, fuzzing, and debugging; a non-`Ok` result means
    /// the cache's internal state is corrupted.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let fail = |msg: String| Err(InvariantError::new(msg));

        if self.capacity == 0 {
            return fail("capacity is zero".to_string());
        }
        if self.map.len() > self.capacity {
            return fail(format!(
                "len {} exceeds capacity {}",
                self.map.len(),
                self.capacity
            ));
        }
        if self.map.len() != self.index.len() {
            return fail(format!(
                "primary map holds {} keys but count index holds {}",
                self.map.len(),
                self.index.len()
            ));
        }

        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        if occupied != self.map.len() {
            return fail(format!(
                "{} occupied slots for {} entries",
                occupied,
                self.map.len()
            ));
        }
        if occupied + self.free.len() != self.slots.len() {
            return fail("free list does not account for vacant slots".to_string());
        }

        if self.map.is_empty() {
            if self.min_count != 0 {
                return fail(format!("empty cache has min_count {}", self.min_count));
            }
            if !self.buckets.is_empty() {
                return fail("empty cache retains buckets".to_string());
            }
            return Ok(());
        }

        if self.min_count == 0 {
            return fail("non-empty cache has min_count 0".to_string());
        }
        if !self.buckets.contains_key(&self.min_count) {
            return fail(format!("min_count {} has no bucket", self.min_count));
        }

        let mut seen = 0usize;
        for (&count, bucket) in &self.buckets {
            if bucket.len == 0 {
                return fail(format!("bucket {count} is empty but retained"));
            }
            if count < self.min_count {
                return fail(format!("bucket {count} sits below min_count {}", self.min_count));
            }
            match bucket.below {
                None => {
                    if count != self.min_count {
                        return fail(format!("bucket {count} has no below link but is not the minimum"));
                    }
                },
                Some(below) => {
                    if below >= count {
                        return fail(format!("bucket {count} links below to {below}"));
                    }
                    let neighbor = match self.buckets.get(&below) {
                        Some(neighbor) => neighbor,
                        None => return fail(format!("bucket {count} links to missing bucket {below}")),
                    };
                    if neighbor.above != Some(count) {
                        return fail(format!("bucket {below} does not link back up to {count}"));
                    }
                },
            }
            if let Some(above) = bucket.above {
                if above <= count {
                    return fail(format!("bucket {count} links above to {above}"));
                }
                if !self.buckets.contains_key(&above) {
                    return fail(format!("bucket {count} links to missing bucket {above}"));
                }
            }

            // Walk the recency list.
            let mut current = bucket.head;
            let mut last = None;
            let mut walked = 0usize;
            while let Some(idx) = current {
                let node = match self.slots.get(idx).and_then(|slot| slot.as_ref()) {
                    Some(node) => node,
                    None => return fail(format!("bucket {count} links vacant slot {idx}")),
                };
                if node.count != count {
                    return fail(format!(
                        "slot {idx} has count {} but sits in bucket {count}",
                        node.count
                    ));
                }
                if node.prev != last {
                    return fail(format!("slot {idx} has a broken prev link"));
                }
                if self.index.get(&node.key) != Some(&idx) {
                    return fail(format!("slot {idx} is not indexed by its key"));
                }
                if !self.map.contains_key(&node.key) {
                    return fail(format!("slot {idx} holds a key absent from the primary map"));
                }
                last = Some(idx);
                current = node.next;
                walked += 1;
                if walked > bucket.len {
                    return fail(format!("bucket {count} list is longer than its len"));
                }
            }
            if bucket.tail != last {
                return fail(format!("bucket {count} tail does not terminate its list"));
            }
            if walked != bucket.len {
                return fail(format!(
                    "bucket {count} len {} does not match walked {walked}",
                    bucket.len
                ));
            }
            seen += walked;
        }

        if seen != self.map.len() {
            return fail(format!(
                "buckets hold {seen} keys but the primary map holds {}",
                self.map.len()
            ));
        }
        Ok(())
    }

    /// Panicking form of [`check_invariants`](Self::check_invariants) for
    /// tests and fuzz targets.
    #[cfg(debug_assertions)]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("lfu invariant violated: {err}");
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Snapshots the operation counters recorded so far.
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        LfuMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            put_calls: self.metrics.put_calls,
            put_inserts: self.metrics.put_inserts,
            put_updates: self.metrics.put_updates,
            evictions: self.metrics.evictions,
            pop_lfu_calls: self.metrics.pop_lfu_calls,
            clears: self.metrics.clears,
            len: self.map.len(),
            capacity: self.capacity,
        }
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("min_count", &self.min_count)
            .finish_non_exhaustive()
    }
}

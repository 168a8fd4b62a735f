// ==============================================
// MODEL-BASED PROPERTY TESTS (integration)
// ==============================================
//
// Drives LfuCache with arbitrary op sequences and checks it against a
// naive reference model built directly from the documented semantics:
// counts bump on every touch, eviction takes the lowest count, ties fall
// to the key that entered its bucket earliest.

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use collkit::lfu::LfuCache;

/// Naive O(n)-per-op LFU implementing the documented semantics verbatim.
struct ModelLfu {
    capacity: usize,
    values: BTreeMap<u32, u32>,
    counts: BTreeMap<u32, u64>,
    // count -> keys ordered by bucket entry (front = oldest = victim)
    buckets: BTreeMap<u64, VecDeque<u32>>,
    evicted: Vec<(u32, u32)>,
}

impl ModelLfu {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: BTreeMap::new(),
            counts: BTreeMap::new(),
            buckets: BTreeMap::new(),
            evicted: Vec::new(),
        }
    }

    fn bump(&mut self, key: u32) {
        let old = self.counts[&key];
        let bucket = self.buckets.get_mut(&old).unwrap();
        let pos = bucket.iter().position(|&k| k == key).unwrap();
        bucket.remove(pos);
        if bucket.is_empty() {
            self.buckets.remove(&old);
        }
        self.counts.insert(key, old + 1);
        self.buckets.entry(old + 1).or_default().push_back(key);
    }

    fn get(&mut self, key: u32) -> Option<u32> {
        let value = *self.values.get(&key)?;
        self.bump(key);
        Some(value)
    }

    fn put(&mut self, key: u32, value: u32) -> Option<u32> {
        if let Some(slot) = self.values.get_mut(&key) {
            let previous = std::mem::replace(slot, value);
            self.bump(key);
            return Some(previous);
        }
        if self.values.len() == self.capacity {
            let (&min, _) = self.buckets.iter().next().unwrap();
            let victim = self.buckets.get_mut(&min).unwrap().pop_front().unwrap();
            if self.buckets[&min].is_empty() {
                self.buckets.remove(&min);
            }
            let victim_value = self.values.remove(&victim).unwrap();
            self.counts.remove(&victim);
            self.evicted.push((victim, victim_value));
        }
        self.values.insert(key, value);
        self.counts.insert(key, 1);
        self.buckets.entry(1).or_default().push_back(key);
        None
    }
}

#[derive(Debug, Clone)]
enum Op {
    Get(u32),
    Put(u32, u32),
    GetOrPut(u32, u32),
    PopLfu,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..16).prop_map(Op::Get),
        (0u32..16, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        (0u32..16, any::<u32>()).prop_map(|(k, v)| Op::GetOrPut(k, v)),
        Just(Op::PopLfu),
    ]
}

proptest! {
    /// The cache agrees with the naive model op-for-op: results, size,
    /// eviction victims, and final contents.
    #[test]
    fn cache_matches_reference_model(
        capacity in 1usize..8,
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let mut cache = LfuCache::with_discard(capacity, move |key: u32, value: u32| {
            sink.lock().unwrap().push((key, value));
        });
        let mut model = ModelLfu::new(capacity);

        for op in ops {
            match op {
                Op::Get(key) => {
                    prop_assert_eq!(cache.get(&key).copied(), model.get(key));
                },
                Op::Put(key, value) => {
                    prop_assert_eq!(cache.put(key, value), model.put(key, value));
                },
                Op::GetOrPut(key, value) => {
                    let expected = match model.get(key) {
                        Some(existing) => existing,
                        None => {
                            model.put(key, value);
                            value
                        },
                    };
                    prop_assert_eq!(*cache.get_or_put(key, || value), expected);
                },
                Op::PopLfu => {
                    // Pop is an explicit removal, not an eviction: the
                    // model removes the victim without recording it.
                    let min = model.buckets.keys().next().copied();
                    let expected = min.map(|min| {
                        let bucket = model.buckets.get_mut(&min).unwrap();
                        let victim = bucket.pop_front().unwrap();
                        if bucket.is_empty() {
                            model.buckets.remove(&min);
                        }
                        let value = model.values.remove(&victim).unwrap();
                        model.counts.remove(&victim);
                        (victim, value)
                    });
                    prop_assert_eq!(cache.pop_lfu(), expected);
                },
            }

            prop_assert!(cache.len() <= capacity);
            prop_assert_eq!(cache.len(), model.values.len());
            prop_assert!(cache.check_invariants().is_ok());
        }

        // Same keys survived.
        let mut keys: Vec<_> = cache.keys().copied().collect();
        keys.sort_unstable();
        let model_keys: Vec<_> = model.values.keys().copied().collect();
        prop_assert_eq!(keys, model_keys);

        // Same victims, in the same order.
        prop_assert_eq!(&*evicted.lock().unwrap(), &model.evicted);

        // Same access counts.
        for (key, count) in &model.counts {
            prop_assert_eq!(cache.access_count(key), Some(*count));
        }
    }

    /// A miss never perturbs any observable state.
    #[test]
    fn miss_is_a_pure_no_op(
        capacity in 1usize..6,
        keys in prop::collection::vec(0u32..8, 0..30),
        probe in 100u32..200,
    ) {
        let mut cache = LfuCache::new(capacity);
        for key in keys {
            cache.put(key, key);
        }

        let len_before = cache.len();
        let counts_before: Vec<_> = {
            let mut pairs: Vec<_> = cache
                .keys()
                .map(|&k| (k, cache.access_count(&k).unwrap()))
                .collect();
            pairs.sort_unstable();
            pairs
        };

        prop_assert_eq!(cache.get(&probe), None);

        prop_assert_eq!(cache.len(), len_before);
        let counts_after: Vec<_> = {
            let mut pairs: Vec<_> = cache
                .keys()
                .map(|&k| (k, cache.access_count(&k).unwrap()))
                .collect();
            pairs.sort_unstable();
            pairs
        };
        prop_assert_eq!(counts_after, counts_before);
        prop_assert!(cache.check_invariants().is_ok());
    }

    /// Re-putting an existing key never changes the size and always
    /// raises its count.
    #[test]
    fn overwrite_preserves_size_and_raises_count(
        capacity in 1usize..6,
        key in 0u32..4,
        rewrites in 1usize..20,
    ) {
        let mut cache = LfuCache::new(capacity);
        cache.put(key, 0);
        let size = cache.len();

        for round in 1..=rewrites {
            cache.put(key, round as u32);
            prop_assert_eq!(cache.len(), size);
            prop_assert_eq!(cache.access_count(&key), Some(1 + round as u64));
        }
    }
}

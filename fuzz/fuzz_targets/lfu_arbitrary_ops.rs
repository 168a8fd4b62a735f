#![no_main]

use collkit::lfu::LfuCache;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on LfuCache
//
// Runs random sequences of put, get, get_or_put, pop_lfu, peek_lfu,
// access_count, contains and clear against a small-capacity cache,
// re-validating every structural invariant after each step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // Capacity in 1..=16; zero capacity is rejected at construction.
    let capacity = usize::from(data[0] % 16) + 1;
    let mut cache: LfuCache<u8, u8> = LfuCache::new(capacity);

    let mut idx = 1;
    while idx + 2 < data.len() {
        let op = data[idx] % 8;
        let key = data[idx + 1];
        let value = data[idx + 2];

        match op {
            0 => {
                cache.put(key, value);
            },
            1 => {
                let _ = cache.get(&key);
            },
            2 => {
                let got = *cache.get_or_put(key, || value);
                assert!(cache.contains_key(&key));
                let _ = got;
            },
            3 => {
                let _ = cache.pop_lfu();
            },
            4 => {
                let _ = cache.peek_lfu();
            },
            5 => {
                let _ = cache.access_count(&key);
            },
            6 => {
                let _ = cache.contains_key(&key);
            },
            7 => {
                cache.clear();
            },
            _ => unreachable!(),
        }

        // Validate invariants after each operation
        cache.debug_validate_invariants();

        // Basic consistency
        assert!(cache.len() <= cache.capacity());
        if cache.is_empty() {
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.peek_lfu(), None);
        } else {
            assert!(cache.len() > 0);
            assert!(cache.peek_lfu().is_some());
        }

        // A present key always has a count of at least 1
        if cache.contains_key(&key) {
            assert!(cache.access_count(&key).unwrap() >= 1);
        }

        idx += 3;
    }
});

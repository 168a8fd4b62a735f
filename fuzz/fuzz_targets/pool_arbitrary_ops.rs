#![no_main]

use collkit::pool::{ObjectPool, Pool};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on ObjectPool
//
// Tracks the expected number of idle objects through random borrow,
// borrow_into, recycle, recycle_all, clear, clear_into and scoped
// sequences and checks the pool's accounting after every step.
fuzz_target!(|data: &[u8]| {
    let mut pool: ObjectPool<Vec<u8>> = ObjectPool::with_finalizer(Vec::new, Vec::clear);
    let mut held: Vec<Vec<u8>> = Vec::new();
    let mut idle = 0usize;

    let mut idx = 0;
    while idx + 1 < data.len() {
        let op = data[idx] % 7;
        let amount = usize::from(data[idx + 1] % 8);

        match op {
            0 => {
                let buf = pool.borrow();
                assert!(buf.is_empty(), "recycled buffers must come back reset");
                held.push(buf);
                idle = idle.saturating_sub(1);
            },
            1 => {
                if let Some(mut buf) = held.pop() {
                    buf.push(1);
                    pool.recycle(buf);
                    idle += 1;
                }
            },
            2 => {
                let before = held.len();
                pool.borrow_into(&mut held, amount);
                assert_eq!(held.len(), before + amount);
                idle -= idle.min(amount);
            },
            3 => {
                let batch: Vec<_> = held.drain(..).collect();
                idle += batch.len();
                pool.recycle_all(batch);
            },
            4 => {
                assert_eq!(pool.clear(), idle);
                idle = 0;
            },
            5 => {
                let mut drained = Vec::new();
                assert_eq!(pool.clear_into(&mut drained), idle);
                assert_eq!(drained.len(), idle);
                idle = 0;
            },
            6 => {
                // Scoped use is net-neutral for outstanding objects but
                // leaves the object idle afterwards.
                let reused = idle > 0;
                pool.scoped(|buf| buf.push(7));
                if !reused {
                    idle += 1;
                }
            },
            _ => unreachable!(),
        }

        assert_eq!(pool.len(), idle);
        idx += 2;
    }
});

// ==============================================
// SYNC POOL CONCURRENCY TESTS (integration)
// ==============================================
//
// Exercises SyncPool under contending threads. The pool never allocates
// more objects than are simultaneously outstanding, so a counting
// initializer bounds allocations by the thread count.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use collkit::pool::{ObjectPool, Pool};

const THREADS: usize = 8;
const ROUNDS: usize = 200;

fn counting_sync_pool() -> (Arc<collkit::pool::SyncPool<Vec<u8>>>, Arc<AtomicUsize>) {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&created);
    let pool = ObjectPool::with_finalizer(
        move || {
            counter.fetch_add(1, Ordering::Relaxed);
            Vec::new()
        },
        Vec::clear,
    )
    .synchronized();
    (Arc::new(pool), created)
}

#[test]
fn contended_borrow_recycle_never_loses_objects() {
    let (pool, created) = counting_sync_pool();

    let workers: Vec<_> = (0..THREADS)
        .map(|worker| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    let mut buf = pool.borrow();
                    assert!(buf.is_empty(), "finalizer must reset recycled buffers");
                    buf.push((worker % 256) as u8);
                    buf.push((round % 256) as u8);
                    pool.recycle(buf);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    // Each thread holds at most one object at a time, so at most THREADS
    // objects were ever simultaneously outstanding.
    assert!(created.load(Ordering::Relaxed) <= THREADS);
    assert_eq!(pool.len(), created.load(Ordering::Relaxed));
}

#[test]
fn contended_batch_cycles_balance() {
    const BATCH: usize = 4;
    let (pool, created) = counting_sync_pool();

    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for _ in 0..ROUNDS {
                    let mut batch = Vec::new();
                    pool.borrow_into(&mut batch, BATCH);
                    assert_eq!(batch.len(), BATCH);
                    pool.recycle_all(batch);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert!(created.load(Ordering::Relaxed) <= THREADS * BATCH);
    assert_eq!(pool.len(), created.load(Ordering::Relaxed));
}

#[test]
fn contended_scoped_use_returns_every_object() {
    let (pool, created) = counting_sync_pool();

    let workers: Vec<_> = (0..THREADS)
        .map(|worker| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for _ in 0..ROUNDS {
                    let len = pool.scoped(|buf| {
                        buf.push(worker as u8);
                        buf.len()
                    });
                    assert_eq!(len, 1);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    // Nothing is outstanding once all scoped uses finished.
    assert_eq!(pool.len(), created.load(Ordering::Relaxed));
}

#[test]
fn clear_under_contention_only_drops_idle_objects() {
    let (pool, _created) = counting_sync_pool();

    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let mut drained = 0usize;
                for _ in 0..ROUNDS {
                    let buf = pool.borrow();
                    pool.recycle(buf);
                    drained += pool.clear();
                }
                drained
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    // Whatever is left is idle and countable.
    let mut rest = Vec::new();
    let moved = pool.clear_into(&mut rest);
    assert_eq!(moved, rest.len());
    assert_eq!(pool.len(), 0);
}

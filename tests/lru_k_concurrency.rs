// ==============================================
// LRU-K CONCURRENCY TESTS (integration)
// ==============================================
//
// Shared `ConcurrentLrukCache` handles hammered from several threads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use lrukit::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const THREADS: usize = 8;
const OPS_PER_THREAD: usize = 2_000;

#[cfg_attr(miri, ignore)]
#[test]
fn mixed_workload_keeps_bounds() {
    let evictions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&evictions);
    let cache: ConcurrentLrukCache<u32, u64> = LrukBuilder::new(64)
        .k(2)
        .on_evict(move |_, _| {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .try_build_concurrent()
        .unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(t as u64);
                barrier.wait();
                for i in 0..OPS_PER_THREAD {
                    let key = rng.gen_range(0..256u32);
                    match rng.gen_range(0..10) {
                        0..=3 => {
                            cache.put(key, i as u64);
                        },
                        4..=6 => {
                            cache.get(&key);
                        },
                        7 => {
                            cache.peek(&key);
                        },
                        8 => {
                            cache.touch(&key);
                        },
                        _ => {
                            cache.remove(&key);
                        },
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = cache.stats();
    assert!(stats.size <= stats.capacity);
    assert_eq!(stats.total_entries, stats.size + stats.history_size);
    assert_eq!(cache.keys().len(), stats.size);
    assert!(evictions.load(Ordering::Relaxed) > 0);
}

#[cfg_attr(miri, ignore)]
#[test]
fn readers_observe_admitted_values() {
    let cache: ConcurrentLrukCache<u32, u32> = ConcurrentLrukCache::try_new(128, 2).unwrap();
    for key in 0..100 {
        cache.put(key, key * 2);
        cache.put(key, key * 2);
    }

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = cache.clone();
            thread::spawn(move || {
                for key in 0..100 {
                    assert_eq!(cache.peek(&key), Some(key * 2));
                    assert!(cache.contains(&key));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.len(), 100);
}

#[cfg_attr(miri, ignore)]
#[test]
fn resize_and_clear_race_with_writers() {
    let cache: ConcurrentLrukCache<u32, u32> = ConcurrentLrukCache::try_new(32, 1).unwrap();
    let barrier = Arc::new(Barrier::new(3));

    let writer = {
        let cache = cache.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for key in 0..5_000 {
                cache.put(key % 200, key);
            }
        })
    };
    let resizer = {
        let cache = cache.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for round in 0..200usize {
                cache.resize(1 + round % 40).unwrap();
                if round % 50 == 0 {
                    cache.clear();
                }
            }
        })
    };

    barrier.wait();
    for _ in 0..1_000 {
        assert!(cache.len() <= 40);
    }

    writer.join().unwrap();
    resizer.join().unwrap();
    assert!(cache.len() <= cache.capacity());
}

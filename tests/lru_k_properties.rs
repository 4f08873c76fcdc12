// ==============================================
// LRU-K PROPERTY TESTS (integration)
// ==============================================
//
// Random operation sequences checked against structural invariants and a
// simple reference model of admission.

use std::collections::{HashMap, VecDeque};

use lrukit::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Put(u8, u16),
    Get(u8),
    Peek(u8),
    Touch(u8),
    Remove(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..24, any::<u16>()).prop_map(|(k, v)| Op::Put(k, v)),
        3 => (0u8..24).prop_map(Op::Get),
        1 => (0u8..24).prop_map(Op::Peek),
        1 => (0u8..24).prop_map(Op::Touch),
        1 => (0u8..24).prop_map(Op::Remove),
    ]
}

/// Reference model: per-key access counts plus a recency queue of admitted keys.
#[derive(Default)]
struct Model {
    counts: HashMap<u8, usize>,
    values: HashMap<u8, u16>,
    cached: VecDeque<u8>,
}

impl Model {
    fn access(&mut self, key: u8, k: usize, capacity: usize) {
        if let Some(pos) = self.cached.iter().position(|&c| c == key) {
            self.cached.remove(pos);
            self.cached.push_front(key);
            return;
        }
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        if *count >= k {
            if self.cached.len() >= capacity {
                if let Some(victim) = self.cached.pop_back() {
                    self.counts.remove(&victim);
                    self.values.remove(&victim);
                }
            }
            self.cached.push_front(key);
        }
    }

    fn tracked(&self, key: u8) -> bool {
        self.counts.contains_key(&key)
    }

    fn remove(&mut self, key: u8) -> Option<u16> {
        self.counts.remove(&key)?;
        self.cached.retain(|&c| c != key);
        self.values.remove(&key)
    }
}

fn assert_consistent(cache: &LrukCache<u8, u16>) {
    #[cfg(debug_assertions)]
    cache.check_invariants().unwrap();
    let stats = cache.stats();
    assert!(stats.size <= stats.capacity);
    assert_eq!(stats.total_entries, stats.size + stats.history_size);
}

proptest! {
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_invariants_always_hold(
        capacity in 1usize..12,
        k in 1usize..4,
        ops in prop::collection::vec(op_strategy(), 0..200)
    ) {
        let mut cache: LrukCache<u8, u16> = LrukCache::try_new(capacity, k).unwrap();
        for op in ops {
            match op {
                Op::Put(key, value) => { cache.put(key, value); },
                Op::Get(key) => { cache.get(&key); },
                Op::Peek(key) => { cache.peek(&key); },
                Op::Touch(key) => { cache.touch(&key); },
                Op::Remove(key) => { cache.remove(&key); },
            }
            assert_consistent(&cache);
        }
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..8,
        k in 1usize..4,
        ops in prop::collection::vec(op_strategy(), 0..200)
    ) {
        let mut cache: LrukCache<u8, u16> = LrukCache::try_new(capacity, k).unwrap();
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Put(key, value) => {
                    cache.put(key, value);
                    model.values.insert(key, value);
                    model.access(key, k, capacity);
                },
                Op::Get(key) => {
                    let got = cache.get(&key).copied();
                    if model.tracked(key) {
                        model.access(key, k, capacity);
                    }
                    let expected = if model.cached.contains(&key) {
                        model.values.get(&key).copied()
                    } else {
                        None
                    };
                    prop_assert_eq!(got, expected);
                },
                Op::Peek(key) => {
                    let expected = if model.cached.contains(&key) {
                        model.values.get(&key).copied()
                    } else {
                        None
                    };
                    prop_assert_eq!(cache.peek(&key).copied(), expected);
                },
                Op::Touch(key) => {
                    let tracked = model.tracked(key);
                    prop_assert_eq!(cache.touch(&key), tracked);
                    if tracked {
                        model.access(key, k, capacity);
                    }
                },
                Op::Remove(key) => {
                    prop_assert_eq!(cache.remove(&key), model.remove(key));
                },
            }
            prop_assert_eq!(cache.keys(), model.cached.iter().copied().collect::<Vec<_>>());
        }
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_len_never_exceeds_capacity(
        capacity in 1usize..16,
        keys in prop::collection::vec(0u8..64, 0..300)
    ) {
        let mut cache: LrukCache<u8, u16> = LrukCache::try_new(capacity, 2).unwrap();
        for key in keys {
            cache.put(key, u16::from(key));
            prop_assert!(cache.len() <= capacity);
        }
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_resize_keeps_mru_prefix(
        capacity in 2usize..16,
        shrink_to in 1usize..16,
        keys in prop::collection::vec(0u8..64, 0..100)
    ) {
        let mut cache: LrukCache<u8, u16> = LrukCache::try_new(capacity, 1).unwrap();
        for key in keys {
            cache.put(key, 0);
        }
        let before = cache.keys();
        let evicted = cache.resize(shrink_to).unwrap();

        let kept = before.len().min(shrink_to);
        prop_assert_eq!(evicted, before.len() - kept);
        prop_assert_eq!(cache.keys(), before[..kept].to_vec());
        assert_consistent(&cache);
    }
}

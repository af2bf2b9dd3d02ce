use std::{
    collections::VecDeque,
    num::NonZeroUsize,
};

use rand::{
    Rng,
    SeedableRng,
    rngs::StdRng,
};
use recency::{
    CacheError,
    Lru,
};

fn keys<K: Clone, V>(cache: &Lru<K, V>) -> Vec<K> {
    cache.keys().cloned().collect()
}

#[test]
fn test_lru_new_empty() {
    let cache = Lru::<i32, String>::new(NonZeroUsize::new(3).unwrap());
    assert_eq!(cache.size(), 0);
    assert!(cache.is_empty());
    assert_eq!(cache.max_size(), 3);
    assert!(cache.into_iter().next().is_none());
}

#[test]
fn test_lru_invalid_capacity() {
    for capacity in [0i64, -1, -100] {
        match Lru::<String, u32>::try_new(capacity) {
            Err(CacheError::InvalidCapacity { requested }) => {
                assert_eq!(requested, capacity.to_string());
            }
            Ok(_) => panic!("capacity {capacity} should be rejected"),
        }
    }
}

#[test]
fn test_lru_capacity_beyond_usize_is_rejected() {
    assert_eq!(
        Lru::<u8, u8>::try_new(u128::MAX).unwrap_err(),
        CacheError::InvalidCapacity {
            requested: "340282366920938463463374607431768211455".to_string(),
        }
    );
}

#[test]
fn test_lru_largest_capacity_builds_lazily() {
    let mut cache = Lru::<u32, u32>::try_new(usize::MAX).unwrap();
    assert_eq!(cache.max_size(), usize::MAX);
    assert!(cache.is_empty());

    for i in 0..4 {
        assert_eq!(cache.put(i, i * 10), None);
    }
    assert_eq!(cache.get(&0), Some(&0));
    assert_eq!(keys(&cache), [0, 3, 2, 1]);
    assert_eq!(cache.pop_lru(), Some((1, 10)));
    assert_eq!(cache.size(), 3);
}

#[test]
fn test_lru_scenario_walkthrough() {
    let mut cache = Lru::try_new(3).unwrap();

    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("c", 3);
    assert_eq!(keys(&cache), ["c", "b", "a"]);

    assert_eq!(cache.get(&"a"), Some(&1));
    assert_eq!(keys(&cache), ["a", "c", "b"]);

    cache.put("d", 4);
    assert!(!cache.has(&"b"));
    assert_eq!(keys(&cache), ["d", "a", "c"]);
    assert_eq!(cache.size(), 3);

    assert!(cache.delete(&"a"));
    assert_eq!(cache.size(), 2);
    assert_eq!(keys(&cache), ["d", "c"]);

    cache.clear();
    assert_eq!(cache.size(), 0);
    assert!(keys(&cache).is_empty());
    for key in ["a", "b", "c", "d"] {
        assert_eq!(cache.get(&key), None);
    }
}

#[test]
fn test_lru_put_overflow() {
    let mut cache = Lru::try_new(2).unwrap();
    cache.put(1, "one".to_string());
    cache.put(2, "two".to_string());
    let evicted = cache.put(3, "three".to_string());

    assert_eq!(evicted, Some((1, "one".to_string())));
    assert_eq!(cache.size(), 2);
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![(3, "three".to_string()), (2, "two".to_string())]
    );
}

#[test]
fn test_lru_get_existing() {
    let mut cache = Lru::try_new(3).unwrap();
    cache.put(1, "one".to_string());
    cache.put(2, "two".to_string());
    cache.put(3, "three".to_string());
    assert_eq!(cache.get(&2), Some(&"two".to_string()));
    assert_eq!(keys(&cache), [2, 3, 1]);
}

#[test]
fn test_lru_get_nonexistent() {
    let mut cache = Lru::try_new(3).unwrap();
    cache.put(1, "one".to_string());
    cache.put(2, "two".to_string());
    assert_eq!(cache.get(&3), None);
    assert_eq!(keys(&cache), [2, 1]);
}

#[test]
fn test_lru_eviction_follows_recency_not_insertion() {
    let mut cache = Lru::try_new(3).unwrap();
    cache.put(1, ());
    cache.put(2, ());
    cache.put(3, ());

    cache.get(&1);
    cache.put(2, ());

    assert_eq!(cache.lru(), Some((&3, &())));
    assert_eq!(cache.put(4, ()), Some((3, ())));
    assert_eq!(keys(&cache), [4, 2, 1]);
}

#[test]
fn test_lru_has_never_reorders() {
    let mut cache = Lru::try_new(4).unwrap();
    for i in 0..4 {
        cache.put(i, i);
    }
    let before = keys(&cache);

    for i in 0..8 {
        cache.has(&i);
    }

    assert_eq!(keys(&cache), before);
}

#[test]
fn test_lru_update_is_idempotent_on_size() {
    let mut cache = Lru::try_new(2).unwrap();
    cache.put("k", 1);
    cache.put("k", 2);

    assert_eq!(cache.size(), 1);
    assert_eq!(cache.get(&"k"), Some(&2));
}

#[test]
fn test_lru_delete_keeps_order_of_others() {
    let mut cache = Lru::try_new(5).unwrap();
    for i in 0..5 {
        cache.put(i, i);
    }

    assert!(cache.delete(&2));
    assert!(!cache.delete(&7));

    assert_eq!(keys(&cache), [4, 3, 1, 0]);
}

#[test]
fn test_lru_slot_reuse_after_churn() {
    let mut cache = Lru::try_new(16).unwrap();
    for round in 0..50 {
        for i in 0..16 {
            cache.put((round, i), i);
        }
        for i in 0..8 {
            assert!(cache.delete(&(round, i * 2)));
        }
    }

    assert_eq!(cache.size(), 8);
    assert_eq!(
        keys(&cache),
        (0..8).rev().map(|i| (49, i * 2 + 1)).collect::<Vec<_>>()
    );
}

#[test]
fn test_lru_values_and_entries_order() {
    let mut cache = Lru::try_new(3).unwrap();
    cache.put("x", 1);
    cache.put("y", 2);
    cache.put("z", 3);
    cache.get(&"x");

    assert_eq!(cache.values().copied().collect::<Vec<_>>(), [1, 3, 2]);
    assert_eq!(
        cache.entries().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
        [("x", 1), ("z", 3), ("y", 2)]
    );
}

#[test]
fn test_lru_entries_are_single_pass() {
    let mut cache = Lru::try_new(2).unwrap();
    cache.put(1, 1);
    cache.put(2, 2);

    let mut entries = cache.entries();
    assert_eq!(entries.by_ref().count(), 2);
    assert_eq!(entries.next(), None);
}

#[test]
fn test_lru_into_iter_rev_is_eviction_order() {
    let mut cache = Lru::try_new(3).unwrap();
    cache.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
    cache.get(&2);

    assert_eq!(
        cache.into_iter().rev().collect::<Vec<_>>(),
        [(1, 'a'), (3, 'c'), (2, 'b')]
    );
}

/// Reference model: a deque ordered most recently used first.
struct Model {
    capacity: usize,
    entries: VecDeque<(u8, u32)>,
}

impl Model {
    fn position(&self, key: u8) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == key)
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let index = self.position(key)?;
        let entry = self.entries.remove(index)?;
        self.entries.push_front(entry);
        Some(entry.1)
    }

    fn put(&mut self, key: u8, value: u32) -> Option<(u8, u32)> {
        if let Some(index) = self.position(key) {
            self.entries.remove(index);
            self.entries.push_front((key, value));
            return None;
        }
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_back()
        } else {
            None
        };
        self.entries.push_front((key, value));
        evicted
    }

    fn delete(&mut self, key: u8) -> bool {
        match self.position(key) {
            Some(index) => self.entries.remove(index).is_some(),
            None => false,
        }
    }
}

#[test]
fn test_lru_matches_reference_model() {
    let mut rng = StdRng::seed_from_u64(0x5eed_1ce5);

    for capacity in 1..=8usize {
        let mut cache = Lru::<u8, u32>::try_new(capacity).unwrap();
        let mut model = Model {
            capacity,
            entries: VecDeque::new(),
        };

        for step in 0..2_000u32 {
            let key = rng.gen_range(0..16u8);
            match rng.gen_range(0..10) {
                0..=3 => assert_eq!(cache.put(key, step), model.put(key, step)),
                4..=5 => assert_eq!(cache.get(&key).copied(), model.get(key)),
                6 => assert_eq!(cache.has(&key), model.position(key).is_some()),
                7 => assert_eq!(cache.delete(&key), model.delete(key)),
                8 => assert_eq!(cache.pop_lru(), model.entries.pop_back()),
                _ => {
                    if rng.gen_bool(0.05) {
                        cache.clear();
                        model.entries.clear();
                    }
                }
            }

            assert!(cache.size() <= cache.max_size());
            assert_eq!(cache.max_size(), capacity);
            assert_eq!(cache.size(), model.entries.len());
            assert_eq!(
                cache.entries().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
                model.entries.iter().copied().collect::<Vec<_>>()
            );
        }
    }
}

#[cfg(all(debug_assertions, feature = "internal-debugging"))]
#[test]
fn test_lru_debug_validate_under_churn() {
    let mut cache = Lru::try_new(5).unwrap();
    for i in 0..100u32 {
        cache.put(i % 7, i);
        if i % 3 == 0 {
            cache.get(&(i % 5));
        }
        if i % 11 == 0 {
            cache.delete(&(i % 7));
        }
        cache.debug_validate();
    }
    cache.retain(|k, _| k % 2 == 0);
    cache.debug_validate();
    cache.clear();
    cache.debug_validate();
}

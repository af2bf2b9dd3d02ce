#![no_main]

use std::num::NonZeroUsize;

use libfuzzer_sys::fuzz_target;
use recency::Lru;
use recency_fuzz::{
    CacheOperation,
    Model,
};

fuzz_target!(|data: (u8, Vec<CacheOperation>)| {
    let (capacity_raw, operations) = data;

    let capacity = NonZeroUsize::new((capacity_raw % 8).max(1) as usize).unwrap();
    let mut cache = Lru::<u8, u8>::new(capacity);
    let mut model = Model::new(capacity.get());

    for op in operations {
        match op {
            CacheOperation::Put(key, value) => {
                let old_size = cache.size();
                let contained_before = cache.has(&key);

                let evicted = cache.put(key, value);

                assert_eq!(evicted, model.put(key, value));
                assert_eq!(cache.mru(), Some((&key, &value)));
                if contained_before || old_size < cache.max_size() {
                    assert!(evicted.is_none());
                }
                if !contained_before && old_size < cache.max_size() {
                    assert_eq!(cache.size(), old_size + 1);
                }
            }

            CacheOperation::Get(key) => {
                let result = cache.get(&key).copied();
                assert_eq!(result, model.get(key));
                if result.is_some() {
                    assert_eq!(cache.mru().map(|(k, _)| *k), Some(key));
                }
            }

            CacheOperation::Peek(key) => {
                let lru_before = cache.lru().map(|(k, v)| (*k, *v));
                let mru_before = cache.mru().map(|(k, v)| (*k, *v));

                assert_eq!(cache.peek(&key).copied(), model.peek(key));

                assert_eq!(cache.lru().map(|(k, v)| (*k, *v)), lru_before);
                assert_eq!(cache.mru().map(|(k, v)| (*k, *v)), mru_before);
            }

            CacheOperation::Has(key) => {
                assert_eq!(cache.has(&key), model.has(key));
            }

            CacheOperation::Delete(key) => {
                let size_before = cache.size();
                let removed = cache.delete(&key);

                assert_eq!(removed, model.delete(key));
                assert!(!cache.has(&key));
                if removed {
                    assert_eq!(cache.size(), size_before - 1);
                }
            }

            CacheOperation::PopLru => {
                assert_eq!(cache.pop_lru(), model.pop_lru());
            }

            CacheOperation::Clear => {
                cache.clear();
                model.clear();
                assert!(cache.is_empty());
                assert_eq!(cache.max_size(), capacity.get());
            }

            CacheOperation::GetOrInsertWith(key, value) => {
                let result = *cache.get_or_insert_with(key, |_| value);
                assert_eq!(result, model.get_or_insert_with(key, value));
                assert_eq!(cache.mru().map(|(k, _)| *k), Some(key));
            }

            CacheOperation::Retain => {
                cache.retain(|k, v| (k ^ *v) % 3 != 0);
                model.retain(|k, v| (k ^ v) % 3 != 0);
            }

            CacheOperation::Entries => {
                let forward: Vec<_> = cache.entries().map(|(k, v)| (*k, *v)).collect();
                let mut backward: Vec<_> =
                    cache.entries().rev().map(|(k, v)| (*k, *v)).collect();
                backward.reverse();

                assert_eq!(forward, backward);
                assert_eq!(cache.keys().len(), forward.len());
                assert_eq!(
                    cache.values().copied().collect::<Vec<_>>(),
                    forward.iter().map(|(_, v)| *v).collect::<Vec<_>>()
                );
            }
        }

        assert!(cache.size() <= cache.max_size());
        assert_eq!(cache.max_size(), capacity.get());
        assert_eq!(cache.is_empty(), cache.size() == 0);
        assert_eq!(
            cache.entries().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
            model.entries()
        );

        #[cfg(debug_assertions)]
        cache.debug_validate();
    }
});

// HashTable property tests over the public API.
//
// Property 1: order independence. Writing the same final key/value set in
//  two different orders yields tables that agree on every lookup.
// Property 2: idempotence. Repeating put(k, v) never changes item_count
//  after the first insertion.
// Property 3: counting. After any replay of puts and deletes, item_count
//  equals the number of distinct keys present in a model map.
// Property 4: resize correctness. Direct resize/resize_up/resize_down calls
//  keep bucket_count within the clamps and every live key retrievable.
use chained_hashtable::{HashTable, HasherKind, NoopObserver, TableConfig};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn table(buckets: usize, hasher: HasherKind) -> HashTable<u32, NoopObserver> {
    HashTable::with_config_and_observer(
        TableConfig::with_default_value(u32::MAX)
            .with_bucket_count(buckets)
            .with_hasher_kind(hasher),
        NoopObserver,
    )
    .unwrap()
}

fn arb_hasher() -> impl Strategy<Value = HasherKind> {
    proptest::sample::select(HasherKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_order_independent(
        entries in proptest::collection::btree_map("[a-d]{1,4}", 0u32..1000, 0..40),
        hasher in arb_hasher(),
        buckets in 1usize..20,
    ) {
        let mut forward = table(buckets, hasher);
        let mut backward = table(buckets, hasher);
        for (k, v) in &entries {
            forward.put(k.as_str(), *v);
        }
        for (k, v) in entries.iter().rev() {
            backward.put(k.as_str(), *v);
        }
        prop_assert_eq!(forward.len(), entries.len());
        prop_assert_eq!(backward.len(), entries.len());
        for (k, v) in &entries {
            prop_assert_eq!(forward.get(k), v);
            prop_assert_eq!(backward.get(k), v);
        }
    }

    #[test]
    fn prop_put_is_idempotent(
        key in "\\PC{0,8}",
        value in any::<u32>(),
        repeats in 1usize..10,
        hasher in arb_hasher(),
    ) {
        let mut t = table(4, hasher);
        t.put("other", 1);
        let first = t.put(key.as_str(), value);
        for _ in 0..repeats {
            prop_assert_eq!(t.put(key.as_str(), value), first);
        }
        prop_assert_eq!(*t.get(&key), value);
    }

    #[test]
    fn prop_count_tracks_distinct_keys(
        ops in proptest::collection::vec((any::<bool>(), "[a-f]{0,3}", any::<u32>()), 1..150),
        hasher in arb_hasher(),
    ) {
        let mut t = table(8, hasher);
        let mut model = BTreeMap::new();
        for (is_put, key, value) in ops {
            if is_put {
                t.put(key.as_str(), value);
                model.insert(key, value);
            } else {
                let (removed, count) = t.pop(&key);
                prop_assert_eq!(removed, model.remove(&key));
                prop_assert_eq!(count, model.len());
            }
            prop_assert_eq!(t.item_count(), model.len());
        }
        let listed: BTreeMap<String, u32> = t.iter().map(|(k, v)| (k.to_owned(), *v)).collect();
        prop_assert_eq!(listed, model);
    }

    #[test]
    fn prop_direct_resizes_keep_data(
        keys in proptest::collection::btree_set("[a-z0-9]{1,6}", 0..60),
        calls in proptest::collection::vec(0u8..3, 1..20),
        hasher in arb_hasher(),
    ) {
        let mut t = table(16, hasher);
        for (i, k) in keys.iter().enumerate() {
            t.put(k.as_str(), i as u32);
        }
        for call in calls {
            let b = match call {
                0 => t.resize(),
                1 => t.resize_up(),
                _ => t.resize_down(),
            };
            prop_assert_eq!(b, t.bucket_count());
            prop_assert!(t.min_bucket_count() <= b && b <= t.max_bucket_count());
            prop_assert_eq!(t.len(), keys.len());
            for (i, k) in keys.iter().enumerate() {
                prop_assert_eq!(*t.get(k), i as u32);
            }
        }
    }
}

#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can call the
// private invariant checker after every step.

use crate::config::TableConfig;
use crate::hash_table::HashTable;
use crate::hasher::HasherKind;
use crate::observer::NoopObserver;
use hashbrown::HashMap;
use proptest::prelude::*;

// Pool-indexed operations shrink toward earlier keys and shorter runs.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Get(usize),
    GetMut(usize, i32),
    Pop(usize),
    Delete(usize),
    Resize,
    ResizeUp,
    ResizeDown,
    Rebind(HasherKind),
    Clear,
}

fn arb_hasher() -> impl Strategy<Value = HasherKind> {
    proptest::sample::select(HasherKind::ALL.to_vec())
}

impl OpI {
    // Calls that resize or rebuild the table outside of put/delete.
    fn is_admin(&self) -> bool {
        matches!(
            self,
            OpI::Resize | OpI::ResizeUp | OpI::ResizeDown | OpI::Rebind(_) | OpI::Clear
        )
    }
}

fn arb_ops(pool_len: usize, admin: bool) -> impl Strategy<Value = Vec<OpI>> {
    let idx = 0..pool_len;
    let op = prop_oneof![
        6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
        3 => idx.clone().prop_map(OpI::Get),
        1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::GetMut(i, d)),
        3 => idx.clone().prop_map(OpI::Pop),
        2 => idx.prop_map(OpI::Delete),
        1 => Just(OpI::Resize),
        1 => Just(OpI::ResizeUp),
        1 => Just(OpI::ResizeDown),
        1 => arb_hasher().prop_map(OpI::Rebind),
        1 => Just(OpI::Clear),
    ];
    proptest::collection::vec(op, 1..120)
        .prop_map(move |ops| ops.into_iter().filter(|op| admin || !op.is_admin()).collect())
}

// Keys drawn from a small pool so collisions, overwrites and deletes of
// present keys are common. Permutations of one word force anagram
// collisions under the naive hasher.
fn arb_pool() -> impl Strategy<Value = Vec<String>> {
    prop_oneof![
        proptest::collection::vec("[a-z]{0,5}", 1..=24),
        Just(vec!["abc", "acb", "bac", "bca", "cab", "cba", "aa", "b"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<String>>()),
    ]
}

fn arb_config() -> impl Strategy<Value = TableConfig<i32>> {
    (
        1usize..40,
        proptest::option::of(1usize..16),
        // Always bounded: a zero growth threshold grows on every call.
        1usize..512,
        1usize..5,
        1usize..5,
        0.0f64..2.0,
        0.0f64..1.0,
        arb_hasher(),
    )
        .prop_map(|(buckets, min, max, up, down, hi, lo, hasher)| {
            TableConfig::with_default_value(-1)
                .with_bucket_count(buckets)
                .with_min_bucket_count(min)
                .with_max_bucket_count(Some(max))
                .with_resize_up_factor(up)
                .with_resize_down_factor(down)
                .with_load_before_resize_up(hi)
                .with_load_before_resize_down(lo)
                .with_hasher_kind(hasher)
        })
}

// Apply one op to both sides and compare the observable results.
fn step(
    sut: &mut HashTable<i32, NoopObserver>,
    model: &mut HashMap<String, i32>,
    pool: &[String],
    op: OpI,
) -> Result<(), TestCaseError> {
    let default = *sut.default_value();
    match op {
        OpI::Put(i, v) => {
            let n = sut.put(pool[i].clone(), v);
            model.insert(pool[i].clone(), v);
            prop_assert_eq!(n, model.len());
        }
        OpI::Get(i) => {
            let want = model.get(&pool[i]).copied().unwrap_or(default);
            prop_assert_eq!(*sut.get(&pool[i]), want);
            prop_assert_eq!(sut.contains_key(&pool[i]), model.contains_key(&pool[i]));
        }
        OpI::GetMut(i, d) => match (sut.get_mut(&pool[i]), model.get_mut(&pool[i])) {
            (Some(a), Some(b)) => {
                *a = a.wrapping_add(d);
                *b = b.wrapping_add(d);
            }
            (None, None) => {}
            (a, b) => prop_assert!(false, "get_mut disagrees: {:?} vs {:?}", a, b),
        },
        OpI::Pop(i) => {
            let got = sut.pop(&pool[i]);
            let want = model.remove(&pool[i]);
            prop_assert_eq!(got, (want, model.len()));
        }
        OpI::Delete(i) => {
            prop_assert_eq!(sut.delete(&pool[i]), model.remove(&pool[i]));
        }
        OpI::Resize => {
            let b = sut.resize();
            prop_assert_eq!(b, sut.bucket_count());
        }
        OpI::ResizeUp => {
            let before = sut.bucket_count();
            prop_assert!(sut.resize_up() >= before);
        }
        OpI::ResizeDown => {
            let before = sut.bucket_count();
            prop_assert!(sut.resize_down() <= before);
        }
        OpI::Rebind(kind) => {
            let before = sut.bucket_count();
            sut.rebind_hasher(kind);
            prop_assert_eq!(sut.hasher(), kind);
            prop_assert_eq!(sut.bucket_count(), before);
        }
        OpI::Clear => {
            sut.clear();
            model.clear();
        }
    }
    Ok(())
}

fn check_contents(
    sut: &HashTable<i32, NoopObserver>,
    model: &HashMap<String, i32>,
) -> Result<(), TestCaseError> {
    sut.assert_invariants();
    prop_assert_eq!(sut.len(), model.len());
    prop_assert_eq!(sut.is_empty(), model.is_empty());
    for (k, v) in model {
        prop_assert_eq!(sut.get(k), v);
    }
    let listed: HashMap<String, i32> = sut.iter().map(|(k, v)| (k.to_owned(), *v)).collect();
    prop_assert_eq!(&listed, model);
    Ok(())
}

// Property: under any valid configuration, HashTable behaves like a map.
// - put/get/pop/delete results match the model; misses yield the default.
// - item_count equals the number of distinct live keys.
// - Structural invariants hold after every step, including direct
//   resize calls and hasher rebinding: clamps respected, no empty chains,
//   every entry in the bucket its key hashes to.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(
        config in arb_config(),
        (pool, ops) in arb_pool().prop_flat_map(|pool| {
            let n = pool.len();
            (Just(pool), arb_ops(n, true))
        })
    ) {
        let mut sut = HashTable::with_config_and_observer(config, NoopObserver).unwrap();
        let mut model: HashMap<String, i32> = HashMap::new();
        for op in ops {
            step(&mut sut, &mut model, &pool, op)?;
            check_contents(&sut, &model)?;
        }
    }
}

// Property: with the default policy (factor 2, thresholds 0.75/0.25) the
// load factor after any insert or delete stays below the growth threshold
// unless the table is pinned at its maximum size.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_default_policy_bounds_load(
        buckets in 1usize..70,
        max in proptest::option::of(1usize..64),
        hasher in arb_hasher(),
        (pool, ops) in arb_pool().prop_flat_map(|pool| {
            let n = pool.len();
            (Just(pool), arb_ops(n, false))
        })
    ) {
        let config = TableConfig::default()
            .with_bucket_count(buckets)
            .with_max_bucket_count(max)
            .with_hasher_kind(hasher);
        let mut sut = HashTable::with_config_and_observer(config, NoopObserver).unwrap();
        let mut model: HashMap<String, i32> = HashMap::new();
        for op in ops {
            step(&mut sut, &mut model, &pool, op)?;
            check_contents(&sut, &model)?;
            if sut.bucket_count() < sut.max_bucket_count() {
                prop_assert!(
                    sut.load_factor() < sut.load_before_resize_up(),
                    "load {} over {} buckets",
                    sut.load_factor(),
                    sut.bucket_count()
                );
            }
        }
    }
}

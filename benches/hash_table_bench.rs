use chained_hashtable::{HashTable, HasherKind, NoopObserver, TableConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn table(hasher: HasherKind) -> HashTable<u64, NoopObserver> {
    HashTable::with_config_and_observer(
        TableConfig::default().with_hasher_kind(hasher),
        NoopObserver,
    )
    .unwrap()
}

fn filled(hasher: HasherKind, seed: u64, n: usize) -> (HashTable<u64, NoopObserver>, Vec<String>) {
    let mut t = table(hasher);
    let keys: Vec<_> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        t.put(k.as_str(), i as u64);
    }
    (t, keys)
}

fn bench_hashers(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_fn");
    let keys: Vec<_> = lcg(3).take(1_000).map(key).collect();
    for kind in HasherKind::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter(|| {
                for k in &keys {
                    black_box(kind.hash(k));
                }
            })
        });
    }
    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_10k");
    for kind in HasherKind::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter_batched(
                || table(kind),
                |mut t| {
                    for (i, x) in lcg(1).take(10_000).enumerate() {
                        t.put(key(x), i as u64);
                    }
                    black_box(t)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    for kind in HasherKind::ALL {
        let (t, keys) = filled(kind, 7, 20_000);
        let mut it = keys.iter().cycle();
        group.bench_function(BenchmarkId::from_parameter(kind), |b| {
            b.iter(|| {
                let k = it.next().unwrap();
                black_box(t.get(k));
            })
        });
    }
    group.finish();
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("get_miss", |b| {
        let (t, _) = filled(HasherKind::Fnv1a, 11, 10_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // generate keys unlikely in map
            let k = key(miss.next().unwrap());
            black_box(t.get(&k));
        })
    });
}

fn bench_drain_shrinks(c: &mut Criterion) {
    c.bench_function("delete_10k_with_shrink", |b| {
        b.iter_batched(
            || filled(HasherKind::Fnv1a, 5, 10_000),
            |(mut t, keys)| {
                for k in &keys {
                    black_box(t.delete(k));
                }
                black_box(t.bucket_count())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_hashers, bench_insert, bench_get_hit, bench_get_miss, bench_drain_shrinks
}
criterion_main!(benches);

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use chainmap::{ChainedMap, TableConfig};
use rand::{Rng, distr::Alphanumeric};
use rustc_hash::FxHashMap;

/// Generates a vector of key-value pairs for benchmarking.
fn generate_data(size: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut rng = rand::rng();
    (0..size)
        .map(|_| {
            let key_len = rng.random_range(1..=25);
            let val_len = rng.random_range(1..=250);
            let key: Vec<u8> = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(key_len)
                .collect();
            let value = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(val_len)
                .collect();
            (key, value)
        })
        .collect()
}

fn presized_map(size: usize) -> ChainedMap {
    ChainedMap::with_config(TableConfig::new().with_initial_capacity(size as u64 * 2))
        .expect("failed to create map")
}

fn benchmark_chain_map(c: &mut Criterion) {
    for &size in &[10_000, 100_000, 1_000_000] {
        let mut group = c.benchmark_group(format!("size={size}"));
        if size >= 1_000_000 {
            group.sample_size(10);
        }

        let data = generate_data(size);

        group.bench_function("ChainedMap - put", |b| {
            b.iter_with_setup(
                || presized_map(size),
                |mut map| {
                    for (k, v) in data.iter() {
                        map.put(black_box(k), black_box(v));
                    }
                },
            );
        });

        let mut map = presized_map(size);
        for (k, v) in data.iter() {
            map.put(k, v);
        }
        group.bench_function("ChainedMap - get", |b| {
            b.iter(|| {
                for (k, _) in data.iter() {
                    black_box(map.get(black_box(k)));
                }
            })
        });

        group.bench_function("FxHashMap - put", |b| {
            b.iter_with_setup(
                || FxHashMap::with_capacity_and_hasher(size, Default::default()),
                |mut map: FxHashMap<Vec<u8>, Vec<u8>>| {
                    for (k, v) in data.iter() {
                        map.insert(black_box(k.clone()), black_box(v.clone()));
                    }
                },
            );
        });

        let fx_map: FxHashMap<Vec<u8>, Vec<u8>> = data.iter().cloned().collect();
        group.bench_function("FxHashMap - get", |b| {
            b.iter(|| {
                for (k, _) in data.iter() {
                    black_box(fx_map.get(black_box(k)));
                }
            })
        });
    }
}

criterion_group!(benches, benchmark_chain_map);
criterion_main!(benches);

use criterion::*;
use rand::distributions::{Alphanumeric, Uniform};
use rand::{thread_rng, Rng};
use tempfile::TempDir;

use std::collections::BTreeMap;

use ledgerkv::{open_store, EngineKind, Store, StoreConfig};

fn open(kind: EngineKind) -> (Box<dyn Store>, TempDir) {
    let dir = TempDir::new().expect("failed to create temporary dir");
    let store = open_store(&StoreConfig::new(kind, dir.path()), None).expect("failed to open store");
    // drop dir after benchmark
    (store, dir)
}

// Unique keys, so a read always sees the value written for it.
fn random_data(n: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut rng = thread_rng();
    let mut data = BTreeMap::new();
    while data.len() < n {
        let len = rng.gen_range(1, 101);
        let key: String = rng.sample_iter(&Alphanumeric).take(len).collect();
        let len = rng.gen_range(1, 1001);
        let val: String = rng.sample_iter(&Alphanumeric).take(len).collect();
        data.insert(key.into_bytes(), val.into_bytes());
    }
    data.into_iter().collect()
}

fn write100(c: &mut Criterion) {
    let data = random_data(100);
    c.bench(
        "write100",
        ParameterizedBenchmark::new(
            "put",
            {
                let data = data.clone();
                move |b, kind| {
                    b.iter_batched(
                        || open(*kind),
                        |(store, dir)| {
                            for (k, v) in data.iter() {
                                store.put(k, v).expect("failed to put");
                            }
                            drop(store);
                            drop(dir);
                        },
                        BatchSize::PerIteration,
                    )
                }
            },
            vec![EngineKind::Sled, EngineKind::Memory],
        )
        .with_function("batch", move |b, kind| {
            b.iter_batched(
                || open(*kind),
                |(store, dir)| {
                    let mut batch = store.new_batch();
                    for (k, v) in data.iter() {
                        batch.put(k, v);
                    }
                    store.apply_batch(batch).expect("failed to apply batch");
                    drop(store);
                    drop(dir);
                },
                BatchSize::PerIteration,
            )
        })
        .sample_size(15),
    );
}

fn read(c: &mut Criterion) {
    let data = random_data(1000);
    let ord: Vec<usize> = thread_rng()
        .sample_iter(&Uniform::new(0, data.len()))
        .take(250)
        .collect();
    c.bench(
        "read250",
        ParameterizedBenchmark::new(
            "get",
            move |b, kind| {
                let (store, _dir) = open(*kind);
                for (k, v) in data.iter() {
                    store.put(k, v).expect("failed to put");
                }
                b.iter(|| {
                    for i in ord.iter() {
                        let (key, val) = &data[*i];
                        assert_eq!(val, &store.get(key).expect("failed to get"));
                    }
                })
            },
            vec![EngineKind::Sled, EngineKind::Memory],
        )
        .sample_size(20),
    );
}

fn seek(c: &mut Criterion) {
    c.bench(
        "seek",
        ParameterizedBenchmark::new(
            "prefix",
            |b, kind| {
                let (store, _dir) = open(*kind);
                for i in 0..1000u32 {
                    let key = format!("block/{:02}/{:04}", i % 16, i);
                    store.put(key.as_bytes(), &i.to_be_bytes()).expect("failed to put");
                }
                b.iter(|| {
                    let mut n = 0;
                    store
                        .seek(b"block/07/", &mut |_, _| n += 1)
                        .expect("failed to seek");
                    assert!(n > 0);
                })
            },
            vec![EngineKind::Sled, EngineKind::Memory],
        )
        .sample_size(20),
    );
}

criterion_group!(benches, write100, read, seek);
criterion_main!(benches);

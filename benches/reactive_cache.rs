use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use oxigraph::model::{GraphName, Literal, NamedNode, Quad};
use oxigraph::store::Store;
use quint_store::{ReactiveQuintStore, StoreHandle};
use std::sync::Arc;

const DATASETS: usize = 10;
const QUADS_PER_DATASET: u64 = 1000;

fn dataset_uri(i: usize) -> String {
    format!("http://example.org/dataset{}", i)
}

fn sensor_store(seed: u64) -> StoreHandle {
    let store = Store::new().unwrap();
    let temperature = NamedNode::new("http://example.org/temperature").unwrap();
    for i in 0..QUADS_PER_DATASET {
        let sensor = NamedNode::new(format!("http://example.org/sensor{}", i % 50)).unwrap();
        store
            .insert(&Quad::new(
                sensor,
                temperature.clone(),
                Literal::new_simple_literal(format!("{}", 20 + (i + seed) % 10)),
                GraphName::DefaultGraph,
            ))
            .unwrap();
    }
    Arc::new(store)
}

fn populated_cache(queries_per_dataset: usize) -> ReactiveQuintStore {
    let mut cache = ReactiveQuintStore::new();
    for d in 0..DATASETS {
        cache.update(&dataset_uri(d), sensor_store(d as u64));
    }
    for d in 0..DATASETS {
        let uri = dataset_uri(d);
        for q in 0..queries_per_dataset {
            let sensor = format!("http://example.org/sensor{}", q);
            cache.get_reactive(Some(&sensor), None, None, None, Some(&uri));
        }
    }
    cache.get_reactive(None, Some("http://example.org/temperature"), None, None, None);
    cache
}

fn bench_cache_hit(c: &mut Criterion) {
    let mut cache = populated_cache(50);
    let uri = dataset_uri(DATASETS - 1);
    c.bench_function("get_reactive_hit", |b| {
        b.iter(|| {
            black_box(cache.get_reactive(
                Some("http://example.org/sensor49"),
                None,
                None,
                None,
                Some(&uri),
            ))
        })
    });
}

fn bench_update_fan_out(c: &mut Criterion) {
    let uri = dataset_uri(0);
    c.bench_function("update_refreshes_dataset_and_wildcard", |b| {
        b.iter_batched(
            || (populated_cache(10), sensor_store(7)),
            |(mut cache, store)| {
                cache.update(&uri, store);
                cache
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_cache_hit, bench_update_fan_out);
criterion_main!(benches);

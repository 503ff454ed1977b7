#![allow(missing_docs)]

use donaton_di::{Container, Inject, abstraction, error::Error};
use criterion::{criterion_group, criterion_main, Criterion};
use std::{
    hint::black_box,
    sync::{Arc, RwLock}
};

trait Store: Send + Sync {
    fn count(&self) -> usize;
}

#[derive(Default, Debug)]
struct Cache(RwLock<Vec<i32>>);

impl Store for Cache {
    fn count(&self) -> usize {
        self.0.read().unwrap().len()
    }
}

abstraction!(dyn Store => Cache);

struct Reader {
    store: Arc<dyn Store>
}

impl Inject for Reader {
    fn inject(container: &Container) -> Result<Self, Error> {
        Ok(Self { store: container.resolve()? })
    }
}

fn benchmark(c: &mut Criterion) {
    let container = Container::new();
    container.bind_singleton::<dyn Store, Cache>();
    container.bind::<Cache, Cache>();
    container.bind::<Reader, Reader>();
    container.bind_instance(Arc::new(42_u64));

    c.bench_function("singleton", |b| b.iter(
        || black_box(container.resolve::<dyn Store>().unwrap())
    ));
    c.bench_function("instance", |b| b.iter(
        || black_box(container.resolve::<u64>().unwrap())
    ));
    c.bench_function("transient", |b| b.iter(
        || black_box(container.resolve::<Cache>().unwrap())
    ));
    c.bench_function("auto-wired", |b| b.iter(
        || black_box(container.resolve::<Reader>().unwrap().store.count())
    ));
}

criterion_group!(benches, benchmark);
criterion_main!(benches);

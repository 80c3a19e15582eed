use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use indexmap::IndexMap;

use cadence_core::key::Key;
use cadence_core::order::{resolve, Schedulable};

struct Item {
    key: Key,
    after: Vec<Key>,
    before: Vec<Key>,
}

impl Schedulable for Item {
    fn key(&self) -> &Key {
        &self.key
    }

    fn after(&self) -> &[Key] {
        &self.after
    }

    fn before(&self) -> &[Key] {
        &self.before
    }
}

/// A chain: task i runs after task i-1.
fn chain(len: usize) -> IndexMap<Key, Item> {
    (0..len)
        .map(|i| {
            let key = Key::new(format!("task-{i}"));
            let after = if i == 0 {
                Vec::new()
            } else {
                vec![Key::new(format!("task-{}", i - 1))]
            };
            (
                key.clone(),
                Item {
                    key,
                    after,
                    before: Vec::new(),
                },
            )
        })
        .collect()
}

/// A fan: every task runs after one shared root, otherwise unconstrained.
fn fan(len: usize) -> IndexMap<Key, Item> {
    std::iter::once((
        Key::new("root"),
        Item {
            key: Key::new("root"),
            after: Vec::new(),
            before: Vec::new(),
        },
    ))
    .chain((0..len).map(|i| {
        let key = Key::new(format!("task-{i}"));
        (
            key.clone(),
            Item {
                key,
                after: vec![Key::new("root")],
                before: Vec::new(),
            },
        )
    }))
    .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("resolve chain (256)", |b| {
        let items = chain(256);
        b.iter(|| black_box(resolve(&items).unwrap()));
    });

    c.bench_function("resolve fan (256)", |b| {
        let items = fan(256);
        b.iter(|| black_box(resolve(&items).unwrap()));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

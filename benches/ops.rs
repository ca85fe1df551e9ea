//! Micro-benchmarks for the hot range-set operations.
//!
//! Run with:
//! ```bash
//! cargo bench --bench ops
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rangeset_rs::set::IntSet;

/// Build a reproducible batch of sets with up to three intervals each.
fn random_sets(count: usize, seed: u64) -> Vec<IntSet> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut set = IntSet::empty();
            for _ in 0..rng.random_range(1..=3) {
                let a = rng.random_range(-1_000_000..=1_000_000);
                let b = rng.random_range(-1_000_000..=1_000_000);
                set = set.unite(&IntSet::range(a.min(b), a.max(b)));
            }
            set
        })
        .collect()
}

fn bench_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("rangeset/lattice");
    let sets = random_sets(64, 42);

    group.bench_function("unite", |b| {
        b.iter(|| {
            let mut acc = IntSet::empty();
            for set in &sets {
                acc = acc.unite(set);
            }
            acc
        })
    });

    group.bench_function("intersect", |b| {
        b.iter(|| {
            let mut hits = 0;
            for pair in sets.chunks(2) {
                if !pair[0].intersect(&pair[1]).is_empty() {
                    hits += 1;
                }
            }
            hits
        })
    });

    group.bench_function("subtract", |b| {
        b.iter(|| {
            let mut acc = IntSet::ALL;
            for set in &sets {
                acc = acc.subtract(set);
            }
            acc
        })
    });

    group.finish();
}

fn bench_transfers(c: &mut Criterion) {
    let mut group = c.benchmark_group("rangeset/transfers");
    let sets = random_sets(64, 7);

    for is_long in [true, false] {
        group.bench_with_input(BenchmarkId::new("plus", is_long), &is_long, |b, &is_long| {
            b.iter(|| {
                let mut acc = IntSet::point(0);
                for set in &sets {
                    acc = acc.plus(set, is_long);
                }
                acc
            })
        });
    }

    group.bench_function("bitwise_and", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(sets.len() / 2);
            for pair in sets.chunks(2) {
                out.push(pair[0].bitwise_and(&pair[1]));
            }
            out
        })
    });

    group.bench_function("div", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(sets.len() / 2);
            for pair in sets.chunks(2) {
                out.push(pair[0].div(&pair[1], true));
            }
            out
        })
    });

    group.finish();
}

criterion_group!(benches, bench_lattice, bench_transfers);
criterion_main!(benches);

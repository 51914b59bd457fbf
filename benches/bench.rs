#![allow(missing_docs)]

use block_merkle::{Keccak256, MerkleTree, Sha256};
use criterion::{
    BenchmarkGroup, Criterion, criterion_group, criterion_main, measurement::WallTime,
};
use std::{hint::black_box, time::Duration};

/// Benchmarks building a tree and computing its root from scratch.
pub fn full_root(c: &mut Criterion) {
    let counts = [100u64, 1000, 10000];

    let mut g = group(c, "full_root");
    for count in counts {
        let blocks = blocks(count);

        g.throughput(criterion::Throughput::Elements(count));
        g.bench_function(criterion::BenchmarkId::new("keccak256", count), |b| {
            b.iter(|| {
                let mut tree = MerkleTree::with_capacity(Keccak256, 2 * count as usize);
                tree.extend_blocks(0, &blocks).unwrap();
                black_box(tree.root().unwrap())
            })
        });
        g.bench_function(criterion::BenchmarkId::new("sha256", count), |b| {
            b.iter(|| {
                let mut tree = MerkleTree::with_capacity(Sha256, 2 * count as usize);
                tree.extend_blocks(0, &blocks).unwrap();
                black_box(tree.root().unwrap())
            })
        });
    }
}

/// Benchmarks overwriting a single block of a large tree and recomputing the root.
pub fn incremental_root(c: &mut Criterion) {
    let counts = [1000u64, 100_000];

    let mut g = group(c, "incremental_root");
    for count in counts {
        let mut tree = MerkleTree::with_capacity(Keccak256, 2 * count as usize);
        tree.extend_blocks(0, blocks(count)).unwrap();
        tree.root().unwrap();

        let mut index = 0;
        g.bench_function(criterion::BenchmarkId::new("leaves", count), |b| {
            b.iter(|| {
                index = (index + 7919) % count;
                tree.set_block_data(index, &index.to_le_bytes()).unwrap();
                black_box(tree.root().unwrap())
            })
        });
    }
}

fn group<'c>(c: &'c mut Criterion, name: &str) -> BenchmarkGroup<'c, WallTime> {
    let mut g = c.benchmark_group(name);
    g.warm_up_time(Duration::from_secs(1));
    g.noise_threshold(0.02);
    g
}

fn blocks(count: u64) -> Vec<[u8; 8]> {
    (0..count).map(u64::to_be_bytes).collect()
}

criterion_group!(benches, full_root, incremental_root);
criterion_main!(benches);

//! Benchmarks for queue insertion and whole-list transforms.
//!
//! Run with: cargo bench
//!
//! Storage is pre-allocated so the insert numbers measure linking, not
//! arena growth.

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use nexus_ringq::{OwnedQueue, Queue, QueueChain, QueueStorage};

const LEN: usize = 10_000;

fn random_queue(seed: u64) -> OwnedQueue<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut queue = OwnedQueue::with_capacity(LEN);
    queue
        .try_extend((0..LEN).map(|_| rng.random_range(0..LEN as u64)))
        .unwrap();
    queue
}

// ============================================================================
// Insert / remove
// ============================================================================

fn bench_insert_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_remove");
    group.throughput(Throughput::Elements(LEN as u64));

    let mut queue: OwnedQueue<u64> = OwnedQueue::with_capacity(LEN);

    group.bench_function("insert_tail+remove_head", |b| {
        b.iter(|| {
            for i in 0..LEN as u64 {
                black_box(queue.insert_tail(i).unwrap());
            }
            while let Some(v) = queue.remove_head() {
                black_box(v);
            }
        });
    });

    group.bench_function("insert_head+remove_tail", |b| {
        b.iter(|| {
            for i in 0..LEN as u64 {
                black_box(queue.insert_head(i).unwrap());
            }
            while let Some(v) = queue.remove_tail() {
                black_box(v);
            }
        });
    });

    group.finish();
}

// ============================================================================
// Transforms
// ============================================================================

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transforms");
    group.throughput(Throughput::Elements(LEN as u64));

    group.bench_function("sort", |b| {
        b.iter_batched(
            || random_queue(1),
            |mut queue| {
                queue.sort(false);
                queue
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("reverse", |b| {
        let mut queue = random_queue(2);
        b.iter(|| queue.reverse());
    });

    group.bench_function("reverse_k/8", |b| {
        let mut queue = random_queue(3);
        b.iter(|| queue.reverse_k(black_box(8)));
    });

    group.bench_function("swap_adjacent", |b| {
        let mut queue = random_queue(4);
        b.iter(|| queue.swap_adjacent());
    });

    group.bench_function("keep_ascending", |b| {
        b.iter_batched(
            || random_queue(5),
            |mut queue| black_box(queue.keep_ascending()),
            BatchSize::LargeInput,
        );
    });

    group.bench_function("delete_duplicates/sorted", |b| {
        b.iter_batched(
            || {
                let mut queue = random_queue(6);
                queue.sort(false);
                queue
            },
            |mut queue| black_box(queue.delete_duplicates()),
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_shuffle(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle");

    for len in [100usize, 1_000] {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_function(format!("{len}"), |b| {
            let mut rng = SmallRng::seed_from_u64(7);
            let mut queue: OwnedQueue<usize> = OwnedQueue::with_capacity(len);
            queue.try_extend(0..len).unwrap();
            b.iter(|| queue.shuffle(&mut rng));
        });
    }

    group.finish();
}

fn bench_merge_all(c: &mut Criterion) {
    const QUEUES: usize = 8;

    let mut group = c.benchmark_group("merge_all");
    group.throughput(Throughput::Elements(LEN as u64));

    group.bench_function(format!("{QUEUES}x{}", LEN / QUEUES), |b| {
        b.iter_batched(
            || {
                let mut storage: QueueStorage<u64> = QueueStorage::with_capacity(LEN);
                let mut chain = QueueChain::new();
                for q in 0..QUEUES {
                    let mut queue = Queue::new();
                    for i in 0..(LEN / QUEUES) as u64 {
                        queue
                            .insert_tail(&mut storage, i * QUEUES as u64 + q as u64)
                            .unwrap();
                    }
                    chain.push(queue);
                }
                (storage, chain)
            },
            |(mut storage, mut chain)| {
                black_box(chain.merge_all(&mut storage, false));
                (storage, chain)
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_remove,
    bench_transforms,
    bench_shuffle,
    bench_merge_all
);
criterion_main!(benches);

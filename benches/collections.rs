use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arena_collections::{MinHeap, OwnedLinkedList, OwnedXorList};

const N: u64 = 1024;

/// XOR list vs conventional doubly linked list: fill from the back, drain
/// from the front. Measures the cost of the combined-link arithmetic
/// against two plain key writes.
fn bench_list_ends(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_push_pop");

    group.bench_function("xor_list", |b| {
        b.iter(|| {
            let mut list = OwnedXorList::with_capacity(N as usize);
            for i in 0..N {
                list.push_back(black_box(i));
            }
            while let Some(v) = list.pop_front() {
                black_box(v);
            }
        })
    });

    group.bench_function("linked_list", |b| {
        b.iter(|| {
            let mut list = OwnedLinkedList::with_capacity(N as usize);
            for i in 0..N {
                list.push_back(black_box(i));
            }
            while let Some(v) = list.pop_front() {
                black_box(v);
            }
        })
    });

    group.finish();
}

fn bench_list_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_middle_access");

    let xor: OwnedXorList<u64> = (0..N).collect();
    let linked: OwnedLinkedList<u64> = (0..N).collect();

    group.bench_function("xor_list", |b| {
        b.iter(|| black_box(xor.get(black_box(N as usize / 2))))
    });

    group.bench_function("linked_list", |b| {
        b.iter(|| black_box(linked.get(black_box(N as usize / 2))))
    });

    group.finish();
}

fn bench_heap_churn(c: &mut Criterion) {
    c.bench_function("min_heap_push_pop", |b| {
        b.iter(|| {
            let mut heap = MinHeap::with_capacity(N as usize);
            for i in (0..N).rev() {
                heap.push(black_box(i)).unwrap();
            }
            while let Some(v) = heap.pop() {
                black_box(v);
            }
        })
    });
}

criterion_group!(
    benches,
    bench_list_ends,
    bench_list_traversal,
    bench_heap_churn
);
criterion_main!(benches);

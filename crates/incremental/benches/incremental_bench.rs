//! Benchmarks for mailgraph-incremental.
//!
//! Target: moving a window by a few rows costs the same regardless of
//! how large the window is.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mailgraph_incremental::{
    diff_dataset, diff_pure_dataset, Dataset, DatasetDiff, DiffSwitch, DynamicSlice, FnArray,
    GroupDiffBy,
};

fn make_dataset(size: u64, offset: u64) -> Dataset<u64, u64> {
    (offset..offset + size).map(|i| (i, i * 7)).collect()
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/apply");

    for size in [10u64, 100, 1000] {
        let diff = DatasetDiff::from_dataset(&make_dataset(size, 0));
        group.bench_with_input(BenchmarkId::new("insert_all", size), &diff, |b, diff| {
            b.iter(|| {
                let mut data = Dataset::new();
                diff.apply(&mut data);
                black_box(data)
            })
        });
    }

    group.finish();
}

fn bench_differ(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/differ");

    for size in [100u64, 1000, 10000] {
        let prev = make_dataset(size, 0);
        let cur = make_dataset(size, size / 10);
        group.bench_with_input(BenchmarkId::new("always", size), &(&prev, &cur), |b, &(p, n)| {
            b.iter(|| diff_dataset(black_box(p), black_box(n)))
        });
        group.bench_with_input(BenchmarkId::new("on_change", size), &(&prev, &cur), |b, &(p, n)| {
            b.iter(|| diff_pure_dataset(black_box(p), black_box(n)))
        });
    }

    group.finish();
}

fn bench_slice_shift(c: &mut Criterion) {
    let mut group = c.benchmark_group("slice/shift_by_one");

    for width in [10i64, 1000, 100000] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            let mut slice = DynamicSlice::new(FnArray::new(1_000_000, |i| (i, i)));
            slice.update((0, width));
            let mut begin = 0i64;
            b.iter(|| {
                begin = (begin + 1) % 500_000;
                black_box(slice.update((begin, begin + width)))
            })
        });
    }

    group.finish();
}

fn bench_switch(c: &mut Criterion) {
    let mut group = c.benchmark_group("switch/on_inner");

    for size in [100u64, 1000] {
        let a = make_dataset(size, 0);
        let b_snapshot = make_dataset(size, size / 2);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            let mut switch = DiffSwitch::new(Dataset::new(), diff_dataset::<u64, u64>);
            b.iter(|| {
                let gen = switch.switch();
                black_box(switch.on_inner(gen, &a));
                let gen = switch.switch();
                black_box(switch.on_inner(gen, &b_snapshot))
            })
        });
    }

    group.finish();
}

fn bench_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("group/apply");

    for size in [100u64, 1000] {
        let diff = DatasetDiff::from_dataset(&make_dataset(size, 0));
        group.bench_with_input(BenchmarkId::new("insert_all", size), &diff, |b, diff| {
            b.iter(|| {
                let mut grouping = GroupDiffBy::new(|v: &u64| v % 16);
                black_box(grouping.apply(diff))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_apply,
    bench_differ,
    bench_slice_shift,
    bench_switch,
    bench_group
);
criterion_main!(benches);

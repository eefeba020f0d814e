//! Benchmarks for hexweave topology
//!
//! Measures performance of:
//! - Growing a disk point by point
//! - Toggling a bridge cell (split and rejoin)
//! - Closing and opening a hole in a large ring
//! - Perimeter and hole queries
//! - Border node classification and spiral conversion

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hexweave_topology::{
    point_to_spiral, spiral_to_point, total_slots_through, BorderNode, Edges, HexPoint,
    LatticeSet, Spiral, SpiralIndex,
};

fn disk(radius: u64) -> LatticeSet {
    Spiral::disk(HexPoint::ORIGIN, radius).collect()
}

/// Benchmark building a filled disk in spiral order
fn bench_grow_disk(c: &mut Criterion) {
    let mut group = c.benchmark_group("grow_disk");

    for &radius in &[4u64, 16, 32] {
        group.throughput(Throughput::Elements(total_slots_through(radius)));
        group.bench_with_input(BenchmarkId::new("radius", radius), &radius, |b, &r| {
            b.iter(|| disk(black_box(r)).len())
        });
    }
    group.finish();
}

/// Benchmark removing and re-adding the cell joining two disks
fn bench_bridge_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("bridge_toggle");

    for &radius in &[4u64, 16, 32] {
        let offset = 2 * radius as i64 + 2;
        let mut set = disk(radius);
        set.merge(disk(radius).translate(HexPoint::new(offset, 0)))
            .expect("disks are disjoint");
        let bridge = HexPoint::new(radius as i64 + 1, 0);
        set.insert(bridge);

        group.bench_with_input(BenchmarkId::new("radius", radius), &bridge, |b, &p| {
            b.iter(|| {
                set.remove(black_box(p));
                set.insert(black_box(p));
            })
        });
    }
    group.finish();
}

/// Benchmark sealing and reopening a ring around a hole
fn bench_hole_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("hole_toggle");

    for &radius in &[4u64, 16, 32] {
        let mut set: LatticeSet = Spiral::rings(radius, radius).collect();
        let gap = HexPoint::new(0, -(radius as i64));
        set.remove(gap);

        group.bench_with_input(BenchmarkId::new("radius", radius), &gap, |b, &p| {
            b.iter(|| {
                set.insert(black_box(p));
                set.remove(black_box(p));
            })
        });
    }
    group.finish();
}

/// Benchmark ordered perimeter and hole extraction
fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    for &radius in &[4u64, 16, 32] {
        let mut set = disk(radius);
        set.remove(HexPoint::ORIGIN);
        group.bench_with_input(BenchmarkId::new("perimeter", radius), &set, |b, s| {
            b.iter(|| s.perimeter().map(|p| p.len()))
        });
        group.bench_with_input(BenchmarkId::new("holes", radius), &set, |b, s| {
            b.iter(|| s.holes().map(|h| h.len()))
        });
    }
    group.finish();
}

/// Benchmark translating a shape and testing the copy against it
fn bench_translate_overlap(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate_overlap");

    for &radius in &[4u64, 16] {
        let set = disk(radius);
        let offset = HexPoint::new(2 * radius as i64 + 1, 0);
        group.bench_with_input(BenchmarkId::new("radius", radius), &set, |b, s| {
            b.iter(|| {
                let moved = s.translate(black_box(offset));
                (moved.overlaps(s), moved.adjacent_to(s))
            })
        });
    }
    group.finish();
}

/// Benchmark border node classification against the lookup table
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(64));

    group.bench_function("computed", |b| {
        b.iter(|| {
            (0..64u8)
                .map(|bits| BorderNode::classify(Edges::from_bits(black_box(bits))).concavity)
                .sum::<i8>()
        })
    });
    group.bench_function("table", |b| {
        b.iter(|| {
            (0..64u8)
                .map(|bits| BorderNode::of(Edges::from_bits(black_box(bits))).concavity)
                .sum::<i8>()
        })
    });
    group.finish();
}

/// Benchmark spiral round-trip conversion
fn bench_spiral_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("spiral_roundtrip");

    for &index in &[0u64, 100, 10_000, 1_000_000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(index), &index, |b, &idx| {
            b.iter(|| point_to_spiral(spiral_to_point(SpiralIndex(black_box(idx)))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_grow_disk,
    bench_bridge_toggle,
    bench_hole_toggle,
    bench_queries,
    bench_translate_overlap,
    bench_classify,
    bench_spiral_roundtrip,
);

criterion_main!(benches);

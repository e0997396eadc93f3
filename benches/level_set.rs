//! Benchmarks for level-set extraction
//!
//! Author: Moroya Sakamoto

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use levelset::prelude::*;

fn sphere(p: Vec3) -> f32 {
    1.0 - p.length()
}

fn gyroid(p: Vec3) -> f32 {
    let q = p * 8.0;
    0.4 - (q.x.sin() * q.y.cos() + q.y.sin() * q.z.cos() + q.z.sin() * q.x.cos()).abs()
}

fn bench_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("sphere");
    let bounds = Aabb::new(Vec3::splat(-1.5), Vec3::splat(1.5));

    for edge_length in [0.2, 0.1, 0.05] {
        group.bench_with_input(
            BenchmarkId::from_parameter(edge_length),
            &edge_length,
            |b, &edge_length| {
                let config = LevelSetConfig::new(edge_length);
                b.iter(|| level_set(sphere, black_box(bounds), &config).unwrap())
            },
        );
    }

    group.finish();
}

fn bench_gyroid(c: &mut Criterion) {
    let mut group = c.benchmark_group("gyroid");
    group.sample_size(20);
    let bounds = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));

    // High surface area per volume: stresses the table sizing heuristic.
    group.bench_function("edge_0.05", |b| {
        let config = LevelSetConfig::new(0.05);
        b.iter(|| level_set(gyroid, black_box(bounds), &config).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_sphere, bench_gyroid);
criterion_main!(benches);

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
// criterion_group!/criterion_main! expand to undocumented functions that cannot
// carry #[allow]; suppress at crate level.
#![allow(missing_docs)]
//! Broad-phase benchmarks: BVH build and query against the all-pairs baseline.
//!
//! ```sh
//! cargo bench --package cyclone-benches --bench bvh_broad_phase
//! ```
use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use cyclone_core::{BodyId, Handle, Vec3};
use cyclone_geom::{AllPairs, BoundingSphere, BroadPhase, Bvh};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZES: [usize; 4] = [16, 128, 512, 2_048];

/// Spheres scattered through a cube whose side grows with `n`, so the
/// expected overlap count per body stays roughly constant.
fn scatter(n: usize) -> Vec<(BodyId, BoundingSphere)> {
    let mut rng = StdRng::seed_from_u64(0x00C7_C10E);
    let side = (n as f64).cbrt() * 4.0;
    (0..n)
        .map(|i| {
            let centre = Vec3::new(
                rng.gen_range(-side..side),
                rng.gen_range(-side..side),
                rng.gen_range(-side..side),
            );
            let radius = rng.gen_range(0.5..1.5);
            (Handle::from_raw(i as u32), BoundingSphere::new(centre, radius))
        })
        .collect()
}

fn build<B: BroadPhase + Default>(items: &[(BodyId, BoundingSphere)]) -> B {
    let mut bp = B::default();
    for (body, volume) in items {
        bp.upsert(*body, *volume);
    }
    bp
}

fn bench_bvh_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("bvh_build");
    group
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(5))
        .sample_size(50);
    for &n in &SIZES {
        let items = scatter(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &items, |b, items| {
            b.iter(|| black_box(build::<Bvh>(items)));
        });
    }
    group.finish();
}

fn bench_potential_contacts(c: &mut Criterion) {
    let mut group = c.benchmark_group("potential_contacts");
    group
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(5))
        .sample_size(50);
    for &n in &SIZES {
        let items = scatter(n);
        let bvh = build::<Bvh>(&items);
        let all_pairs = build::<AllPairs>(&items);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("bvh", n), &bvh, |b, bvh| {
            let mut out = Vec::new();
            b.iter(|| {
                out.clear();
                black_box(bvh.potential_contacts(usize::MAX, &mut out))
            });
        });
        group.bench_with_input(BenchmarkId::new("all_pairs", n), &all_pairs, |b, bp| {
            let mut out = Vec::new();
            b.iter(|| {
                out.clear();
                black_box(bp.potential_contacts(usize::MAX, &mut out))
            });
        });
    }
    group.finish();
}

fn bench_bvh_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("bvh_update");
    for &n in &SIZES {
        let items = scatter(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &items, |b, items| {
            b.iter_batched(
                || build::<Bvh>(items),
                |mut bvh| {
                    // Nudge every body once, as a world step would.
                    for (body, volume) in items {
                        let moved = BoundingSphere::new(
                            volume.centre() + Vec3::new(0.25, 0.0, 0.0),
                            volume.radius(),
                        );
                        bvh.update(*body, moved);
                    }
                    black_box(bvh)
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_bvh_build,
    bench_potential_contacts,
    bench_bvh_update
);
criterion_main!(benches);

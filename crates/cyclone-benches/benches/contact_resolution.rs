// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
// criterion_group!/criterion_main! expand to undocumented functions that cannot
// carry #[allow]; suppress at crate level.
#![allow(missing_docs)]
#![allow(clippy::expect_used)]
//! Iterative contact resolver cost as the contact count grows.
//!
//! Every contact shares a particle with its neighbours, so each pass also
//! pays for penetration updates on adjacent contacts.
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use cyclone_core::{Particle, ParticleContact, ParticleContactResolver, ParticleSet, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DT: f64 = 1.0 / 60.0;

/// A row of `n + 1` particles with `n` closing, interpenetrating contacts
/// between neighbours.
fn chain(n: usize) -> (ParticleSet, Vec<ParticleContact>) {
    let mut rng = StdRng::seed_from_u64(0x0C0A_7AC7);
    let mut set = ParticleSet::new();
    let handles: Vec<_> = (0..=n)
        .map(|i| {
            let velocity = Vec3::new(rng.gen_range(-2.0..2.0), 0.0, 0.0);
            let particle = Particle::new(Vec3::new(i as f64 * 0.9, 0.0, 0.0), 1.0)
                .expect("unit mass is valid")
                .with_velocity(velocity);
            set.insert(particle)
        })
        .collect();
    let contacts = handles
        .windows(2)
        .map(|pair| {
            ParticleContact::new(
                pair[1],
                Some(pair[0]),
                Vec3::new(1.0, 0.0, 0.0),
                rng.gen_range(0.0..0.2),
                0.5,
            )
        })
        .collect();
    (set, contacts)
}

fn bench_resolve_contacts(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_contacts");
    for &n in &[8usize, 64, 256, 1_024] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let resolver = ParticleContactResolver::new(n * 2);
            b.iter_batched(
                || chain(n),
                |(mut set, mut contacts)| {
                    let used = resolver
                        .resolve_contacts(&mut contacts, &mut set, DT)
                        .expect("positive duration");
                    black_box((used, set))
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve_contacts);
criterion_main!(benches);

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! State hashing for reproducibility checks.
//!
//! Determinism contract
//! - The hash is a BLAKE3 digest over a canonical byte stream of every entry
//!   in the store, visited in ascending handle order.
//! - Every `Real` is encoded as its IEEE-754 bit pattern in little-endian
//!   byte order, so two runs hash equal only if their state is bit-identical.
//! - The entry count (8-byte little-endian) is written first to separate
//!   stores of different sizes whose prefixes match.
//! - Flags are encoded as a single byte (`0` or `1`).
//!
//! Notes
//! - Force accumulators are excluded: they are empty between steps and their
//!   contents depend on when the caller samples.
//! - Changing the field order or encoding changes every hash and must be
//!   treated as a breaking change.

use blake3::Hasher;

use crate::body::RigidBody;
use crate::handle::{BodySet, ParticleSet};
use crate::math::{Mat3, Real, Vec3};

/// Canonical 256-bit state digest.
pub type Hash = [u8; 32];

fn put_real(hasher: &mut Hasher, value: Real) {
    hasher.update(&value.to_bits().to_le_bytes());
}

fn put_vec3(hasher: &mut Hasher, v: &Vec3) {
    put_real(hasher, v.x);
    put_real(hasher, v.y);
    put_real(hasher, v.z);
}

fn put_mat3(hasher: &mut Hasher, m: &Mat3) {
    for value in m.to_array() {
        put_real(hasher, value);
    }
}

fn put_len(hasher: &mut Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}

/// Hashes position, velocity, acceleration, damping and inverse mass of
/// every particle.
pub fn particle_state_hash(particles: &ParticleSet) -> Hash {
    let mut hasher = Hasher::new();
    put_len(&mut hasher, particles.len());
    for (_, p) in particles.iter() {
        put_vec3(&mut hasher, &p.position);
        put_vec3(&mut hasher, &p.velocity);
        put_vec3(&mut hasher, &p.acceleration);
        put_real(&mut hasher, p.damping);
        put_real(&mut hasher, p.inverse_mass);
    }
    hasher.finalize().into()
}

fn put_body(hasher: &mut Hasher, b: &RigidBody) {
    put_vec3(hasher, &b.position());
    let q = b.orientation();
    for value in q.to_array() {
        put_real(hasher, value);
    }
    put_vec3(hasher, &b.velocity());
    put_vec3(hasher, &b.rotation());
    put_vec3(hasher, &b.acceleration());
    put_real(hasher, b.inverse_mass());
    put_mat3(hasher, &b.inverse_inertia_tensor());
    put_real(hasher, b.linear_damping());
    put_real(hasher, b.angular_damping());
    put_real(hasher, b.motion());
    hasher.update(&[u8::from(b.is_awake()), u8::from(b.can_sleep())]);
}

/// Hashes the kinematic, mass and sleep state of every rigid body.
pub fn body_state_hash(bodies: &BodySet) -> Hash {
    let mut hasher = Hasher::new();
    put_len(&mut hasher, bodies.len());
    for (_, b) in bodies.iter() {
        put_body(&mut hasher, b);
    }
    hasher.finalize().into()
}

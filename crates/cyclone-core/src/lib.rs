// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! cyclone-core: deterministic particle and rigid-body physics.
//!
//! The crate covers integration of point masses and rigid bodies, force
//! generators driven through registries, particle contacts with an iterative
//! resolver, cable and rod links, and two worlds that run the fixed step
//! pipeline. Broad-phase collision lives in `cyclone-geom`.
//!
//! Everything is single-threaded and synchronous. Given the same inputs and
//! the same sequence of calls, every step produces bit-identical state; the
//! [`snapshot`] hashes exist to check exactly that.
#![forbid(unsafe_code)]

pub mod math;
pub mod snapshot;

mod body;
mod config;
mod error;
mod fgen;
mod handle;
mod particle;
mod pcontacts;
mod pfgen;
mod plinks;
mod pworld;
mod registry;
mod world;

// Re-exports for stable public API
pub use body::RigidBody;
pub use config::{WorldConfig, DEFAULT_MAX_CONTACTS, DEFAULT_SLEEP_EPSILON};
pub use error::PhysicsError;
pub use fgen::{Aero, AeroControl, BodyForceRegistry, Buoyancy, Gravity, Spring};
pub use handle::{BodyId, BodySet, Handle, ParticleId, ParticleSet, Store};
pub use math::{Mat3, Mat4, Quat, Real, Vec3};
pub use particle::Particle;
pub use pcontacts::{ParticleContact, ParticleContactResolver};
pub use pfgen::{
    ParticleAnchoredBungee, ParticleAnchoredSpring, ParticleBungee, ParticleBuoyancy,
    ParticleDrag, ParticleForceGenerator, ParticleForceRegistry, ParticleGravity,
    ParticleSpring,
};
pub use plinks::{
    ParticleCable, ParticleCableConstraint, ParticleContactGenerator, ParticleRod,
    ParticleRodConstraint,
};
pub use pworld::{GroundContacts, ParticleWorld, StepReport};
pub use registry::{ForceGenerator, ForceRegistry, GeneratorId};
pub use snapshot::{body_state_hash, particle_state_hash, Hash};
pub use world::World;

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Links that constrain particles by generating contacts: cables and rods,
//! between two particles or between a particle and a fixed anchor.

use crate::handle::{ParticleId, ParticleSet};
use crate::math::{Real, Vec3};
use crate::pcontacts::ParticleContact;

/// Source of particle contacts for one simulation step.
pub trait ParticleContactGenerator {
    /// Writes up to `contacts.len()` contacts and returns how many were
    /// written.
    fn add_contact(&self, particles: &ParticleSet, contacts: &mut [ParticleContact]) -> usize;
}

/// Positions of two linked particles, if both exist.
fn link_positions(particles: &ParticleSet, link: [ParticleId; 2]) -> Option<(Vec3, Vec3)> {
    let a = particles.get(link[0])?.position;
    let b = particles.get(link[1])?.position;
    Some((a, b))
}

/// Cable joining two particles: a contact appears once it is taut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleCable {
    /// Linked particles.
    pub particles: [ParticleId; 2],
    /// Length beyond which the cable pulls back.
    pub max_length: Real,
    /// Bounciness of the cable.
    pub restitution: Real,
}

impl ParticleCable {
    /// Creates a cable between `a` and `b`.
    pub fn new(a: ParticleId, b: ParticleId, max_length: Real, restitution: Real) -> Self {
        Self {
            particles: [a, b],
            max_length,
            restitution,
        }
    }
}

impl ParticleContactGenerator for ParticleCable {
    fn add_contact(&self, particles: &ParticleSet, contacts: &mut [ParticleContact]) -> usize {
        let Some(slot) = contacts.first_mut() else {
            return 0;
        };
        let Some((p0, p1)) = link_positions(particles, self.particles) else {
            return 0;
        };
        let length = (p0 - p1).length();
        if length < self.max_length {
            return 0;
        }
        *slot = ParticleContact::new(
            self.particles[0],
            Some(self.particles[1]),
            (p1 - p0).normalize(),
            length - self.max_length,
            self.restitution,
        );
        1
    }
}

/// Rigid rod joining two particles: any deviation from its length creates a
/// contact with zero restitution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleRod {
    /// Linked particles.
    pub particles: [ParticleId; 2],
    /// Length the rod holds.
    pub length: Real,
}

impl ParticleRod {
    /// Creates a rod between `a` and `b`.
    pub fn new(a: ParticleId, b: ParticleId, length: Real) -> Self {
        Self {
            particles: [a, b],
            length,
        }
    }
}

impl ParticleContactGenerator for ParticleRod {
    #[allow(clippy::float_cmp)]
    fn add_contact(&self, particles: &ParticleSet, contacts: &mut [ParticleContact]) -> usize {
        let Some(slot) = contacts.first_mut() else {
            return 0;
        };
        let Some((p0, p1)) = link_positions(particles, self.particles) else {
            return 0;
        };
        let current = (p0 - p1).length();
        if current == self.length {
            return 0;
        }
        let normal = (p1 - p0).normalize();
        let (normal, penetration) = if current > self.length {
            (normal, current - self.length)
        } else {
            (-normal, self.length - current)
        };
        *slot = ParticleContact::new(
            self.particles[0],
            Some(self.particles[1]),
            normal,
            penetration,
            0.0,
        );
        1
    }
}

/// Cable tying one particle to a fixed anchor point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleCableConstraint {
    /// Constrained particle.
    pub particle: ParticleId,
    /// Fixed end of the cable.
    pub anchor: Vec3,
    /// Length beyond which the cable pulls back.
    pub max_length: Real,
    /// Bounciness of the cable.
    pub restitution: Real,
}

impl ParticleCableConstraint {
    /// Creates an anchored cable.
    pub fn new(particle: ParticleId, anchor: Vec3, max_length: Real, restitution: Real) -> Self {
        Self {
            particle,
            anchor,
            max_length,
            restitution,
        }
    }
}

impl ParticleContactGenerator for ParticleCableConstraint {
    fn add_contact(&self, particles: &ParticleSet, contacts: &mut [ParticleContact]) -> usize {
        let Some(slot) = contacts.first_mut() else {
            return 0;
        };
        let Some(position) = particles.get(self.particle).map(|p| p.position) else {
            return 0;
        };
        let length = (position - self.anchor).length();
        if length < self.max_length {
            return 0;
        }
        *slot = ParticleContact::new(
            self.particle,
            None,
            (self.anchor - position).normalize(),
            length - self.max_length,
            self.restitution,
        );
        1
    }
}

/// Rigid rod tying one particle to a fixed anchor point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleRodConstraint {
    /// Constrained particle.
    pub particle: ParticleId,
    /// Fixed end of the rod.
    pub anchor: Vec3,
    /// Length the rod holds.
    pub length: Real,
}

impl ParticleRodConstraint {
    /// Creates an anchored rod.
    pub fn new(particle: ParticleId, anchor: Vec3, length: Real) -> Self {
        Self {
            particle,
            anchor,
            length,
        }
    }
}

impl ParticleContactGenerator for ParticleRodConstraint {
    #[allow(clippy::float_cmp)]
    fn add_contact(&self, particles: &ParticleSet, contacts: &mut [ParticleContact]) -> usize {
        let Some(slot) = contacts.first_mut() else {
            return 0;
        };
        let Some(position) = particles.get(self.particle).map(|p| p.position) else {
            return 0;
        };
        let current = (position - self.anchor).length();
        if current == self.length {
            return 0;
        }
        let normal = (self.anchor - position).normalize();
        let (normal, penetration) = if current > self.length {
            (normal, current - self.length)
        } else {
            (-normal, self.length - current)
        };
        *slot = ParticleContact::new(self.particle, None, normal, penetration, 0.0);
        1
    }
}

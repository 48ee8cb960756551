// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Force generators acting on particles.

use crate::handle::{ParticleId, ParticleSet};
use crate::math::{Real, Vec3};
use crate::particle::Particle;
use crate::registry::{ForceGenerator, ForceRegistry};

/// Force generator for particles.
pub trait ParticleForceGenerator: ForceGenerator<Particle> {}

impl<G: ForceGenerator<Particle>> ParticleForceGenerator for G {}

/// Registry of particle force generators.
pub type ParticleForceRegistry = ForceRegistry<Particle>;

/// Spring force along `d = this - other`: `-(|d| - rest_length) * k * d̂`.
fn spring_force(d: Vec3, spring_constant: Real, rest_length: Real) -> Vec3 {
    let magnitude = (d.length() - rest_length) * spring_constant;
    d.normalize().scale(-magnitude)
}

/// Spring force that only pulls, when `|d| > rest_length`.
fn bungee_force(d: Vec3, spring_constant: Real, rest_length: Real) -> Option<Vec3> {
    let length = d.length();
    if length <= rest_length {
        return None;
    }
    let magnitude = spring_constant * (length - rest_length);
    Some(d.normalize().scale(-magnitude))
}

/// Constant gravitational acceleration, applied as `g * mass`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleGravity {
    /// Acceleration due to gravity.
    pub gravity: Vec3,
}

impl ParticleGravity {
    /// Creates a gravity generator.
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }
}

impl ForceGenerator<Particle> for ParticleGravity {
    fn update_force(&mut self, target: ParticleId, set: &mut ParticleSet, _duration: Real) {
        let Some(particle) = set.get_mut(target) else {
            return;
        };
        if !particle.has_finite_mass() {
            return;
        }
        let force = self.gravity.scale(particle.mass());
        particle.add_force(force);
    }
}

/// Velocity drag with linear and quadratic coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleDrag {
    /// Linear drag coefficient.
    pub k1: Real,
    /// Quadratic drag coefficient.
    pub k2: Real,
}

impl ParticleDrag {
    /// Creates a drag generator.
    pub fn new(k1: Real, k2: Real) -> Self {
        Self { k1, k2 }
    }
}

impl ForceGenerator<Particle> for ParticleDrag {
    fn update_force(&mut self, target: ParticleId, set: &mut ParticleSet, _duration: Real) {
        let Some(particle) = set.get_mut(target) else {
            return;
        };
        let speed = particle.velocity.length();
        let coeff = self.k1 * speed + self.k2 * speed * speed;
        let force = particle.velocity.normalize().scale(-coeff);
        particle.add_force(force);
    }
}

/// Spring between the target and another particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpring {
    /// Particle at the other end.
    pub other: ParticleId,
    /// Stiffness.
    pub spring_constant: Real,
    /// Length at which the spring exerts no force.
    pub rest_length: Real,
}

impl ParticleSpring {
    /// Creates a spring to `other`.
    pub fn new(other: ParticleId, spring_constant: Real, rest_length: Real) -> Self {
        Self {
            other,
            spring_constant,
            rest_length,
        }
    }
}

impl ForceGenerator<Particle> for ParticleSpring {
    fn update_force(&mut self, target: ParticleId, set: &mut ParticleSet, _duration: Real) {
        let Some(other) = set.get(self.other).map(|p| p.position) else {
            return;
        };
        let Some(particle) = set.get_mut(target) else {
            return;
        };
        let d = particle.position - other;
        particle.add_force(spring_force(d, self.spring_constant, self.rest_length));
    }
}

/// Spring between the target and a fixed point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleAnchoredSpring {
    /// Fixed end of the spring.
    pub anchor: Vec3,
    /// Stiffness.
    pub spring_constant: Real,
    /// Length at which the spring exerts no force.
    pub rest_length: Real,
}

impl ParticleAnchoredSpring {
    /// Creates a spring anchored at `anchor`.
    pub fn new(anchor: Vec3, spring_constant: Real, rest_length: Real) -> Self {
        Self {
            anchor,
            spring_constant,
            rest_length,
        }
    }
}

impl ForceGenerator<Particle> for ParticleAnchoredSpring {
    fn update_force(&mut self, target: ParticleId, set: &mut ParticleSet, _duration: Real) {
        let Some(particle) = set.get_mut(target) else {
            return;
        };
        let d = particle.position - self.anchor;
        particle.add_force(spring_force(d, self.spring_constant, self.rest_length));
    }
}

/// Elastic that only pulls the target towards another particle when
/// stretched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBungee {
    /// Particle at the other end.
    pub other: ParticleId,
    /// Stiffness.
    pub spring_constant: Real,
    /// Length beyond which the bungee pulls.
    pub rest_length: Real,
}

impl ParticleBungee {
    /// Creates a bungee to `other`.
    pub fn new(other: ParticleId, spring_constant: Real, rest_length: Real) -> Self {
        Self {
            other,
            spring_constant,
            rest_length,
        }
    }
}

impl ForceGenerator<Particle> for ParticleBungee {
    fn update_force(&mut self, target: ParticleId, set: &mut ParticleSet, _duration: Real) {
        let Some(other) = set.get(self.other).map(|p| p.position) else {
            return;
        };
        let Some(particle) = set.get_mut(target) else {
            return;
        };
        let d = particle.position - other;
        if let Some(force) = bungee_force(d, self.spring_constant, self.rest_length) {
            particle.add_force(force);
        }
    }
}

/// Elastic that only pulls the target towards a fixed point when stretched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleAnchoredBungee {
    /// Fixed end of the bungee.
    pub anchor: Vec3,
    /// Stiffness.
    pub spring_constant: Real,
    /// Length beyond which the bungee pulls.
    pub rest_length: Real,
}

impl ParticleAnchoredBungee {
    /// Creates a bungee anchored at `anchor`.
    pub fn new(anchor: Vec3, spring_constant: Real, rest_length: Real) -> Self {
        Self {
            anchor,
            spring_constant,
            rest_length,
        }
    }
}

impl ForceGenerator<Particle> for ParticleAnchoredBungee {
    fn update_force(&mut self, target: ParticleId, set: &mut ParticleSet, _duration: Real) {
        let Some(particle) = set.get_mut(target) else {
            return;
        };
        let d = particle.position - self.anchor;
        if let Some(force) = bungee_force(d, self.spring_constant, self.rest_length) {
            particle.add_force(force);
        }
    }
}

/// Buoyancy of a particle in a liquid whose surface is the plane
/// `y = water_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBuoyancy {
    /// Depth at which the object is half submerged; full lift is reached at
    /// `water_height - max_depth`.
    pub max_depth: Real,
    /// Volume of the object.
    pub volume: Real,
    /// Height of the liquid surface.
    pub water_height: Real,
    /// Density of the liquid (1000 for pure water).
    pub liquid_density: Real,
}

impl ParticleBuoyancy {
    /// Creates a buoyancy generator.
    pub fn new(max_depth: Real, volume: Real, water_height: Real, liquid_density: Real) -> Self {
        Self {
            max_depth,
            volume,
            water_height,
            liquid_density,
        }
    }
}

/// Upward force for an object at height `depth`, scaled linearly while
/// partially submerged.
pub(crate) fn buoyancy_lift(
    depth: Real,
    max_depth: Real,
    volume: Real,
    water_height: Real,
    liquid_density: Real,
) -> Option<Real> {
    if depth >= water_height + max_depth {
        return None;
    }
    let full = liquid_density * volume;
    if depth <= water_height - max_depth {
        return Some(full);
    }
    Some(full * (water_height + max_depth - depth) / (2.0 * max_depth))
}

impl ForceGenerator<Particle> for ParticleBuoyancy {
    fn update_force(&mut self, target: ParticleId, set: &mut ParticleSet, _duration: Real) {
        let Some(particle) = set.get_mut(target) else {
            return;
        };
        let lift = buoyancy_lift(
            particle.position.y,
            self.max_depth,
            self.volume,
            self.water_height,
            self.liquid_density,
        );
        if let Some(lift) = lift {
            particle.add_force(Vec3::new(0.0, lift, 0.0));
        }
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Point masses and their Newton-Euler integrator.

use crate::error::{check_duration, PhysicsError};
use crate::math::{real_pow, Real, Vec3};

/// Point mass with linear state only.
///
/// `inverse_mass == 0` encodes an immovable particle (infinite mass). The
/// force accumulator is private: generators add to it through
/// [`Particle::add_force`] and [`Particle::integrate`] clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// World-space position.
    pub position: Vec3,
    /// Linear velocity.
    pub velocity: Vec3,
    /// Constant acceleration applied every step (e.g. gravity).
    pub acceleration: Vec3,
    /// Fraction of velocity kept per second, in `(0, 1]`.
    pub damping: Real,
    /// Reciprocal of the mass; zero for immovable particles.
    pub inverse_mass: Real,
    force_accum: Vec3,
}

impl Default for Particle {
    /// Unit mass at the origin, at rest, with no damping.
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            damping: 1.0,
            inverse_mass: 1.0,
            force_accum: Vec3::ZERO,
        }
    }
}

impl Particle {
    /// Creates a particle of the given mass at `position`.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidMass`] when `mass` is not positive and
    /// finite.
    pub fn new(position: Vec3, mass: Real) -> Result<Self, PhysicsError> {
        let mut particle = Self {
            position,
            ..Self::default()
        };
        particle.set_mass(mass)?;
        Ok(particle)
    }

    /// Creates an immovable particle (infinite mass) at `position`.
    pub fn immovable(position: Vec3) -> Self {
        Self {
            position,
            inverse_mass: 0.0,
            ..Self::default()
        }
    }

    /// Sets the initial velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the constant acceleration.
    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Sets the damping factor.
    pub fn with_damping(mut self, damping: Real) -> Self {
        self.damping = damping;
        self
    }

    /// Mass of the particle; `Real::MAX` stands in for infinite mass.
    pub fn mass(&self) -> Real {
        if self.inverse_mass == 0.0 {
            Real::MAX
        } else {
            1.0 / self.inverse_mass
        }
    }

    /// Sets the mass.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidMass`] for zero, negative or non-finite
    /// input; the particle is left unchanged.
    pub fn set_mass(&mut self, mass: Real) -> Result<(), PhysicsError> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(PhysicsError::InvalidMass(mass));
        }
        self.inverse_mass = 1.0 / mass;
        Ok(())
    }

    /// Returns `true` unless the particle is immovable.
    pub fn has_finite_mass(&self) -> bool {
        self.inverse_mass > 0.0
    }

    /// Adds a force for the next integration only.
    pub fn add_force(&mut self, force: Vec3) {
        self.force_accum += force;
    }

    /// Forces accumulated since the last integration.
    pub fn accumulated_force(&self) -> Vec3 {
        self.force_accum
    }

    /// Discards accumulated forces.
    pub fn clear_accumulator(&mut self) {
        self.force_accum = Vec3::ZERO;
    }

    /// Advances the particle by `duration` seconds.
    ///
    /// Position moves with the velocity from the start of the step, then the
    /// velocity picks up `acceleration + force / mass` and is scaled by
    /// `damping^duration`. Immovable particles are skipped before the
    /// duration is checked.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidDuration`] for `duration <= 0`.
    pub fn integrate(&mut self, duration: Real) -> Result<(), PhysicsError> {
        if self.inverse_mass <= 0.0 {
            return Ok(());
        }
        check_duration(duration)?;

        self.position = self.position.add_scaled(&self.velocity, duration);

        let resulting = self.acceleration.add_scaled(&self.force_accum, self.inverse_mass);
        self.velocity = self.velocity.add_scaled(&resulting, duration);
        self.velocity *= real_pow(self.damping, duration);

        self.clear_accumulator();
        Ok(())
    }
}

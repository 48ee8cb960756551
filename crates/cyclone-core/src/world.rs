// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rigid-body world: bodies plus their force registry.

use tracing::{debug, instrument};

use crate::body::RigidBody;
use crate::config::WorldConfig;
use crate::error::{check_duration, PhysicsError};
use crate::fgen::BodyForceRegistry;
use crate::handle::{BodyId, BodySet};
use crate::math::Real;

/// A set of rigid bodies simulated together.
#[derive(Debug)]
pub struct World {
    bodies: BodySet,
    registry: BodyForceRegistry,
    config: WorldConfig,
}

impl World {
    /// Creates an empty world.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: WorldConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self {
            bodies: BodySet::new(),
            registry: BodyForceRegistry::new(),
            config,
        })
    }

    /// Configuration the world was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Adds a body, applying the world's sleep threshold to it.
    pub fn add_body(&mut self, mut body: RigidBody) -> BodyId {
        body.set_sleep_epsilon(self.config.sleep_epsilon);
        if body.is_awake() {
            body.set_awake(true);
        }
        self.bodies.insert(body)
    }

    /// All bodies.
    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    /// All bodies, mutably.
    pub fn bodies_mut(&mut self) -> &mut BodySet {
        &mut self.bodies
    }

    /// Force registry driven by [`World::run_physics`].
    pub fn registry(&self) -> &BodyForceRegistry {
        &self.registry
    }

    /// Force registry, mutably.
    pub fn registry_mut(&mut self) -> &mut BodyForceRegistry {
        &mut self.registry
    }

    /// Clears accumulators and refreshes derived data on every body.
    pub fn start_frame(&mut self) {
        for body in self.bodies.iter_mut() {
            body.clear_accumulators();
            body.calculate_derived_data();
        }
    }

    /// Runs one step: forces, then integration of every body.
    ///
    /// Returns the number of bodies still awake after the step.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidDuration`] for `duration <= 0`; the
    /// world is untouched in that case.
    #[instrument(level = "debug", skip(self))]
    pub fn run_physics(&mut self, duration: Real) -> Result<usize, PhysicsError> {
        check_duration(duration)?;
        self.registry.update_forces(&mut self.bodies, duration);
        for body in self.bodies.iter_mut() {
            body.integrate(duration)?;
        }
        let awake = self.bodies.iter().filter(|(_, b)| b.is_awake()).count();
        debug!(bodies = self.bodies.len(), awake, "rigid step complete");
        Ok(awake)
    }
}

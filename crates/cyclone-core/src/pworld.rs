// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Particle world: owns particles, their force registry, contact generators
//! and the resolver, and runs one simulation step at a time.
//!
//! Step order is fixed: accumulate forces, integrate, generate contacts,
//! resolve contacts. The contact buffer is allocated once with
//! [`WorldConfig::max_contacts`] slots and never grows; generators that do
//! not fit in a step are skipped with a warning.

use tracing::{debug, instrument, warn};

use crate::config::WorldConfig;
use crate::error::{check_duration, PhysicsError};
use crate::handle::{ParticleId, ParticleSet};
use crate::math::{Real, Vec3};
use crate::particle::Particle;
use crate::pcontacts::{ParticleContact, ParticleContactResolver};
use crate::pfgen::ParticleForceRegistry;
use crate::plinks::ParticleContactGenerator;

/// Summary of one world step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Contacts generated in the step.
    pub contacts: usize,
    /// Resolver passes actually used.
    pub iterations: usize,
}

/// Contact generator that keeps particles above the ground plane `y = 0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundContacts {
    particles: Vec<ParticleId>,
}

impl GroundContacts {
    /// Restitution of ground contacts.
    pub const RESTITUTION: Real = 0.2;

    /// Watches the given particles.
    pub fn new(particles: Vec<ParticleId>) -> Self {
        Self { particles }
    }

    /// Adds a particle to watch.
    pub fn push(&mut self, particle: ParticleId) {
        self.particles.push(particle);
    }
}

impl ParticleContactGenerator for GroundContacts {
    fn add_contact(&self, particles: &ParticleSet, contacts: &mut [ParticleContact]) -> usize {
        let mut count = 0;
        for &handle in &self.particles {
            if count >= contacts.len() {
                break;
            }
            let Some(particle) = particles.get(handle) else {
                continue;
            };
            let y = particle.position.y;
            if y < 0.0 {
                contacts[count] =
                    ParticleContact::new(handle, None, Vec3::UP, -y, Self::RESTITUTION);
                count += 1;
            }
        }
        count
    }
}

/// A set of particles simulated together.
pub struct ParticleWorld {
    particles: ParticleSet,
    registry: ParticleForceRegistry,
    resolver: ParticleContactResolver,
    generators: Vec<Box<dyn ParticleContactGenerator>>,
    contacts: Vec<ParticleContact>,
    used: usize,
    config: WorldConfig,
}

impl core::fmt::Debug for ParticleWorld {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParticleWorld")
            .field("particles", &self.particles.len())
            .field("registry", &self.registry)
            .field("generators", &self.generators.len())
            .field("contacts", &self.used)
            .field("config", &self.config)
            .finish()
    }
}

impl ParticleWorld {
    /// Creates an empty world.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: WorldConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self {
            particles: ParticleSet::new(),
            registry: ParticleForceRegistry::new(),
            resolver: ParticleContactResolver::new(config.iterations),
            generators: Vec::new(),
            contacts: vec![ParticleContact::default(); config.max_contacts],
            used: 0,
            config,
        })
    }

    /// Configuration the world was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Adds a particle and returns its handle.
    pub fn add_particle(&mut self, particle: Particle) -> ParticleId {
        self.particles.insert(particle)
    }

    /// All particles.
    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    /// All particles, mutably.
    pub fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    /// Force registry driven by [`ParticleWorld::run_physics`].
    pub fn registry(&self) -> &ParticleForceRegistry {
        &self.registry
    }

    /// Force registry, mutably.
    pub fn registry_mut(&mut self) -> &mut ParticleForceRegistry {
        &mut self.registry
    }

    /// Adds a contact generator; generators run in insertion order.
    pub fn add_contact_generator<G: ParticleContactGenerator + 'static>(&mut self, generator: G) {
        self.generators.push(Box::new(generator));
    }

    /// Contacts generated by the last step (already resolved).
    pub fn contacts(&self) -> &[ParticleContact] {
        &self.contacts[..self.used]
    }

    /// Clears every particle's force accumulator.
    pub fn start_frame(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.clear_accumulator();
        }
    }

    /// Fills the contact buffer from every generator and returns the number
    /// of contacts written.
    pub fn generate_contacts(&mut self) -> usize {
        let mut used = 0;
        for (i, generator) in self.generators.iter().enumerate() {
            let remaining = &mut self.contacts[used..];
            if remaining.is_empty() {
                warn!(
                    capacity = self.config.max_contacts,
                    skipped = self.generators.len() - i,
                    "contact buffer full; remaining generators skipped"
                );
                break;
            }
            used += generator.add_contact(&self.particles, remaining);
        }
        self.used = used;
        used
    }

    /// Integrates every particle.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidDuration`] for `duration <= 0`.
    pub fn integrate(&mut self, duration: Real) -> Result<(), PhysicsError> {
        check_duration(duration)?;
        for particle in self.particles.iter_mut() {
            particle.integrate(duration)?;
        }
        Ok(())
    }

    /// Runs one step: forces, integration, contact generation, resolution.
    ///
    /// With `iterations == 0` in the configuration the resolver may use up to
    /// twice as many passes as contacts were generated.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidDuration`] for `duration <= 0`; the
    /// world is untouched in that case.
    #[instrument(level = "debug", skip(self))]
    pub fn run_physics(&mut self, duration: Real) -> Result<StepReport, PhysicsError> {
        check_duration(duration)?;
        self.registry.update_forces(&mut self.particles, duration);
        self.integrate(duration)?;

        let used = self.generate_contacts();
        self.resolver.set_iterations(self.config.iterations_for(used));
        let iterations = if used == 0 {
            0
        } else {
            self.resolver
                .resolve_contacts(&mut self.contacts[..used], &mut self.particles, duration)?
        };
        debug!(contacts = used, iterations, "particle step complete");
        Ok(StepReport {
            contacts: used,
            iterations,
        })
    }
}

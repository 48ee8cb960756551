// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Particle contacts and the iterative contact resolver.
//!
//! A contact joins one or two particles along a normal. Resolution applies an
//! impulse to fix the separating velocity and then projects positions apart
//! to remove interpenetration. The resolver always works on the most urgent
//! contact first and keeps the penetration of neighbouring contacts current
//! as particles move.

use tracing::{trace, warn};

use crate::error::{check_duration, PhysicsError};
use crate::handle::{ParticleId, ParticleSet};
use crate::math::{Real, Vec3};
use crate::particle::Particle;

/// Two particles (or one particle and immovable scenery) in contact.
///
/// A contact whose first slot is empty is inert and never resolved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParticleContact {
    /// Particles involved; the second is `None` for contact with scenery.
    pub particles: [Option<ParticleId>; 2],
    /// Direction, in world space, along which the first particle is pushed.
    pub contact_normal: Vec3,
    /// Depth of interpenetration along the normal.
    pub penetration: Real,
    /// Normal restitution coefficient.
    pub restitution: Real,
    /// Movement applied to each particle by the last interpenetration pass.
    pub particle_movement: [Vec3; 2],
}

impl ParticleContact {
    /// Creates a contact between `first` and an optional `second` particle.
    pub fn new(
        first: ParticleId,
        second: Option<ParticleId>,
        contact_normal: Vec3,
        penetration: Real,
        restitution: Real,
    ) -> Self {
        Self {
            particles: [Some(first), second],
            contact_normal,
            penetration,
            restitution,
            particle_movement: [Vec3::ZERO; 2],
        }
    }

    /// Returns `true` when the contact names no first particle.
    pub fn is_inert(&self) -> bool {
        self.particles[0].is_none()
    }

    /// Returns `true` when both named particles exist in `set` and are
    /// distinct, so resolution can move them.
    pub fn is_resolvable(&self, set: &ParticleSet) -> bool {
        match self.particles {
            [Some(a), Some(b)] => a != b && set.contains(a) && set.contains(b),
            [Some(a), None] => set.contains(a),
            [None, _] => false,
        }
    }

    /// Velocity at which the particles separate along the normal;
    /// negative while closing.
    pub fn separating_velocity(&self, set: &ParticleSet) -> Real {
        let Some(first) = self.particles[0].and_then(|h| set.get(h)) else {
            return 0.0;
        };
        let mut relative = first.velocity;
        if let Some(second) = self.particles[1].and_then(|h| set.get(h)) {
            relative -= second.velocity;
        }
        relative.dot(&self.contact_normal)
    }

    /// Resolves velocity and then interpenetration.
    pub fn resolve(&mut self, set: &mut ParticleSet, duration: Real) {
        self.resolve_velocity(set, duration);
        self.resolve_interpenetration(set);
    }

    /// Applies the impulse that gives the contact its post-collision
    /// separating velocity.
    ///
    /// Closing velocity that was built up by acceleration alone during the
    /// last `duration` is not bounced back, so particles resting under
    /// constant acceleration stay at rest.
    pub fn resolve_velocity(&mut self, set: &mut ParticleSet, duration: Real) {
        let separating = self.separating_velocity(set);
        if separating > 0.0 {
            return;
        }
        let normal = self.contact_normal;
        let restitution = self.restitution;
        let _ = self.with_particles(set, |first, second| {
            let mut new_separating = -separating * restitution;

            let mut acc_caused = first.acceleration;
            if let Some(second) = second.as_deref() {
                acc_caused -= second.acceleration;
            }
            let acc_caused_separating = acc_caused.dot(&normal) * duration;
            if acc_caused_separating < 0.0 {
                new_separating += restitution * acc_caused_separating;
                if new_separating < 0.0 {
                    new_separating = 0.0;
                }
            }

            let delta_velocity = new_separating - separating;
            let total_inverse_mass =
                first.inverse_mass + second.as_deref().map_or(0.0, |p| p.inverse_mass);
            if total_inverse_mass <= 0.0 {
                return;
            }

            let impulse_per_imass = normal.scale(delta_velocity / total_inverse_mass);
            first.velocity = first.velocity.add_scaled(&impulse_per_imass, first.inverse_mass);
            if let Some(second) = second {
                second.velocity = second
                    .velocity
                    .add_scaled(&impulse_per_imass, -second.inverse_mass);
            }
        });
    }

    /// Moves the particles apart along the normal in proportion to their
    /// inverse masses and records the movement.
    pub fn resolve_interpenetration(&mut self, set: &mut ParticleSet) {
        self.particle_movement = [Vec3::ZERO; 2];
        if self.penetration <= 0.0 {
            return;
        }
        let normal = self.contact_normal;
        let penetration = self.penetration;
        let movement = self.with_particles(set, |first, second| {
            let total_inverse_mass =
                first.inverse_mass + second.as_deref().map_or(0.0, |p| p.inverse_mass);
            if total_inverse_mass <= 0.0 {
                return [Vec3::ZERO; 2];
            }
            let move_per_imass = normal.scale(penetration / total_inverse_mass);
            let first_move = move_per_imass.scale(first.inverse_mass);
            first.position += first_move;
            let second_move = match second {
                Some(second) => {
                    let m = move_per_imass.scale(-second.inverse_mass);
                    second.position += m;
                    m
                }
                None => Vec3::ZERO,
            };
            [first_move, second_move]
        });
        if let Some(movement) = movement {
            self.particle_movement = movement;
        }
    }

    /// Runs `f` with exclusive access to the contact's particles.
    ///
    /// Returns `None` for inert contacts, dangling handles, or a contact that
    /// names the same particle twice.
    fn with_particles<R>(
        &self,
        set: &mut ParticleSet,
        f: impl FnOnce(&mut Particle, Option<&mut Particle>) -> R,
    ) -> Option<R> {
        match self.particles {
            [Some(a), Some(b)] => {
                let (first, second) = set.pair_mut(a, b)?;
                Some(f(first, Some(second)))
            }
            [Some(a), None] => set.get_mut(a).map(|first| f(first, None)),
            [None, _] => None,
        }
    }
}

/// Iterative resolver that repeatedly fixes the most severe contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParticleContactResolver {
    iterations: usize,
}

impl ParticleContactResolver {
    /// Creates a resolver allowed at most `iterations` passes per call.
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Maximum passes per call.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Changes the maximum passes per call.
    pub fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    /// Resolves `contacts` against `set` and returns the passes used.
    ///
    /// Each pass picks the contact with the lowest separating velocity among
    /// those still closing or interpenetrating (the first one wins a tie),
    /// resolves it, and updates the penetration of every contact sharing a
    /// moved particle. Stops early once no contact qualifies. Inert contacts,
    /// contacts with dangling handles and contacts naming one particle twice
    /// never qualify.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidDuration`] for `duration <= 0`.
    pub fn resolve_contacts(
        &self,
        contacts: &mut [ParticleContact],
        set: &mut ParticleSet,
        duration: Real,
    ) -> Result<usize, PhysicsError> {
        check_duration(duration)?;
        let unresolvable = contacts
            .iter()
            .filter(|c| !c.is_inert() && !c.is_resolvable(set))
            .count();
        if unresolvable > 0 {
            warn!(unresolvable, "skipping contacts with dangling or repeated particles");
        }
        let mut used = 0;
        while used < self.iterations {
            let mut max = Real::MAX;
            let mut max_index = None;
            for (i, contact) in contacts.iter().enumerate() {
                if !contact.is_resolvable(set) {
                    continue;
                }
                let separating = contact.separating_velocity(set);
                if separating < max && (separating < 0.0 || contact.penetration > 0.0) {
                    max = separating;
                    max_index = Some(i);
                }
            }
            let Some(index) = max_index else {
                break;
            };

            contacts[index].resolve(set, duration);
            trace!(
                contact = index,
                separating = max,
                penetration = contacts[index].penetration,
                "resolved contact"
            );

            let resolved = contacts[index].particles;
            let movement = contacts[index].particle_movement;
            for contact in contacts.iter_mut() {
                let normal = contact.contact_normal;
                if contact.particles[0].is_some() {
                    if contact.particles[0] == resolved[0] {
                        contact.penetration -= movement[0].dot(&normal);
                    } else if contact.particles[0] == resolved[1] {
                        contact.penetration -= movement[1].dot(&normal);
                    }
                }
                if contact.particles[1].is_some() {
                    if contact.particles[1] == resolved[0] {
                        contact.penetration += movement[0].dot(&normal);
                    } else if contact.particles[1] == resolved[1] {
                        contact.penetration += movement[1].dot(&normal);
                    }
                }
            }
            used += 1;
        }
        Ok(used)
    }
}

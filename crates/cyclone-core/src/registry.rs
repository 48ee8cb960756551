// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Force generator capability and the registry that drives it.
//!
//! A registry owns its generators and an ordered list of
//! `(target, generator)` registrations. One generator may serve many targets,
//! and [`ForceRegistry::update_forces`] walks the registrations in the order
//! they were added so repeated runs accumulate forces identically.

use core::any::Any;

use tracing::warn;

use crate::handle::{Handle, Store};
use crate::math::Real;

/// Something that adds force to one entry of a store each step.
///
/// Implementations only add to accumulators (`add_force`, `add_torque`,
/// ...); they never integrate or read back results from the same call.
pub trait ForceGenerator<T>: Any {
    /// Adds this generator's force to `target` for a step of `duration`.
    fn update_force(&mut self, target: Handle<T>, set: &mut Store<T>, duration: Real);
}

/// Registry-local identity of an owned force generator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct GeneratorId(u32);

impl GeneratorId {
    /// Raw index into the registry's generator table.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Ordered `(target, generator)` registrations plus the generators they
/// reference.
pub struct ForceRegistry<T> {
    generators: Vec<Box<dyn ForceGenerator<T>>>,
    registrations: Vec<(Handle<T>, GeneratorId)>,
}

impl<T> Default for ForceRegistry<T> {
    fn default() -> Self {
        Self {
            generators: Vec::new(),
            registrations: Vec::new(),
        }
    }
}

impl<T> core::fmt::Debug for ForceRegistry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ForceRegistry")
            .field("generators", &self.generators.len())
            .field("registrations", &self.registrations)
            .finish()
    }
}

impl<T: 'static> ForceRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a generator and returns its id.
    pub fn insert_generator<G: ForceGenerator<T>>(&mut self, generator: G) -> GeneratorId {
        let id = GeneratorId(u32::try_from(self.generators.len()).unwrap_or(u32::MAX));
        self.generators.push(Box::new(generator));
        id
    }

    /// Registers `generator` to act on `target`.
    ///
    /// Duplicate pairs are allowed and apply the force once per registration.
    pub fn add(&mut self, target: Handle<T>, generator: GeneratorId) {
        self.registrations.push((target, generator));
    }

    /// Removes the first registration equal to `(target, generator)`.
    ///
    /// Returns `false` when no such registration exists. The generator itself
    /// stays owned by the registry.
    pub fn remove(&mut self, target: Handle<T>, generator: GeneratorId) -> bool {
        let found = self
            .registrations
            .iter()
            .position(|&(t, g)| t == target && g == generator);
        match found {
            Some(pos) => {
                self.registrations.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drops every registration. Generators are kept.
    pub fn clear(&mut self) {
        self.registrations.clear();
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Registrations in update order.
    pub fn registrations(&self) -> &[(Handle<T>, GeneratorId)] {
        &self.registrations
    }

    /// Shared access to a generator as its concrete type.
    pub fn generator<G: ForceGenerator<T>>(&self, id: GeneratorId) -> Option<&G> {
        let generator: &dyn ForceGenerator<T> = &**self.generators.get(id.index())?;
        let any: &dyn Any = generator;
        any.downcast_ref::<G>()
    }

    /// Exclusive access to a generator as its concrete type, e.g. to move a
    /// control surface or change the wind between steps.
    pub fn generator_mut<G: ForceGenerator<T>>(&mut self, id: GeneratorId) -> Option<&mut G> {
        let generator: &mut dyn ForceGenerator<T> = &mut **self.generators.get_mut(id.index())?;
        let any: &mut dyn Any = generator;
        any.downcast_mut::<G>()
    }

    /// Calls every registered generator once, in registration order.
    ///
    /// Registrations naming a missing target or generator are skipped with a
    /// warning.
    pub fn update_forces(&mut self, set: &mut Store<T>, duration: Real) {
        for &(target, id) in &self.registrations {
            if !set.contains(target) {
                warn!(?target, "force registration names a missing target");
                continue;
            }
            match self.generators.get_mut(id.index()) {
                Some(generator) => generator.update_force(target, set, duration),
                None => warn!(?id, "force registration names a missing generator"),
            }
        }
    }
}

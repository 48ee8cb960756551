// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! World configuration shared by the particle and rigid-body worlds.

use crate::error::PhysicsError;
use crate::math::Real;

/// Default capacity of a particle world's per-step contact buffer.
pub const DEFAULT_MAX_CONTACTS: usize = 256;

/// Default sleep threshold for rigid bodies.
pub const DEFAULT_SLEEP_EPSILON: Real = 0.3;

/// Tunables for a simulation world.
///
/// Hosts may persist this with the `serde` feature; the core never reads
/// configuration files itself.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Maximum number of particle contacts generated per step.
    pub max_contacts: usize,
    /// Resolver iterations per step. `0` selects twice the number of contacts
    /// generated in that step.
    pub iterations: usize,
    /// Motion threshold below which rigid bodies fall asleep.
    pub sleep_epsilon: Real,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_contacts: DEFAULT_MAX_CONTACTS,
            iterations: 0,
            sleep_epsilon: DEFAULT_SLEEP_EPSILON,
        }
    }
}

impl WorldConfig {
    /// Sets the contact buffer capacity.
    pub fn with_max_contacts(mut self, max_contacts: usize) -> Self {
        self.max_contacts = max_contacts;
        self
    }

    /// Sets a fixed resolver iteration count (`0` for automatic).
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the rigid-body sleep threshold.
    pub fn with_sleep_epsilon(mut self, sleep_epsilon: Real) -> Self {
        self.sleep_epsilon = sleep_epsilon;
        self
    }

    /// Checks the configuration for values no world can run with.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidConfig`] when `max_contacts` is zero or
    /// `sleep_epsilon` is not a positive finite number.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.max_contacts == 0 {
            return Err(PhysicsError::InvalidConfig("max_contacts must be > 0"));
        }
        if !(self.sleep_epsilon.is_finite() && self.sleep_epsilon > 0.0) {
            return Err(PhysicsError::InvalidConfig(
                "sleep_epsilon must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Resolver iterations to use for a step that generated `used` contacts.
    pub fn iterations_for(&self, used: usize) -> usize {
        if self.iterations == 0 {
            used * 2
        } else {
            self.iterations
        }
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use thiserror::Error;

use crate::math::Real;

/// Errors emitted by the physics core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A mass setter received a zero, negative or non-finite mass.
    #[error("invalid mass: {0} (must be finite and > 0)")]
    InvalidMass(Real),
    /// An integrator received a non-positive or NaN timestep.
    #[error("invalid duration: {0} (must be > 0)")]
    InvalidDuration(Real),
    /// An inertia tensor could not be inverted.
    #[error("inertia tensor is singular")]
    SingularMatrix,
    /// A world configuration failed validation.
    #[error("invalid world configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Rejects `duration <= 0` and NaN.
pub(crate) fn check_duration(duration: Real) -> Result<(), PhysicsError> {
    if duration > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidDuration(duration))
    }
}

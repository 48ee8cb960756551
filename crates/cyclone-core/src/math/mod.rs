// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic math helpers covering scalar utilities, vectors, 3×3 and
//! 3×4 matrices, and orientation quaternions.
//!
//! All values are [`Real`] (`f64`). Transcendental helpers that feed the
//! integrators route through `libm` so results do not depend on the platform
//! math library.

mod mat3;
mod mat4;
mod quat;
mod vec3;

pub use mat3::Mat3;
pub use mat4::Mat4;
pub use quat::Quat;
pub use vec3::Vec3;

/// Scalar type used by every physics quantity in the engine.
pub type Real = f64;

/// Degeneracy threshold used when normalising vectors and quaternions.
///
/// Lengths at or below this value are treated as zero so callers can detect
/// degenerate directions deterministically.
pub const EPSILON: Real = 1e-9;

/// Determinant magnitude below which a matrix is considered singular.
pub const SINGULAR_EPSILON: Real = 1e-12;

/// Clamps `value` to the inclusive `[min, max]` range.
pub fn clamp(value: Real, min: Real, max: Real) -> Real {
    debug_assert!(min <= max, "invalid clamp range: {min} > {max}");
    value.max(min).min(max)
}

/// Raises `base` to `exponent` through `libm` for cross-platform stable
/// results.
///
/// Used for frame-rate independent damping (`damping^duration`) and the sleep
/// bias (`0.5^duration`).
pub fn real_pow(base: Real, exponent: Real) -> Real {
    libm::pow(base, exponent)
}

/// Square root through `libm`, matching [`real_pow`]'s provenance.
pub fn real_sqrt(value: Real) -> Real {
    libm::sqrt(value)
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::ops::Mul;

use crate::math::{real_sqrt, Real, Vec3, EPSILON};

/// Orientation quaternion stored as `(r, i, j, k)`.
///
/// `r` is the real part. Orientations are expected to stay unit length; rigid
/// bodies renormalise after every integration step.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quat {
    /// Real component.
    pub r: Real,
    /// First complex component.
    pub i: Real,
    /// Second complex component.
    pub j: Real,
    /// Third complex component.
    pub k: Real,
}

impl Quat {
    /// Creates a quaternion from raw components.
    pub const fn new(r: Real, i: Real, j: Real, k: Real) -> Self {
        Self { r, i, j, k }
    }

    /// Returns the identity rotation.
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Builds a rotation of `angle` radians about `axis`.
    ///
    /// A degenerate axis yields the identity rotation.
    pub fn from_axis_angle(axis: Vec3, angle: Real) -> Self {
        let axis = axis.normalize();
        if axis == Vec3::ZERO {
            return Self::identity();
        }
        let half = angle * 0.5;
        let s = libm::sin(half);
        Self::new(libm::cos(half), axis.x * s, axis.y * s, axis.z * s)
    }

    /// Returns the components as an array in `(r, i, j, k)` order.
    pub fn to_array(self) -> [Real; 4] {
        [self.r, self.i, self.j, self.k]
    }

    /// Euclidean norm of the four components.
    pub fn length(&self) -> Real {
        real_sqrt(self.r * self.r + self.i * self.i + self.j * self.j + self.k * self.k)
    }

    /// Scales the quaternion to unit length.
    ///
    /// A zero-length quaternion becomes the identity rotation, which keeps
    /// freshly zeroed orientations valid.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len <= EPSILON {
            return Self::identity();
        }
        let inv = 1.0 / len;
        Self::new(self.r * inv, self.i * inv, self.j * inv, self.k * inv)
    }

    /// Hamilton product `self * other`.
    pub fn multiply(&self, other: &Self) -> Self {
        Self::new(
            self.r * other.r - self.i * other.i - self.j * other.j - self.k * other.k,
            self.r * other.i + self.i * other.r + self.j * other.k - self.k * other.j,
            self.r * other.j + self.j * other.r + self.k * other.i - self.i * other.k,
            self.r * other.k + self.k * other.r + self.i * other.j - self.j * other.i,
        )
    }

    /// Advances the orientation by an angular velocity over a timestep.
    ///
    /// Computes `self + 0.5 * (0, vector * scale) * self`. The result is not
    /// renormalised.
    pub fn add_scaled_vector(&self, vector: &Vec3, scale: Real) -> Self {
        let spin = Self::new(0.0, vector.x * scale, vector.y * scale, vector.z * scale);
        let delta = spin.multiply(self);
        Self::new(
            self.r + delta.r * 0.5,
            self.i + delta.i * 0.5,
            self.j + delta.j * 0.5,
            self.k + delta.k * 0.5,
        )
    }

    /// Right-multiplies by the pure quaternion `(0, vector)`.
    pub fn rotate_by_vector(&self, vector: &Vec3) -> Self {
        self.multiply(&Self::new(0.0, vector.x, vector.y, vector.z))
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Quat {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl From<[Real; 4]> for Quat {
    fn from(value: [Real; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::ops::Mul;

use crate::math::{Mat3, Quat, Real, Vec3, SINGULAR_EPSILON};

/// Row-major 3×4 affine transform with an implicit `[0 0 0 1]` bottom row.
///
/// - The left 3×3 block holds rotation (and any scale), the last column holds
///   the translation.
/// - Rigid bodies rebuild theirs from `(position, orientation)` after every
///   integration step, so the rotation block stays orthonormal.
///
/// # Examples
/// ```
/// use cyclone_core::math::{Mat4, Quat, Vec3};
/// let t = Mat4::from_orientation_and_position(&Quat::identity(), &Vec3::new(5.0, -3.0, 2.0));
/// let p = Vec3::new(2.0, 4.0, -1.0);
/// assert_eq!(t.transform(&p).to_array(), [7.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mat4 {
    data: [Real; 12],
}

impl Mat4 {
    /// Creates a transform from row-major elements (three rows of four).
    pub const fn new(data: [Real; 12]) -> Self {
        Self { data }
    }

    /// Returns the identity transform.
    pub const fn identity() -> Self {
        Self::new([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0,
        ])
    }

    /// Builds the transform that rotates by `q` and then translates by `pos`.
    pub fn from_orientation_and_position(q: &Quat, pos: &Vec3) -> Self {
        let r = Mat3::from_quat(q).to_array();
        Self::new([
            r[0], r[1], r[2], pos.x, //
            r[3], r[4], r[5], pos.y, //
            r[6], r[7], r[8], pos.z,
        ])
    }

    /// Returns the underlying row-major array.
    pub fn to_array(self) -> [Real; 12] {
        self.data
    }

    /// Composes two transforms: the result applies `rhs` first, then `self`.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let a = &self.data;
        let b = &rhs.data;
        let mut out = [0.0; 12];
        for row in 0..3 {
            let base = row * 4;
            for col in 0..4 {
                out[base + col] =
                    a[base] * b[col] + a[base + 1] * b[4 + col] + a[base + 2] * b[8 + col];
            }
            out[base + 3] += a[base + 3];
        }
        Self::new(out)
    }

    /// Transforms a point (rotation plus translation).
    pub fn transform(&self, v: &Vec3) -> Vec3 {
        let d = &self.data;
        Vec3::new(
            v.x * d[0] + v.y * d[1] + v.z * d[2] + d[3],
            v.x * d[4] + v.y * d[5] + v.z * d[6] + d[7],
            v.x * d[8] + v.y * d[9] + v.z * d[10] + d[11],
        )
    }

    /// Inverse-transforms a point, assuming the rotation block is orthonormal.
    pub fn transform_inverse(&self, v: &Vec3) -> Vec3 {
        let d = &self.data;
        let t = Vec3::new(v.x - d[3], v.y - d[7], v.z - d[11]);
        self.transform_inverse_direction(&t)
    }

    /// Transforms a direction (rotation only).
    pub fn transform_direction(&self, v: &Vec3) -> Vec3 {
        let d = &self.data;
        Vec3::new(
            v.x * d[0] + v.y * d[1] + v.z * d[2],
            v.x * d[4] + v.y * d[5] + v.z * d[6],
            v.x * d[8] + v.y * d[9] + v.z * d[10],
        )
    }

    /// Inverse-transforms a direction by the transpose of the rotation block.
    pub fn transform_inverse_direction(&self, v: &Vec3) -> Vec3 {
        let d = &self.data;
        Vec3::new(
            v.x * d[0] + v.y * d[4] + v.z * d[8],
            v.x * d[1] + v.y * d[5] + v.z * d[9],
            v.x * d[2] + v.y * d[6] + v.z * d[10],
        )
    }

    /// Determinant of the 3×3 rotation block.
    pub fn determinant(&self) -> Real {
        let d = &self.data;
        -d[8] * d[5] * d[2] + d[4] * d[9] * d[2] + d[8] * d[1] * d[6]
            - d[0] * d[9] * d[6]
            - d[4] * d[1] * d[10]
            + d[0] * d[5] * d[10]
    }

    /// Returns the inverse transform, or `None` when the rotation block is
    /// singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() <= SINGULAR_EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let m = &self.data;
        Some(Self::new([
            (-m[9] * m[6] + m[5] * m[10]) * inv,
            (m[9] * m[2] - m[1] * m[10]) * inv,
            (-m[5] * m[2] + m[1] * m[6]) * inv,
            (m[9] * m[6] * m[3] - m[5] * m[10] * m[3] - m[9] * m[2] * m[7]
                + m[1] * m[10] * m[7]
                + m[5] * m[2] * m[11]
                - m[1] * m[6] * m[11])
                * inv,
            (m[8] * m[6] - m[4] * m[10]) * inv,
            (-m[8] * m[2] + m[0] * m[10]) * inv,
            (m[4] * m[2] - m[0] * m[6]) * inv,
            (-m[8] * m[6] * m[3] + m[4] * m[10] * m[3] + m[8] * m[2] * m[7]
                - m[0] * m[10] * m[7]
                - m[4] * m[2] * m[11]
                + m[0] * m[6] * m[11])
                * inv,
            (-m[8] * m[5] + m[4] * m[9]) * inv,
            (m[8] * m[1] - m[0] * m[9]) * inv,
            (-m[4] * m[1] + m[0] * m[5]) * inv,
            (m[8] * m[5] * m[3] - m[4] * m[9] * m[3] - m[8] * m[1] * m[7]
                + m[0] * m[9] * m[7]
                + m[4] * m[1] * m[11]
                - m[0] * m[5] * m[11])
                * inv,
        ]))
    }

    /// Column `i` as a vector; columns 0..=2 are the basis axes and column 3
    /// the translation.
    pub fn axis(&self, i: usize) -> Vec3 {
        Vec3::new(self.data[i], self.data[i + 4], self.data[i + 8])
    }

    /// The 3×3 rotation block.
    pub fn rotation(&self) -> Mat3 {
        let d = &self.data;
        Mat3::new([d[0], d[1], d[2], d[4], d[5], d[6], d[8], d[9], d[10]])
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[Real; 12]> for Mat4 {
    fn from(value: [Real; 12]) -> Self {
        Self::new(value)
    }
}

impl Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<Vec3> for Mat4 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform(&rhs)
    }
}

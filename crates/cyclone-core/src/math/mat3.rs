// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::ops::{Add, Mul};

use crate::math::{Quat, Real, Vec3, SINGULAR_EPSILON};

/// Row-major 3×3 matrix, used for rotations and inertia tensors.
///
/// Element `(row, col)` lives at `data[row * 3 + col]`.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mat3 {
    data: [Real; 9],
}

impl Mat3 {
    /// Creates a matrix from row-major elements.
    pub const fn new(data: [Real; 9]) -> Self {
        Self { data }
    }

    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self::new([
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0,
        ])
    }

    /// Returns the all-zero matrix.
    pub const fn zero() -> Self {
        Self::new([0.0; 9])
    }

    /// Diagonal matrix with `a`, `b`, `c` on the leading diagonal.
    pub fn from_diagonal(a: Real, b: Real, c: Real) -> Self {
        Self::from_inertia_coeffs(a, b, c, 0.0, 0.0, 0.0)
    }

    /// Inertia tensor from principal moments and products of inertia.
    ///
    /// Products appear negated off the diagonal, following the usual tensor
    /// convention.
    pub fn from_inertia_coeffs(
        ix: Real,
        iy: Real,
        iz: Real,
        ixy: Real,
        ixz: Real,
        iyz: Real,
    ) -> Self {
        Self::new([
            ix, -ixy, -ixz, //
            -ixy, iy, -iyz, //
            -ixz, -iyz, iz,
        ])
    }

    /// Inertia tensor of an axis-aligned rectangular block with the given
    /// half-extents and mass.
    pub fn block_inertia(half_sizes: Vec3, mass: Real) -> Self {
        let sq = half_sizes.component_product(&half_sizes);
        Self::from_diagonal(
            0.3 * mass * (sq.y + sq.z),
            0.3 * mass * (sq.x + sq.z),
            0.3 * mass * (sq.x + sq.y),
        )
    }

    /// Skew-symmetric matrix `[v]×` so that `[v]× · w == v × w`.
    pub fn skew_symmetric(v: Vec3) -> Self {
        Self::new([
            0.0, -v.z, v.y, //
            v.z, 0.0, -v.x, //
            -v.y, v.x, 0.0,
        ])
    }

    /// Builds a matrix whose columns are `a`, `b` and `c`.
    pub fn from_columns(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self::new([
            a.x, b.x, c.x, //
            a.y, b.y, c.y, //
            a.z, b.z, c.z,
        ])
    }

    /// Rotation matrix for a unit quaternion.
    ///
    /// Matches the rotation block produced by
    /// [`crate::math::Mat4::from_orientation_and_position`].
    pub fn from_quat(q: &Quat) -> Self {
        let (r, i, j, k) = (q.r, q.i, q.j, q.k);
        Self::new([
            1.0 - (2.0 * j * j + 2.0 * k * k),
            2.0 * i * j - 2.0 * k * r,
            2.0 * i * k + 2.0 * j * r,
            2.0 * i * j + 2.0 * k * r,
            1.0 - (2.0 * i * i + 2.0 * k * k),
            2.0 * j * k - 2.0 * i * r,
            2.0 * i * k - 2.0 * j * r,
            2.0 * j * k + 2.0 * i * r,
            1.0 - (2.0 * i * i + 2.0 * j * j),
        ])
    }

    /// Returns the underlying row-major array.
    pub fn to_array(self) -> [Real; 9] {
        self.data
    }

    /// Element at `(row, col)`. Indices must be below 3.
    pub fn get(&self, row: usize, col: usize) -> Real {
        self.data[row * 3 + col]
    }

    /// Multiplies `self * v`.
    pub fn transform(&self, v: &Vec3) -> Vec3 {
        let d = &self.data;
        Vec3::new(
            v.x * d[0] + v.y * d[1] + v.z * d[2],
            v.x * d[3] + v.y * d[4] + v.z * d[5],
            v.x * d[6] + v.y * d[7] + v.z * d[8],
        )
    }

    /// Multiplies `selfᵗ * v` without building the transpose.
    pub fn transform_transpose(&self, v: &Vec3) -> Vec3 {
        let d = &self.data;
        Vec3::new(
            v.x * d[0] + v.y * d[3] + v.z * d[6],
            v.x * d[1] + v.y * d[4] + v.z * d[7],
            v.x * d[2] + v.y * d[5] + v.z * d[8],
        )
    }

    /// Row `i` as a vector.
    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::new(self.data[i * 3], self.data[i * 3 + 1], self.data[i * 3 + 2])
    }

    /// Column `i` as a vector (the `i`-th basis axis of a rotation).
    pub fn axis(&self, i: usize) -> Vec3 {
        Vec3::new(self.data[i], self.data[i + 3], self.data[i + 6])
    }

    /// Returns the transpose.
    pub fn transpose(&self) -> Self {
        let d = &self.data;
        Self::new([d[0], d[3], d[6], d[1], d[4], d[7], d[2], d[5], d[8]])
    }

    /// Matrix product `self * rhs`.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let a = &self.data;
        let b = &rhs.data;
        let mut out = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                out[row * 3 + col] = a[row * 3] * b[col]
                    + a[row * 3 + 1] * b[3 + col]
                    + a[row * 3 + 2] * b[6 + col];
            }
        }
        Self::new(out)
    }

    /// Multiplies every element by `s`.
    pub fn scale(&self, s: Real) -> Self {
        Self::new(self.data.map(|e| e * s))
    }

    /// Element-wise sum.
    pub fn add(&self, rhs: &Self) -> Self {
        let mut out = self.data;
        for (o, r) in out.iter_mut().zip(rhs.data.iter()) {
            *o += r;
        }
        Self::new(out)
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> Real {
        let d = &self.data;
        d[0] * (d[4] * d[8] - d[5] * d[7]) - d[1] * (d[3] * d[8] - d[5] * d[6])
            + d[2] * (d[3] * d[7] - d[4] * d[6])
    }

    /// Returns the inverse, or `None` when the determinant is (nearly) zero.
    pub fn inverse(&self) -> Option<Self> {
        let d = &self.data;
        let det = self.determinant();
        if det.abs() <= SINGULAR_EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(Self::new([
            (d[4] * d[8] - d[5] * d[7]) * inv,
            -(d[1] * d[8] - d[2] * d[7]) * inv,
            (d[1] * d[5] - d[2] * d[4]) * inv,
            -(d[3] * d[8] - d[5] * d[6]) * inv,
            (d[0] * d[8] - d[2] * d[6]) * inv,
            -(d[0] * d[5] - d[2] * d[3]) * inv,
            (d[3] * d[7] - d[4] * d[6]) * inv,
            -(d[0] * d[7] - d[1] * d[6]) * inv,
            (d[0] * d[4] - d[1] * d[3]) * inv,
        ]))
    }

    /// Element-wise linear interpolation: `a * (1 - t) + b * t`.
    pub fn lerp(a: &Self, b: &Self, t: Real) -> Self {
        let mut out = [0.0; 9];
        for (i, o) in out.iter_mut().enumerate() {
            *o = a.data[i] * (1.0 - t) + b.data[i] * t;
        }
        Self::new(out)
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[Real; 9]> for Mat3 {
    fn from(value: [Real; 9]) -> Self {
        Self::new(value)
    }
}

impl Mul for Mat3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform(&rhs)
    }
}

impl Mul<Real> for Mat3 {
    type Output = Self;
    fn mul(self, rhs: Real) -> Self {
        self.scale(rhs)
    }
}

impl Add for Mat3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Mat3::add(&self, &rhs)
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::f64::consts::PI;

use cyclone_core::math::{real_sqrt, Real, Vec3};

/// Sphere in world space.
///
/// Invariants:
/// - `radius` is non-negative.
/// - Spheres are immutable once built; [`BoundingSphere::enclosing`] is the
///   only way to grow one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingSphere {
    centre: Vec3,
    radius: Real,
}

impl BoundingSphere {
    /// Creates a sphere at `centre` with the given `radius`.
    pub fn new(centre: Vec3, radius: Real) -> Self {
        debug_assert!(radius >= 0.0, "negative bounding radius: {radius}");
        Self { centre, radius }
    }

    /// Centre of the sphere.
    pub fn centre(&self) -> Vec3 {
        self.centre
    }

    /// Radius of the sphere.
    pub fn radius(&self) -> Real {
        self.radius
    }

    /// Smallest sphere of this construction that encloses both `a` and `b`.
    ///
    /// When one sphere already contains the other the larger one is returned
    /// unchanged. Otherwise the result spans both along the line through their
    /// centres.
    pub fn enclosing(a: &Self, b: &Self) -> Self {
        let offset = b.centre - a.centre;
        let distance_sq = offset.length_squared();
        let radius_diff = b.radius - a.radius;

        if radius_diff * radius_diff >= distance_sq {
            return if a.radius > b.radius { *a } else { *b };
        }

        let distance = real_sqrt(distance_sq);
        let radius = (distance + a.radius + b.radius) * 0.5;
        let mut centre = a.centre;
        if distance > 0.0 {
            centre += offset * ((radius - a.radius) / distance);
        }
        Self { centre, radius }
    }

    /// Returns `true` if the spheres overlap. Touching spheres do not.
    pub fn overlaps(&self, other: &Self) -> bool {
        let distance_sq = (self.centre - other.centre).length_squared();
        let reach = self.radius + other.radius;
        distance_sq < reach * reach
    }

    /// How much this sphere would grow to also enclose `other`, measured as
    /// the change in squared radius (proportional to surface area).
    pub fn growth(&self, other: &Self) -> Real {
        let merged = Self::enclosing(self, other);
        merged.radius * merged.radius - self.radius * self.radius
    }

    /// Volume of the sphere.
    pub fn size(&self) -> Real {
        4.0 / 3.0 * PI * self.radius * self.radius * self.radius
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Broad-phase interfaces, the bounding volume hierarchy, and an all-pairs
//! reference implementation.
//!
//! Contract (applies to every implementation here):
//! - A body appears at most once; upserting a present body replaces its
//!   volume.
//! - Potential contacts are written in an implementation-defined but
//!   deterministic order. Compare sets via [`PotentialContact::canonical`].
//! - At most `limit` contacts are appended per query and the count appended
//!   is returned, so callers can track remaining capacity across queries.

#[doc = "All-pairs reference broad phase."]
pub mod all_pairs;
#[doc = "Bounding volume hierarchy."]
pub mod bvh;

use cyclone_core::BodyId;

use crate::types::sphere::BoundingSphere;

/// Pair of bodies whose bounding volumes overlap and that may be in contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PotentialContact {
    /// The two bodies, in the order the broad phase reported them.
    pub bodies: [BodyId; 2],
}

impl PotentialContact {
    /// Creates a potential contact between `a` and `b`.
    pub fn new(a: BodyId, b: BodyId) -> Self {
        Self { bodies: [a, b] }
    }

    /// Pair identity with the lower handle first.
    pub fn canonical(&self) -> (BodyId, BodyId) {
        let [a, b] = self.bodies;
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Broad phase over rigid-body handles keyed by bounding sphere.
pub trait BroadPhase {
    /// Inserts `body` or replaces its volume if already present.
    fn upsert(&mut self, body: BodyId, volume: BoundingSphere);
    /// Removes `body`; returns `false` if it was not present.
    fn remove(&mut self, body: BodyId) -> bool;
    /// Appends up to `limit` potential contacts to `out` and returns how many
    /// were appended.
    fn potential_contacts(&self, limit: usize, out: &mut Vec<PotentialContact>) -> usize;
}

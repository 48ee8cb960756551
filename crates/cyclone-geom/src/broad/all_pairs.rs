// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use std::collections::BTreeMap;

use cyclone_core::BodyId;

use super::{BroadPhase, PotentialContact};
use crate::types::sphere::BoundingSphere;

/// Broad phase that tests every pair, `O(n^2)`.
///
/// Serves as the correctness baseline for [`crate::Bvh`]. Pairs are emitted
/// in ascending `(low, high)` handle order, already canonical.
#[derive(Debug, Clone, Default)]
pub struct AllPairs {
    items: BTreeMap<BodyId, BoundingSphere>,
}

impl AllPairs {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no bodies are present.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl BroadPhase for AllPairs {
    fn upsert(&mut self, body: BodyId, volume: BoundingSphere) {
        self.items.insert(body, volume);
    }

    fn remove(&mut self, body: BodyId) -> bool {
        self.items.remove(&body).is_some()
    }

    fn potential_contacts(&self, limit: usize, out: &mut Vec<PotentialContact>) -> usize {
        let items: Vec<(BodyId, BoundingSphere)> =
            self.items.iter().map(|(id, sphere)| (*id, *sphere)).collect();
        let mut count = 0;
        for (i, (a_id, a_sphere)) in items.iter().enumerate() {
            for (b_id, b_sphere) in items.iter().skip(i + 1) {
                if count == limit {
                    return count;
                }
                if a_sphere.overlaps(b_sphere) {
                    out.push(PotentialContact::new(*a_id, *b_id));
                    count += 1;
                }
            }
        }
        count
    }
}

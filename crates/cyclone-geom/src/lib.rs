// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Coarse collision detection for Cyclone.

This crate provides:
- Bounding spheres (`BoundingSphere`) with merge, overlap and growth queries.
- A bounding volume hierarchy (`Bvh`) over rigid-body handles that reports
  potential contacts.
- A `BroadPhase` trait and an `O(n^2)` `AllPairs` reference used to
  cross-check the tree.

Design notes:
- Deterministic: insertion and enumeration order depend only on the sequence
  of calls; no hashing order or RNG leaks into results.
- Overlap is strict: touching spheres are not reported.
"]
#![forbid(unsafe_code)]

/// Broad-phase structures and the shared trait.
pub mod broad;
/// Bounding volumes.
pub mod types;

pub use broad::all_pairs::AllPairs;
pub use broad::bvh::{Bvh, BvhNode, NodeId, NodeKind};
pub use broad::{BroadPhase, PotentialContact};
pub use types::sphere::BoundingSphere;

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bounding volumes used by the broad phase.
//!
//! Volumes are plain `Copy` values in world space. Merging never shrinks: the
//! merged volume always encloses both inputs, so a branch volume built from
//! its children stays conservative.

#[doc = "Bounding spheres."]
pub mod sphere;

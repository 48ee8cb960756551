// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use cyclone_core::{Real, Vec3};

pub const EPS: Real = 1e-9;

pub fn approx(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() <= eps
}

pub fn assert_vec_approx(a: Vec3, b: Vec3, eps: Real) {
    assert!(
        approx(a.x, b.x, eps) && approx(a.y, b.y, eps) && approx(a.z, b.z, eps),
        "{a:?} vs {b:?} (eps {eps})"
    );
}

pub fn assert_array_approx(a: &[Real], b: &[Real], eps: Real) {
    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!(approx(*x, *y, eps), "index {i}: {a:?} vs {b:?}");
    }
}

/// Routes `tracing` output through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
mod common;

use core::f64::consts::FRAC_PI_2;

use common::{assert_array_approx, assert_vec_approx, EPS};
use cyclone_core::{Mat3, Mat4, PhysicsError, Quat, RigidBody, Vec3};

#[test]
fn construction_computes_derived_data() {
    let body = RigidBody::new(2.0, Mat3::from_diagonal(1.0, 2.0, 4.0))
        .unwrap()
        .with_position(Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(body.transform().axis(3).to_array(), [1.0, 2.0, 3.0]);
    assert_eq!(body.inverse_mass(), 0.5);
    assert_array_approx(
        &body.inverse_inertia_tensor_world().to_array(),
        &Mat3::from_diagonal(1.0, 0.5, 0.25).to_array(),
        EPS,
    );
    assert!(body.is_awake());
    assert_eq!(body.motion(), 2.0 * body.sleep_epsilon());
}

#[test]
fn integrate_updates_velocity_before_position() {
    let mut body = RigidBody::default()
        .with_can_sleep(false)
        .with_velocity(Vec3::new(1.0, 0.0, 0.0))
        .with_acceleration(Vec3::new(0.0, -10.0, 0.0));
    body.integrate(0.5).unwrap();
    assert_eq!(body.velocity().to_array(), [1.0, -5.0, 0.0]);
    assert_eq!(body.position().to_array(), [0.5, -2.5, 0.0]);
    assert_eq!(body.last_frame_acceleration().to_array(), [0.0, -10.0, 0.0]);
    assert_eq!(body.transform().axis(3), body.position());
}

#[test]
fn torque_spins_the_body_and_keeps_orientation_unit() {
    let mut body = RigidBody::default().with_can_sleep(false);
    body.add_torque(Vec3::new(0.0, 0.0, 1.0));
    body.integrate(1.0).unwrap();
    assert_eq!(body.rotation().to_array(), [0.0, 0.0, 1.0]);
    let q = body.orientation();
    assert!(q.k > 0.0);
    assert!((q.length() - 1.0).abs() < EPS);
    assert_eq!(body.accumulated_torque(), Vec3::ZERO);
    assert_eq!(body.accumulated_force(), Vec3::ZERO);
}

#[test]
fn off_centre_force_produces_torque() {
    let mut body = RigidBody::default();
    body.add_force_at_point(Vec3::UNIT_Y, Vec3::UNIT_X);
    assert_eq!(body.accumulated_force(), Vec3::UNIT_Y);
    assert_eq!(body.accumulated_torque(), Vec3::UNIT_Z);

    let mut turned = RigidBody::default()
        .with_position(Vec3::new(5.0, 0.0, 0.0))
        .with_orientation(Quat::from_axis_angle(Vec3::UNIT_Z, FRAC_PI_2));
    // Body +X points along world +Y once turned.
    turned.add_force_at_body_point(Vec3::UNIT_X, Vec3::UNIT_X);
    assert_vec_approx(turned.accumulated_torque(), Vec3::new(0.0, 0.0, -1.0), EPS);
}

#[test]
fn frame_conversions_round_trip() {
    let body = RigidBody::default()
        .with_position(Vec3::new(1.0, -2.0, 0.5))
        .with_orientation(Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.7));
    let p = Vec3::new(0.3, 0.2, -0.9);
    let world = body.point_in_world_space(&p);
    assert_vec_approx(body.point_in_local_space(&world), p, EPS);
    let d = body.direction_in_world_space(&p);
    assert_vec_approx(body.direction_in_local_space(&d), p, EPS);
}

#[test]
fn world_inertia_follows_orientation() {
    let mut body = RigidBody::default();
    body.set_inverse_inertia_tensor(Mat3::from_diagonal(1.0, 2.0, 3.0));
    body.set_orientation(Quat::from_axis_angle(Vec3::UNIT_Z, FRAC_PI_2));
    body.calculate_derived_data();
    assert_array_approx(
        &body.inverse_inertia_tensor_world().to_array(),
        &Mat3::from_diagonal(2.0, 1.0, 3.0).to_array(),
        EPS,
    );
    let rotation = body.transform().rotation();
    let expected = rotation
        .multiply(&body.inverse_inertia_tensor())
        .multiply(&rotation.transpose());
    assert_eq!(body.inverse_inertia_tensor_world(), expected);
}

#[test]
fn slow_body_falls_asleep_and_stays_frozen() {
    let mut body = RigidBody::default().with_velocity(Vec3::new(0.1, 0.0, 0.0));
    let mut steps = 0;
    while body.is_awake() && steps < 100 {
        body.integrate(0.1).unwrap();
        steps += 1;
    }
    assert!(!body.is_awake(), "body should sleep within 100 steps");
    assert!(steps > 1);
    assert_eq!(body.velocity(), Vec3::ZERO);
    assert_eq!(body.rotation(), Vec3::ZERO);

    let frozen = body.position();
    body.integrate(0.1).unwrap();
    assert_eq!(body.position(), frozen);
    // Asleep: even an invalid duration is a no-op.
    assert!(body.integrate(0.0).is_ok());
}

#[test]
fn forces_wake_a_sleeping_body() {
    let mut body = RigidBody::default();
    body.set_awake(false);
    assert!(!body.is_awake());
    body.add_force(Vec3::UNIT_Y);
    assert!(body.is_awake());
    assert_eq!(body.motion(), 2.0 * body.sleep_epsilon());
}

#[test]
fn forces_on_an_awake_body_keep_its_motion() {
    let mut body = RigidBody::default().with_velocity(Vec3::new(0.1, 0.0, 0.0));
    body.integrate(0.1).unwrap();
    assert!(body.is_awake());
    let motion = body.motion();
    assert!(motion < 2.0 * body.sleep_epsilon());

    body.add_force(Vec3::UNIT_Y);
    body.add_force_at_point(Vec3::UNIT_X, Vec3::UNIT_Z);
    body.add_force_at_body_point(Vec3::UNIT_X, Vec3::UNIT_Y);
    body.add_torque(Vec3::UNIT_Z);
    assert_eq!(body.motion(), motion);

    body.set_can_sleep(false);
    assert_eq!(body.motion(), motion);
}

#[test]
fn disabling_sleep_wakes_the_body() {
    let mut body = RigidBody::default();
    body.set_awake(false);
    body.set_can_sleep(false);
    assert!(body.is_awake());
    assert!(!body.can_sleep());
}

#[test]
fn motion_is_capped_at_ten_times_epsilon() {
    let mut body = RigidBody::default().with_velocity(Vec3::new(100.0, 0.0, 0.0));
    for _ in 0..5 {
        body.integrate(1.0).unwrap();
    }
    assert!(body.is_awake());
    assert_eq!(body.motion(), 10.0 * body.sleep_epsilon());
}

#[test]
fn awake_body_rejects_non_positive_duration() {
    let mut body = RigidBody::default();
    assert_eq!(body.integrate(0.0), Err(PhysicsError::InvalidDuration(0.0)));
}

#[test]
fn degenerate_mass_and_inertia_are_rejected() {
    let mut body = RigidBody::default();
    assert_eq!(body.set_mass(0.0), Err(PhysicsError::InvalidMass(0.0)));
    assert_eq!(
        body.set_inertia_tensor(&Mat3::zero()),
        Err(PhysicsError::SingularMatrix)
    );
    assert_eq!(body.inverse_inertia_tensor(), Mat3::identity());
    assert!(RigidBody::new(1.0, Mat3::zero()).is_err());

    body.set_inertia_tensor(&Mat3::from_diagonal(2.0, 4.0, 8.0)).unwrap();
    assert_eq!(
        body.inverse_inertia_tensor(),
        Mat3::from_diagonal(0.5, 0.25, 0.125)
    );
    assert_eq!(body.inertia_tensor(), Some(Mat3::from_diagonal(2.0, 4.0, 8.0)));
}

#[test]
fn immovable_body_ignores_forces() {
    let mut body = RigidBody::immovable(Vec3::new(0.0, 1.0, 0.0)).with_can_sleep(false);
    body.add_force(Vec3::new(0.0, -100.0, 0.0));
    body.add_torque(Vec3::UNIT_X);
    body.integrate(1.0).unwrap();
    assert_eq!(body.position().to_array(), [0.0, 1.0, 0.0]);
    assert_eq!(body.rotation(), Vec3::ZERO);
    assert!(!body.has_finite_mass());
    assert!(body.inertia_tensor().is_none());
    assert_eq!(body.transform(), Mat4::from_orientation_and_position(&Quat::identity(), &body.position()));
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rigid bodies: linear and angular state, derived world-space data, and the
//! sleep-aware integrator.

use tracing::trace;

use crate::config::DEFAULT_SLEEP_EPSILON;
use crate::error::{check_duration, PhysicsError};
use crate::math::{real_pow, Mat3, Mat4, Quat, Real, Vec3};

/// Rigid body integrated with Newton-Euler equations.
///
/// The body alternates between two states:
/// - **awake**: integrates and accepts forces;
/// - **asleep**: velocity and rotation are zero and [`RigidBody::integrate`]
///   does nothing.
///
/// Any force or torque wakes the body. The cached transform and world-space
/// inverse inertia tensor are valid after construction, after
/// [`RigidBody::integrate`], and after [`RigidBody::calculate_derived_data`];
/// setters that move or rotate the body leave them stale until one of those
/// runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    inverse_mass: Real,
    inverse_inertia_tensor: Mat3,
    linear_damping: Real,
    angular_damping: Real,
    position: Vec3,
    orientation: Quat,
    velocity: Vec3,
    rotation: Vec3,
    acceleration: Vec3,

    inverse_inertia_tensor_world: Mat3,
    transform: Mat4,
    last_frame_acceleration: Vec3,

    force_accum: Vec3,
    torque_accum: Vec3,

    motion: Real,
    is_awake: bool,
    can_sleep: bool,
    sleep_epsilon: Real,
}

impl Default for RigidBody {
    /// Unit mass with an identity inertia tensor, at rest at the origin.
    fn default() -> Self {
        let mut body = Self {
            inverse_mass: 1.0,
            inverse_inertia_tensor: Mat3::identity(),
            linear_damping: 1.0,
            angular_damping: 1.0,
            position: Vec3::ZERO,
            orientation: Quat::identity(),
            velocity: Vec3::ZERO,
            rotation: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            inverse_inertia_tensor_world: Mat3::identity(),
            transform: Mat4::identity(),
            last_frame_acceleration: Vec3::ZERO,
            force_accum: Vec3::ZERO,
            torque_accum: Vec3::ZERO,
            motion: 2.0 * DEFAULT_SLEEP_EPSILON,
            is_awake: true,
            can_sleep: true,
            sleep_epsilon: DEFAULT_SLEEP_EPSILON,
        };
        body.calculate_derived_data();
        body
    }
}

impl RigidBody {
    /// Creates an awake body with the given mass and body-space inertia
    /// tensor.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidMass`] for a non-positive or non-finite
    /// mass and [`PhysicsError::SingularMatrix`] when the tensor cannot be
    /// inverted.
    pub fn new(mass: Real, inertia_tensor: Mat3) -> Result<Self, PhysicsError> {
        let mut body = Self::default();
        body.set_mass(mass)?;
        body.set_inertia_tensor(&inertia_tensor)?;
        body.calculate_derived_data();
        Ok(body)
    }

    /// Creates an immovable body (infinite mass and inertia).
    pub fn immovable(position: Vec3) -> Self {
        let mut body = Self {
            inverse_mass: 0.0,
            inverse_inertia_tensor: Mat3::zero(),
            position,
            ..Self::default()
        };
        body.calculate_derived_data();
        body
    }

    /// Sets the position and refreshes derived data.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self.calculate_derived_data();
        self
    }

    /// Sets the orientation (normalised) and refreshes derived data.
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self.calculate_derived_data();
        self
    }

    /// Sets the linear velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the angular velocity.
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the constant acceleration.
    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Sets linear and angular damping.
    pub fn with_damping(mut self, linear: Real, angular: Real) -> Self {
        self.set_damping(linear, angular);
        self
    }

    /// Sets whether the body may fall asleep.
    pub fn with_can_sleep(mut self, can_sleep: bool) -> Self {
        self.set_can_sleep(can_sleep);
        self
    }

    // ── Derived data ────────────────────────────────────────────────────

    /// Normalises the orientation and rebuilds the transform and world-space
    /// inverse inertia tensor.
    pub fn calculate_derived_data(&mut self) {
        self.orientation = self.orientation.normalize();
        self.transform = Mat4::from_orientation_and_position(&self.orientation, &self.position);
        let r = self.transform.rotation();
        self.inverse_inertia_tensor_world = r
            .multiply(&self.inverse_inertia_tensor)
            .multiply(&r.transpose());
    }

    /// Advances the body by `duration` seconds.
    ///
    /// Sleeping bodies are left untouched. Otherwise linear and angular
    /// velocity pick up the accumulated force and torque, are damped by
    /// `damping^duration`, and then move the position and orientation. After
    /// the derived data is rebuilt and the accumulators cleared, a bias-weighted
    /// motion average decides whether the body may fall asleep.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidDuration`] for `duration <= 0` on an
    /// awake body.
    pub fn integrate(&mut self, duration: Real) -> Result<(), PhysicsError> {
        if !self.is_awake {
            return Ok(());
        }
        check_duration(duration)?;

        self.last_frame_acceleration = self
            .acceleration
            .add_scaled(&self.force_accum, self.inverse_mass);
        let angular_acceleration = self.inverse_inertia_tensor_world.transform(&self.torque_accum);

        self.velocity = self
            .velocity
            .add_scaled(&self.last_frame_acceleration, duration);
        self.rotation = self.rotation.add_scaled(&angular_acceleration, duration);

        self.velocity *= real_pow(self.linear_damping, duration);
        self.rotation *= real_pow(self.angular_damping, duration);

        self.position = self.position.add_scaled(&self.velocity, duration);
        self.orientation = self.orientation.add_scaled_vector(&self.rotation, duration);

        self.calculate_derived_data();
        self.clear_accumulators();

        if self.can_sleep {
            let current = self.velocity.dot(&self.velocity) + self.rotation.dot(&self.rotation);
            let bias = real_pow(0.5, duration);
            self.motion = bias * self.motion + (1.0 - bias) * current;

            if self.motion < self.sleep_epsilon {
                trace!(motion = self.motion, "body fell asleep");
                self.set_awake(false);
            } else if self.motion > 10.0 * self.sleep_epsilon {
                self.motion = 10.0 * self.sleep_epsilon;
            }
        }
        Ok(())
    }

    // ── Forces ──────────────────────────────────────────────────────────

    /// Adds a force through the centre of mass and wakes the body.
    pub fn add_force(&mut self, force: Vec3) {
        self.force_accum += force;
        self.wake();
    }

    /// Adds a force at a world-space point, producing torque about the centre
    /// of mass.
    pub fn add_force_at_point(&mut self, force: Vec3, point: Vec3) {
        let arm = point - self.position;
        self.force_accum += force;
        self.torque_accum += arm.cross(&force);
        self.wake();
    }

    /// Adds a world-space force at a body-space point.
    pub fn add_force_at_body_point(&mut self, force: Vec3, point: Vec3) {
        let world = self.point_in_world_space(&point);
        self.add_force_at_point(force, world);
    }

    /// Adds a world-space torque and wakes the body.
    pub fn add_torque(&mut self, torque: Vec3) {
        self.torque_accum += torque;
        self.wake();
    }

    /// Discards accumulated force and torque.
    pub fn clear_accumulators(&mut self) {
        self.force_accum = Vec3::ZERO;
        self.torque_accum = Vec3::ZERO;
    }

    /// Force accumulated since the last integration.
    pub fn accumulated_force(&self) -> Vec3 {
        self.force_accum
    }

    /// Torque accumulated since the last integration.
    pub fn accumulated_torque(&self) -> Vec3 {
        self.torque_accum
    }

    // ── Mass and inertia ────────────────────────────────────────────────

    /// Mass; `Real::MAX` stands in for infinite mass.
    pub fn mass(&self) -> Real {
        if self.inverse_mass == 0.0 {
            Real::MAX
        } else {
            1.0 / self.inverse_mass
        }
    }

    /// Sets the mass.
    ///
    /// # Errors
    /// Returns [`PhysicsError::InvalidMass`] for zero, negative or non-finite
    /// input. Use [`RigidBody::set_inverse_mass`] with `0` for an immovable
    /// body.
    pub fn set_mass(&mut self, mass: Real) -> Result<(), PhysicsError> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(PhysicsError::InvalidMass(mass));
        }
        self.inverse_mass = 1.0 / mass;
        Ok(())
    }

    /// Reciprocal of the mass.
    pub fn inverse_mass(&self) -> Real {
        self.inverse_mass
    }

    /// Sets the reciprocal of the mass directly (`0` = immovable).
    pub fn set_inverse_mass(&mut self, inverse_mass: Real) {
        self.inverse_mass = inverse_mass;
    }

    /// Returns `true` unless the body is immovable.
    pub fn has_finite_mass(&self) -> bool {
        self.inverse_mass > 0.0
    }

    /// Stores the inverse of a body-space inertia tensor.
    ///
    /// # Errors
    /// Returns [`PhysicsError::SingularMatrix`] when `tensor` has no inverse;
    /// the body keeps its previous tensor.
    pub fn set_inertia_tensor(&mut self, tensor: &Mat3) -> Result<(), PhysicsError> {
        let inverse = tensor.inverse().ok_or(PhysicsError::SingularMatrix)?;
        self.inverse_inertia_tensor = inverse;
        Ok(())
    }

    /// Stores a body-space inverse inertia tensor as given.
    pub fn set_inverse_inertia_tensor(&mut self, inverse: Mat3) {
        self.inverse_inertia_tensor = inverse;
    }

    /// Body-space inertia tensor, or `None` when the stored inverse is
    /// singular (e.g. an immovable body).
    pub fn inertia_tensor(&self) -> Option<Mat3> {
        self.inverse_inertia_tensor.inverse()
    }

    /// Body-space inverse inertia tensor.
    pub fn inverse_inertia_tensor(&self) -> Mat3 {
        self.inverse_inertia_tensor
    }

    /// World-space inertia tensor, or `None` when singular.
    pub fn inertia_tensor_world(&self) -> Option<Mat3> {
        self.inverse_inertia_tensor_world.inverse()
    }

    /// World-space inverse inertia tensor as of the last derived-data update.
    pub fn inverse_inertia_tensor_world(&self) -> Mat3 {
        self.inverse_inertia_tensor_world
    }

    // ── State accessors ─────────────────────────────────────────────────

    /// Centre of mass in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the body. Call [`RigidBody::calculate_derived_data`] before
    /// reading the transform.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Orientation quaternion.
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Sets the orientation, normalising it.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation.normalize();
    }

    /// Linear velocity.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Sets the linear velocity.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Angular velocity.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Sets the angular velocity.
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    /// Constant acceleration applied every step.
    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Sets the constant acceleration.
    pub fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }

    /// Linear damping factor.
    pub fn linear_damping(&self) -> Real {
        self.linear_damping
    }

    /// Angular damping factor.
    pub fn angular_damping(&self) -> Real {
        self.angular_damping
    }

    /// Sets linear and angular damping.
    pub fn set_damping(&mut self, linear: Real, angular: Real) {
        self.linear_damping = linear;
        self.angular_damping = angular;
    }

    /// Acceleration (including accumulated force) used in the last step.
    pub fn last_frame_acceleration(&self) -> Vec3 {
        self.last_frame_acceleration
    }

    // ── Frames ──────────────────────────────────────────────────────────

    /// Cached body-to-world transform.
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Converts a body-space point to world space.
    pub fn point_in_world_space(&self, point: &Vec3) -> Vec3 {
        self.transform.transform(point)
    }

    /// Converts a world-space point to body space.
    pub fn point_in_local_space(&self, point: &Vec3) -> Vec3 {
        self.transform.transform_inverse(point)
    }

    /// Converts a body-space direction to world space.
    pub fn direction_in_world_space(&self, direction: &Vec3) -> Vec3 {
        self.transform.transform_direction(direction)
    }

    /// Converts a world-space direction to body space.
    pub fn direction_in_local_space(&self, direction: &Vec3) -> Vec3 {
        self.transform.transform_inverse_direction(direction)
    }

    // ── Sleep ───────────────────────────────────────────────────────────

    /// Whether the body is awake.
    pub fn is_awake(&self) -> bool {
        self.is_awake
    }

    /// Wakes or sleeps the body.
    ///
    /// Waking seeds `motion` at twice the sleep threshold so the body does not
    /// fall straight back asleep; sleeping zeroes linear and angular velocity.
    pub fn set_awake(&mut self, awake: bool) {
        if awake {
            self.is_awake = true;
            self.motion = 2.0 * self.sleep_epsilon;
        } else {
            self.is_awake = false;
            self.velocity = Vec3::ZERO;
            self.rotation = Vec3::ZERO;
        }
    }

    /// Wakes a sleeping body; an awake body keeps its current `motion`.
    fn wake(&mut self) {
        if !self.is_awake {
            self.set_awake(true);
        }
    }

    /// Whether the body may fall asleep.
    pub fn can_sleep(&self) -> bool {
        self.can_sleep
    }

    /// Allows or forbids sleeping; forbidding wakes a sleeping body.
    pub fn set_can_sleep(&mut self, can_sleep: bool) {
        self.can_sleep = can_sleep;
        if !can_sleep {
            self.wake();
        }
    }

    /// Recency-weighted kinetic measure driving the sleep decision.
    pub fn motion(&self) -> Real {
        self.motion
    }

    /// Motion threshold below which the body falls asleep.
    pub fn sleep_epsilon(&self) -> Real {
        self.sleep_epsilon
    }

    /// Sets the sleep threshold.
    pub fn set_sleep_epsilon(&mut self, sleep_epsilon: Real) {
        self.sleep_epsilon = sleep_epsilon;
    }
}

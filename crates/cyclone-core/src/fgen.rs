// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Force generators acting on rigid bodies.

use crate::body::RigidBody;
use crate::handle::{BodyId, BodySet};
use crate::math::{clamp, Mat3, Real, Vec3};
use crate::pfgen::buoyancy_lift;
use crate::registry::{ForceGenerator, ForceRegistry};

/// Registry of rigid-body force generators.
pub type BodyForceRegistry = ForceRegistry<RigidBody>;

/// Constant gravitational acceleration, applied through the centre of mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Acceleration due to gravity.
    pub gravity: Vec3,
}

impl Gravity {
    /// Creates a gravity generator.
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }
}

impl ForceGenerator<RigidBody> for Gravity {
    fn update_force(&mut self, target: BodyId, set: &mut BodySet, _duration: Real) {
        let Some(body) = set.get_mut(target) else {
            return;
        };
        if !body.has_finite_mass() {
            return;
        }
        let force = self.gravity.scale(body.mass());
        body.add_force(force);
    }
}

/// Spring joining a point on the target to a point on another body.
///
/// Both connection points are in their own body's coordinates. The force is
/// applied at the target's connection point, so an off-centre spring also
/// produces torque.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    /// Connection point on the target, in body space.
    pub connection_point: Vec3,
    /// Body at the other end.
    pub other: BodyId,
    /// Connection point on `other`, in its body space.
    pub other_connection_point: Vec3,
    /// Stiffness.
    pub spring_constant: Real,
    /// Length at which the spring exerts no force.
    pub rest_length: Real,
}

impl Spring {
    /// Creates a body-to-body spring.
    pub fn new(
        connection_point: Vec3,
        other: BodyId,
        other_connection_point: Vec3,
        spring_constant: Real,
        rest_length: Real,
    ) -> Self {
        Self {
            connection_point,
            other,
            other_connection_point,
            spring_constant,
            rest_length,
        }
    }
}

impl ForceGenerator<RigidBody> for Spring {
    fn update_force(&mut self, target: BodyId, set: &mut BodySet, _duration: Real) {
        let Some(other_ws) = set
            .get(self.other)
            .map(|b| b.point_in_world_space(&self.other_connection_point))
        else {
            return;
        };
        let Some(body) = set.get_mut(target) else {
            return;
        };
        let lws = body.point_in_world_space(&self.connection_point);
        let d = lws - other_ws;
        let magnitude = (d.length() - self.rest_length) * self.spring_constant;
        let force = d.normalize().scale(-magnitude);
        body.add_force_at_point(force, lws);
    }
}

/// Buoyancy of a body, acting at a body-space centre of buoyancy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Buoyancy {
    /// Centre of buoyancy in body space.
    pub centre_of_buoyancy: Vec3,
    /// Submersion depth at which lift is half its maximum.
    pub max_depth: Real,
    /// Volume of the body.
    pub volume: Real,
    /// Height of the liquid surface.
    pub water_height: Real,
    /// Density of the liquid.
    pub liquid_density: Real,
}

impl Buoyancy {
    /// Creates a buoyancy generator.
    pub fn new(
        centre_of_buoyancy: Vec3,
        max_depth: Real,
        volume: Real,
        water_height: Real,
        liquid_density: Real,
    ) -> Self {
        Self {
            centre_of_buoyancy,
            max_depth,
            volume,
            water_height,
            liquid_density,
        }
    }
}

impl ForceGenerator<RigidBody> for Buoyancy {
    fn update_force(&mut self, target: BodyId, set: &mut BodySet, _duration: Real) {
        let Some(body) = set.get_mut(target) else {
            return;
        };
        let depth = body.point_in_world_space(&self.centre_of_buoyancy).y;
        let lift = buoyancy_lift(
            depth,
            self.max_depth,
            self.volume,
            self.water_height,
            self.liquid_density,
        );
        if let Some(lift) = lift {
            body.add_force_at_body_point(Vec3::new(0.0, lift, 0.0), self.centre_of_buoyancy);
        }
    }
}

/// Aerodynamic force from a body-space tensor applied to the relative wind.
fn aero_force(body: &RigidBody, tensor: &Mat3, windspeed: &Vec3) -> Vec3 {
    let velocity = body.velocity() + *windspeed;
    let body_velocity = body.direction_in_local_space(&velocity);
    let body_force = tensor.transform(&body_velocity);
    body.direction_in_world_space(&body_force)
}

/// Aerodynamic surface with a fixed tensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aero {
    /// Maps body-space air velocity to body-space force.
    pub tensor: Mat3,
    /// Point of application in body space.
    pub position: Vec3,
    /// Wind velocity in world space.
    pub windspeed: Vec3,
}

impl Aero {
    /// Creates an aerodynamic surface.
    pub fn new(tensor: Mat3, position: Vec3, windspeed: Vec3) -> Self {
        Self {
            tensor,
            position,
            windspeed,
        }
    }
}

impl ForceGenerator<RigidBody> for Aero {
    fn update_force(&mut self, target: BodyId, set: &mut BodySet, _duration: Real) {
        let Some(body) = set.get_mut(target) else {
            return;
        };
        let force = aero_force(body, &self.tensor, &self.windspeed);
        body.add_force_at_body_point(force, self.position);
    }
}

/// Control surface whose tensor blends between three states by a control
/// value in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AeroControl {
    /// Tensor at control `-1`.
    pub min_tensor: Mat3,
    /// Tensor at control `0`.
    pub base_tensor: Mat3,
    /// Tensor at control `+1`.
    pub max_tensor: Mat3,
    /// Point of application in body space.
    pub position: Vec3,
    /// Wind velocity in world space.
    pub windspeed: Vec3,
    control: Real,
}

impl AeroControl {
    /// Creates a control surface at neutral (`control = 0`).
    pub fn new(
        base_tensor: Mat3,
        min_tensor: Mat3,
        max_tensor: Mat3,
        position: Vec3,
        windspeed: Vec3,
    ) -> Self {
        Self {
            min_tensor,
            base_tensor,
            max_tensor,
            position,
            windspeed,
            control: 0.0,
        }
    }

    /// Current control value.
    pub fn control(&self) -> Real {
        self.control
    }

    /// Sets the control value, clamped to `[-1, 1]`.
    pub fn set_control(&mut self, value: Real) {
        self.control = clamp(value, -1.0, 1.0);
    }

    /// Tensor for the current control value.
    pub fn tensor(&self) -> Mat3 {
        if self.control < 0.0 {
            Mat3::lerp(&self.min_tensor, &self.base_tensor, self.control + 1.0)
        } else if self.control > 0.0 {
            Mat3::lerp(&self.base_tensor, &self.max_tensor, self.control)
        } else {
            self.base_tensor
        }
    }
}

impl ForceGenerator<RigidBody> for AeroControl {
    fn update_force(&mut self, target: BodyId, set: &mut BodySet, _duration: Real) {
        let Some(body) = set.get_mut(target) else {
            return;
        };
        let tensor = self.tensor();
        let force = aero_force(body, &tensor, &self.windspeed);
        body.add_force_at_body_point(force, self.position);
    }
}

//! Rigid-body boundary used by every force producer.
//!
//! Force models write through [`ForceReceiver`] and never integrate
//! themselves; `systems::integrator` consumes the accumulators once per tick.

use glam::DVec3;

use skylance_core::components::RigidBody;
use skylance_core::types::Pose;

/// Write side of a rigid body.
pub trait ForceReceiver {
    /// Accumulate a world-space force applied at a world-space point.
    fn add_force_at_point(&mut self, force: DVec3, world_point: DVec3);
    /// Accumulate a world-space force through the centre of mass.
    fn add_force(&mut self, force: DVec3);
    fn velocity(&self) -> DVec3;
    fn mass(&self) -> f64;
    fn angular_drag(&self) -> f64;
}

impl ForceReceiver for RigidBody {
    fn add_force_at_point(&mut self, force: DVec3, world_point: DVec3) {
        self.force += force;
        self.torque += (world_point - self.pose.position).cross(force);
    }

    fn add_force(&mut self, force: DVec3) {
        self.force += force;
    }

    fn velocity(&self) -> DVec3 {
        self.velocity
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn angular_drag(&self) -> f64 {
        self.angular_drag
    }
}

/// A dynamic body at rest.
pub fn dynamic_body(pose: Pose, mass: f64, inertia: DVec3, angular_drag: f64) -> RigidBody {
    RigidBody {
        pose,
        velocity: DVec3::ZERO,
        angular_velocity: DVec3::ZERO,
        mass,
        inertia,
        angular_drag,
        use_gravity: true,
        kinematic: false,
        force: DVec3::ZERO,
        torque: DVec3::ZERO,
    }
}

/// A body moved only by its own velocity, with orientation set by its owner.
pub fn kinematic_body(pose: Pose, velocity: DVec3) -> RigidBody {
    RigidBody {
        pose,
        velocity,
        angular_velocity: DVec3::ZERO,
        mass: 1.0,
        inertia: DVec3::ONE,
        angular_drag: 0.0,
        use_gravity: false,
        kinematic: true,
        force: DVec3::ZERO,
        torque: DVec3::ZERO,
    }
}

/// Kinematic state another system needs to read from a body.
#[derive(Debug, Clone, Copy)]
pub struct BodyState {
    pub pose: Pose,
    pub velocity: DVec3,
}

impl BodyState {
    pub fn of(body: &RigidBody) -> Self {
        Self {
            pose: body.pose,
            velocity: body.velocity,
        }
    }
}

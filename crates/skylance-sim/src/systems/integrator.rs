//! Reference rigid-body integrator.
//!
//! Semi-implicit Euler: velocities are updated from the accumulated force
//! and torque, then positions and orientations from the new velocities.
//! Runs after every force producer in the tick and clears the accumulators.

use glam::{DQuat, DVec3};
use hecs::World;

use skylance_core::components::RigidBody;

/// Integrate every rigid body by `dt` seconds.
pub fn run(world: &mut World, gravity: f64, dt: f64) {
    for (_entity, body) in world.query_mut::<&mut RigidBody>() {
        step(body, gravity, dt);
    }
}

/// Integrate one body.
pub fn step(body: &mut RigidBody, gravity: f64, dt: f64) {
    if !body.kinematic {
        let mut acceleration = if body.mass > 0.0 {
            body.force / body.mass
        } else {
            DVec3::ZERO
        };
        if body.use_gravity {
            acceleration.y -= gravity;
        }
        body.velocity += acceleration * dt;

        // Torque is resolved in the body frame where the inertia is diagonal.
        let rotation = body.pose.rotation;
        let local_torque = rotation.inverse() * body.torque;
        let local_alpha = DVec3::new(
            safe_div(local_torque.x, body.inertia.x),
            safe_div(local_torque.y, body.inertia.y),
            safe_div(local_torque.z, body.inertia.z),
        );
        body.angular_velocity += rotation * local_alpha * dt;
        body.angular_velocity *= 1.0 / (1.0 + dt * body.angular_drag);

        let spin = body.angular_velocity * dt;
        if spin.length_squared() > 0.0 {
            body.pose.rotation = (DQuat::from_scaled_axis(spin) * body.pose.rotation).normalize();
        }
    }

    body.pose.position += body.velocity * dt;
    body.force = DVec3::ZERO;
    body.torque = DVec3::ZERO;
}

fn safe_div(value: f64, inertia: f64) -> f64 {
    if inertia > 0.0 {
        value / inertia
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{dynamic_body, kinematic_body, ForceReceiver};
    use approx::assert_relative_eq;
    use skylance_core::constants::GRAVITY;
    use skylance_core::types::Pose;

    #[test]
    fn test_free_fall() {
        let mut body = dynamic_body(Pose::default(), 1000.0, DVec3::ONE, 0.0);
        for _ in 0..50 {
            step(&mut body, GRAVITY, 0.02);
        }
        assert_relative_eq!(body.velocity.y, -GRAVITY, epsilon = 1e-9);
    }

    #[test]
    fn test_force_accelerates_and_clears() {
        let mut body = dynamic_body(Pose::default(), 1000.0, DVec3::ONE, 0.0);
        body.use_gravity = false;
        body.add_force(DVec3::new(0.0, 0.0, -2000.0));
        step(&mut body, GRAVITY, 0.5);
        assert_relative_eq!(body.velocity.z, -1.0, epsilon = 1e-12);
        assert_relative_eq!(body.pose.position.z, -0.5, epsilon = 1e-12);
        assert_eq!(body.force, DVec3::ZERO);
    }

    #[test]
    fn test_torque_spins_body_and_drag_damps() {
        let mut body = dynamic_body(Pose::default(), 1000.0, DVec3::splat(100.0), 1.0);
        body.use_gravity = false;
        body.add_force_at_point(DVec3::new(0.0, -10.0, 0.0), DVec3::new(0.0, 0.0, 6.0));
        step(&mut body, GRAVITY, 0.1);
        let spin_after_torque = body.angular_velocity.x;
        assert!(spin_after_torque > 0.0);
        // Nose (−Z) rotates upward about +X.
        assert!((body.pose.rotation * DVec3::NEG_Z).y > 0.0);

        step(&mut body, GRAVITY, 0.1);
        assert!(body.angular_velocity.x < spin_after_torque);
    }

    #[test]
    fn test_kinematic_body_ignores_forces() {
        let mut body = kinematic_body(Pose::default(), DVec3::new(0.0, 0.0, -200.0));
        body.add_force(DVec3::new(1e6, 0.0, 0.0));
        step(&mut body, GRAVITY, 0.02);
        assert_eq!(body.velocity, DVec3::new(0.0, 0.0, -200.0));
        assert_relative_eq!(body.pose.position.z, -4.0, epsilon = 1e-12);
        assert_eq!(body.force, DVec3::ZERO);
    }
}

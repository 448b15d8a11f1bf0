//! Thrust, parasitic drag and braking.
//!
//! Runs every fixed tick on each airframe. Thrust follows the throttle set
//! by the frame-rate controls; brakes act on the ground or as an airbrake in
//! flight depending on a short downward probe.

use glam::DVec3;
use hecs::World;

use skylance_core::components::{Airframe, RigidBody};
use skylance_core::config::AircraftConfig;
use skylance_core::constants::{AIRBRAKE_MIN_SPEED, DRAG_MIN_SPEED, GROUND_BRAKE_SPEED_CLAMP};
use skylance_core::types::LayerMask;

use crate::body::ForceReceiver;
use crate::spatial::SpatialQuery;

/// Apply propulsion and brake forces to every airframe.
pub fn run(
    world: &mut World,
    scene: &impl SpatialQuery,
    config: &AircraftConfig,
    air_density: f64,
) {
    for (_entity, (body, airframe)) in world.query_mut::<(&mut RigidBody, &mut Airframe)>() {
        apply_thrust(body, airframe, config);
        apply_drag(body, config, air_density);

        airframe.grounded = is_grounded(body, scene, config);
        airframe.airbrake_engaged = false;
        if airframe.controls.brake {
            if airframe.grounded {
                apply_ground_brake(body, config);
            } else {
                apply_airbrake(body, config);
                airframe.airbrake_engaged = true;
            }
        }
    }
}

fn apply_thrust(body: &mut RigidBody, airframe: &mut Airframe, config: &AircraftConfig) {
    let thrust = body.pose.nose() * (airframe.throttle * config.max_thrust);
    airframe.thrust = thrust;
    body.add_force(thrust);
}

/// `−v̂ · 0.5 · ρ · v² · Cd · A`, skipped near rest.
pub fn drag_force(velocity: DVec3, drag_coefficient: f64, frontal_area: f64, air_density: f64) -> DVec3 {
    let speed = velocity.length();
    if speed < DRAG_MIN_SPEED {
        return DVec3::ZERO;
    }
    let magnitude = 0.5 * air_density * speed * speed * drag_coefficient * frontal_area;
    -velocity.normalize() * magnitude
}

fn apply_drag(body: &mut RigidBody, config: &AircraftConfig, air_density: f64) {
    let drag = drag_force(
        body.velocity(),
        config.drag_coefficient,
        config.frontal_area,
        air_density,
    );
    body.add_force(drag);
}

fn is_grounded(body: &RigidBody, scene: &impl SpatialQuery, config: &AircraftConfig) -> bool {
    scene
        .raycast(
            body.pose.position,
            -body.pose.up(),
            config.ground_probe_distance,
            LayerMask::GROUND,
        )
        .is_some()
}

/// Wheel brakes: proportional to speed, clamped.
pub fn ground_brake_force(velocity: DVec3, brake_force: f64) -> DVec3 {
    let speed = velocity.length().clamp(0.0, GROUND_BRAKE_SPEED_CLAMP);
    -velocity.normalize_or_zero() * brake_force * speed
}

fn apply_ground_brake(body: &mut RigidBody, config: &AircraftConfig) {
    let force = ground_brake_force(body.velocity(), config.brake_force);
    body.add_force(force);
}

fn apply_airbrake(body: &mut RigidBody, config: &AircraftConfig) {
    let velocity = body.velocity();
    if velocity.length() < AIRBRAKE_MIN_SPEED {
        return;
    }
    body.add_force(-velocity.normalize() * config.airbrake.drag);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use skylance_core::constants::AIR_DENSITY;

    #[test]
    fn test_drag_skipped_near_rest() {
        assert_eq!(drag_force(DVec3::new(0.05, 0.0, 0.0), 0.02, 2.5, AIR_DENSITY), DVec3::ZERO);
        assert_eq!(drag_force(DVec3::ZERO, 0.02, 2.5, AIR_DENSITY), DVec3::ZERO);
    }

    #[test]
    fn test_drag_opposes_velocity() {
        let drag = drag_force(DVec3::new(0.0, 0.0, -100.0), 0.02, 2.5, AIR_DENSITY);
        assert_relative_eq!(drag.z, 0.5 * AIR_DENSITY * 10_000.0 * 0.02 * 2.5, epsilon = 1e-9);
        assert_eq!(drag.x, 0.0);
    }

    #[test]
    fn test_ground_brake_clamps_speed() {
        let slow = ground_brake_force(DVec3::new(10.0, 0.0, 0.0), 5000.0);
        assert_relative_eq!(slow.x, -50_000.0, epsilon = 1e-9);
        let fast = ground_brake_force(DVec3::new(250.0, 0.0, 0.0), 5000.0);
        assert_relative_eq!(fast.x, -500_000.0, epsilon = 1e-9);
        assert_eq!(ground_brake_force(DVec3::ZERO, 5000.0), DVec3::ZERO);
    }
}

//! Patrol system: flies every bandit along its waypoint loop.

use hecs::World;
use log::{debug, warn};

use skylance_core::components::{Patrol, RigidBody};
use skylance_patrol::waypoint::{step, PatrolContext};

/// Advance every enabled patrol by one fixed tick.
///
/// Bandits are kinematic: the patrol sets velocity and orientation directly
/// and the integrator moves them.
pub fn run(world: &mut World, dt: f64) {
    for (entity, (patrol, body)) in world.query_mut::<(&mut Patrol, &mut RigidBody)>() {
        if !patrol.enabled {
            continue;
        }
        let ctx = PatrolContext {
            config: &patrol.config,
            pose: body.pose,
            waypoints: &patrol.waypoints,
            current_waypoint: patrol.current_waypoint,
            speed: patrol.speed,
            speed_velocity: patrol.speed_velocity,
            last_altitude: patrol.last_altitude,
            dt,
        };
        let Some(update) = step(&ctx) else {
            warn!("patrol on {entity:?} has no waypoints; disabling it");
            patrol.enabled = false;
            continue;
        };

        if update.waypoint_reached {
            debug!("{entity:?} heading for waypoint {}", update.current_waypoint);
        }
        body.pose = update.pose;
        body.velocity = update.velocity;
        patrol.current_waypoint = update.current_waypoint;
        patrol.speed = update.speed;
        patrol.speed_velocity = update.speed_velocity;
        patrol.last_altitude = update.last_altitude;
    }
}

//! Waypoint following.
//!
//! One fixed tick of patrol flight: pick a target speed from the vertical
//! trend, smooth toward it, fly along the nose, turn toward the current
//! waypoint and advance to the next one when close enough.

use glam::DVec3;

use skylance_core::config::PatrolConfig;
use skylance_core::constants::{PATROL_VERTICAL_DEADBAND, WAYPOINT_CAPTURE_RADIUS};
use skylance_core::math::{clamp01, look_rotation, smooth_damp};
use skylance_core::types::Pose;

/// Input for one patrolling aircraft.
pub struct PatrolContext<'a> {
    pub config: &'a PatrolConfig,
    pub pose: Pose,
    pub waypoints: &'a [DVec3],
    pub current_waypoint: usize,
    pub speed: f64,
    pub speed_velocity: f64,
    /// Altitude on the previous tick (m).
    pub last_altitude: f64,
    pub dt: f64,
}

/// Output of one patrol step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolUpdate {
    pub pose: Pose,
    pub velocity: DVec3,
    pub current_waypoint: usize,
    pub speed: f64,
    pub speed_velocity: f64,
    pub last_altitude: f64,
    pub waypoint_reached: bool,
}

/// Speed the patrol wants given the altitude change since the last tick.
pub fn desired_speed(config: &PatrolConfig, vertical_delta: f64) -> f64 {
    if vertical_delta > PATROL_VERTICAL_DEADBAND {
        config.min_speed
    } else if vertical_delta < -PATROL_VERTICAL_DEADBAND {
        config.max_speed
    } else {
        config.cruise_speed
    }
}

/// Advance one patrol by a tick. `None` when there is nothing to fly to.
pub fn step(ctx: &PatrolContext) -> Option<PatrolUpdate> {
    let target = *ctx.waypoints.get(ctx.current_waypoint)?;
    let position = ctx.pose.position;

    let vertical_delta = position.y - ctx.last_altitude;
    let mut speed_velocity = ctx.speed_velocity;
    let speed = smooth_damp(
        ctx.speed,
        desired_speed(ctx.config, vertical_delta),
        &mut speed_velocity,
        ctx.config.speed_smooth_time,
        ctx.dt,
    );
    let velocity = ctx.pose.nose() * speed;

    let mut pose = ctx.pose;
    let direction = (target - position).normalize_or_zero();
    if direction != DVec3::ZERO {
        let wanted = look_rotation(direction, ctx.pose.up());
        let t = clamp01(ctx.config.rotation_speed * ctx.dt);
        pose.rotation = ctx.pose.rotation.slerp(wanted, t).normalize();
    }

    let waypoint_reached = position.distance(target) < WAYPOINT_CAPTURE_RADIUS;
    let current_waypoint = if waypoint_reached {
        (ctx.current_waypoint + 1) % ctx.waypoints.len()
    } else {
        ctx.current_waypoint
    };

    Some(PatrolUpdate {
        pose,
        velocity,
        current_waypoint,
        speed,
        speed_velocity,
        last_altitude: position.y,
        waypoint_reached,
    })
}

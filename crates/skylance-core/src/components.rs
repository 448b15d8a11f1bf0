//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::{DQuat, DVec3};
use hecs::Entity;

use crate::commands::{ControlState, RadarCommand};
use crate::config::{AeroSurfaceConfig, MissileConfig, PatrolConfig};
use crate::enums::*;
use crate::types::{LayerMask, Pose};

/// Dynamic body state and force accumulators.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub pose: Pose,
    pub velocity: DVec3,
    /// World-space angular velocity (rad/s).
    pub angular_velocity: DVec3,
    pub mass: f64,
    /// Principal moments of inertia about body X, Y, Z (kg·m²).
    pub inertia: DVec3,
    pub angular_drag: f64,
    pub use_gravity: bool,
    /// Kinematic bodies are moved by their owner, not by accumulated forces.
    pub kinematic: bool,
    /// Force accumulated this tick (N). Cleared by the integrator.
    pub force: DVec3,
    /// Torque accumulated this tick (N·m). Cleared by the integrator.
    pub torque: DVec3,
}

/// Sphere collider used by spatial queries.
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub radius: f64,
    pub layers: LayerMask,
    pub enabled: bool,
}

/// Marks the player's aircraft.
#[derive(Debug, Clone, Copy)]
pub struct PlayerAircraft;

/// Marks a hostile patrolling aircraft.
#[derive(Debug, Clone, Copy)]
pub struct Bandit;

/// Pilot-driven state of an aircraft: throttle, flaps, brakes, presentation.
#[derive(Debug, Clone)]
pub struct Airframe {
    /// Throttle in [0, 1].
    pub throttle: f64,
    pub flap_stage: usize,
    /// Number of flap stages (including retracted).
    pub flap_stage_count: usize,
    pub controls: ControlState,
    pub grounded: bool,
    pub airbrake_engaged: bool,
    /// Local rotation of the airbrake panel.
    pub airbrake_rotation: DQuat,
    pub engine_pitch: f64,
    pub engine_volume: f64,
    /// Thrust applied on the last tick (N, world space).
    pub thrust: DVec3,
}

/// Gear state and the presentation flags derived from it.
#[derive(Debug, Clone, Copy)]
pub struct LandingGear {
    pub down: bool,
    pub open_model_visible: bool,
    pub closed_model_visible: bool,
    pub collision_enabled: bool,
}

/// Per-tick output of one aerodynamic surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceRuntime {
    /// Rate-limited deflection (degrees).
    pub current_deflection: f64,
    /// Smoothed input deflection the surface is moving toward (degrees).
    pub target_deflection: f64,
    /// Angle of attack including deflection (radians).
    pub angle_of_attack: f64,
    pub lift: DVec3,
    pub drag: DVec3,
    /// Angle of attack outside the configured stall band.
    pub stalled: bool,
}

/// One aerodynamic panel attached to an airframe.
#[derive(Debug, Clone)]
pub struct AeroSurface {
    pub config: AeroSurfaceConfig,
    /// Body the surface pushes on.
    pub owner: Option<Entity>,
    /// Pose relative to the owner.
    pub mount: Pose,
    pub runtime: SurfaceRuntime,
    pub enabled: bool,
}

/// One entry of the radar contact table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarContact {
    pub target: Entity,
    /// Simulation time of the last accepted detection (s).
    pub last_seen: f64,
    pub seen_this_sweep: bool,
}

/// Search/track radar mounted on an aircraft.
#[derive(Debug, Clone)]
pub struct Radar {
    pub mode: RadarMode,
    /// Gimbal azimuth relative to the nose (degrees).
    pub gimbal_azimuth: f64,
    /// Gimbal elevation in track mode (degrees).
    pub gimbal_elevation: f64,
    pub vertical_slice: u32,
    /// Current search width (degrees).
    pub horizontal_sweep_angle: f64,
    /// Contacts in registration order.
    pub contacts: Vec<RadarContact>,
    pub locked: Option<Entity>,
    pub selected: Option<Entity>,
    /// Pilot commands waiting for the next radar pass.
    pub pending_commands: Vec<RadarCommand>,
    pub enabled: bool,
}

/// A launch rail and whether its missile is still visible on it.
#[derive(Debug, Clone, Copy)]
pub struct Hardpoint {
    pub mount: Pose,
    pub loaded: bool,
}

/// Seeker arming timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeekerState {
    pub active: bool,
    pub ready: bool,
    /// Seconds since the seeker was armed.
    pub timer: f64,
}

/// Missile carriage on an aircraft.
#[derive(Debug, Clone)]
pub struct Armament {
    pub hardpoints: Vec<Hardpoint>,
    pub current_hardpoint: usize,
    pub remaining: u32,
    pub seeker: SeekerState,
    /// Radar whose lock is handed to launched missiles.
    pub radar: Option<Entity>,
    pub enabled: bool,
}

/// A homing missile in flight.
#[derive(Debug, Clone)]
pub struct Missile {
    pub config: MissileConfig,
    pub target: Option<Entity>,
    /// Entity carrying the radar that illuminates for this missile.
    pub radar: Option<Entity>,
    pub phase: MissilePhase,
    /// Seconds since launch.
    pub elapsed: f64,
    pub speed: f64,
    /// Launch platform velocity, added to the missile's own speed.
    pub inherited_velocity: DVec3,
    /// Active seeker has taken over guidance.
    pub autonomous: bool,
    pub launched: bool,
}

/// Closed waypoint loop flown by a bandit.
#[derive(Debug, Clone)]
pub struct Patrol {
    pub config: PatrolConfig,
    pub waypoints: Vec<DVec3>,
    pub current_waypoint: usize,
    pub speed: f64,
    /// State carried by the speed spring.
    pub speed_velocity: f64,
    /// Altitude on the previous tick (m).
    pub last_altitude: f64,
    pub enabled: bool,
}

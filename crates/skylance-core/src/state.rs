//! Simulation snapshot: the complete visible state handed to a presentation layer each tick.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Pose, SimTime};

/// Complete visible state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: SimPhase,
    pub aircraft: Option<AircraftView>,
    pub surfaces: Vec<SurfaceView>,
    pub radar: Option<RadarView>,
    pub armament: Option<ArmamentView>,
    pub missiles: Vec<MissileView>,
    pub bandits: Vec<BanditView>,
    /// Events emitted since the previous snapshot.
    pub events: Vec<SimEvent>,
}

/// HUD numbers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FlightData {
    pub altitude: f64,
    /// Height above the ground along world down, or altitude if out of range.
    pub radar_altitude: f64,
    pub speed: f64,
    /// Degrees.
    pub angle_of_attack: f64,
    pub throttle_percent: f64,
    /// Newtons.
    pub thrust: f64,
}

/// Own aircraft state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AircraftView {
    pub pose: Pose,
    pub velocity: DVec3,
    pub flight: FlightData,
    pub throttle: f64,
    pub flap_stage: usize,
    pub grounded: bool,
    pub gear: GearView,
    pub airbrake_engaged: bool,
    pub airbrake_rotation: DQuat,
    pub engine_pitch: f64,
    pub engine_volume: f64,
}

/// Gear presentation flags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GearView {
    pub down: bool,
    pub open_model_visible: bool,
    pub closed_model_visible: bool,
    pub collision_enabled: bool,
}

/// One aerodynamic panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceView {
    pub name: String,
    /// Degrees.
    pub deflection: f64,
    /// Degrees.
    pub angle_of_attack: f64,
    pub lift: DVec3,
    pub drag: DVec3,
    pub stalled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadarView {
    pub mode: RadarMode,
    pub gimbal_azimuth: f64,
    pub gimbal_elevation: f64,
    pub vertical_slice: u32,
    /// Current search width (degrees).
    pub scan_width: f64,
    pub contacts: Vec<ContactView>,
    pub locked: Option<u64>,
    pub selected: Option<u64>,
    /// Range to the locked target (m).
    pub lock_range: Option<f64>,
    /// Relative velocity along the line of sight to the locked target (m/s).
    pub lock_closing_speed: Option<f64>,
}

/// A radar contact with its bearing from the aircraft nose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactView {
    pub target: u64,
    /// Degrees, positive right.
    pub azimuth: f64,
    /// Degrees, positive up.
    pub elevation: f64,
    pub range: f64,
    /// Seconds since last detection.
    pub age: f64,
    pub selected: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArmamentView {
    pub remaining: u32,
    pub capacity: u32,
    pub current_hardpoint: usize,
    /// Which rails still carry a missile.
    pub loaded: Vec<bool>,
    pub seeker: SeekerStatus,
    pub seeker_timer: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissileView {
    pub id: u64,
    pub pose: Pose,
    pub velocity: DVec3,
    pub phase: MissilePhase,
    pub speed: f64,
    pub elapsed: f64,
    pub target: Option<u64>,
    pub autonomous: bool,
    /// Distance to the target (m).
    pub target_range: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanditView {
    pub id: u64,
    pub position: DVec3,
    pub velocity: DVec3,
    pub current_waypoint: usize,
}

//! Authored configuration loaded before the simulation starts.
//!
//! Every struct is `#[serde(default)]`, so a partial JSON document only
//! overrides the fields it names.

use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{ControlAxis, GuidanceKind, GuidancePolicy};
use crate::error::ConfigError;
use crate::math::euler_degrees;
use crate::types::Pose;

/// A point fixed to a parent body, authored as an offset and XYZ Euler angles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    pub position: DVec3,
    /// Euler angles in degrees.
    pub rotation_deg: DVec3,
}

impl MountConfig {
    pub fn new(position: DVec3, rotation_deg: DVec3) -> Self {
        Self {
            position,
            rotation_deg,
        }
    }

    /// Local pose relative to the parent body.
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, euler_degrees(self.rotation_deg))
    }
}

/// One lifting or control panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroSurfaceConfig {
    pub name: String,
    pub span: f64,
    pub chord: f64,
    pub lift_coefficient: f64,
    pub drag_coefficient: f64,
    /// Degrees. Reported as a diagnostic only.
    pub stall_angle_high: f64,
    /// Degrees. Reported as a diagnostic only.
    pub stall_angle_low: f64,
    pub control: ControlAxis,
    /// Degrees.
    pub max_deflection: f64,
    /// Scales the pilot input before deflection. Negative flips the surface.
    pub input_multiplier: f64,
    /// Maximum deflection rate (degrees per second).
    pub deflection_rate: f64,
    /// Flap deflection per stage (degrees). Only used by `ControlAxis::Flap`.
    pub flap_angles: Vec<f64>,
    pub mount: MountConfig,
}

impl Default for AeroSurfaceConfig {
    fn default() -> Self {
        Self {
            name: String::from("surface"),
            span: 1.0,
            chord: 1.0,
            lift_coefficient: 1.2,
            drag_coefficient: 0.02,
            stall_angle_high: 15.0,
            stall_angle_low: -15.0,
            control: ControlAxis::None,
            max_deflection: 30.0,
            input_multiplier: 1.0,
            deflection_rate: 90.0,
            flap_angles: vec![0.0, 15.0, 40.0],
            mount: MountConfig::default(),
        }
    }
}

impl AeroSurfaceConfig {
    pub fn area(&self) -> f64 {
        self.span * self.chord
    }

    fn panel(name: &str, span: f64, chord: f64, position: DVec3) -> Self {
        Self {
            name: name.to_string(),
            span,
            chord,
            mount: MountConfig::new(position, DVec3::ZERO),
            ..Self::default()
        }
    }

    fn control(mut self, axis: ControlAxis, multiplier: f64, max_deflection: f64) -> Self {
        self.control = axis;
        self.input_multiplier = multiplier;
        self.max_deflection = max_deflection;
        self
    }

    fn rotated(mut self, rotation_deg: DVec3) -> Self {
        self.mount.rotation_deg = rotation_deg;
        self
    }
}

/// Airbrake force and presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirbrakeConfig {
    /// Constant drag force while deployed in flight (N).
    pub drag: f64,
    /// Exponential approach rate of the panel animation (1/s).
    pub deploy_speed: f64,
    pub deployed_rotation_deg: DVec3,
    pub stowed_rotation_deg: DVec3,
}

impl Default for AirbrakeConfig {
    fn default() -> Self {
        Self {
            drag: 15_000.0,
            deploy_speed: 10.0,
            deployed_rotation_deg: DVec3::new(60.0, 0.0, 0.0),
            stowed_rotation_deg: DVec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineAudioConfig {
    pub min_pitch: f64,
    pub max_pitch: f64,
}

impl Default for EngineAudioConfig {
    fn default() -> Self {
        Self {
            min_pitch: ENGINE_MIN_PITCH,
            max_pitch: ENGINE_MAX_PITCH,
        }
    }
}

/// The player's aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AircraftConfig {
    pub mass: f64,
    pub angular_drag: f64,
    /// Principal moments of inertia about body X, Y, Z (kg·m²).
    pub inertia: DVec3,
    /// Sphere radius used for spatial queries (m).
    pub collider_radius: f64,
    /// Maximum engine thrust (N).
    pub max_thrust: f64,
    /// Throttle change per second while the control is held.
    pub thrust_change_rate: f64,
    pub drag_coefficient: f64,
    /// Frontal area for parasitic drag (m²).
    pub frontal_area: f64,
    /// Ground brake force per m/s of speed (N).
    pub brake_force: f64,
    /// Length of the downward ray that decides whether the aircraft is on the ground (m).
    pub ground_probe_distance: f64,
    pub airbrake: AirbrakeConfig,
    pub engine_audio: EngineAudioConfig,
    pub surfaces: Vec<AeroSurfaceConfig>,
    pub start_position: DVec3,
    /// Initial speed along the nose (m/s).
    pub start_speed: f64,
    pub gear_down: bool,
}

impl Default for AircraftConfig {
    fn default() -> Self {
        Self {
            mass: 1000.0,
            angular_drag: 0.05,
            inertia: DVec3::new(1500.0, 2500.0, 1200.0),
            collider_radius: 6.0,
            max_thrust: 50_000.0,
            thrust_change_rate: 0.5,
            drag_coefficient: 0.02,
            frontal_area: 2.5,
            brake_force: 5000.0,
            ground_probe_distance: 1.5,
            airbrake: AirbrakeConfig::default(),
            engine_audio: EngineAudioConfig::default(),
            surfaces: default_surfaces(),
            start_position: DVec3::new(0.0, 2000.0, 0.0),
            start_speed: 150.0,
            gear_down: true,
        }
    }
}

/// Conventional layout: two wings, ailerons, flaps, elevator and rudder.
///
/// Nose is body −Z. Positive pitch/roll/yaw input is nose up, right wing down
/// and nose right respectively.
fn default_surfaces() -> Vec<AeroSurfaceConfig> {
    vec![
        AeroSurfaceConfig::panel("wing_left", 4.5, 2.0, DVec3::new(-3.0, 0.0, 0.2)),
        AeroSurfaceConfig::panel("wing_right", 4.5, 2.0, DVec3::new(3.0, 0.0, 0.2)),
        AeroSurfaceConfig::panel("aileron_left", 1.5, 0.5, DVec3::new(-5.0, 0.0, 1.2))
            .control(ControlAxis::Roll, 1.0, 25.0),
        AeroSurfaceConfig::panel("aileron_right", 1.5, 0.5, DVec3::new(5.0, 0.0, 1.2))
            .control(ControlAxis::Roll, -1.0, 25.0),
        AeroSurfaceConfig {
            lift_coefficient: 1.5,
            deflection_rate: 30.0,
            ..AeroSurfaceConfig::panel("flap_left", 1.5, 0.6, DVec3::new(-2.0, 0.0, 1.2))
                .control(ControlAxis::Flap, 1.0, 40.0)
        },
        AeroSurfaceConfig {
            lift_coefficient: 1.5,
            deflection_rate: 30.0,
            ..AeroSurfaceConfig::panel("flap_right", 1.5, 0.6, DVec3::new(2.0, 0.0, 1.2))
                .control(ControlAxis::Flap, 1.0, 40.0)
        },
        AeroSurfaceConfig::panel("elevator", 4.0, 1.0, DVec3::new(0.0, 0.0, 6.0))
            .control(ControlAxis::Pitch, -1.0, 25.0),
        AeroSurfaceConfig::panel("rudder", 1.5, 1.0, DVec3::new(0.0, 1.0, 6.0))
            .control(ControlAxis::Yaw, -1.0, 25.0)
            .rotated(DVec3::new(0.0, 0.0, -90.0)),
    ]
}

/// Search and track radar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub detection_range: f64,
    /// Track-mode gimbal limit in azimuth (degrees).
    pub horizontal_limit: f64,
    /// Track-mode gimbal limit in elevation (degrees).
    pub vertical_limit: f64,
    /// Search width (degrees).
    pub horizontal_sweep_angle: f64,
    /// Search height (degrees), divided into `vertical_slices` bars.
    pub vertical_sweep_angle: f64,
    pub vertical_slices: u32,
    /// Degrees per second.
    pub sweep_speed: f64,
    /// Azimuth half-window for illumination (degrees).
    pub sweep_resolution: f64,
    /// Seconds a contact survives without re-detection.
    pub contact_persistence: f64,
    /// Minimum |closing speed| for a detection to count (m/s).
    pub notching_threshold: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            detection_range: 1000.0,
            horizontal_limit: 70.0,
            vertical_limit: 10.0,
            horizontal_sweep_angle: RADAR_WIDE_SCAN_WIDTH,
            vertical_sweep_angle: 9.0,
            vertical_slices: 3,
            sweep_speed: 60.0,
            sweep_resolution: 3.0,
            contact_persistence: 3.0,
            notching_threshold: 50.0,
        }
    }
}

impl RadarConfig {
    /// Height of one search bar (degrees).
    pub fn slice_height(&self) -> f64 {
        self.vertical_sweep_angle / self.vertical_slices.max(1) as f64
    }
}

/// Homing missile performance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileConfig {
    pub max_speed: f64,
    pub acceleration: f64,
    /// Seconds of motor burn.
    pub burn_time: f64,
    pub max_g: f64,
    /// Seconds after launch before guidance starts.
    pub guidance_delay: f64,
    /// Seconds after launch before self-destruct.
    pub timeout: f64,
    /// Proximity fuse distance (m).
    pub proximity_range: f64,
    pub guidance: GuidanceKind,
    pub policy: GuidancePolicy,
    pub collider_radius: f64,
}

impl Default for MissileConfig {
    fn default() -> Self {
        Self {
            max_speed: 300.0,
            acceleration: 100.0,
            burn_time: 3.0,
            max_g: 50.0,
            guidance_delay: 1.0,
            timeout: 10.0,
            proximity_range: 5.0,
            guidance: GuidanceKind::Sarh,
            policy: GuidancePolicy::Pursuit,
            collider_radius: 0.5,
        }
    }
}

/// Missile carriage and seeker timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmamentConfig {
    /// Launch rails, fired round-robin. One missile per rail.
    pub hardpoints: Vec<MountConfig>,
    pub seeker_warmup: f64,
    pub seeker_timeout: f64,
}

impl Default for ArmamentConfig {
    fn default() -> Self {
        let hardpoints = [1.0, 2.0, 3.0, 4.0]
            .iter()
            .flat_map(|&x| {
                [
                    MountConfig::new(DVec3::new(-x, -0.5, 0.0), DVec3::ZERO),
                    MountConfig::new(DVec3::new(x, -0.5, 0.0), DVec3::ZERO),
                ]
            })
            .collect();
        Self {
            hardpoints,
            seeker_warmup: 1.0,
            seeker_timeout: 10.0,
        }
    }
}

/// Waypoint-patrol behaviour for bandits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    /// Slerp rate toward the next waypoint (1/s).
    pub rotation_speed: f64,
    pub min_speed: f64,
    pub cruise_speed: f64,
    pub max_speed: f64,
    pub speed_smooth_time: f64,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 2.0,
            min_speed: 170.0,
            cruise_speed: 200.0,
            max_speed: 300.0,
            speed_smooth_time: 2.0,
        }
    }
}

/// How many bandits to spawn and where.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BanditConfig {
    pub count: u32,
    /// Distance of each patrol loop's centre from the player start (m).
    pub ring_radius: f64,
    /// Radius of each patrol loop (m).
    pub loop_radius: f64,
    pub waypoints_per_loop: u32,
    pub altitude: f64,
    /// Random altitude variation applied per waypoint (m).
    pub altitude_jitter: f64,
    pub collider_radius: f64,
    pub patrol: PatrolConfig,
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            count: 3,
            ring_radius: 800.0,
            loop_radius: 1500.0,
            waypoints_per_loop: 6,
            altitude: 2000.0,
            altitude_jitter: 150.0,
            collider_radius: 6.0,
            patrol: PatrolConfig::default(),
        }
    }
}

/// Everything needed to start a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub seed: u64,
    pub tick_rate: u32,
    pub gravity: f64,
    pub air_density: f64,
    /// Height of the flat ground plane (m).
    pub ground_height: f64,
    pub aircraft: AircraftConfig,
    pub radar: RadarConfig,
    pub missile: MissileConfig,
    pub armament: ArmamentConfig,
    pub bandits: BanditConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: TICK_RATE,
            gravity: GRAVITY,
            air_density: AIR_DENSITY,
            ground_height: 0.0,
            aircraft: AircraftConfig::default(),
            radar: RadarConfig::default(),
            missile: MissileConfig::default(),
            armament: ArmamentConfig::default(),
            bandits: BanditConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Parse and validate a scenario from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ScenarioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Seconds per fixed tick.
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::invalid("tick_rate", "must be positive"));
        }
        if !(self.aircraft.mass > 0.0) {
            return Err(ConfigError::invalid("aircraft.mass", "must be positive"));
        }
        for surface in &self.aircraft.surfaces {
            if !(surface.span > 0.0) || !(surface.chord > 0.0) {
                return Err(ConfigError::invalid(
                    format!("aircraft.surfaces[{}]", surface.name),
                    "span and chord must be positive",
                ));
            }
            if surface.control == ControlAxis::Flap && surface.flap_angles.is_empty() {
                return Err(ConfigError::invalid(
                    format!("aircraft.surfaces[{}].flap_angles", surface.name),
                    "flap surface needs at least one stage",
                ));
            }
        }
        if self.radar.vertical_slices == 0 {
            return Err(ConfigError::invalid("radar.vertical_slices", "must be at least 1"));
        }
        if !(self.radar.detection_range > 0.0) {
            return Err(ConfigError::invalid("radar.detection_range", "must be positive"));
        }
        if self.armament.hardpoints.is_empty() {
            return Err(ConfigError::invalid("armament.hardpoints", "must not be empty"));
        }
        Ok(())
    }
}

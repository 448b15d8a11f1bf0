//! Simulation constants and tuning parameters.
//!
//! Authored per-entity numbers live in [`crate::config`]; the values here are
//! fixed properties of the model itself or the defaults those configs start from.

/// Default fixed simulation tick rate (Hz).
pub const TICK_RATE: u32 = 50;

/// Seconds per tick at the default tick rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Gravitational acceleration magnitude (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Sea-level air density (kg/m³).
pub const AIR_DENSITY: f64 = 1.225;

// --- Aerodynamics ---

/// Rate used to smooth raw stick input into a target deflection.
pub const INPUT_SMOOTHING_RATE: f64 = 3.0;

/// Fraction of a control surface's deflection that reaches the force model.
pub const DEFLECTION_FORCE_BLEND: f64 = 0.7;

// --- Propulsion and drag ---

/// Below this speed (m/s) parasitic drag is skipped.
pub const DRAG_MIN_SPEED: f64 = 0.1;

/// Below this speed (m/s) the airbrake produces no force.
pub const AIRBRAKE_MIN_SPEED: f64 = 1.0;

/// Speed clamp used to scale ground braking (m/s).
pub const GROUND_BRAKE_SPEED_CLAMP: f64 = 100.0;

/// Maximum range of the radar altimeter ray (m).
pub const RADAR_ALTIMETER_RANGE: f64 = 10_000.0;

/// Lower bound of the engine audio pitch.
pub const ENGINE_MIN_PITCH: f64 = 0.5;

/// Upper bound of the engine audio pitch.
pub const ENGINE_MAX_PITCH: f64 = 2.0;

/// Engine audio volume at idle throttle.
pub const ENGINE_MIN_VOLUME: f64 = 0.1;

/// Engine audio volume at full throttle.
pub const ENGINE_MAX_VOLUME: f64 = 1.0;

// --- Radar ---

/// Search width used when the scan width is toggled away from the wide setting (degrees).
pub const RADAR_NARROW_SCAN_WIDTH: f64 = 30.0;

/// Wide search width (degrees).
pub const RADAR_WIDE_SCAN_WIDTH: f64 = 70.0;

// --- Missiles ---

/// Range inside which an active seeker goes autonomous (m).
pub const ARH_AUTONOMOUS_RANGE: f64 = 5_000.0;

/// Pitbull range used by lofted guidance (m). Lofting fades out inside it.
pub const LOFT_PITBULL_RANGE: f64 = 5_000.0;

/// Floor applied to missile speed when computing the turn-rate cap (m/s).
pub const MIN_TURN_RATE_SPEED: f64 = 1.0;

// --- Patrol ---

/// Distance at which a patrolling aircraft switches to its next waypoint (m).
pub const WAYPOINT_CAPTURE_RADIUS: f64 = 100.0;

/// Altitude change per tick treated as climbing or descending (m).
pub const PATROL_VERTICAL_DEADBAND: f64 = 0.1;

// --- World ---

/// Entities further than this from the origin are removed (m).
pub const WORLD_RADIUS: f64 = 200_000.0;

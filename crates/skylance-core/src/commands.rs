//! Pilot input sent to the simulation.
//!
//! Held controls are sampled every frame as a [`ControlState`]. Discrete
//! button presses are [`PilotCommand`]s queued for the next frame boundary.

use serde::{Deserialize, Serialize};

/// Level-triggered controls, sampled every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub throttle_up: bool,
    pub throttle_down: bool,
    /// Stick pitch in [-1, 1], positive nose up.
    pub pitch: f64,
    /// Stick roll in [-1, 1], positive roll right.
    pub roll: f64,
    /// Pedal yaw in [-1, 1], positive yaw right.
    pub yaw: f64,
    pub brake: bool,
}

impl ControlState {
    /// Clamp the analogue axes to their valid range.
    pub fn clamped(self) -> Self {
        Self {
            pitch: self.pitch.clamp(-1.0, 1.0),
            roll: self.roll.clamp(-1.0, 1.0),
            yaw: self.yaw.clamp(-1.0, 1.0),
            ..self
        }
    }
}

/// Edge-triggered pilot actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PilotCommand {
    // --- Airframe ---
    /// Extend flaps one stage.
    FlapsDown,
    /// Retract flaps one stage.
    FlapsUp,
    ToggleGear,

    // --- Radar ---
    /// Move the target cursor to the next contact.
    CycleTarget,
    /// Lock the selected contact, or release the current lock.
    ToggleLock,
    /// Switch the search sweep between wide and narrow.
    ToggleScanWidth,

    // --- Weapons ---
    /// Arm the seeker, or fire once it is ready.
    Fire,

    // --- Simulation control ---
    Pause,
    Resume,
}

/// Radar commands forwarded from the pilot to the radar's own update pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadarCommand {
    CycleTarget,
    ToggleLock,
    ToggleScanWidth,
}

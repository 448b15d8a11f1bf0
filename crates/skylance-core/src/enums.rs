//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which pilot control, if any, drives an aerodynamic surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlAxis {
    /// Fixed lifting surface (wing, stabiliser).
    #[default]
    None,
    Pitch,
    Roll,
    Yaw,
    /// Staged high-lift flap.
    Flap,
}

/// Radar operating mode. A pure function of whether a lock is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadarMode {
    /// Search (SRC): bar-scan sweep across vertical slices.
    #[default]
    #[serde(rename = "SRC")]
    Search,
    /// Track (ACM): gimbal slaved to the locked target.
    #[serde(rename = "ACM")]
    Track,
}

/// Missile seeker type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuidanceKind {
    /// Semi-active radar homing: needs the launching radar's lock every guided step.
    #[default]
    Sarh,
    /// Active radar homing: self-guiding once inside acquisition range.
    Arh,
}

/// Steering policy applied once the missile is guided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuidancePolicy {
    /// Point the nose straight at the target.
    #[default]
    Pursuit,
    /// Bias the aim point upward until inside pitbull range.
    Lofted,
}

/// Missile flight phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissilePhase {
    /// On the rail, not yet launched.
    #[default]
    Idle,
    /// Motor burning, guidance not yet enabled.
    Boosting,
    /// Motor burnt out, guidance not yet enabled.
    Coasting,
    /// Steering toward the target.
    Guided,
    /// Proximity fuse fired.
    Detonated,
    /// Flight time ceiling exceeded.
    Expired,
    /// Target handle no longer valid.
    TargetLost,
}

impl MissilePhase {
    /// True once the missile has left flight for good.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MissilePhase::Detonated | MissilePhase::Expired | MissilePhase::TargetLost
        )
    }
}

/// Missile seeker arming state on the launching aircraft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeekerStatus {
    #[default]
    Off,
    /// Powered but still inside the warm-up window.
    WarmingUp,
    /// Ready to fire until the seeker timeout.
    Ready,
}

/// Top-level simulation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    #[default]
    Active,
    Paused,
}

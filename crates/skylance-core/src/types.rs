//! Fundamental geometric and simulation types.

use std::ops::BitOr;

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of a body or a mount point.
///
/// Frames are right-handed with +Y up. Airframes and missiles are authored
/// with the nose along body −Z, so the engine's "forward axis" (+Z) points aft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec3,
    pub rotation: DQuat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    pub fn new(position: DVec3, rotation: DQuat) -> Self {
        Self { position, rotation }
    }

    /// Body +Z in world space.
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::Z
    }

    /// Direction the nose points (body −Z) in world space.
    pub fn nose(&self) -> DVec3 {
        self.rotation * DVec3::NEG_Z
    }

    /// Body +Y in world space.
    pub fn up(&self) -> DVec3 {
        self.rotation * DVec3::Y
    }

    /// Body +X in world space.
    pub fn right(&self) -> DVec3 {
        self.rotation * DVec3::X
    }

    /// Express a world-space direction in this pose's local frame.
    pub fn inverse_transform_direction(&self, dir: DVec3) -> DVec3 {
        self.rotation.inverse() * dir
    }

    /// Map a local-space point to world space.
    pub fn transform_point(&self, local: DVec3) -> DVec3 {
        self.position + self.rotation * local
    }

    /// Compose a child pose mounted on this one.
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.transform_point(local.position),
            rotation: self.rotation * local.rotation,
        }
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each fixed tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one fixed tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Collision layer bitmask used by spatial queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const GROUND: LayerMask = LayerMask(1 << 0);
    /// Radar-reflective bodies.
    pub const RADAR: LayerMask = LayerMask(1 << 1);
    /// Anything that blocks a radar line of sight.
    pub const OBSTRUCTION: LayerMask = LayerMask(1 << 2);
    pub const AIRFRAME: LayerMask = LayerMask(1 << 3);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// True if the two masks share any layer.
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}

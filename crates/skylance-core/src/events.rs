//! Events emitted by the simulation for audio and UI feedback.
//!
//! Entities are identified by their `hecs::Entity` bits.

use serde::{Deserialize, Serialize};

/// Why a held lock was dropped without the pilot asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockLossReason {
    /// The locked contact expired from the table.
    ContactLost,
    /// The target left the track-mode gimbal limits.
    GimbalLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// New entry in the radar contact table.
    ContactRegistered { target: u64, range: f64 },
    /// Contact expired or its target no longer exists.
    ContactDropped { target: u64 },
    LockAcquired { target: u64 },
    /// The pilot released the lock.
    LockReleased { target: u64 },
    LockLost { target: u64, reason: LockLossReason },
    FlapStageChanged { stage: usize },
    GearToggled { down: bool },
    SeekerArmed,
    SeekerReady,
    SeekerTimedOut,
    MissileAway {
        missile: u64,
        target: u64,
        hardpoint: usize,
    },
    /// Proximity fuse fired; target and missile destroyed.
    Splash { missile: u64, target: u64 },
    MissileExpired { missile: u64 },
    MissileLostTarget { missile: u64 },
}

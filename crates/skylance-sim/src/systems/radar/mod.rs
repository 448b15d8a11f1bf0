//! Radar scan and track engine.
//!
//! One pass per fixed tick, in this order: reset seen flags, apply queued
//! pilot commands, resolve the mode from the lock, move the gimbal, detect,
//! expire stale contacts, then clear any lock or selection whose contact
//! was removed. After a pass a held lock always names a live contact.

pub mod contacts;
pub mod detection;
pub mod sweep;

use glam::DVec3;
use hecs::{Entity, World};
use log::{error, info, warn};

use skylance_core::commands::RadarCommand;
use skylance_core::components::{Radar, RigidBody};
use skylance_core::config::RadarConfig;
use skylance_core::constants::{RADAR_NARROW_SCAN_WIDTH, RADAR_WIDE_SCAN_WIDTH};
use skylance_core::enums::RadarMode;
use skylance_core::events::{LockLossReason, SimEvent};

use crate::body::BodyState;
use crate::spatial::SpatialQuery;

/// Position and velocity of a potential target, `None` once it no longer exists.
pub trait TargetLookup {
    fn kinematics(&self, target: Entity) -> Option<(DVec3, DVec3)>;

    fn is_alive(&self, target: Entity) -> bool {
        self.kinematics(target).is_some()
    }
}

/// Looks targets up in the ECS world.
pub struct WorldTargets<'a>(pub &'a World);

impl TargetLookup for WorldTargets<'_> {
    fn kinematics(&self, target: Entity) -> Option<(DVec3, DVec3)> {
        self.0
            .get::<&RigidBody>(target)
            .ok()
            .map(|body| (body.pose.position, body.velocity))
    }

    fn is_alive(&self, target: Entity) -> bool {
        self.0.contains(target)
    }
}

/// A radar in search mode at the left edge of the first slice.
pub fn new_radar(config: &RadarConfig) -> Radar {
    Radar {
        mode: RadarMode::Search,
        gimbal_azimuth: -config.horizontal_sweep_angle / 2.0,
        gimbal_elevation: 0.0,
        vertical_slice: 0,
        horizontal_sweep_angle: config.horizontal_sweep_angle,
        contacts: Vec::new(),
        locked: None,
        selected: None,
        pending_commands: Vec::new(),
        enabled: true,
    }
}

/// Everything a single radar pass reads.
pub struct PassContext<'a, S: SpatialQuery, T: TargetLookup> {
    pub config: &'a RadarConfig,
    pub own_entity: Entity,
    pub own: BodyState,
    pub scene: &'a S,
    pub targets: &'a T,
    /// Simulation time (s).
    pub now: f64,
    pub dt: f64,
}

/// Run one pass for every enabled radar in the world.
pub fn run(
    world: &World,
    scene: &impl SpatialQuery,
    config: &RadarConfig,
    now: f64,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    let radars: Vec<Entity> = world
        .query::<&Radar>()
        .iter()
        .filter(|(_, radar)| radar.enabled)
        .map(|(entity, _)| entity)
        .collect();
    let targets = WorldTargets(world);

    for entity in radars {
        let own = world.get::<&RigidBody>(entity).ok().map(|b| BodyState::of(&b));
        let Ok(mut radar) = world.get::<&mut Radar>(entity) else {
            continue;
        };
        let Some(own) = own else {
            error!("radar on {entity:?} has no aircraft body; disabling it");
            radar.enabled = false;
            continue;
        };
        let ctx = PassContext {
            config,
            own_entity: entity,
            own,
            scene,
            targets: &targets,
            now,
            dt,
        };
        pass(&mut radar, &ctx, events);
    }
}

/// One complete radar update.
pub fn pass<S: SpatialQuery, T: TargetLookup>(
    radar: &mut Radar,
    ctx: &PassContext<'_, S, T>,
    events: &mut Vec<SimEvent>,
) {
    contacts::reset_flags(radar);
    apply_commands(radar, events);
    resolve_mode(radar, ctx.targets, events);

    match radar.mode {
        RadarMode::Search => sweep::advance_search(radar, ctx.config, ctx.dt),
        RadarMode::Track => track_locked(radar, ctx, events),
    }

    for detection in detection::detect(
        radar,
        ctx.config,
        ctx.own_entity,
        &ctx.own,
        ctx.scene,
        ctx.targets,
    ) {
        contacts::register(radar, detection.target, ctx.now, detection.range, events);
    }

    let persistence = ctx.config.contact_persistence;
    contacts::expire(radar, ctx.now, persistence, |e| ctx.targets.is_alive(e), events);
    enforce_lock_invariant(radar, events);
}

fn apply_commands(radar: &mut Radar, events: &mut Vec<SimEvent>) {
    for command in std::mem::take(&mut radar.pending_commands) {
        match command {
            RadarCommand::CycleTarget => contacts::cycle_selection(radar),
            RadarCommand::ToggleLock => toggle_lock(radar, events),
            RadarCommand::ToggleScanWidth => {
                let wide = radar.horizontal_sweep_angle == RADAR_WIDE_SCAN_WIDTH;
                radar.horizontal_sweep_angle = if wide {
                    RADAR_NARROW_SCAN_WIDTH
                } else {
                    RADAR_WIDE_SCAN_WIDTH
                };
            }
        }
    }
}

fn toggle_lock(radar: &mut Radar, events: &mut Vec<SimEvent>) {
    if let Some(target) = radar.locked.take() {
        info!("unlocked target {target:?}");
        events.push(SimEvent::LockReleased {
            target: target.to_bits().get(),
        });
    } else if let Some(target) = radar.selected {
        if contacts::contains(radar, target) {
            radar.locked = Some(target);
            info!("locked target {target:?}");
            events.push(SimEvent::LockAcquired {
                target: target.to_bits().get(),
            });
        }
    }
}

fn resolve_mode(radar: &mut Radar, targets: &impl TargetLookup, events: &mut Vec<SimEvent>) {
    let locked = radar.locked;
    radar.mode = match locked {
        Some(target) if contacts::contains(radar, target) && targets.is_alive(target) => {
            RadarMode::Track
        }
        Some(target) => {
            lose_lock(radar, target, LockLossReason::ContactLost, events);
            RadarMode::Search
        }
        None => RadarMode::Search,
    };
}

fn track_locked<S: SpatialQuery, T: TargetLookup>(
    radar: &mut Radar,
    ctx: &PassContext<'_, S, T>,
    events: &mut Vec<SimEvent>,
) {
    let Some(target) = radar.locked else {
        return;
    };
    let Some((position, _)) = ctx.targets.kinematics(target) else {
        lose_lock(radar, target, LockLossReason::ContactLost, events);
        return;
    };
    if !sweep::slave_to_target(radar, ctx.config, &ctx.own.pose, position) {
        lose_lock(radar, target, LockLossReason::GimbalLimit, events);
    }
}

fn lose_lock(radar: &mut Radar, target: Entity, reason: LockLossReason, events: &mut Vec<SimEvent>) {
    radar.locked = None;
    radar.mode = RadarMode::Search;
    match reason {
        LockLossReason::ContactLost => warn!("lost lock on target {target:?}"),
        LockLossReason::GimbalLimit => {
            warn!("target {target:?} out of track gimbal limits; dropping lock")
        }
    }
    events.push(SimEvent::LockLost {
        target: target.to_bits().get(),
        reason,
    });
}

fn enforce_lock_invariant(radar: &mut Radar, events: &mut Vec<SimEvent>) {
    if let Some(target) = radar.locked {
        if !contacts::contains(radar, target) {
            lose_lock(radar, target, LockLossReason::ContactLost, events);
        }
    }
    if let Some(selected) = radar.selected {
        if !contacts::contains(radar, selected) {
            radar.selected = None;
        }
    }
}

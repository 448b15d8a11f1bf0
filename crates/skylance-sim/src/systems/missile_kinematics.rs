//! Missile kinematics system: motor burn, phase transitions, guidance and
//! the proximity fuse.
//!
//! Each fixed tick a missile ages, checks its timeout and target, burns its
//! motor, sets its velocity along the nose and then, once past the guidance
//! delay, steers toward the target if its seeker is allowed to. Terminal
//! missiles are left for the cleanup pass.

use glam::DVec3;
use hecs::{Entity, World};
use log::{info, warn};

use skylance_core::components::{Missile, Radar, RigidBody};
use skylance_core::constants::ARH_AUTONOMOUS_RANGE;
use skylance_core::enums::{GuidanceKind, MissilePhase};
use skylance_core::events::SimEvent;
use skylance_core::types::Pose;

use crate::guidance;

/// What became of a missile this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MissileOutcome {
    Flying,
    Expired,
    TargetLost,
    Splash(Entity),
}

/// Target information a missile reads each tick.
#[derive(Debug, Clone, Copy)]
pub struct TargetFix {
    /// Target position, `None` when the target no longer exists.
    pub position: Option<DVec3>,
    /// The illuminating radar currently holds a lock on this target.
    pub lock_held: bool,
}

/// Advance one missile by `dt`. Updates `missile` and `pose` in place and
/// returns the new world velocity together with the outcome.
pub fn advance(
    missile: &mut Missile,
    pose: &mut Pose,
    fix: TargetFix,
    gravity: f64,
    dt: f64,
) -> (DVec3, MissileOutcome) {
    let config = missile.config;
    missile.elapsed += dt;

    if missile.elapsed > config.timeout {
        missile.phase = MissilePhase::Expired;
        return (DVec3::ZERO, MissileOutcome::Expired);
    }
    let (Some(target), Some(target_position)) = (missile.target, fix.position) else {
        missile.phase = MissilePhase::TargetLost;
        return (DVec3::ZERO, MissileOutcome::TargetLost);
    };

    if missile.elapsed <= config.burn_time {
        missile.speed = (missile.speed + config.acceleration * dt).min(config.max_speed);
    }
    let velocity = pose.nose() * missile.speed + missile.inherited_velocity;
    let distance = pose.position.distance(target_position);

    if missile.elapsed >= config.guidance_delay {
        missile.phase = MissilePhase::Guided;
        let guiding = match config.guidance {
            GuidanceKind::Sarh => fix.lock_held,
            GuidanceKind::Arh => {
                if !missile.autonomous && distance < ARH_AUTONOMOUS_RANGE {
                    missile.autonomous = true;
                }
                missile.autonomous || fix.lock_held
            }
        };
        if guiding {
            if let Some(aim) = guidance::aim_direction(config.policy, pose, target_position) {
                let rate = guidance::max_turn_rate_deg(config.max_g, gravity, missile.speed);
                pose.rotation = guidance::steer(pose.rotation, aim, rate * dt);
            }
        }
    } else if missile.elapsed <= config.burn_time {
        missile.phase = MissilePhase::Boosting;
    } else {
        missile.phase = MissilePhase::Coasting;
    }

    if distance <= config.proximity_range {
        missile.phase = MissilePhase::Detonated;
        return (velocity, MissileOutcome::Splash(target));
    }
    (velocity, MissileOutcome::Flying)
}

/// Run every missile in flight for one tick.
///
/// Targets destroyed by a proximity burst are pushed onto `despawn`.
pub fn run(
    world: &mut World,
    gravity: f64,
    dt: f64,
    events: &mut Vec<SimEvent>,
    despawn: &mut Vec<Entity>,
) {
    let mut updates: Vec<(Entity, Missile, Pose, DVec3, MissileOutcome)> = Vec::new();

    {
        let mut query = world.query::<(&Missile, &RigidBody)>();
        for (entity, (missile, body)) in query.iter() {
            if !missile.launched || missile.phase.is_terminal() {
                continue;
            }
            let fix = target_fix(world, missile);
            let mut missile = missile.clone();
            let mut pose = body.pose;
            let (velocity, outcome) = advance(&mut missile, &mut pose, fix, gravity, dt);
            updates.push((entity, missile, pose, velocity, outcome));
        }
    }

    for (entity, missile, pose, velocity, outcome) in updates {
        let id = entity.to_bits().get();
        match outcome {
            MissileOutcome::Flying => {}
            MissileOutcome::Expired => {
                warn!("missile {entity:?} timed out");
                events.push(SimEvent::MissileExpired { missile: id });
            }
            MissileOutcome::TargetLost => {
                warn!("missile {entity:?} lost its target");
                events.push(SimEvent::MissileLostTarget { missile: id });
            }
            MissileOutcome::Splash(target) => {
                info!("missile {entity:?} splashed {target:?}");
                events.push(SimEvent::Splash {
                    missile: id,
                    target: target.to_bits().get(),
                });
                despawn.push(target);
            }
        }

        if let Ok((stored, body)) = world.query_one_mut::<(&mut Missile, &mut RigidBody)>(entity) {
            *stored = missile;
            body.pose = pose;
            body.velocity = velocity;
        }
    }
}

fn target_fix(world: &World, missile: &Missile) -> TargetFix {
    let Some(target) = missile.target else {
        return TargetFix {
            position: None,
            lock_held: false,
        };
    };
    let position = world.get::<&RigidBody>(target).ok().map(|b| b.pose.position);
    let lock_held = missile
        .radar
        .and_then(|radar| world.get::<&Radar>(radar).ok().map(|r| r.locked == Some(target)))
        .unwrap_or(false);
    TargetFix {
        position,
        lock_held,
    }
}

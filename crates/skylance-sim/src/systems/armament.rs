//! Armament manager: seeker arming, the fire trigger and missile launch.
//!
//! The first trigger press powers the seeker (only with a radar lock and
//! missiles left). After the warm-up a second press fires from the current
//! hardpoint; the seeker shuts down again if not used before its timeout.

use glam::DVec3;
use hecs::{Entity, World};
use log::{error, info, warn};

use skylance_core::components::*;
use skylance_core::config::{ArmamentConfig, MissileConfig};
use skylance_core::enums::{MissilePhase, SeekerStatus};
use skylance_core::events::SimEvent;
use skylance_core::types::{LayerMask, Pose};

use crate::body::kinematic_body;

/// Full magazine with every hardpoint loaded.
pub fn new_armament(config: &ArmamentConfig, radar: Option<Entity>) -> Armament {
    Armament {
        hardpoints: config
            .hardpoints
            .iter()
            .map(|mount| Hardpoint {
                mount: mount.pose(),
                loaded: true,
            })
            .collect(),
        current_hardpoint: 0,
        remaining: config.hardpoints.len() as u32,
        seeker: SeekerState::default(),
        radar,
        enabled: true,
    }
}

/// Seeker state as reported to the pilot.
pub fn seeker_status(seeker: &SeekerState) -> SeekerStatus {
    match (seeker.active, seeker.ready) {
        (false, _) => SeekerStatus::Off,
        (true, false) => SeekerStatus::WarmingUp,
        (true, true) => SeekerStatus::Ready,
    }
}

/// Everything a launch needs from the carrying aircraft.
struct LaunchOrder {
    pose: Pose,
    velocity: DVec3,
    target: Entity,
    radar: Option<Entity>,
    hardpoint: usize,
}

/// Handle one trigger press on `aircraft`.
pub fn press_fire(
    world: &mut World,
    aircraft: Entity,
    missile: &MissileConfig,
    events: &mut Vec<SimEvent>,
) {
    let locked = locked_target(world, aircraft);
    let order = {
        let Ok((armament, body)) = world.query_one_mut::<(&mut Armament, &RigidBody)>(aircraft)
        else {
            return;
        };
        if !armament.enabled {
            return;
        }

        if !armament.seeker.active {
            if locked.is_some() && armament.remaining > 0 {
                armament.seeker = SeekerState {
                    active: true,
                    ready: false,
                    timer: 0.0,
                };
                info!("seeker armed");
                events.push(SimEvent::SeekerArmed);
            }
            None
        } else if armament.seeker.ready {
            prepare_launch(armament, body, locked)
        } else {
            None
        }
    };

    if let Some(order) = order {
        launch(world, order, missile, events);
    }
}

fn locked_target(world: &World, aircraft: Entity) -> Option<Entity> {
    let radar_entity = world.get::<&Armament>(aircraft).ok()?.radar?;
    let radar = world.get::<&Radar>(radar_entity).ok()?;
    radar.locked
}

/// Consume a missile from the current hardpoint.
fn prepare_launch(
    armament: &mut Armament,
    body: &RigidBody,
    locked: Option<Entity>,
) -> Option<LaunchOrder> {
    let target = locked?;
    if armament.remaining == 0 {
        return None;
    }
    let hardpoint_index = armament.current_hardpoint;
    let hardpoint = armament.hardpoints.get_mut(hardpoint_index)?;
    hardpoint.loaded = false;
    let pose = body.pose.compose(&hardpoint.mount);

    armament.remaining -= 1;
    armament.seeker = SeekerState::default();
    armament.current_hardpoint = (hardpoint_index + 1) % armament.hardpoints.len();

    Some(LaunchOrder {
        pose,
        velocity: body.velocity,
        target,
        radar: armament.radar,
        hardpoint: hardpoint_index,
    })
}

fn launch(world: &mut World, order: LaunchOrder, config: &MissileConfig, events: &mut Vec<SimEvent>) {
    let missile = world.spawn((
        kinematic_body(order.pose, order.velocity),
        Collider {
            radius: config.collider_radius,
            layers: LayerMask::AIRFRAME,
            enabled: true,
        },
        Missile {
            config: *config,
            target: Some(order.target),
            radar: order.radar,
            phase: MissilePhase::Boosting,
            elapsed: 0.0,
            speed: 0.0,
            inherited_velocity: order.velocity,
            autonomous: false,
            launched: true,
        },
    ));
    info!(
        "missile {missile:?} away from hardpoint {} at {:?}",
        order.hardpoint, order.target
    );
    events.push(SimEvent::MissileAway {
        missile: missile.to_bits().get(),
        target: order.target.to_bits().get(),
        hardpoint: order.hardpoint,
    });
}

/// Advance the seeker timers by one frame.
pub fn update_seekers(world: &mut World, config: &ArmamentConfig, dt: f64, events: &mut Vec<SimEvent>) {
    for (entity, armament) in world.query_mut::<&mut Armament>() {
        if armament.enabled && armament.radar.is_none() {
            error!("armament on {entity:?} has no radar link; disabling it");
            armament.enabled = false;
        }
        let seeker = &mut armament.seeker;
        if !seeker.active {
            continue;
        }
        seeker.timer += dt;
        if seeker.timer >= config.seeker_warmup && !seeker.ready {
            seeker.ready = true;
            events.push(SimEvent::SeekerReady);
        }
        if seeker.timer >= config.seeker_timeout {
            *seeker = SeekerState::default();
            warn!("seeker on {entity:?} timed out");
            events.push(SimEvent::SeekerTimedOut);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_armament_is_full() {
        let config = ArmamentConfig::default();
        let armament = new_armament(&config, None);
        assert_eq!(armament.remaining, 8);
        assert_eq!(armament.hardpoints.len(), 8);
        assert!(armament.hardpoints.iter().all(|h| h.loaded));
        assert_eq!(seeker_status(&armament.seeker), SeekerStatus::Off);
    }

    #[test]
    fn test_seeker_warms_up_then_times_out() {
        let mut world = World::new();
        let config = ArmamentConfig::default();
        let radar_host = world.spawn(());
        let mut armament = new_armament(&config, Some(radar_host));
        armament.seeker.active = true;
        let entity = world.spawn((armament,));
        let mut events = Vec::new();

        for _ in 0..49 {
            update_seekers(&mut world, &config, 0.02, &mut events);
        }
        let status = seeker_status(&world.get::<&Armament>(entity).unwrap().seeker);
        assert_eq!(status, SeekerStatus::WarmingUp);

        update_seekers(&mut world, &config, 0.021, &mut events);
        let status = seeker_status(&world.get::<&Armament>(entity).unwrap().seeker);
        assert_eq!(status, SeekerStatus::Ready);
        assert!(events.contains(&SimEvent::SeekerReady));

        for _ in 0..500 {
            update_seekers(&mut world, &config, 0.02, &mut events);
        }
        let status = seeker_status(&world.get::<&Armament>(entity).unwrap().seeker);
        assert_eq!(status, SeekerStatus::Off);
        assert!(events.contains(&SimEvent::SeekerTimedOut));
    }
}

//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player's aircraft with its aerodynamic surfaces, radar and
//! armament, and the patrolling bandits.

use glam::DVec3;
use hecs::{Entity, World};
use log::{info, warn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skylance_core::components::*;
use skylance_core::config::{AircraftConfig, BanditConfig, ScenarioConfig};
use skylance_core::constants::ENGINE_MIN_VOLUME;
use skylance_core::enums::ControlAxis;
use skylance_core::math::{euler_degrees, lerp, look_rotation};
use skylance_core::types::{LayerMask, Pose};
use skylance_patrol::route::circle_loop;

use crate::body::{dynamic_body, kinematic_body};
use crate::systems::armament::new_armament;
use crate::systems::controls::set_gear_state;
use crate::systems::radar::new_radar;

/// Populate an empty world for `config`. Returns the player's aircraft.
pub fn setup_world(world: &mut World, config: &ScenarioConfig, rng: &mut ChaCha8Rng) -> Entity {
    let player = spawn_player(world, config);
    spawn_surfaces(world, player, &config.aircraft);
    spawn_bandits(world, &config.bandits, config.aircraft.start_position, rng);
    player
}

/// Spawn the player's aircraft with radar and armament on the same entity.
pub fn spawn_player(world: &mut World, config: &ScenarioConfig) -> Entity {
    let aircraft = &config.aircraft;
    let pose = Pose::new(aircraft.start_position, Pose::IDENTITY.rotation);
    let mut body = dynamic_body(pose, aircraft.mass, aircraft.inertia, aircraft.angular_drag);
    body.velocity = pose.nose() * aircraft.start_speed;

    let mut gear = LandingGear {
        down: false,
        open_model_visible: false,
        closed_model_visible: false,
        collision_enabled: false,
    };
    set_gear_state(&mut gear, aircraft.gear_down);

    let player = world.reserve_entity();
    world.spawn_at(
        player,
        (
            body,
            Collider {
                radius: aircraft.collider_radius,
                layers: LayerMask::AIRFRAME | LayerMask::OBSTRUCTION,
                enabled: true,
            },
            PlayerAircraft,
            new_airframe(aircraft),
            gear,
            new_radar(&config.radar),
            new_armament(&config.armament, Some(player)),
        ),
    );
    info!("player aircraft {player:?} spawned at {:?}", aircraft.start_position);
    player
}

/// Airframe at idle throttle with flaps retracted.
pub fn new_airframe(config: &AircraftConfig) -> Airframe {
    let flap_stage_count = config
        .surfaces
        .iter()
        .filter(|s| s.control == ControlAxis::Flap)
        .map(|s| s.flap_angles.len())
        .max()
        .unwrap_or(1);

    Airframe {
        throttle: 0.0,
        flap_stage: 0,
        flap_stage_count,
        controls: Default::default(),
        grounded: false,
        airbrake_engaged: false,
        airbrake_rotation: euler_degrees(config.airbrake.stowed_rotation_deg),
        engine_pitch: lerp(config.engine_audio.min_pitch, config.engine_audio.max_pitch, 0.0),
        engine_volume: ENGINE_MIN_VOLUME,
        thrust: DVec3::ZERO,
    }
}

/// One entity per configured surface, all pushing on `owner`.
pub fn spawn_surfaces(world: &mut World, owner: Entity, config: &AircraftConfig) -> Vec<Entity> {
    config
        .surfaces
        .iter()
        .map(|surface| {
            world.spawn((AeroSurface {
                config: surface.clone(),
                owner: Some(owner),
                mount: surface.mount.pose(),
                runtime: SurfaceRuntime::default(),
                enabled: true,
            },))
        })
        .collect()
}

/// Spawn `config.count` bandits, each on its own loop around a ring
/// centred on `center`. Deterministic for a given rng state.
pub fn spawn_bandits(
    world: &mut World,
    config: &BanditConfig,
    center: DVec3,
    rng: &mut ChaCha8Rng,
) -> Vec<Entity> {
    let count = config.count.max(1) as f64;
    let jitter = config.altitude_jitter.abs();
    (0..config.count)
        .map(|i| {
            let bearing = std::f64::consts::TAU * i as f64 / count + rng.gen_range(-0.3..0.3);
            let loop_center = DVec3::new(
                center.x + config.ring_radius * bearing.cos(),
                0.0,
                center.z - config.ring_radius * bearing.sin(),
            );
            let offsets: Vec<f64> = (0..config.waypoints_per_loop)
                .map(|_| rng.gen_range(-jitter..=jitter))
                .collect();
            let start_angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let waypoints = circle_loop(
                loop_center,
                config.loop_radius,
                config.waypoints_per_loop as usize,
                config.altitude,
                start_angle,
                &offsets,
            );
            spawn_bandit(world, waypoints, config)
        })
        .collect()
}

/// Spawn one bandit at the first waypoint of its loop, heading for the next.
///
/// With no waypoints the bandit is placed at the ring centre altitude and its
/// patrol starts disabled.
pub fn spawn_bandit(world: &mut World, waypoints: Vec<DVec3>, config: &BanditConfig) -> Entity {
    let patrol_config = config.patrol;
    let start = waypoints
        .first()
        .copied()
        .unwrap_or(DVec3::new(0.0, config.altitude, 0.0));
    let next = if waypoints.len() > 1 { 1 } else { 0 };
    let heading = waypoints
        .get(next)
        .map(|w| (*w - start).normalize_or_zero())
        .filter(|d| *d != DVec3::ZERO)
        .unwrap_or(DVec3::NEG_Z);
    let pose = Pose::new(start, look_rotation(heading, DVec3::Y));

    let enabled = !waypoints.is_empty();
    let patrol = Patrol {
        config: patrol_config,
        waypoints,
        current_waypoint: next,
        speed: patrol_config.cruise_speed,
        speed_velocity: 0.0,
        last_altitude: start.y,
        enabled,
    };

    let entity = world.spawn((
        kinematic_body(pose, pose.nose() * patrol_config.cruise_speed),
        Collider {
            radius: config.collider_radius,
            layers: LayerMask::RADAR | LayerMask::OBSTRUCTION | LayerMask::AIRFRAME,
            enabled: true,
        },
        Bandit,
        patrol,
    ));
    if !enabled {
        warn!("bandit {entity:?} has no waypoints; patrol disabled");
    }
    entity
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_player_carries_all_systems() {
        let mut world = World::new();
        let config = ScenarioConfig::default();
        let player = spawn_player(&mut world, &config);

        assert!(world.get::<&Radar>(player).is_ok());
        assert!(world.get::<&PlayerAircraft>(player).is_ok());
        let armament = world.get::<&Armament>(player).unwrap();
        assert_eq!(armament.radar, Some(player));
        let airframe = world.get::<&Airframe>(player).unwrap();
        assert_eq!(airframe.flap_stage_count, 3);
        let body = world.get::<&RigidBody>(player).unwrap();
        assert_eq!(body.velocity, DVec3::new(0.0, 0.0, -150.0));
        assert!(body.use_gravity && !body.kinematic);
        let gear = world.get::<&LandingGear>(player).unwrap();
        assert!(gear.down && gear.collision_enabled && !gear.closed_model_visible);
    }

    #[test]
    fn test_surfaces_point_at_owner() {
        let mut world = World::new();
        let config = ScenarioConfig::default();
        let player = spawn_player(&mut world, &config);
        let surfaces = spawn_surfaces(&mut world, player, &config.aircraft);
        assert_eq!(surfaces.len(), config.aircraft.surfaces.len());
        for surface in surfaces {
            assert_eq!(world.get::<&AeroSurface>(surface).unwrap().owner, Some(player));
        }
    }

    #[test]
    fn test_bandits_are_deterministic_per_seed() {
        let config = BanditConfig::default();
        let positions = |seed: u64| {
            let mut world = World::new();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            spawn_bandits(&mut world, &config, DVec3::ZERO, &mut rng)
                .into_iter()
                .map(|e| world.get::<&RigidBody>(e).unwrap().pose.position)
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(7), positions(7));
        assert_ne!(positions(7), positions(8));
        assert_eq!(positions(7).len(), 3);
    }

    #[test]
    fn test_bandit_without_waypoints_is_disabled() {
        let mut world = World::new();
        let bandit = spawn_bandit(&mut world, Vec::new(), &BanditConfig::default());
        assert!(!world.get::<&Patrol>(bandit).unwrap().enabled);
    }

    #[test]
    fn test_bandit_heads_for_second_waypoint() {
        let mut world = World::new();
        let waypoints = vec![DVec3::new(0.0, 1000.0, 0.0), DVec3::new(1000.0, 1000.0, 0.0)];
        let bandit = spawn_bandit(&mut world, waypoints, &BanditConfig::default());
        let body = world.get::<&RigidBody>(bandit).unwrap();
        assert!((body.pose.nose() - DVec3::X).length() < 1e-9);
        assert!(body.kinematic);
        assert_eq!(world.get::<&Patrol>(bandit).unwrap().current_waypoint, 1);
    }
}

//! Snapshot system: reads the ECS world and builds a complete `SimSnapshot`.
//!
//! This system is read-only; it never modifies the world.

use glam::DVec3;
use hecs::{Entity, World};

use skylance_core::components::*;
use skylance_core::constants::{DRAG_MIN_SPEED, RADAR_ALTIMETER_RANGE};
use skylance_core::enums::SimPhase;
use skylance_core::events::SimEvent;
use skylance_core::math::{azimuth_elevation, signed_angle};
use skylance_core::state::*;
use skylance_core::types::{LayerMask, SimTime};

use super::armament::seeker_status;
use super::radar::detection::closing_speed;
use crate::spatial::SpatialQuery;

/// Build a complete snapshot of the world as the player sees it.
pub fn build_snapshot(
    world: &World,
    player: Option<Entity>,
    scene: &impl SpatialQuery,
    time: &SimTime,
    phase: SimPhase,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    let now = time.elapsed_secs;
    SimSnapshot {
        time: *time,
        phase,
        aircraft: player.and_then(|p| build_aircraft(world, p, scene)),
        surfaces: player.map(|p| build_surfaces(world, p)).unwrap_or_default(),
        radar: player.and_then(|p| build_radar(world, p, now)),
        armament: player.and_then(|p| build_armament(world, p)),
        missiles: build_missiles(world),
        bandits: build_bandits(world),
        events,
    }
}

/// HUD numbers for one body.
pub fn flight_data(body: &RigidBody, airframe: &Airframe, scene: &impl SpatialQuery) -> FlightData {
    let position = body.pose.position;
    let speed = body.velocity.length();
    let angle_of_attack = if speed < DRAG_MIN_SPEED {
        0.0
    } else {
        signed_angle(body.velocity / speed, body.pose.nose(), body.pose.right())
    };
    let radar_altitude = scene
        .raycast(position, DVec3::NEG_Y, RADAR_ALTIMETER_RANGE, LayerMask::GROUND)
        .map_or(position.y, |hit| hit.distance);

    FlightData {
        altitude: position.y,
        radar_altitude,
        speed,
        angle_of_attack,
        throttle_percent: airframe.throttle * 100.0,
        thrust: airframe.thrust.length(),
    }
}

fn build_aircraft(world: &World, player: Entity, scene: &impl SpatialQuery) -> Option<AircraftView> {
    let mut query = world
        .query_one::<(&RigidBody, &Airframe, Option<&LandingGear>)>(player)
        .ok()?;
    let (body, airframe, gear) = query.get()?;

    let gear = gear.map_or_else(GearView::default, |g| GearView {
        down: g.down,
        open_model_visible: g.open_model_visible,
        closed_model_visible: g.closed_model_visible,
        collision_enabled: g.collision_enabled,
    });

    Some(AircraftView {
        pose: body.pose,
        velocity: body.velocity,
        flight: flight_data(body, airframe, scene),
        throttle: airframe.throttle,
        flap_stage: airframe.flap_stage,
        grounded: airframe.grounded,
        gear,
        airbrake_engaged: airframe.airbrake_engaged,
        airbrake_rotation: airframe.airbrake_rotation,
        engine_pitch: airframe.engine_pitch,
        engine_volume: airframe.engine_volume,
    })
}

fn build_surfaces(world: &World, player: Entity) -> Vec<SurfaceView> {
    world
        .query::<&AeroSurface>()
        .iter()
        .filter(|(_, surface)| surface.owner == Some(player))
        .map(|(_, surface)| SurfaceView {
            name: surface.config.name.clone(),
            deflection: surface.runtime.current_deflection,
            angle_of_attack: surface.runtime.angle_of_attack.to_degrees(),
            lift: surface.runtime.lift,
            drag: surface.runtime.drag,
            stalled: surface.runtime.stalled,
        })
        .collect()
}

fn build_radar(world: &World, player: Entity, now: f64) -> Option<RadarView> {
    let radar = world.get::<&Radar>(player).ok()?;
    let own = world.get::<&RigidBody>(player).ok()?;
    let origin = own.pose.position;

    let contacts = radar
        .contacts
        .iter()
        .filter_map(|contact| {
            let target = world.get::<&RigidBody>(contact.target).ok()?;
            let offset = target.pose.position - origin;
            let (azimuth, elevation) =
                azimuth_elevation(own.pose.rotation, offset.normalize_or_zero());
            Some(ContactView {
                target: contact.target.to_bits().get(),
                azimuth,
                elevation,
                range: offset.length(),
                age: now - contact.last_seen,
                selected: radar.selected == Some(contact.target),
                locked: radar.locked == Some(contact.target),
            })
        })
        .collect();

    let lock_body = radar
        .locked
        .and_then(|target| world.get::<&RigidBody>(target).ok());
    let lock_range = lock_body.as_ref().map(|t| origin.distance(t.pose.position));
    let lock_closing_speed = lock_body
        .as_ref()
        .map(|t| closing_speed(origin, own.velocity, t.pose.position, t.velocity));

    Some(RadarView {
        mode: radar.mode,
        gimbal_azimuth: radar.gimbal_azimuth,
        gimbal_elevation: radar.gimbal_elevation,
        vertical_slice: radar.vertical_slice,
        scan_width: radar.horizontal_sweep_angle,
        contacts,
        locked: radar.locked.map(|e| e.to_bits().get()),
        selected: radar.selected.map(|e| e.to_bits().get()),
        lock_range,
        lock_closing_speed,
    })
}

fn build_armament(world: &World, player: Entity) -> Option<ArmamentView> {
    let armament = world.get::<&Armament>(player).ok()?;
    Some(ArmamentView {
        remaining: armament.remaining,
        capacity: armament.hardpoints.len() as u32,
        current_hardpoint: armament.current_hardpoint,
        loaded: armament.hardpoints.iter().map(|h| h.loaded).collect(),
        seeker: seeker_status(&armament.seeker),
        seeker_timer: armament.seeker.timer,
    })
}

fn build_missiles(world: &World) -> Vec<MissileView> {
    let mut missiles: Vec<MissileView> = world
        .query::<(&Missile, &RigidBody)>()
        .iter()
        .map(|(entity, (missile, body))| {
            let target_range = missile
                .target
                .and_then(|t| world.get::<&RigidBody>(t).ok())
                .map(|t| body.pose.position.distance(t.pose.position));
            MissileView {
                id: entity.to_bits().get(),
                pose: body.pose,
                velocity: body.velocity,
                phase: missile.phase,
                speed: missile.speed,
                elapsed: missile.elapsed,
                target: missile.target.map(|t| t.to_bits().get()),
                autonomous: missile.autonomous,
                target_range,
            }
        })
        .collect();
    missiles.sort_by_key(|m| m.id);
    missiles
}

fn build_bandits(world: &World) -> Vec<BanditView> {
    let mut bandits: Vec<BanditView> = world
        .query::<(&Bandit, &RigidBody, Option<&Patrol>)>()
        .iter()
        .map(|(entity, (_, body, patrol))| BanditView {
            id: entity.to_bits().get(),
            position: body.pose.position,
            velocity: body.velocity,
            current_waypoint: patrol.map_or(0, |p| p.current_waypoint),
        })
        .collect();
    bandits.sort_by_key(|b| b.id);
    bandits
}

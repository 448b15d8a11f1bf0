//! Aerodynamic surface system.
//!
//! Each surface entity samples its owner's airflow in its own frame, advances
//! its deflection, and pushes exactly one lift force (plus flap drag) into
//! the owner's rigid body per tick.

use std::collections::HashMap;

use glam::DVec3;
use hecs::{Entity, World};
use log::error;

use skylance_core::commands::ControlState;
use skylance_core::components::{AeroSurface, Airframe, RigidBody};
use skylance_core::enums::ControlAxis;

use crate::aero;
use crate::body::{BodyState, ForceReceiver};

/// What a surface needs to know about the airframe it is attached to.
#[derive(Debug, Clone, Copy)]
struct OwnerState {
    body: BodyState,
    controls: ControlState,
    flap_stage: usize,
    flap_stage_count: usize,
}

struct PendingForce {
    owner: Entity,
    force: DVec3,
    point: DVec3,
}

/// Compute and apply forces for every enabled surface.
pub fn run(world: &mut World, air_density: f64, dt: f64) {
    let owners: HashMap<Entity, OwnerState> = world
        .query::<(&RigidBody, &Airframe)>()
        .iter()
        .map(|(entity, (body, airframe))| {
            (
                entity,
                OwnerState {
                    body: BodyState::of(body),
                    controls: airframe.controls,
                    flap_stage: airframe.flap_stage,
                    flap_stage_count: airframe.flap_stage_count,
                },
            )
        })
        .collect();

    let mut pending = Vec::new();
    for (_entity, surface) in world.query_mut::<&mut AeroSurface>() {
        if !surface.enabled {
            continue;
        }
        let Some(owner) = surface.owner.and_then(|o| owners.get(&o).map(|s| (o, *s))) else {
            error!(
                "surface `{}` has no live airframe; disabling it",
                surface.config.name
            );
            surface.enabled = false;
            continue;
        };
        let (owner_entity, state) = owner;
        let (lift, drag, point) = update_surface(surface, &state, air_density, dt);
        pending.push(PendingForce {
            owner: owner_entity,
            force: lift + drag,
            point,
        });
    }

    for force in pending {
        if let Ok(mut body) = world.get::<&mut RigidBody>(force.owner) {
            body.add_force_at_point(force.force, force.point);
        }
    }
}

/// Advance one surface and return (lift, drag, world application point).
fn update_surface(
    surface: &mut AeroSurface,
    owner: &OwnerState,
    air_density: f64,
    dt: f64,
) -> (DVec3, DVec3, DVec3) {
    let config = &surface.config;
    let runtime = &mut surface.runtime;
    let world_pose = owner.body.pose.compose(&surface.mount);

    let deflection = match config.control {
        ControlAxis::None => 0.0,
        ControlAxis::Pitch | ControlAxis::Roll | ControlAxis::Yaw => {
            let raw = control_input(config.control, &owner.controls) * config.input_multiplier;
            aero::step_control_deflection(
                runtime,
                raw,
                config.max_deflection,
                config.deflection_rate,
                dt,
            );
            aero::effective_control_deflection(runtime.current_deflection)
        }
        ControlAxis::Flap => {
            let stage = owner.flap_stage.min(config.flap_angles.len().saturating_sub(1));
            let angle = config.flap_angles.get(stage).copied().unwrap_or(0.0);
            aero::step_flap_deflection(runtime, angle, config.deflection_rate, dt);
            runtime.current_deflection
        }
    };

    let airflow = -owner.body.velocity;
    let local_airflow = world_pose.inverse_transform_direction(airflow);
    let sample = aero::sample_airflow(local_airflow, deflection);
    let magnitude = aero::lift_magnitude(
        air_density,
        sample.local_speed,
        config.area(),
        config.lift_coefficient,
    );
    let lift = aero::lift_force(world_pose.up(), magnitude, sample.angle_of_attack);

    let drag = if config.control == ControlAxis::Flap {
        let drag = aero::flap_drag_magnitude(
            air_density,
            sample.local_speed,
            config.area(),
            config.drag_coefficient,
            owner.flap_stage,
            owner.flap_stage_count,
        );
        world_pose.nose() * drag
    } else {
        DVec3::ZERO
    };

    runtime.angle_of_attack = sample.angle_of_attack;
    runtime.lift = lift;
    runtime.drag = drag;
    runtime.stalled = aero::is_stalled(
        sample.angle_of_attack,
        config.stall_angle_low,
        config.stall_angle_high,
    );

    (lift, drag, world_pose.position)
}

fn control_input(axis: ControlAxis, controls: &ControlState) -> f64 {
    match axis {
        ControlAxis::Pitch => controls.pitch,
        ControlAxis::Roll => controls.roll,
        ControlAxis::Yaw => controls.yaw,
        ControlAxis::None | ControlAxis::Flap => 0.0,
    }
}

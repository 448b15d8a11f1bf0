//! Frame-rate pilot controls and presentation.
//!
//! Throttle accumulation, discrete airframe commands (flaps, gear), engine
//! audio parameters and the airbrake panel animation. These run once per
//! rendered frame with the frame's own `dt`, decoupled from the fixed tick.

use hecs::{Entity, World};
use log::debug;

use skylance_core::commands::{ControlState, RadarCommand};
use skylance_core::components::{Airframe, LandingGear, Radar};
use skylance_core::config::AircraftConfig;
use skylance_core::constants::{ENGINE_MAX_VOLUME, ENGINE_MIN_VOLUME};
use skylance_core::events::SimEvent;
use skylance_core::math::{clamp01, euler_degrees, lerp};

/// Copy the sampled controls onto every airframe.
pub fn set_controls(world: &mut World, controls: ControlState) {
    for (_entity, airframe) in world.query_mut::<&mut Airframe>() {
        airframe.controls = controls;
    }
}

/// Move the flaps one stage. `extend` moves toward the last stage.
pub fn step_flaps(world: &mut World, aircraft: Entity, extend: bool, events: &mut Vec<SimEvent>) {
    let Ok(mut airframe) = world.get::<&mut Airframe>(aircraft) else {
        return;
    };
    let last = airframe.flap_stage_count.saturating_sub(1);
    let stage = if extend {
        (airframe.flap_stage + 1).min(last)
    } else {
        airframe.flap_stage.saturating_sub(1)
    };
    if stage != airframe.flap_stage {
        airframe.flap_stage = stage;
        debug!("flaps to stage {stage}");
        events.push(SimEvent::FlapStageChanged { stage });
    }
}

/// Flip the landing gear.
pub fn toggle_gear(world: &mut World, aircraft: Entity, events: &mut Vec<SimEvent>) {
    let Ok(mut gear) = world.get::<&mut LandingGear>(aircraft) else {
        return;
    };
    let down = !gear.down;
    set_gear_state(&mut gear, down);
    debug!("gear {}", if down { "down" } else { "up" });
    events.push(SimEvent::GearToggled { down });
}

/// Update the gear and the presentation flags derived from it.
///
/// Gear collision follows the gear state whether or not an open model exists.
pub fn set_gear_state(gear: &mut LandingGear, down: bool) {
    gear.down = down;
    gear.open_model_visible = down;
    gear.collision_enabled = down;
    gear.closed_model_visible = !down;
}

/// Hand a radar command to the aircraft's radar for its next pass.
pub fn queue_radar_command(world: &mut World, aircraft: Entity, command: RadarCommand) {
    if let Ok(mut radar) = world.get::<&mut Radar>(aircraft) {
        radar.pending_commands.push(command);
    }
}

/// Frame-rate update for every airframe.
pub fn run(world: &mut World, config: &AircraftConfig, dt: f64) {
    let deployed = euler_degrees(config.airbrake.deployed_rotation_deg);
    let stowed = euler_degrees(config.airbrake.stowed_rotation_deg);
    let blend = 1.0 - (-config.airbrake.deploy_speed * dt).exp();

    for (_entity, airframe) in world.query_mut::<&mut Airframe>() {
        airframe.throttle = accumulate_throttle(
            airframe.throttle,
            &airframe.controls,
            config.thrust_change_rate,
            dt,
        );

        airframe.engine_pitch = lerp(
            config.engine_audio.min_pitch,
            config.engine_audio.max_pitch,
            airframe.throttle,
        );
        airframe.engine_volume = lerp(ENGINE_MIN_VOLUME, ENGINE_MAX_VOLUME, airframe.throttle);

        let target = if airframe.airbrake_engaged { deployed } else { stowed };
        airframe.airbrake_rotation = airframe.airbrake_rotation.slerp(target, blend).normalize();
    }
}

/// Integrate held throttle controls, clamped to [0, 1].
pub fn accumulate_throttle(throttle: f64, controls: &ControlState, rate: f64, dt: f64) -> f64 {
    let mut throttle = throttle;
    if controls.throttle_up {
        throttle = clamp01(throttle + rate * dt);
    }
    if controls.throttle_down {
        throttle = clamp01(throttle - rate * dt);
    }
    throttle
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_throttle_accumulates_at_rate() {
        let controls = ControlState {
            throttle_up: true,
            ..Default::default()
        };
        let mut throttle = 0.0;
        for _ in 0..50 {
            throttle = accumulate_throttle(throttle, &controls, 0.5, 0.02);
        }
        assert_relative_eq!(throttle, 0.5, epsilon = 1e-9);

        for _ in 0..500 {
            throttle = accumulate_throttle(throttle, &controls, 0.5, 0.02);
        }
        assert_eq!(throttle, 1.0);
    }

    #[test]
    fn test_throttle_up_and_down_cancel() {
        let controls = ControlState {
            throttle_up: true,
            throttle_down: true,
            ..Default::default()
        };
        assert_relative_eq!(accumulate_throttle(0.4, &controls, 0.5, 0.1), 0.4, epsilon = 1e-12);
        assert_eq!(accumulate_throttle(0.0, &controls, 0.5, 0.1), 0.0);
    }

    #[test]
    fn test_gear_flags_follow_state() {
        let mut gear = LandingGear {
            down: true,
            open_model_visible: true,
            closed_model_visible: false,
            collision_enabled: true,
        };
        set_gear_state(&mut gear, false);
        assert!(!gear.down);
        assert!(!gear.open_model_visible);
        assert!(gear.closed_model_visible);
        assert!(!gear.collision_enabled);
    }
}

//! Aerodynamic surface model.
//!
//! Pure functions from local airflow and surface geometry to forces. The
//! surface frame has chordwise flow along local +Z and lift along local +Y.
//!
//! Lift uses `sin(2·aoa)` as a stall surrogate: response is steep near zero,
//! peaks at 45° and reverses past it. The configured stall angles never
//! enter the force.

use glam::DVec3;

use skylance_core::components::SurfaceRuntime;
use skylance_core::constants::{DEFLECTION_FORCE_BLEND, INPUT_SMOOTHING_RATE};
use skylance_core::math::{lerp, move_towards};

/// Chordwise speed and angle of attack seen by one surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirflowSample {
    /// Local +Z component of the airflow (m/s).
    pub local_speed: f64,
    /// Radians, including any deflection offset.
    pub angle_of_attack: f64,
}

/// Sample local airflow, adding `deflection_deg` to the geometric angle of attack.
pub fn sample_airflow(local_airflow: DVec3, deflection_deg: f64) -> AirflowSample {
    AirflowSample {
        local_speed: local_airflow.z,
        angle_of_attack: local_airflow.y.atan2(local_airflow.z) + deflection_deg.to_radians(),
    }
}

/// `0.5 · ρ · v² · A · Cl`.
pub fn lift_magnitude(air_density: f64, local_speed: f64, area: f64, lift_coefficient: f64) -> f64 {
    0.5 * air_density * local_speed * local_speed * area * lift_coefficient
}

/// Lift along the surface's up axis, scaled by `sin(2·aoa)`.
pub fn lift_force(surface_up: DVec3, magnitude: f64, angle_of_attack: f64) -> DVec3 {
    surface_up * magnitude * (2.0 * angle_of_attack).sin()
}

/// Flap drag magnitude at the given stage.
///
/// Scales linearly from zero at stage 0 to full at the last stage.
pub fn flap_drag_magnitude(
    air_density: f64,
    local_speed: f64,
    area: f64,
    drag_coefficient: f64,
    stage: usize,
    stage_count: usize,
) -> f64 {
    if stage_count < 2 {
        return 0.0;
    }
    let fraction = stage as f64 / (stage_count - 1) as f64;
    0.5 * air_density * local_speed * local_speed * area * drag_coefficient * fraction
}

/// Advance a control surface's deflection for one fixed step.
///
/// Raw input is smoothed into the target, then the visible deflection
/// chases the target at no more than `rate_deg` per second.
pub fn step_control_deflection(
    runtime: &mut SurfaceRuntime,
    raw_input: f64,
    max_deflection: f64,
    rate_deg: f64,
    dt: f64,
) {
    runtime.target_deflection = lerp(
        runtime.target_deflection,
        raw_input * max_deflection,
        dt * INPUT_SMOOTHING_RATE,
    );
    runtime.current_deflection =
        move_towards(runtime.current_deflection, runtime.target_deflection, rate_deg * dt);
}

/// Advance a flap's deflection toward its stage angle for one fixed step.
pub fn step_flap_deflection(runtime: &mut SurfaceRuntime, stage_angle: f64, rate_deg: f64, dt: f64) {
    runtime.target_deflection = stage_angle;
    runtime.current_deflection = move_towards(runtime.current_deflection, stage_angle, rate_deg * dt);
}

/// Part of a control surface's deflection that reaches the angle of attack.
pub fn effective_control_deflection(current_deflection: f64) -> f64 {
    lerp(0.0, current_deflection, DEFLECTION_FORCE_BLEND)
}

/// True when the angle of attack (radians) lies outside `[low, high]` (degrees).
pub fn is_stalled(angle_of_attack: f64, stall_low_deg: f64, stall_high_deg: f64) -> bool {
    let aoa = angle_of_attack.to_degrees();
    aoa > stall_high_deg || aoa < stall_low_deg
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use skylance_core::constants::AIR_DENSITY;

    fn force_for(airflow: DVec3, deflection: f64) -> DVec3 {
        let sample = sample_airflow(airflow, deflection);
        let lift = lift_magnitude(AIR_DENSITY, sample.local_speed, 6.0, 1.2);
        lift_force(DVec3::Y, lift, sample.angle_of_attack)
    }

    #[test]
    fn test_zero_chordwise_flow_gives_zero_lift() {
        for airflow in [
            DVec3::ZERO,
            DVec3::new(0.0, 50.0, 0.0),
            DVec3::new(0.0, -120.0, 0.0),
            DVec3::new(30.0, 10.0, 0.0),
        ] {
            let force = force_for(airflow, 0.0);
            assert_eq!(force, DVec3::ZERO, "airflow {airflow:?}");
            assert!(!force.is_nan());
        }
    }

    #[test]
    fn test_lift_antisymmetric_in_aoa() {
        for deg in [1.0_f64, 5.0, 12.0, 30.0, 60.0] {
            let aoa = deg.to_radians();
            let up = lift_force(DVec3::Y, 1000.0, aoa);
            let down = lift_force(DVec3::Y, 1000.0, -aoa);
            assert_relative_eq!(up.y, -down.y, epsilon = 1e-9);
            assert!(up.y * down.y < 0.0);
        }
    }

    #[test]
    fn test_lift_peaks_at_45_and_reverses_past_90() {
        let at_45 = lift_force(DVec3::Y, 1.0, 45f64.to_radians()).y;
        let at_30 = lift_force(DVec3::Y, 1.0, 30f64.to_radians()).y;
        let at_100 = lift_force(DVec3::Y, 1.0, 100f64.to_radians()).y;
        assert_relative_eq!(at_45, 1.0, epsilon = 1e-12);
        assert!(at_30 < at_45);
        assert!(at_100 < 0.0);
    }

    #[test]
    fn test_sample_airflow_adds_deflection() {
        let sample = sample_airflow(DVec3::new(0.0, 0.0, 100.0), 10.0);
        assert_eq!(sample.local_speed, 100.0);
        assert_relative_eq!(sample.angle_of_attack, 10f64.to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn test_control_deflection_is_rate_limited() {
        let mut runtime = SurfaceRuntime::default();
        // Input smoothing alone would move the target by 25 * 0.06 = 1.5°.
        step_control_deflection(&mut runtime, 1.0, 25.0, 10.0, 0.02);
        assert_relative_eq!(runtime.target_deflection, 1.5, epsilon = 1e-12);
        assert_relative_eq!(runtime.current_deflection, 0.2, epsilon = 1e-12);

        for _ in 0..500 {
            step_control_deflection(&mut runtime, 1.0, 25.0, 10.0, 0.02);
        }
        assert_relative_eq!(runtime.current_deflection, 25.0, epsilon = 1e-6);
    }

    #[test]
    fn test_effective_deflection_blend() {
        assert_relative_eq!(effective_control_deflection(20.0), 14.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flap_drag_scales_with_stage() {
        let full = flap_drag_magnitude(AIR_DENSITY, 100.0, 3.0, 0.02, 2, 3);
        let half = flap_drag_magnitude(AIR_DENSITY, 100.0, 3.0, 0.02, 1, 3);
        assert_relative_eq!(full, 0.5 * AIR_DENSITY * 10_000.0 * 3.0 * 0.02, epsilon = 1e-9);
        assert_relative_eq!(half, full / 2.0, epsilon = 1e-9);
        assert_eq!(flap_drag_magnitude(AIR_DENSITY, 100.0, 3.0, 0.02, 0, 3), 0.0);
        assert_eq!(flap_drag_magnitude(AIR_DENSITY, 100.0, 3.0, 0.02, 0, 1), 0.0);
    }

    #[test]
    fn test_stall_flag_uses_band() {
        assert!(!is_stalled(10f64.to_radians(), -15.0, 15.0));
        assert!(is_stalled(20f64.to_radians(), -15.0, 15.0));
        assert!(is_stalled(-20f64.to_radians(), -15.0, 15.0));
    }
}

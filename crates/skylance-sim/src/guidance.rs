//! Guidance algorithms for homing missiles.
//!
//! Proportional pursuit with a constant-lateral-acceleration turn cap: the
//! nose is rotated toward the aim direction along the shortest arc, at most
//! `max_g · g / speed` radians per second. Lofted guidance biases the aim
//! point upward outside pitbull range.

use glam::{DQuat, DVec3};

use skylance_core::constants::{LOFT_PITBULL_RANGE, MIN_TURN_RATE_SPEED};
use skylance_core::enums::GuidancePolicy;
use skylance_core::math::{clamp01, rotate_towards};
use skylance_core::types::Pose;

/// Maximum turn rate in degrees per second for a given speed.
///
/// Available turn rate shrinks as speed grows. Speeds below
/// `MIN_TURN_RATE_SPEED` are floored to keep the rate finite.
pub fn max_turn_rate_deg(max_g: f64, gravity: f64, speed: f64) -> f64 {
    (max_g * gravity / speed.max(MIN_TURN_RATE_SPEED)).to_degrees()
}

/// Unit direction the missile should point its nose along.
///
/// `None` when the target sits on the missile.
pub fn aim_direction(policy: GuidancePolicy, missile: &Pose, target: DVec3) -> Option<DVec3> {
    let to_target = target - missile.position;
    let distance = to_target.length();
    let direction = to_target.normalize_or_zero();
    if direction == DVec3::ZERO {
        return None;
    }

    match policy {
        GuidancePolicy::Pursuit => Some(direction),
        GuidancePolicy::Lofted => {
            if distance > LOFT_PITBULL_RANGE {
                let loft = clamp01((distance - LOFT_PITBULL_RANGE) / LOFT_PITBULL_RANGE);
                let lofted = (direction + missile.up() * loft).normalize_or_zero();
                if lofted != DVec3::ZERO {
                    return Some(lofted);
                }
            }
            Some(direction)
        }
    }
}

/// Rotate `rotation` so the nose (local −Z) turns toward `direction`,
/// by at most `max_step_deg`.
pub fn steer(rotation: DQuat, direction: DVec3, max_step_deg: f64) -> DQuat {
    let nose = (rotation * DVec3::NEG_Z).normalize();
    let desired = DQuat::from_rotation_arc(nose, direction) * rotation;
    rotate_towards(rotation, desired, max_step_deg).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use skylance_core::constants::GRAVITY;
    use skylance_core::math::angle_between;

    #[test]
    fn test_turn_rate_cap_matches_lateral_g() {
        let rate = max_turn_rate_deg(50.0, GRAVITY, 300.0);
        assert_relative_eq!(rate, (50.0 * GRAVITY / 300.0).to_degrees(), epsilon = 1e-12);
    }

    #[test]
    fn test_turn_rate_floors_speed() {
        let at_zero = max_turn_rate_deg(50.0, GRAVITY, 0.0);
        let at_one = max_turn_rate_deg(50.0, GRAVITY, 1.0);
        assert_eq!(at_zero, at_one);
        assert!(at_zero.is_finite());
    }

    #[test]
    fn test_steer_never_exceeds_step() {
        let cap = max_turn_rate_deg(50.0, GRAVITY, 300.0) * 0.02;
        for bearing in [5.0_f64, 45.0, 90.0, 135.0, 179.0] {
            let rad = bearing.to_radians();
            let direction = DVec3::new(rad.sin(), 0.0, -rad.cos());
            let next = steer(DQuat::IDENTITY, direction, cap);
            let turned = angle_between(DVec3::NEG_Z, next * DVec3::NEG_Z);
            assert!(turned <= cap + 1e-9, "bearing {bearing}: turned {turned} > cap {cap}");
            assert_relative_eq!(turned, cap.min(bearing), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_steer_reaches_small_offsets() {
        let direction = DVec3::new(0.01, 0.0, -1.0).normalize();
        let next = steer(DQuat::IDENTITY, direction, 10.0);
        assert_relative_eq!((next * DVec3::NEG_Z - direction).length(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pursuit_aims_at_target() {
        let pose = Pose::default();
        let dir = aim_direction(GuidancePolicy::Pursuit, &pose, DVec3::new(0.0, 0.0, -8000.0));
        assert_eq!(dir, Some(DVec3::NEG_Z));
        assert_eq!(aim_direction(GuidancePolicy::Pursuit, &pose, DVec3::ZERO), None);
    }

    #[test]
    fn test_loft_bias_fades_inside_pitbull() {
        let pose = Pose::default();

        let far = aim_direction(GuidancePolicy::Lofted, &pose, DVec3::new(0.0, 0.0, -10_000.0));
        let far = far.unwrap();
        // Full loft at twice pitbull range: 45° above the line of sight.
        assert_relative_eq!(angle_between(far, DVec3::NEG_Z), 45.0, epsilon = 1e-9);

        let near = aim_direction(GuidancePolicy::Lofted, &pose, DVec3::new(0.0, 0.0, -4_000.0));
        assert_eq!(near, Some(DVec3::NEG_Z));
    }
}

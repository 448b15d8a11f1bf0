//! Radar detection: illumination, occlusion and notch filtering.
//!
//! A candidate on the radar-reflective layer within range is accepted when
//! the beam covers it, nothing on the obstruction layer sits in front of it,
//! and its closing speed is strictly above the notch threshold.

use glam::DVec3;
use hecs::Entity;
use log::debug;

use skylance_core::components::Radar;
use skylance_core::config::RadarConfig;
use skylance_core::math::azimuth_elevation;
use skylance_core::types::LayerMask;

use super::sweep::slice_floor;
use super::TargetLookup;
use crate::body::BodyState;
use crate::spatial::SpatialQuery;

/// Layers that block a radar line of sight.
pub const OCCLUSION_MASK: LayerMask = LayerMask(LayerMask::OBSTRUCTION.0 | LayerMask::GROUND.0);

/// A target that passed every test this pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub target: Entity,
    pub range: f64,
    pub closing_speed: f64,
}

/// Whether the beam covers a direction at (`azimuth`, `elevation`) degrees.
///
/// Both modes test the current slice band; tracking pins the slice to 0.
pub fn is_illuminated(radar: &Radar, config: &RadarConfig, azimuth: f64, elevation: f64) -> bool {
    let floor = slice_floor(radar, config);
    let in_azimuth = (azimuth - radar.gimbal_azimuth).abs() < config.sweep_resolution;
    let in_elevation = elevation > floor && elevation < floor + config.slice_height();
    in_azimuth && in_elevation
}

/// Relative velocity along the line of sight. Positive when opening.
pub fn closing_speed(
    own_position: DVec3,
    own_velocity: DVec3,
    target_position: DVec3,
    target_velocity: DVec3,
) -> f64 {
    let line_of_sight = (target_position - own_position).normalize_or_zero();
    line_of_sight.dot(target_velocity - own_velocity)
}

/// Notch filter: only returns strictly faster than the threshold survive.
pub fn passes_notch(closing_speed: f64, threshold: f64) -> bool {
    closing_speed.abs() > threshold
}

/// Run every detection test for one radar pass.
pub fn detect(
    radar: &Radar,
    config: &RadarConfig,
    own_entity: Entity,
    own: &BodyState,
    scene: &impl SpatialQuery,
    targets: &impl TargetLookup,
) -> Vec<Detection> {
    let origin = own.pose.position;
    let mut detections = Vec::new();

    for candidate in scene.overlap_sphere(origin, config.detection_range, LayerMask::RADAR) {
        if candidate == own_entity {
            continue;
        }
        let Some((position, velocity)) = targets.kinematics(candidate) else {
            continue;
        };
        let direction = (position - origin).normalize_or_zero();
        if direction == DVec3::ZERO {
            continue;
        }

        let (azimuth, elevation) = azimuth_elevation(own.pose.rotation, direction);
        if !is_illuminated(radar, config, azimuth, elevation) {
            continue;
        }

        if let Some(hit) = scene.raycast(origin, direction, config.detection_range, OCCLUSION_MASK) {
            if hit.entity != Some(candidate) {
                debug!("candidate {candidate:?} occluded at {:.0} m", hit.distance);
                continue;
            }
        }

        let closing = closing_speed(origin, own.velocity, position, velocity);
        if !passes_notch(closing, config.notching_threshold) {
            debug!("candidate {candidate:?} notched ({closing:.1} m/s)");
            continue;
        }

        detections.push(Detection {
            target: candidate,
            range: origin.distance(position),
            closing_speed: closing,
        });
    }

    detections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::radar::new_radar;
    use skylance_core::enums::RadarMode;

    #[test]
    fn test_notch_is_strict() {
        assert!(!passes_notch(50.0, 50.0));
        assert!(!passes_notch(-50.0, 50.0));
        assert!(passes_notch(51.0, 50.0));
        assert!(passes_notch(-51.0, 50.0));
        assert!(!passes_notch(0.0, 50.0));
    }

    #[test]
    fn test_closing_speed_sign() {
        let ahead = DVec3::new(0.0, 0.0, -100.0);
        let opening = closing_speed(DVec3::ZERO, DVec3::ZERO, ahead, DVec3::new(0.0, 0.0, -80.0));
        assert_eq!(opening, 80.0);
        let closing = closing_speed(DVec3::ZERO, DVec3::new(0.0, 0.0, -200.0), ahead, DVec3::ZERO);
        assert_eq!(closing, -200.0);
    }

    #[test]
    fn test_search_illumination_uses_slice_band() {
        let config = RadarConfig::default();
        let mut radar = new_radar(&config);
        radar.gimbal_azimuth = 10.0;
        radar.vertical_slice = 1;

        // Slice 1 spans (−1.5°, +1.5°).
        assert!(is_illuminated(&radar, &config, 11.0, 0.0));
        assert!(!is_illuminated(&radar, &config, 13.5, 0.0));
        assert!(!is_illuminated(&radar, &config, 10.0, 2.0));
        assert!(!is_illuminated(&radar, &config, 10.0, 1.5));
    }

    #[test]
    fn test_track_illumination_uses_first_slice_band() {
        let config = RadarConfig::default();
        let mut radar = new_radar(&config);
        radar.mode = RadarMode::Track;
        radar.gimbal_azimuth = -20.0;
        radar.gimbal_elevation = 0.0;
        radar.vertical_slice = 0;

        // Slice 0 spans (−4.5°, −1.5°): a level target is not illuminated.
        assert!(!is_illuminated(&radar, &config, -20.0, 0.0));
        assert!(is_illuminated(&radar, &config, -20.0, -3.0));
        assert!(!is_illuminated(&radar, &config, -17.0, -3.0));
    }
}

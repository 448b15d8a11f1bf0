//! Gimbal motion: bar-scan sweep in search mode, target slaving in track mode.

use glam::DVec3;

use skylance_core::components::Radar;
use skylance_core::config::RadarConfig;
use skylance_core::math::azimuth_elevation;
use skylance_core::types::Pose;

/// Advance the search sweep by `dt`.
///
/// Passing the right edge wraps to the left edge and moves to the next
/// vertical slice, cycling back to slice 0 after the last.
pub fn advance_search(radar: &mut Radar, config: &RadarConfig, dt: f64) {
    let half_width = radar.horizontal_sweep_angle / 2.0;
    radar.gimbal_azimuth += config.sweep_speed * dt;
    if radar.gimbal_azimuth > half_width {
        radar.gimbal_azimuth = -half_width;
        radar.vertical_slice = (radar.vertical_slice + 1) % config.vertical_slices.max(1);
    }
}

/// Point the gimbal at `target`.
///
/// Returns `false` and leaves the gimbal untouched when the target is outside
/// the track-mode gimbal limits.
pub fn slave_to_target(radar: &mut Radar, config: &RadarConfig, own: &Pose, target: DVec3) -> bool {
    let direction = (target - own.position).normalize_or_zero();
    let (azimuth, elevation) = azimuth_elevation(own.rotation, direction);
    if azimuth.abs() > config.horizontal_limit || elevation.abs() > config.vertical_limit {
        return false;
    }
    radar.gimbal_azimuth = azimuth;
    radar.gimbal_elevation = elevation;
    radar.vertical_slice = 0;
    true
}

/// Lower edge of the current search slice (degrees).
pub fn slice_floor(radar: &Radar, config: &RadarConfig) -> f64 {
    -config.vertical_sweep_angle / 2.0 + radar.vertical_slice as f64 * config.slice_height()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::radar::new_radar;
    use approx::assert_relative_eq;

    #[test]
    fn test_sweep_wraps_and_advances_slice() {
        let config = RadarConfig::default();
        let mut radar = new_radar(&config);
        radar.gimbal_azimuth = 35.0;
        radar.vertical_slice = 0;

        // At exactly +35 the wrap has not happened yet.
        advance_search(&mut radar, &config, 0.0);
        assert_eq!(radar.gimbal_azimuth, 35.0);

        advance_search(&mut radar, &config, 0.02);
        assert_eq!(radar.gimbal_azimuth, -35.0);
        assert_eq!(radar.vertical_slice, 1);
    }

    #[test]
    fn test_last_slice_wraps_to_zero() {
        let config = RadarConfig::default();
        let mut radar = new_radar(&config);
        radar.gimbal_azimuth = 34.5;
        radar.vertical_slice = config.vertical_slices - 1;
        advance_search(&mut radar, &config, 0.02);
        assert_eq!(radar.gimbal_azimuth, -35.0);
        assert_eq!(radar.vertical_slice, 0);
    }

    #[test]
    fn test_sweep_moves_at_configured_speed() {
        let config = RadarConfig::default();
        let mut radar = new_radar(&config);
        assert_eq!(radar.gimbal_azimuth, -35.0);
        for _ in 0..50 {
            advance_search(&mut radar, &config, 0.02);
        }
        assert_relative_eq!(radar.gimbal_azimuth, 25.0, epsilon = 1e-9);
        assert_eq!(radar.vertical_slice, 0);
    }

    #[test]
    fn test_slave_respects_gimbal_limits() {
        let config = RadarConfig::default();
        let mut radar = new_radar(&config);
        let own = Pose::default();

        assert!(slave_to_target(&mut radar, &config, &own, DVec3::new(100.0, 50.0, -1000.0)));
        assert!(radar.gimbal_azimuth > 0.0);
        assert!(radar.gimbal_elevation > 0.0);

        // 45° up is beyond the 10° vertical limit.
        let before = radar.gimbal_azimuth;
        assert!(!slave_to_target(&mut radar, &config, &own, DVec3::new(0.0, 500.0, -500.0)));
        assert_eq!(radar.gimbal_azimuth, before);
    }

    #[test]
    fn test_slice_floor_steps_by_height() {
        let config = RadarConfig::default();
        let mut radar = new_radar(&config);
        assert_relative_eq!(slice_floor(&radar, &config), -4.5, epsilon = 1e-12);
        radar.vertical_slice = 2;
        assert_relative_eq!(slice_floor(&radar, &config), 1.5, epsilon = 1e-12);
    }
}

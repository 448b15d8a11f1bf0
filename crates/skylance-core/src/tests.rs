#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::commands::{ControlState, PilotCommand};
    use crate::config::*;
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::events::{LockLossReason, SimEvent};
    use crate::state::SimSnapshot;
    use crate::types::{LayerMask, Pose, SimTime};

    #[test]
    fn test_radar_mode_serde_uses_short_names() {
        assert_eq!(serde_json::to_string(&RadarMode::Search).unwrap(), "\"SRC\"");
        assert_eq!(serde_json::to_string(&RadarMode::Track).unwrap(), "\"ACM\"");
        let back: RadarMode = serde_json::from_str("\"ACM\"").unwrap();
        assert_eq!(back, RadarMode::Track);
    }

    #[test]
    fn test_pilot_command_tagged_json() {
        let json = serde_json::to_string(&PilotCommand::ToggleLock).unwrap();
        assert_eq!(json, r#"{"type":"ToggleLock"}"#);
        let back: PilotCommand = serde_json::from_str(r#"{"type":"FlapsDown"}"#).unwrap();
        assert_eq!(back, PilotCommand::FlapsDown);
    }

    #[test]
    fn test_control_state_clamped() {
        let c = ControlState {
            pitch: 3.0,
            roll: -2.0,
            yaw: 0.5,
            ..Default::default()
        }
        .clamped();
        assert_eq!(c.pitch, 1.0);
        assert_eq!(c.roll, -1.0);
        assert_eq!(c.yaw, 0.5);
    }

    #[test]
    fn test_missile_phase_terminal() {
        assert!(!MissilePhase::Boosting.is_terminal());
        assert!(!MissilePhase::Guided.is_terminal());
        assert!(MissilePhase::Detonated.is_terminal());
        assert!(MissilePhase::Expired.is_terminal());
        assert!(MissilePhase::TargetLost.is_terminal());
    }

    #[test]
    fn test_sim_event_serde() {
        let events = vec![
            SimEvent::ContactRegistered {
                target: 7,
                range: 812.5,
            },
            SimEvent::LockLost {
                target: 7,
                reason: LockLossReason::GimbalLimit,
            },
            SimEvent::MissileAway {
                missile: 9,
                target: 7,
                hardpoint: 2,
            },
            SimEvent::SeekerArmed,
        ];
        for event in events {
            let json = serde_json::to_string(&event).unwrap();
            let back: SimEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(event, back);
        }
    }

    #[test]
    fn test_snapshot_default_serializes() {
        let snap = SimSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"time\""));
        assert!(json.contains("\"events\":[]"));
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        for _ in 0..50 {
            t.advance(0.02);
        }
        assert_eq!(t.tick, 50);
        assert!((t.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pose_axes() {
        let pose = Pose::default();
        assert_eq!(pose.nose(), DVec3::NEG_Z);
        assert_eq!(pose.forward(), DVec3::Z);
        assert_eq!(pose.up(), DVec3::Y);
        assert_eq!(pose.right(), DVec3::X);
    }

    #[test]
    fn test_pose_compose_offsets_child() {
        let parent = Pose::new(
            DVec3::new(10.0, 0.0, 0.0),
            glam::DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2),
        );
        let child = Pose::new(DVec3::new(0.0, 0.0, -1.0), glam::DQuat::IDENTITY);
        let world = parent.compose(&child);
        // Parent yawed 90° left: its nose points along world −X.
        assert!((world.position - DVec3::new(9.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_layer_mask_intersects() {
        let mask = LayerMask::RADAR | LayerMask::AIRFRAME;
        assert!(mask.intersects(LayerMask::RADAR));
        assert!(!mask.intersects(LayerMask::GROUND));
        assert!(LayerMask::ALL.intersects(LayerMask::OBSTRUCTION));
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
    }

    #[test]
    fn test_default_scenario_matches_authored_values() {
        let config = ScenarioConfig::default();
        assert_eq!(config.tick_rate, 50);
        assert_eq!(config.aircraft.max_thrust, 50_000.0);
        assert_eq!(config.aircraft.thrust_change_rate, 0.5);
        assert_eq!(config.radar.horizontal_sweep_angle, 70.0);
        assert_eq!(config.radar.vertical_slices, 3);
        assert_eq!(config.radar.notching_threshold, 50.0);
        assert_eq!(config.missile.max_g, 50.0);
        assert_eq!(config.armament.hardpoints.len(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_surface_area() {
        let surface = AeroSurfaceConfig {
            span: 4.0,
            chord: 1.5,
            ..Default::default()
        };
        assert_eq!(surface.area(), 6.0);
    }

    #[test]
    fn test_partial_json_overrides_named_fields_only() {
        let json = r#"{ "seed": 7, "radar": { "detection_range": 2500.0 } }"#;
        let config = ScenarioConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.radar.detection_range, 2500.0);
        assert_eq!(config.radar.sweep_speed, 60.0);
        assert_eq!(config.missile.proximity_range, 5.0);
    }

    #[test]
    fn test_invalid_slices_rejected() {
        let json = r#"{ "radar": { "vertical_slices": 0 } }"#;
        match ScenarioConfig::from_json_str(json) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "radar.vertical_slices"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_hardpoints_rejected() {
        let json = r#"{ "armament": { "hardpoints": [] } }"#;
        assert!(matches!(
            ScenarioConfig::from_json_str(json),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            ScenarioConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            ScenarioConfig::load("/nonexistent/skylance/scenario.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = ScenarioConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back = ScenarioConfig::from_json_str(&json).unwrap();
        assert_eq!(config, back);
    }
}

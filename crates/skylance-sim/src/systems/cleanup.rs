//! Cleanup system: removes finished missiles, destroyed targets and bodies
//! that left the world or went numerically bad.

use hecs::{Entity, World};
use log::{debug, warn};

use skylance_core::components::{Missile, PlayerAircraft, RigidBody};
use skylance_core::constants::WORLD_RADIUS;

/// Despawn everything collected this tick.
///
/// `despawn_buffer` may already hold entities queued by earlier systems
/// (targets destroyed by a proximity burst); it is drained on return.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for (entity, missile) in world.query_mut::<&Missile>() {
        if missile.phase.is_terminal() {
            despawn_buffer.push(entity);
        }
    }

    let radius_sq = WORLD_RADIUS * WORLD_RADIUS;
    for (entity, body) in world
        .query_mut::<&RigidBody>()
        .without::<&PlayerAircraft>()
    {
        let position = body.pose.position;
        if !position.is_finite() || !body.velocity.is_finite() {
            warn!("{entity:?} has a non-finite state; removing it");
            despawn_buffer.push(entity);
        } else if position.length_squared() > radius_sq {
            debug!("{entity:?} left the world");
            despawn_buffer.push(entity);
        }
    }

    despawn_buffer.sort_unstable();
    despawn_buffer.dedup();
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use skylance_core::config::MissileConfig;
    use skylance_core::enums::MissilePhase;
    use skylance_core::types::Pose;

    use crate::body::kinematic_body;

    fn missile(phase: MissilePhase) -> Missile {
        Missile {
            config: MissileConfig::default(),
            target: None,
            radar: None,
            phase,
            elapsed: 0.0,
            speed: 0.0,
            inherited_velocity: DVec3::ZERO,
            autonomous: false,
            launched: true,
        }
    }

    #[test]
    fn test_removes_terminal_missiles_only() {
        let mut world = World::new();
        let flying = world.spawn((missile(MissilePhase::Guided),));
        let done = world.spawn((missile(MissilePhase::Detonated),));
        let mut buffer = Vec::new();
        run(&mut world, &mut buffer);
        assert!(world.contains(flying));
        assert!(!world.contains(done));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_removes_queued_and_out_of_bounds() {
        let mut world = World::new();
        let far = Pose::new(DVec3::new(WORLD_RADIUS + 1.0, 0.0, 0.0), Pose::IDENTITY.rotation);
        let gone = world.spawn((kinematic_body(far, DVec3::ZERO),));
        let queued = world.spawn((kinematic_body(Pose::default(), DVec3::ZERO),));
        let stays = world.spawn((kinematic_body(Pose::default(), DVec3::ZERO),));
        let mut bad = kinematic_body(Pose::default(), DVec3::ZERO);
        bad.velocity.x = f64::NAN;
        let broken = world.spawn((bad,));

        // Queued twice: despawned once without complaint.
        let mut buffer = vec![queued, queued];
        run(&mut world, &mut buffer);
        assert!(!world.contains(gone));
        assert!(!world.contains(queued));
        assert!(!world.contains(broken));
        assert!(world.contains(stays));
    }

    #[test]
    fn test_player_is_never_culled() {
        let mut world = World::new();
        let far = Pose::new(DVec3::new(0.0, WORLD_RADIUS * 2.0, 0.0), Pose::IDENTITY.rotation);
        let player = world.spawn((kinematic_body(far, DVec3::ZERO), PlayerAircraft));
        run(&mut world, &mut Vec::new());
        assert!(world.contains(player));
    }
}

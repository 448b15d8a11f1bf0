//! Spatial query service: ray casts and overlap tests against collider spheres
//! and the ground plane.

use glam::DVec3;
use hecs::{Entity, World};

use skylance_core::components::{Collider, RigidBody};
use skylance_core::types::LayerMask;

/// Nearest intersection along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Entity hit, or `None` for the ground plane.
    pub entity: Option<Entity>,
    pub distance: f64,
    pub point: DVec3,
}

/// Read-only geometric queries over the scene.
pub trait SpatialQuery {
    /// Nearest hit along `direction` (unit length) within `max_distance`.
    ///
    /// Colliders that contain `origin` are ignored.
    fn raycast(&self, origin: DVec3, direction: DVec3, max_distance: f64, mask: LayerMask)
        -> Option<RayHit>;

    /// Entities whose collider touches the sphere.
    fn overlap_sphere(&self, center: DVec3, radius: f64, mask: LayerMask) -> Vec<Entity>;
}

#[derive(Debug, Clone, Copy)]
struct SphereEntry {
    entity: Entity,
    center: DVec3,
    radius: f64,
    layers: LayerMask,
}

/// Snapshot of every enabled collider plus a flat ground plane.
///
/// Built once per tick after integration, so every query in the tick sees
/// the same geometry.
#[derive(Debug, Clone, Default)]
pub struct SceneQuery {
    spheres: Vec<SphereEntry>,
    ground_height: Option<f64>,
}

impl SceneQuery {
    /// Scene with no ground plane.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ground(mut self, height: f64) -> Self {
        self.ground_height = Some(height);
        self
    }

    pub fn add_sphere(&mut self, entity: Entity, center: DVec3, radius: f64, layers: LayerMask) {
        self.spheres.push(SphereEntry {
            entity,
            center,
            radius,
            layers,
        });
    }

    /// Capture all enabled colliders attached to rigid bodies.
    pub fn from_world(world: &World, ground_height: f64) -> Self {
        let mut scene = Self::new().with_ground(ground_height);
        for (entity, (body, collider)) in world.query::<(&RigidBody, &Collider)>().iter() {
            if collider.enabled {
                scene.add_sphere(entity, body.pose.position, collider.radius, collider.layers);
            }
        }
        scene
    }

    fn ray_sphere(origin: DVec3, direction: DVec3, sphere: &SphereEntry) -> Option<f64> {
        let offset = origin - sphere.center;
        let c = offset.length_squared() - sphere.radius * sphere.radius;
        if c <= 0.0 {
            return None;
        }
        let b = offset.dot(direction);
        if b > 0.0 {
            return None;
        }
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        Some(-b - discriminant.sqrt())
    }

    fn ray_ground(&self, origin: DVec3, direction: DVec3) -> Option<f64> {
        let height = self.ground_height?;
        let above = origin.y - height;
        if above < 0.0 || direction.y >= 0.0 {
            return None;
        }
        Some(above / -direction.y)
    }
}

impl SpatialQuery for SceneQuery {
    fn raycast(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == DVec3::ZERO {
            return None;
        }

        let mut best: Option<(Option<Entity>, f64)> = None;
        for sphere in self.spheres.iter().filter(|s| s.layers.intersects(mask)) {
            if let Some(t) = Self::ray_sphere(origin, direction, sphere) {
                if t <= max_distance && best.map_or(true, |(_, d)| t < d) {
                    best = Some((Some(sphere.entity), t));
                }
            }
        }
        if mask.intersects(LayerMask::GROUND) {
            if let Some(t) = self.ray_ground(origin, direction) {
                if t <= max_distance && best.map_or(true, |(_, d)| t < d) {
                    best = Some((None, t));
                }
            }
        }

        best.map(|(entity, distance)| RayHit {
            entity,
            distance,
            point: origin + direction * distance,
        })
    }

    fn overlap_sphere(&self, center: DVec3, radius: f64, mask: LayerMask) -> Vec<Entity> {
        self.spheres
            .iter()
            .filter(|s| s.layers.intersects(mask))
            .filter(|s| s.center.distance(center) <= radius + s.radius)
            .map(|s| s.entity)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn(())).collect()
    }

    #[test]
    fn test_raycast_returns_nearest_sphere() {
        let e = entities(2);
        let mut scene = SceneQuery::new();
        scene.add_sphere(e[0], DVec3::new(0.0, 0.0, -100.0), 5.0, LayerMask::OBSTRUCTION);
        scene.add_sphere(e[1], DVec3::new(0.0, 0.0, -50.0), 5.0, LayerMask::OBSTRUCTION);

        let hit = scene
            .raycast(DVec3::ZERO, DVec3::NEG_Z, 1000.0, LayerMask::OBSTRUCTION)
            .unwrap();
        assert_eq!(hit.entity, Some(e[1]));
        assert_relative_eq!(hit.distance, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_raycast_ignores_containing_sphere_and_other_layers() {
        let e = entities(2);
        let mut scene = SceneQuery::new();
        scene.add_sphere(e[0], DVec3::ZERO, 6.0, LayerMask::OBSTRUCTION);
        scene.add_sphere(e[1], DVec3::new(0.0, 0.0, -50.0), 5.0, LayerMask::RADAR);

        assert!(scene
            .raycast(DVec3::ZERO, DVec3::NEG_Z, 1000.0, LayerMask::OBSTRUCTION)
            .is_none());
    }

    #[test]
    fn test_raycast_hits_ground() {
        let scene = SceneQuery::new().with_ground(0.0);
        let hit = scene
            .raycast(DVec3::new(0.0, 1.0, 0.0), DVec3::NEG_Y, 1.5, LayerMask::GROUND)
            .unwrap();
        assert_eq!(hit.entity, None);
        assert_relative_eq!(hit.distance, 1.0, epsilon = 1e-12);

        assert!(scene
            .raycast(DVec3::new(0.0, 2.0, 0.0), DVec3::NEG_Y, 1.5, LayerMask::GROUND)
            .is_none());
    }

    #[test]
    fn test_overlap_sphere_respects_range_and_mask() {
        let e = entities(3);
        let mut scene = SceneQuery::new();
        scene.add_sphere(e[0], DVec3::new(0.0, 0.0, -900.0), 5.0, LayerMask::RADAR);
        scene.add_sphere(e[1], DVec3::new(0.0, 0.0, -1200.0), 5.0, LayerMask::RADAR);
        scene.add_sphere(e[2], DVec3::new(0.0, 0.0, -100.0), 5.0, LayerMask::AIRFRAME);

        let found = scene.overlap_sphere(DVec3::ZERO, 1000.0, LayerMask::RADAR);
        assert_eq!(found, vec![e[0]]);
    }
}

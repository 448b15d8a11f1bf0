//! Patrol route generation.

use glam::DVec3;

/// Closed loop of `count` waypoints on a horizontal circle.
///
/// `altitude_offsets` is cycled over the waypoints and added to `altitude`;
/// pass an empty slice for a level loop. Points run counter-clockwise seen
/// from above, starting at `start_angle` (radians).
pub fn circle_loop(
    center: DVec3,
    radius: f64,
    count: usize,
    altitude: f64,
    start_angle: f64,
    altitude_offsets: &[f64],
) -> Vec<DVec3> {
    (0..count)
        .map(|i| {
            let angle = start_angle + std::f64::consts::TAU * i as f64 / count as f64;
            let offset = if altitude_offsets.is_empty() {
                0.0
            } else {
                altitude_offsets[i % altitude_offsets.len()]
            };
            DVec3::new(
                center.x + radius * angle.cos(),
                altitude + offset,
                center.z - radius * angle.sin(),
            )
        })
        .collect()
}

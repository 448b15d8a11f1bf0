//! Scalar and rotation helpers shared by the simulation systems.
//!
//! Angles passed to and returned from these helpers are in degrees unless
//! the name says otherwise.

use glam::{DMat3, DQuat, DVec3};

/// Linear interpolation with `t` clamped to [0, 1].
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Clamp to [0, 1].
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: f64, target: f64, max_delta: f64) -> f64 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Critically damped spring toward `target`.
///
/// `velocity` carries the spring state between calls. Never overshoots the
/// target.
pub fn smooth_damp(current: f64, target: f64, velocity: &mut f64, smooth_time: f64, dt: f64) -> f64 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Clamp overshoot.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}

/// Rotate `from` toward `to` by at most `max_degrees`.
///
/// Returns `to` exactly once it is within reach.
pub fn rotate_towards(from: DQuat, to: DQuat, max_degrees: f64) -> DQuat {
    let angle = from.angle_between(to).to_degrees();
    if angle <= f64::EPSILON || angle <= max_degrees {
        return to;
    }
    from.slerp(to, max_degrees / angle)
}

/// Unsigned angle between two vectors (degrees). Zero if either is degenerate.
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    let denom = (a.length_squared() * b.length_squared()).sqrt();
    if denom < 1e-15 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Angle from `from` to `to`, signed by the handedness around `axis` (degrees).
pub fn signed_angle(from: DVec3, to: DVec3, axis: DVec3) -> f64 {
    let unsigned = angle_between(from, to);
    if axis.dot(from.cross(to)) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

/// Azimuth and elevation (degrees) of a world direction seen from a frame
/// whose nose is local −Z.
///
/// Azimuth is positive to the right, elevation positive up.
pub fn azimuth_elevation(frame: DQuat, direction: DVec3) -> (f64, f64) {
    let local = frame.inverse() * direction;
    let azimuth = local.x.atan2(-local.z).to_degrees();
    let horizontal = (local.x * local.x + local.z * local.z).sqrt();
    let elevation = local.y.atan2(horizontal).to_degrees();
    (azimuth, elevation)
}

/// Rotation whose nose (local −Z) points along `direction`, keeping local +Y
/// as close to `up` as possible.
///
/// Falls back to the shortest arc from −Z when `direction` is parallel to `up`.
pub fn look_rotation(direction: DVec3, up: DVec3) -> DQuat {
    let back = -direction.normalize_or_zero();
    if back == DVec3::ZERO {
        return DQuat::IDENTITY;
    }
    let right = up.cross(back);
    if right.length_squared() < 1e-12 {
        return DQuat::from_rotation_arc(DVec3::NEG_Z, -back);
    }
    let right = right.normalize();
    let up = back.cross(right);
    DQuat::from_mat3(&DMat3::from_cols(right, up, back))
}

/// Rotation from XYZ Euler angles in degrees, applied X then Y then Z.
pub fn euler_degrees(angles: DVec3) -> DQuat {
    DQuat::from_euler(
        glam::EulerRot::ZYX,
        angles.z.to_radians(),
        angles.y.to_radians(),
        angles.x.to_radians(),
    )
}

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Unit quaternion used for carriage orientation.
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// Rigid local-to-world transform of a curve.
pub type Isometry3 = nalgebra::Isometry3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Linear interpolation between two points.
#[must_use]
pub fn lerp_point(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}

/// Linear interpolation between two vectors.
#[must_use]
pub fn lerp_vector(a: &Vector3, b: &Vector3, t: f64) -> Vector3 {
    a + (b - a) * t
}

/// Yaw/pitch rotation that turns +X onto `direction`, with zero roll.
///
/// Returns the identity for a zero-length direction.
#[must_use]
pub fn rotation_towards(direction: &Vector3) -> Rotation {
    if direction.norm() < TOLERANCE {
        return Rotation::identity();
    }
    let yaw = direction.y.atan2(direction.x);
    let horizontal = direction.x.hypot(direction.y);
    // Positive pitch about +Y tips +X downwards.
    let pitch = -direction.z.atan2(horizontal);
    Rotation::from_euler_angles(0.0, pitch, yaw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lerp_midpoint() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(10.0, -4.0, 2.0);
        let m = lerp_point(&a, &b, 0.5);
        assert_relative_eq!(m.x, 5.0);
        assert_relative_eq!(m.y, -2.0);
        assert_relative_eq!(m.z, 1.0);
    }

    #[test]
    fn rotation_maps_x_onto_direction() {
        let dir = Vector3::new(1.0, 1.0, 1.0).normalize();
        let rotated = rotation_towards(&dir) * Vector3::x();
        assert_relative_eq!(rotated.x, dir.x, epsilon = 1e-9);
        assert_relative_eq!(rotated.y, dir.y, epsilon = 1e-9);
        assert_relative_eq!(rotated.z, dir.z, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_direction_is_identity() {
        assert_eq!(rotation_towards(&Vector3::zeros()), Rotation::identity());
    }
}

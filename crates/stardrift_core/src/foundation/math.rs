//! Math utilities and types
//!
//! Provides the fundamental math types used by the simulation. Rotations
//! are kept as Euler vectors (radians, XYZ) rather than quaternions so
//! transforms round-trip through the wire protocol unchanged.

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Transform representing position, rotation (Euler radians), and uniform scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Rotation as Euler angles in radians
    pub rotation: Vec3,

    /// Uniform scale factor
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Create a transform at the given position with identity rotation
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Forward heading derived from yaw/pitch Euler angles.
///
/// Yaw rotates around +Y, pitch around +X; a zero rotation faces -Z,
/// matching the camera convention the renderer uses.
pub fn forward_from_rotation(rotation: &Vec3) -> Vec3 {
    let (pitch, yaw) = (rotation.x, rotation.y);
    Vec3::new(
        -yaw.sin() * pitch.cos(),
        pitch.sin(),
        -yaw.cos() * pitch.cos(),
    )
}

/// A unit vector perpendicular to `dir` in the horizontal plane.
///
/// Falls back to +X when `dir` is (anti)parallel to +Y, so callers always
/// get a usable lateral axis for offset placement.
pub fn lateral_axis(dir: &Vec3) -> Vec3 {
    let up = Vec3::new(0.0, 1.0, 0.0);
    let side = dir.cross(&up);
    if side.magnitude_squared() < 1e-6 {
        Vec3::new(1.0, 0.0, 0.0)
    } else {
        side.normalize()
    }
}

/// Normalize a vector, or return `fallback` when its magnitude is ~zero
pub fn normalize_or(v: &Vec3, fallback: Vec3) -> Vec3 {
    let mag_sq = v.magnitude_squared();
    if mag_sq < 1e-8 {
        fallback
    } else {
        v / mag_sq.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn forward_is_unit_length() {
        let fwd = forward_from_rotation(&Vec3::new(0.3, 1.2, 0.0));
        assert_relative_eq!(fwd.magnitude(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn zero_rotation_faces_negative_z() {
        let fwd = forward_from_rotation(&Vec3::zeros());
        assert_relative_eq!(fwd.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(fwd.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(fwd.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn lateral_axis_is_perpendicular() {
        let dir = Vec3::new(0.0, 0.0, -1.0);
        let side = lateral_axis(&dir);
        assert_relative_eq!(side.dot(&dir), 0.0, epsilon = 1e-6);
        assert_relative_eq!(side.magnitude(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn normalize_or_handles_zero_vector() {
        let fallback = Vec3::new(0.0, 0.0, -1.0);
        assert_eq!(normalize_or(&Vec3::zeros(), fallback), fallback);
    }
}

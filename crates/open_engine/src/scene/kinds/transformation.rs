//! Transformation payload

use crate::foundation::math::{utils, Mat4, Quat, Vec3};

/// Position, rotation and scale applied to a subtree
///
/// The matrix is composed as translation * rotation * scale, so children are
/// scaled first, then rotated, then moved.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl Default for Transformation {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transformation {
    /// Identity transformation
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Replace the position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Replace the rotation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    /// Replace the scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Move along world axes
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.position += Vec3::new(x, y, z);
    }

    /// Move along the node's own (rotated) axes
    pub fn move_by(&mut self, x: f32, y: f32, z: f32) {
        self.position += self.rotation * Vec3::new(x, y, z);
    }

    /// Rotate by Euler angles in radians, relative to the current orientation
    pub fn rotate(&mut self, x: f32, y: f32, z: f32) {
        self.rotate_by(utils::quat_from_euler(x, y, z));
    }

    /// Rotate by a quaternion, relative to the current orientation
    pub fn rotate_by(&mut self, rotation: Quat) {
        self.rotation = Quat::new_normalize((self.rotation * rotation).into_inner());
    }

    /// Multiply the scale component-wise
    pub fn scale_by(&mut self, x: f32, y: f32, z: f32) {
        self.scale.component_mul_assign(&Vec3::new(x, y, z));
    }

    /// Local transformation matrix
    pub fn matrix(&self) -> Mat4 {
        utils::compose_trs(&self.position, &self.rotation, &self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_matrix() {
        assert_relative_eq!(Transformation::new().matrix(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_move_follows_rotation() {
        let mut t = Transformation::new();
        t.rotate(0.0, HALF_PI, 0.0);
        t.move_by(0.0, 0.0, -1.0);
        // -Z rotated a quarter turn about Y points along -X
        assert_relative_eq!(t.position(), Vec3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);

        t.translate(1.0, 2.0, 0.0);
        assert_relative_eq!(t.position(), Vec3::new(0.0, 2.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_rotations_accumulate() {
        let mut t = Transformation::new();
        t.rotate(0.0, HALF_PI, 0.0);
        t.rotate(0.0, HALF_PI, 0.0);
        let forward = t.rotation() * Vec3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(forward, Vec3::new(0.0, 0.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_matrix_scales_then_translates() {
        let mut t = Transformation::new().with_position(Vec3::new(0.0, 0.0, 5.0));
        t.scale_by(2.0, 2.0, 2.0);
        let p = t.matrix().transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.coords, Vec3::new(2.0, 0.0, 5.0), epsilon = EPSILON);
        assert_relative_eq!(t.scale(), Vec3::new(2.0, 2.0, 2.0), epsilon = EPSILON);
    }
}

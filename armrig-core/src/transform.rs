/// 4x4 affine transform helpers used by the scene graph and input edits
use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Rotation of `angle` radians about `axis`, `None` when the axis has no length
    pub fn rotation_matrix(angle: f32, axis: &Vector3<f32>) -> Option<Matrix4<f32>> {
        let axis = Unit::try_new(*axis, 1e-12)?;
        Some(Matrix4::from_axis_angle(&axis, angle))
    }

    /// `m * T(offset)`: move along the frame's own axes
    pub fn translate(m: &Matrix4<f32>, offset: &Vector3<f32>) -> Matrix4<f32> {
        m * Self::translation_matrix(offset)
    }

    /// `m * R(angle, axis)`: spin about an axis of the frame itself
    pub fn rotate(m: &Matrix4<f32>, angle: f32, axis: &Vector3<f32>) -> Matrix4<f32> {
        match Self::rotation_matrix(angle, axis) {
            Some(r) => m * r,
            None => *m,
        }
    }

    /// Origin of the frame, i.e. the translation column
    pub fn origin(m: &Matrix4<f32>) -> Point3<f32> {
        Point3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
    }
}

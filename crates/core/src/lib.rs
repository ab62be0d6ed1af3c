//! Core shared types: math re-exports, placement transform, scene host and errors.

use thiserror::Error;

pub use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, vec2, vec3};

pub mod scene;
pub mod transform;

pub use scene::{NodeId, SceneTree};
pub use transform::Transform;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown scene node {0}")]
    UnknownNode(NodeId),
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = transform::Transform::identity();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn placement_matrix_carries_translation() {
        let t = transform::Transform::at(vec3(1.0, 2.0, 3.0));
        let m = t.matrix().to_cols_array();
        assert!((m[12] - 1.0).abs() < 1e-6);
        assert!((m[13] - 2.0).abs() < 1e-6);
        assert!((m[14] - 3.0).abs() < 1e-6);
        assert!((m[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn point_is_scaled_then_rotated_then_moved() {
        let t = transform::Transform::at(vec3(0.0, 0.0, 5.0))
            .with_scale(Vec3::splat(2.0))
            .with_euler(vec3(0.0, 0.0, std::f32::consts::FRAC_PI_2));
        let p = t.transform_point(Vec3::X);
        assert!((p - vec3(0.0, 2.0, 5.0)).length() < 1e-5);
        assert!((t.matrix().transform_point3(Vec3::X) - p).length() < 1e-5);
    }
}

/// Camera placement and its view frustum
use nalgebra::{Point3, Vector3};

use crate::algebra::Matrix;
use crate::error::RenderResult;
use crate::frustum::{BoundingSphere, Frustum, SphereClassification};
use crate::transform::RotationState;

/// Camera looking down +z in its own space
#[derive(Debug, Clone)]
pub struct Camera {
    position: Point3<f32>,
    rotation: RotationState,
    frustum: Frustum,
}

impl Camera {
    pub fn new(position: Point3<f32>, rotation: RotationState, near_distance: f32) -> Self {
        Self {
            position,
            rotation,
            frustum: Frustum::new(near_distance),
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: RotationState) {
        self.rotation = rotation;
    }

    pub fn move_by(&mut self, dx: f32, dy: f32, dz: f32) {
        self.position += Vector3::new(dx, dy, dz);
    }

    pub fn rotate_by(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation.rotate(dx, dy, dz);
    }

    /// World-to-view matrix for the current position and rotation
    pub fn view_matrix(&self) -> RenderResult<Matrix> {
        Matrix::view(&self.position, &self.rotation.as_vector())
    }

    /// Classify a sphere already expressed in view space
    pub fn classify(&self, sphere: &BoundingSphere) -> SphereClassification {
        self.frustum.classify(sphere)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Point3::origin(), RotationState::zero(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frustum::FrustumRelation;
    use std::f32::consts::PI;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::default();
        assert_eq!(camera.position(), Point3::origin());
        assert!((camera.frustum().near_distance() - 1.0).abs() < 1e-6);
        assert!(camera.view_matrix().unwrap().approx_eq(&Matrix::identity(), 1e-6));
    }

    #[test]
    fn test_view_matrix_follows_position() {
        let mut camera = Camera::default();
        camera.move_by(0.0, 0.0, -5.0);
        let p = camera
            .view_matrix()
            .unwrap()
            .transform_point(&Point3::origin())
            .unwrap()
            .unwrap();
        assert!((p - Point3::new(0.0, 0.0, 5.0)).norm() < 1e-6);
    }

    #[test]
    fn test_turned_camera_sees_behind() {
        let mut camera = Camera::default();
        camera.rotate_by(0.0, PI, 0.0);
        let behind = Point3::new(0.0, 0.0, -10.0);
        let in_view = camera
            .view_matrix()
            .unwrap()
            .transform_point(&behind)
            .unwrap()
            .unwrap();
        let result = camera.classify(&BoundingSphere::new(in_view, 1.0));
        assert_eq!(result.relation, FrustumRelation::Inside);
    }
}

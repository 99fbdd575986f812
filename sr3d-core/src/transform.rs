/// Object transform state and the model matrix derived from it
use nalgebra::Vector3;

use crate::algebra::Matrix;
use crate::error::RenderResult;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    pub fn as_vector(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn matrix(&self) -> RenderResult<Matrix> {
        Matrix::rotation_zyx(&self.as_vector())
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Translation, rotation and per-axis scale of an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: RotationState,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn new(translation: Vector3<f32>, rotation: RotationState, scale: Vector3<f32>) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn at(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    /// Model-to-world matrix `T * R * S`, rebuilt from the current state on every call
    pub fn model_matrix(&self) -> RenderResult<Matrix> {
        Matrix::translation(&self.translation)
            .try_mul(&self.rotation.matrix()?)?
            .try_mul(&Matrix::scale(&self.scale))
    }

    /// Largest scale magnitude over the three axes, used to grow bounding spheres.
    /// Mirrored axes count by their absolute value.
    pub fn max_scale(&self) -> f32 {
        self.scale.x.abs().max(self.scale.y.abs()).max(self.scale.z.abs())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: RotationState::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

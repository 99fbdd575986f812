/// View space to canvas projection
use nalgebra::Point3;

use crate::algebra::Matrix;
use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::geometry::{CanvasPoint, ScreenVertex};

/// Below this magnitude a projected depth is treated as zero
const DEPTH_EPSILON: f32 = 1e-6;

/// Combined `viewport_to_canvas * projection` (3x4) for one canvas size
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    matrix: Matrix,
}

impl Projection {
    pub fn new(config: &RenderConfig) -> RenderResult<Self> {
        let projection = Matrix::projection(config.projection_distance);
        let viewport = Matrix::viewport_to_canvas(
            config.canvas_width as f32,
            config.canvas_height as f32,
            config.viewport_width,
            config.viewport_height,
        );
        Ok(Self {
            matrix: viewport.try_mul(&projection)?,
        })
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Project a view-space point to integer canvas coordinates.
    ///
    /// `None` when the point sits on the camera plane.
    pub fn to_canvas(&self, point: &Point3<f32>) -> RenderResult<Option<CanvasPoint>> {
        let Some(projected) = self.matrix.transform_point(point)? else {
            return Ok(None);
        };
        if projected.z.abs() < DEPTH_EPSILON {
            return Ok(None);
        }
        Ok(Some(CanvasPoint::new(
            (projected.x / projected.z).round() as i32,
            (projected.y / projected.z).round() as i32,
        )))
    }

    /// Project a view-space point and keep its reciprocal depth for the depth test
    pub fn project(&self, point: &Point3<f32>) -> RenderResult<Option<ScreenVertex>> {
        Ok(self
            .to_canvas(point)?
            .and_then(|canvas| ScreenVertex::from_canvas(canvas, point.z)))
    }
}

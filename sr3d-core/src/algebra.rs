/// Dense matrices and the transform builders used by the pipeline
use nalgebra::{DMatrix, Point3, Vector3};

use crate::error::{RenderError, RenderResult};

/// Below this magnitude a homogeneous divisor is treated as zero
const HOMOGENEOUS_EPSILON: f32 = 1e-6;

/// Row-major matrix of arbitrary size.
///
/// Multiplication always checks `cols(lhs) == rows(rhs)` and reports a
/// [`RenderError::DimensionMismatch`] otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    inner: DMatrix<f32>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            inner: DMatrix::zeros(rows, cols),
        }
    }

    /// Build from row-major values; `values.len()` must equal `rows * cols`
    pub fn from_rows(rows: usize, cols: usize, values: &[f32]) -> RenderResult<Self> {
        if values.len() != rows * cols {
            return Err(RenderError::DimensionMismatch {
                left_cols: values.len(),
                right_rows: rows * cols,
            });
        }
        Ok(Self {
            inner: DMatrix::from_row_slice(rows, cols, values),
        })
    }

    pub fn rows(&self) -> usize {
        self.inner.nrows()
    }

    pub fn cols(&self) -> usize {
        self.inner.ncols()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.inner.get((row, col)).copied()
    }

    pub fn try_mul(&self, rhs: &Matrix) -> RenderResult<Matrix> {
        if self.cols() != rhs.rows() {
            return Err(RenderError::DimensionMismatch {
                left_cols: self.cols(),
                right_rows: rhs.rows(),
            });
        }
        Ok(Matrix {
            inner: &self.inner * &rhs.inner,
        })
    }

    pub fn transpose(&self) -> Matrix {
        Matrix {
            inner: self.inner.transpose(),
        }
    }

    /// Element-wise comparison within `epsilon`; shapes must match
    pub fn approx_eq(&self, other: &Matrix, epsilon: f32) -> bool {
        self.rows() == other.rows()
            && self.cols() == other.cols()
            && self
                .inner
                .iter()
                .zip(other.inner.iter())
                .all(|(a, b)| (a - b).abs() < epsilon)
    }

    /// 4x4 identity
    pub fn identity() -> Self {
        Self {
            inner: DMatrix::identity(4, 4),
        }
    }

    pub fn scale(factors: &Vector3<f32>) -> Self {
        let mut m = Self::zeros(4, 4);
        m.inner[(0, 0)] = factors.x;
        m.inner[(1, 1)] = factors.y;
        m.inner[(2, 2)] = factors.z;
        m.inner[(3, 3)] = 1.0;
        m
    }

    pub fn translation(offset: &Vector3<f32>) -> Self {
        let mut m = Self::identity();
        m.inner[(0, 3)] = offset.x;
        m.inner[(1, 3)] = offset.y;
        m.inner[(2, 3)] = offset.z;
        m
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m.inner[(1, 1)] = c;
        m.inner[(1, 2)] = -s;
        m.inner[(2, 1)] = s;
        m.inner[(2, 2)] = c;
        m
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m.inner[(0, 0)] = c;
        m.inner[(0, 2)] = s;
        m.inner[(2, 0)] = -s;
        m.inner[(2, 2)] = c;
        m
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m.inner[(0, 0)] = c;
        m.inner[(0, 1)] = -s;
        m.inner[(1, 0)] = s;
        m.inner[(1, 1)] = c;
        m
    }

    /// Rotation around the three axes, applied in order: X, then Y, then Z (`Rz * Ry * Rx`)
    pub fn rotation_zyx(angles: &Vector3<f32>) -> RenderResult<Self> {
        Self::rotation_z(angles.z)
            .try_mul(&Self::rotation_y(angles.y))?
            .try_mul(&Self::rotation_x(angles.x))
    }

    /// 3x4 perspective projection onto the plane at distance `d`
    pub fn projection(d: f32) -> Self {
        let mut m = Self::zeros(3, 4);
        m.inner[(0, 0)] = d;
        m.inner[(1, 1)] = d;
        m.inner[(2, 2)] = 1.0;
        m
    }

    /// 3x3 map from viewport coordinates to canvas pixels, y pointing down
    pub fn viewport_to_canvas(
        canvas_width: f32,
        canvas_height: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Self {
        let mut m = Self::zeros(3, 3);
        m.inner[(0, 0)] = canvas_width / viewport_width;
        m.inner[(0, 2)] = canvas_width / 2.0;
        m.inner[(1, 1)] = -canvas_height / viewport_height;
        m.inner[(1, 2)] = canvas_height / 2.0;
        m.inner[(2, 2)] = 1.0;
        m
    }

    /// World-to-view matrix for a camera placed by `T(position) * R(rotation)`.
    ///
    /// Rotation is orthonormal, so the inverse is `R^T * T(-position)`.
    pub fn view(position: &Point3<f32>, rotation: &Vector3<f32>) -> RenderResult<Self> {
        let rotation_inverse = Self::rotation_zyx(rotation)?.transpose();
        let translation_inverse = Self::translation(&-position.coords);
        rotation_inverse.try_mul(&translation_inverse)
    }

    /// Homogeneous 4x1 column `(x, y, z, 1)`
    pub fn from_point(point: &Point3<f32>) -> Self {
        Self {
            inner: DMatrix::from_column_slice(4, 1, &[point.x, point.y, point.z, 1.0]),
        }
    }

    /// Cartesian point from a column matrix.
    ///
    /// 4x1 columns are divided by their last row (`None` when it is ~0),
    /// 3x1 columns are returned as-is.
    pub fn to_point(&self) -> RenderResult<Option<Point3<f32>>> {
        if self.cols() != 1 {
            return Err(RenderError::NotHomogeneous {
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        let xyz = Vector3::new(self.inner[(0, 0)], self.inner[(1, 0)], self.inner[(2, 0)]);
        match self.rows() {
            4 => Ok(divide_homogeneous(xyz, self.inner[(3, 0)])),
            3 => Ok(Some(Point3::from(xyz))),
            rows => Err(RenderError::NotHomogeneous { rows, cols: 1 }),
        }
    }

    /// `self * (x, y, z, 1)` without building the column matrix.
    ///
    /// Same conversion rules as [`Matrix::to_point`]: a 4-row result is
    /// divided by `w`, a 3-row result is returned raw.
    pub fn transform_point(&self, point: &Point3<f32>) -> RenderResult<Option<Point3<f32>>> {
        if self.cols() != 4 {
            return Err(RenderError::DimensionMismatch {
                left_cols: self.cols(),
                right_rows: 4,
            });
        }
        let row = |r: usize| {
            self.inner[(r, 0)] * point.x
                + self.inner[(r, 1)] * point.y
                + self.inner[(r, 2)] * point.z
                + self.inner[(r, 3)]
        };
        match self.rows() {
            4 => Ok(divide_homogeneous(Vector3::new(row(0), row(1), row(2)), row(3))),
            3 => Ok(Some(Point3::new(row(0), row(1), row(2)))),
            rows => Err(RenderError::NotHomogeneous { rows, cols: 4 }),
        }
    }
}

fn divide_homogeneous(xyz: Vector3<f32>, w: f32) -> Option<Point3<f32>> {
    if w.abs() < HOMOGENEOUS_EPSILON {
        return None;
    }
    Some(Point3::from(xyz / w))
}

//! Renderable objects and the per-object transform, cull, clip, project pipeline.

use nalgebra::{Point3, Vector3};
use std::ops::AddAssign;

use crate::algebra::Matrix;
use crate::camera::Camera;
use crate::config::RenderMode;
use crate::error::RenderResult;
use crate::frustum::{clip_triangle_against_planes, BoundingSphere, FrustumRelation, SphereClassification};
use crate::geometry::{Color, Geometry, GeometryHandle, Triangle};
use crate::projection::Projection;
use crate::raster::FrameBuffer;
use crate::transform::{RotationState, Transform};

/// Per-frame counters, summed over objects by the scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Original triangles that reached the rasterizer
    pub drawn: usize,
    pub backfaces: usize,
    /// Triangles that clipping reduced to nothing
    pub clipped_away: usize,
    /// Triangles with bad indices or unprojectable vertices
    pub skipped: usize,
    /// Objects rejected by the frustum test
    pub culled_objects: usize,
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, other: Self) {
        self.drawn += other.drawn;
        self.backfaces += other.backfaces;
        self.clipped_away += other.clipped_away;
        self.skipped += other.skipped;
        self.culled_objects += other.culled_objects;
    }
}

/// Geometry plus the transform placing it in the world
#[derive(Debug, Clone)]
pub struct SceneObject {
    name: String,
    geometry: GeometryHandle,
    transform: Transform,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, geometry: Geometry, transform: Transform) -> Self {
        Self::with_handle(name, GeometryHandle::with_geometry(geometry), transform)
    }

    /// Object whose geometry arrives through `handle`, possibly later
    pub fn with_handle(name: impl Into<String>, handle: GeometryHandle, transform: Transform) -> Self {
        Self {
            name: name.into(),
            geometry: handle,
            transform,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &GeometryHandle {
        &self.geometry
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.transform.translation = translation;
    }

    pub fn set_rotation(&mut self, rotation: RotationState) {
        self.transform.rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.transform.scale = scale;
    }

    pub fn move_by(&mut self, dx: f32, dy: f32, dz: f32) {
        self.transform.translation += Vector3::new(dx, dy, dz);
    }

    pub fn rotate_by(&mut self, dx: f32, dy: f32, dz: f32) {
        self.transform.rotation.rotate(dx, dy, dz);
    }

    /// Multiply every scale axis by `factor`
    pub fn scale_by(&mut self, factor: f32) {
        self.transform.scale *= factor;
    }

    pub fn model_matrix(&self) -> RenderResult<Matrix> {
        self.transform.model_matrix()
    }

    /// Draw this object into `frame`.
    ///
    /// Geometry that has not arrived yet draws nothing. Bad triangles are
    /// logged and skipped; only matrix shape errors abort.
    pub fn render(
        &self,
        camera: &Camera,
        projection: &Projection,
        mode: RenderMode,
        frame: &mut FrameBuffer,
    ) -> RenderResult<RenderStats> {
        let mut stats = RenderStats::default();
        let geometry = self.geometry.snapshot();
        if geometry.vertices.is_empty() {
            return Ok(stats);
        }

        let view_model = camera.view_matrix()?.try_mul(&self.model_matrix()?)?;

        let visibility = self.classify(&geometry, &view_model, camera)?;
        if visibility.relation == FrustumRelation::Outside {
            log::trace!("{}: outside the frustum, skipped", self.name);
            stats.culled_objects = 1;
            return Ok(stats);
        }

        for index in 0..geometry.triangles.len() {
            let Some(model_points) = geometry.triangle_vertices(index) else {
                log::warn!(
                    "{}: triangle {} {:?} references a missing vertex",
                    self.name,
                    index,
                    geometry.triangles[index]
                );
                stats.skipped += 1;
                continue;
            };

            let Some(view_triangle) = to_view_space(&view_model, &model_points)? else {
                stats.skipped += 1;
                continue;
            };

            if is_backface(&view_triangle) {
                stats.backfaces += 1;
                continue;
            }

            let pieces = match visibility.relation {
                FrustumRelation::Cuts => {
                    clip_triangle_against_planes(&view_triangle, &visibility.cut_planes)
                }
                _ => vec![view_triangle],
            };
            if pieces.is_empty() {
                stats.clipped_away += 1;
                continue;
            }

            let color = geometry.color_of(index);
            if rasterize_pieces(&pieces, projection, mode, color, frame)? > 0 {
                stats.drawn += 1;
            } else {
                log::trace!("{}: triangle {} has no projectable piece", self.name, index);
                stats.skipped += 1;
            }
        }

        Ok(stats)
    }

    /// One coarse frustum test for the whole object using its bounding sphere
    fn classify(
        &self,
        geometry: &Geometry,
        view_model: &Matrix,
        camera: &Camera,
    ) -> RenderResult<SphereClassification> {
        let outside = SphereClassification {
            relation: FrustumRelation::Outside,
            cut_planes: Vec::new(),
        };
        let Some(sphere) = BoundingSphere::enclosing(&geometry.vertices) else {
            return Ok(outside);
        };
        let Some(center) = view_model.transform_point(&sphere.center)? else {
            return Ok(outside);
        };
        // Over-estimates under non-uniform scale
        let radius = sphere.radius * self.transform.max_scale();
        Ok(camera.classify(&BoundingSphere::new(center, radius)))
    }
}

fn to_view_space(view_model: &Matrix, points: &[Point3<f32>; 3]) -> RenderResult<Option<Triangle>> {
    let (Some(a), Some(b), Some(c)) = (
        view_model.transform_point(&points[0])?,
        view_model.transform_point(&points[1])?,
        view_model.transform_point(&points[2])?,
    ) else {
        return Ok(None);
    };
    Ok(Some(Triangle::new(a, b, c)))
}

/// Project and draw each piece; returns how many reached the rasterizer.
/// Pieces touching the camera plane have no projection and are dropped.
fn rasterize_pieces(
    pieces: &[Triangle],
    projection: &Projection,
    mode: RenderMode,
    color: Color,
    frame: &mut FrameBuffer,
) -> RenderResult<usize> {
    let mut drawn = 0;
    for piece in pieces {
        let [a, b, c] = piece.points;
        let (Some(a), Some(b), Some(c)) = (
            projection.project(&a)?,
            projection.project(&b)?,
            projection.project(&c)?,
        ) else {
            continue;
        };
        match mode {
            RenderMode::Filled => frame.draw_filled_triangle(a, b, c, color),
            RenderMode::Wireframe => frame.draw_wireframe_triangle(a, b, c, color),
        }
        drawn += 1;
    }
    Ok(drawn)
}

/// The camera sits at the view-space origin
fn is_backface(triangle: &Triangle) -> bool {
    let to_camera = Point3::<f32>::origin() - triangle.points[0];
    triangle.normal().dot(&to_camera) <= 0.0
}

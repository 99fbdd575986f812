/// Geometry primitives for 3D rendering
use nalgebra::{Point3, Vector3};
use std::sync::{Arc, RwLock};

/// Flat RGB color of a triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const MAGENTA: Color = Color::new(255, 0, 255);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque RGBA bytes as stored in the pixel buffer
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Scale by a shade factor clamped to `0..=1`; `1.0` leaves the color unchanged
    pub fn shaded(self, h: f32) -> Color {
        let k = h.clamp(0.0, 1.0);
        let scale = |channel: u8| (channel as f32 * k).round() as u8;
        Color::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// Integer canvas coordinate with an interpolated shade factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    pub x: i32,
    pub y: i32,
    pub h: f32,
}

impl CanvasPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y, h: 1.0 }
    }
}

/// Canvas coordinate carrying the reciprocal of its view-space depth.
///
/// `inv_depth` grows as the point gets nearer, so the depth buffer keeps the
/// largest value per pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: i32,
    pub y: i32,
    pub inv_depth: f32,
    pub h: f32,
}

impl ScreenVertex {
    pub fn new(x: i32, y: i32, inv_depth: f32) -> Self {
        Self {
            x,
            y,
            inv_depth,
            h: 1.0,
        }
    }

    /// Attach the pre-projection depth `view_z` to a projected point.
    /// `None` for a zero depth.
    pub fn from_canvas(point: CanvasPoint, view_z: f32) -> Option<Self> {
        if view_z == 0.0 {
            return None;
        }
        Some(Self {
            x: point.x,
            y: point.y,
            inv_depth: 1.0 / view_z,
            h: point.h,
        })
    }
}

/// A triangle in view space, produced and consumed while clipping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub points: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        Self {
            points: [p0, p1, p2],
        }
    }

    /// Face normal `(p1 - p0) x (p2 - p0)`, not normalized
    pub fn normal(&self) -> Vector3<f32> {
        let edge1 = self.points[1] - self.points[0];
        let edge2 = self.points[2] - self.points[0];
        edge1.cross(&edge2)
    }
}

/// Indexed triangle geometry: vertices, index triples, one color per triangle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Point3<f32>>,
    pub triangles: Vec<[usize; 3]>,
    pub colors: Vec<Color>,
}

impl Geometry {
    pub fn new(
        vertices: Vec<Point3<f32>>,
        triangles: Vec<[usize; 3]>,
        colors: Vec<Color>,
    ) -> Self {
        Self {
            vertices,
            triangles,
            colors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }

    /// Color of the original triangle at `index`, black when the color list is short
    pub fn color_of(&self, index: usize) -> Color {
        self.colors.get(index).copied().unwrap_or(Color::BLACK)
    }

    /// Fetch the three vertices of triangle `index`; `None` on an out-of-range vertex index
    pub fn triangle_vertices(&self, index: usize) -> Option<[Point3<f32>; 3]> {
        let [a, b, c] = *self.triangles.get(index)?;
        Some([
            *self.vertices.get(a)?,
            *self.vertices.get(b)?,
            *self.vertices.get(c)?,
        ])
    }
}

/// Shared slot through which a geometry provider publishes an object's mesh.
///
/// Writers replace the whole snapshot; readers clone the `Arc`, so a render
/// never observes a half-written vertex or triangle list.
#[derive(Debug, Clone, Default)]
pub struct GeometryHandle {
    slot: Arc<RwLock<Arc<Geometry>>>,
}

impl GeometryHandle {
    /// A handle with no geometry yet
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_geometry(geometry: Geometry) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Arc::new(geometry))),
        }
    }

    pub fn set(&self, geometry: Geometry) {
        let geometry = Arc::new(geometry);
        // A poisoned lock still holds a complete snapshot; keep going with it.
        match self.slot.write() {
            Ok(mut guard) => *guard = geometry,
            Err(poisoned) => *poisoned.into_inner() = geometry,
        }
    }

    pub fn snapshot(&self) -> Arc<Geometry> {
        match self.slot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }
}

/// Face colors used by [`cube`]: red, green, blue, yellow, magenta, cyan
pub const CUBE_FACE_COLORS: [Color; 6] = [
    Color::RED,
    Color::GREEN,
    Color::BLUE,
    Color::YELLOW,
    Color::MAGENTA,
    Color::CYAN,
];

/// Cube spanning -1..1 on every axis, two triangles per face
pub fn cube(face_colors: [Color; 6]) -> Geometry {
    let vertices = vec![
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(-1.0, 1.0, 1.0),
        Point3::new(-1.0, -1.0, 1.0),
        Point3::new(1.0, -1.0, 1.0),
        Point3::new(1.0, 1.0, -1.0),
        Point3::new(-1.0, 1.0, -1.0),
        Point3::new(-1.0, -1.0, -1.0),
        Point3::new(1.0, -1.0, -1.0),
    ];

    let triangles = vec![
        [0, 1, 2],
        [0, 2, 3],
        [4, 0, 3],
        [4, 3, 7],
        [5, 4, 7],
        [5, 7, 6],
        [1, 5, 6],
        [1, 6, 2],
        [4, 5, 1],
        [4, 1, 0],
        [2, 6, 7],
        [2, 7, 3],
    ];

    let colors = face_colors
        .iter()
        .flat_map(|&color| [color, color])
        .collect();

    Geometry::new(vertices, triangles, colors)
}

/// Single triangle in the z = 0 plane, facing -z
pub fn triangle(color: Color) -> Geometry {
    Geometry::new(
        vec![
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
        ],
        vec![[0, 1, 2]],
        vec![color],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_layout() {
        let cube = cube(CUBE_FACE_COLORS);
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.triangles.len(), 12);
        assert_eq!(cube.colors.len(), 12);
        assert_eq!(cube.color_of(0), Color::RED);
        assert_eq!(cube.color_of(1), Color::RED);
        assert_eq!(cube.color_of(11), Color::CYAN);
        for index in 0..cube.triangles.len() {
            assert!(cube.triangle_vertices(index).is_some());
        }
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = cube(CUBE_FACE_COLORS);
        for index in 0..cube.triangles.len() {
            let [a, b, c] = cube.triangle_vertices(index).unwrap();
            let normal = Triangle::new(a, b, c).normal();
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            assert!(normal.dot(&centroid) > 0.0, "triangle {} faces inward", index);
        }
    }

    #[test]
    fn test_triangle_normal() {
        let tri = triangle(Color::RED);
        let [a, b, c] = tri.triangle_vertices(0).unwrap();
        let normal = Triangle::new(a, b, c).normal();
        assert!(normal.x.abs() < 1e-6 && normal.y.abs() < 1e-6);
        assert!(normal.z < 0.0);
    }

    #[test]
    fn test_missing_color_is_black() {
        let geometry = Geometry::new(
            vec![Point3::origin(); 3],
            vec![[0, 1, 2], [2, 1, 0]],
            vec![Color::GREEN],
        );
        assert_eq!(geometry.color_of(0), Color::GREEN);
        assert_eq!(geometry.color_of(1), Color::BLACK);
    }

    #[test]
    fn test_out_of_range_index() {
        let geometry = Geometry::new(vec![Point3::origin(); 3], vec![[0, 1, 3]], vec![]);
        assert!(geometry.triangle_vertices(0).is_none());
        assert!(geometry.triangle_vertices(1).is_none());
    }

    #[test]
    fn test_handle_swaps_snapshot() {
        let handle = GeometryHandle::empty();
        assert!(handle.snapshot().is_empty());

        let before = handle.snapshot();
        let provider = handle.clone();
        std::thread::spawn(move || provider.set(cube(CUBE_FACE_COLORS)))
            .join()
            .unwrap();

        // Earlier snapshots are untouched, new ones see the whole mesh
        assert!(before.is_empty());
        let after = handle.snapshot();
        assert_eq!(after.triangles.len(), 12);
        assert_eq!(after.colors.len(), 12);
    }

    #[test]
    fn test_screen_vertex_depth() {
        let v = ScreenVertex::from_canvas(CanvasPoint::new(3, 4), 4.0).unwrap();
        assert_eq!((v.x, v.y), (3, 4));
        assert!((v.inv_depth - 0.25).abs() < 1e-6);
        assert!(ScreenVertex::from_canvas(CanvasPoint::new(0, 0), 0.0).is_none());
        assert_eq!(Color::RED.to_rgba(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_shaded_color() {
        assert_eq!(Color::WHITE.shaded(1.0), Color::WHITE);
        assert_eq!(Color::WHITE.shaded(2.0), Color::WHITE);
        assert_eq!(Color::new(200, 100, 0).shaded(0.5), Color::new(100, 50, 0));
        assert_eq!(Color::RED.shaded(-1.0), Color::BLACK);
    }
}

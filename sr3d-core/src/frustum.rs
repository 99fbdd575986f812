//! View-space frustum, sphere classification and triangle clipping.
//!
//! Every plane keeps its inside on the side where the signed distance is
//! non-negative. Clipping is Sutherland-Hodgman specialised to triangles:
//! each plane turns one triangle into zero, one or two triangles.

use nalgebra::{Point3, Vector3};
use std::f32::consts::FRAC_1_SQRT_2;

use crate::geometry::Triangle;

/// Below this magnitude a segment is treated as parallel to a plane
const PARALLEL_EPSILON: f32 = 1e-6;

/// Plane `a*x + b*y + c*z = D`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippingPlane {
    pub normal: Vector3<f32>,
    pub d: f32,
}

impl ClippingPlane {
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self {
            normal: Vector3::new(a, b, c),
            d,
        }
    }

    /// Signed distance of `point`; positive on the inside
    pub fn signed_distance(&self, point: &Point3<f32>) -> f32 {
        (self.normal.dot(&point.coords) - self.d) / self.normal.norm()
    }

    pub fn is_inside(&self, point: &Point3<f32>) -> bool {
        self.signed_distance(point) >= 0.0
    }

    /// Point where the line through `a` and `b` meets the plane.
    ///
    /// Solves `t = (D - n.a) / (n.(b - a))`; `None` when the line is parallel.
    pub fn intersect_segment(&self, a: &Point3<f32>, b: &Point3<f32>) -> Option<Point3<f32>> {
        let ab = b - a;
        let denominator = self.normal.dot(&ab);
        if denominator.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (self.d - self.normal.dot(&a.coords)) / denominator;
        Some(a + ab * t)
    }
}

/// Sphere used for the coarse per-object visibility test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Centre at the mean of `points`, radius reaching the farthest one.
    /// `None` for an empty slice.
    pub fn enclosing(points: &[Point3<f32>]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let sum = points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        let center = Point3::from(sum / points.len() as f32);
        let radius = points
            .iter()
            .map(|p| nalgebra::distance(p, &center))
            .fold(0.0_f32, f32::max);
        Some(Self { center, radius })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumRelation {
    Inside,
    Cuts,
    Outside,
}

/// Outcome of [`Frustum::classify`]; `cut_planes` lists the planes the sphere straddles
#[derive(Debug, Clone, PartialEq)]
pub struct SphereClassification {
    pub relation: FrustumRelation,
    pub cut_planes: Vec<ClippingPlane>,
}

/// Near plane plus four side planes with a 45 degree half-angle, camera looking down +z
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    planes: [ClippingPlane; 5],
}

impl Frustum {
    pub fn new(near_distance: f32) -> Self {
        let s = FRAC_1_SQRT_2;
        Self {
            planes: [
                // near
                ClippingPlane::new(0.0, 0.0, 1.0, near_distance),
                // left
                ClippingPlane::new(s, 0.0, s, 0.0),
                // right
                ClippingPlane::new(-s, 0.0, s, 0.0),
                // bottom
                ClippingPlane::new(0.0, s, s, 0.0),
                // top
                ClippingPlane::new(0.0, -s, s, 0.0),
            ],
        }
    }

    pub fn planes(&self) -> &[ClippingPlane] {
        &self.planes
    }

    pub fn near_distance(&self) -> f32 {
        self.planes[0].d
    }

    /// Classify a view-space sphere.
    ///
    /// Returns `Outside` as soon as one plane has the whole sphere behind it.
    pub fn classify(&self, sphere: &BoundingSphere) -> SphereClassification {
        let mut relation = FrustumRelation::Inside;
        let mut cut_planes = Vec::new();

        for plane in &self.planes {
            let distance = plane.signed_distance(&sphere.center);
            if distance >= sphere.radius {
                continue;
            }
            if distance.abs() < sphere.radius {
                cut_planes.push(*plane);
                relation = FrustumRelation::Cuts;
                continue;
            }
            return SphereClassification {
                relation: FrustumRelation::Outside,
                cut_planes: Vec::new(),
            };
        }

        SphereClassification {
            relation,
            cut_planes,
        }
    }
}

/// Clip one triangle against one plane
pub fn clip_triangle(triangle: &Triangle, plane: &ClippingPlane) -> Vec<Triangle> {
    let (inside, outside): (Vec<Point3<f32>>, Vec<Point3<f32>>) =
        triangle.points.iter().partition(|p| plane.is_inside(p));

    match (inside.as_slice(), outside.as_slice()) {
        ([_, _, _], []) => vec![*triangle],
        ([], [_, _, _]) => Vec::new(),
        ([in0, in1], [out]) => {
            let (Some(i0), Some(i1)) = (
                plane.intersect_segment(out, in0),
                plane.intersect_segment(out, in1),
            ) else {
                log::trace!("parallel clip edge, dropping triangle");
                return Vec::new();
            };
            vec![Triangle::new(*in0, *in1, i0), Triangle::new(*in1, i1, i0)]
        }
        ([in0], [out0, out1]) => {
            let (Some(i0), Some(i1)) = (
                plane.intersect_segment(in0, out0),
                plane.intersect_segment(in0, out1),
            ) else {
                log::trace!("parallel clip edge, dropping triangle");
                return Vec::new();
            };
            vec![Triangle::new(*in0, i0, i1)]
        }
        _ => unreachable!("a triangle has exactly three vertices"),
    }
}

/// Clip against each plane in turn, feeding every pass the previous pass's output
pub fn clip_triangle_against_planes(triangle: &Triangle, planes: &[ClippingPlane]) -> Vec<Triangle> {
    let mut triangles = vec![*triangle];
    for plane in planes {
        triangles = triangles
            .iter()
            .flat_map(|t| clip_triangle(t, plane))
            .collect();
        if triangles.is_empty() {
            break;
        }
    }
    triangles
}

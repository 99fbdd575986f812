/// SR3D Core Library - Software transform-and-rasterize pipeline
///
/// Object geometry is transformed into view space, culled against the
/// camera frustum, clipped, projected to the canvas and rasterized as flat
/// colored, depth-tested triangles into an RGBA pixel buffer.

pub mod algebra;
pub mod camera;
pub mod config;
pub mod error;
pub mod frustum;
pub mod geometry;
pub mod obj;
pub mod object;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use algebra::Matrix;
pub use camera::Camera;
pub use config::{RenderConfig, RenderMode};
pub use error::{RenderError, RenderResult};
pub use frustum::{BoundingSphere, ClippingPlane, Frustum, FrustumRelation, SphereClassification};
pub use geometry::{CanvasPoint, Color, Geometry, GeometryHandle, ScreenVertex, Triangle};
pub use object::{RenderStats, SceneObject};
pub use projection::Projection;
pub use raster::FrameBuffer;
pub use scene::{ObjectId, Present, Scene};
pub use transform::{RotationState, Transform};

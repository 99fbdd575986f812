/// Scene orchestration: buffers, camera and objects for one frame at a time
use crate::camera::Camera;
use crate::config::{RenderConfig, RenderMode};
use crate::error::{RenderError, RenderResult};
use crate::object::{RenderStats, SceneObject};
use crate::projection::Projection;
use crate::raster::FrameBuffer;

/// Receives each finished frame: row-major RGBA, 4 bytes per pixel
pub trait Present {
    type Error;

    fn present(&mut self, pixels: &[u8], width: usize, height: usize) -> Result<(), Self::Error>;
}

/// Index of an object registered with [`Scene::add_object`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

pub struct Scene {
    config: RenderConfig,
    camera: Camera,
    objects: Vec<SceneObject>,
    projection: Projection,
    frame: FrameBuffer,
    last_stats: RenderStats,
}

impl Scene {
    pub fn new(config: RenderConfig) -> RenderResult<Self> {
        let camera = Camera::new(
            nalgebra::Point3::origin(),
            Default::default(),
            config.projection_distance,
        );
        Self::with_camera(config, camera)
    }

    pub fn with_camera(config: RenderConfig, camera: Camera) -> RenderResult<Self> {
        Ok(Self {
            projection: Projection::new(&config)?,
            frame: FrameBuffer::new(config.canvas_width, config.canvas_height),
            config,
            camera,
            objects: Vec::new(),
            last_stats: RenderStats::default(),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn last_stats(&self) -> RenderStats {
        self.last_stats
    }

    pub fn mode(&self) -> RenderMode {
        self.config.mode
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.config.mode = mode;
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        log::info!("adding object '{}'", object.name());
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn object(&self, id: ObjectId) -> RenderResult<&SceneObject> {
        self.objects.get(id.0).ok_or(RenderError::UnknownObject(id.0))
    }

    pub fn object_mut(&mut self, id: ObjectId) -> RenderResult<&mut SceneObject> {
        self.objects
            .get_mut(id.0)
            .ok_or(RenderError::UnknownObject(id.0))
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Reallocate the buffers for a new canvas size
    pub fn resize(&mut self, width: usize, height: usize) -> RenderResult<()> {
        if (width, height) == (self.frame.width(), self.frame.height()) {
            return Ok(());
        }
        self.config.canvas_width = width;
        self.config.canvas_height = height;
        self.projection = Projection::new(&self.config)?;
        self.frame = FrameBuffer::new(width, height);
        log::debug!("resized canvas to {}x{}", width, height);
        Ok(())
    }

    /// Clear the buffers and draw every object in insertion order.
    ///
    /// Overlap is resolved by the depth buffer alone, never by draw order.
    pub fn render_frame(&mut self) -> RenderResult<&[u8]> {
        self.frame.clear();
        let mut stats = RenderStats::default();
        for object in &self.objects {
            stats += object.render(&self.camera, &self.projection, self.config.mode, &mut self.frame)?;
        }
        log::debug!(
            "frame: {} drawn, {} backfaces, {} clipped away, {} skipped, {} objects culled",
            stats.drawn,
            stats.backfaces,
            stats.clipped_away,
            stats.skipped,
            stats.culled_objects
        );
        self.last_stats = stats;
        Ok(self.frame.pixels())
    }

    /// Render a frame and hand it to `surface`
    pub fn present<P>(&mut self, surface: &mut P) -> Result<(), P::Error>
    where
        P: Present,
        P::Error: From<RenderError>,
    {
        self.render_frame()?;
        surface.present(self.frame.pixels(), self.frame.width(), self.frame.height())
    }
}

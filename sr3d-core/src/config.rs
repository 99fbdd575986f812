/// Render configuration shared by the scene, its projection and the camera frustum

/// How triangles are submitted to the rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Filled,
    Wireframe,
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Filled => RenderMode::Wireframe,
            RenderMode::Wireframe => RenderMode::Filled,
        }
    }
}

/// Canvas and viewport configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Canvas width in pixels
    pub canvas_width: usize,
    /// Canvas height in pixels
    pub canvas_height: usize,
    /// Viewport width in view-space units at the projection plane
    pub viewport_width: f32,
    /// Viewport height in view-space units at the projection plane
    pub viewport_height: f32,
    /// Distance from the camera to the projection plane, also the near plane distance
    pub projection_distance: f32,
    pub mode: RenderMode,
}

impl RenderConfig {
    pub fn new(canvas_width: usize, canvas_height: usize) -> Self {
        Self {
            canvas_width,
            canvas_height,
            ..Self::default()
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.canvas_width * self.canvas_height
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_width: 600,
            canvas_height: 600,
            viewport_width: 2.0,
            viewport_height: 2.0,
            projection_distance: 1.0,
            mode: RenderMode::Filled,
        }
    }
}

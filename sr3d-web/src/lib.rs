/// SR3D Web - WASM front end for the software rasterizer
///
/// Frames are rendered on the CPU by `sr3d-core` and copied into a 2D
/// canvas through `ImageData`.
use nalgebra::Vector3;
use sr3d_core::geometry::{cube, CUBE_FACE_COLORS};
use sr3d_core::{ObjectId, Present, RenderConfig, RenderError, Scene, SceneObject, Transform};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

/// Errors crossing the JS boundary
#[derive(Debug)]
pub struct WebError(JsValue);

impl From<RenderError> for WebError {
    fn from(err: RenderError) -> Self {
        WebError(JsValue::from_str(&err.to_string()))
    }
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError(value)
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        err.0
    }
}

/// Copies RGBA frames into a 2D canvas context
pub struct CanvasPresenter {
    context: CanvasRenderingContext2d,
}

impl CanvasPresenter {
    /// Look up `<canvas id=canvas_id>` and take its 2D context
    pub fn from_element_id(canvas_id: &str) -> Result<Self, WebError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{}'", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("'{}' is not a canvas", canvas_id)))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("unexpected context type"))?;
        Ok(Self { context })
    }
}

impl Present for CanvasPresenter {
    type Error = WebError;

    fn present(&mut self, pixels: &[u8], width: usize, height: usize) -> Result<(), WebError> {
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(pixels),
            width as u32,
            height as u32,
        )?;
        self.context.put_image_data(&image, 0.0, 0.0)?;
        Ok(())
    }
}

#[wasm_bindgen]
pub struct WebRenderer {
    scene: Scene,
    object: ObjectId,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Create a renderer for a `width` x `height` canvas showing the demo cube
    #[wasm_bindgen(constructor)]
    pub fn new(width: usize, height: usize) -> Result<WebRenderer, JsValue> {
        let mut scene = Scene::new(RenderConfig::new(width, height)).map_err(WebError::from)?;
        let object = scene.add_object(SceneObject::new(
            "cube",
            cube(CUBE_FACE_COLORS),
            Transform::at(Vector3::new(0.0, 0.0, 5.0)),
        ));
        log::info!("web renderer ready at {}x{}", width, height);
        Ok(WebRenderer { scene, object })
    }

    /// Rotate the cube by the given angles in radians
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) -> Result<(), JsValue> {
        self.scene
            .object_mut(self.object)
            .map_err(WebError::from)?
            .rotate_by(dx, dy, dz);
        Ok(())
    }

    pub fn move_camera(&mut self, dx: f32, dy: f32, dz: f32) {
        self.scene.camera_mut().move_by(dx, dy, dz);
    }

    pub fn toggle_wireframe(&mut self) {
        let mode = self.scene.mode().toggled();
        self.scene.set_mode(mode);
    }

    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), JsValue> {
        self.scene.resize(width, height).map_err(WebError::from)?;
        Ok(())
    }

    /// Render a frame and return its RGBA bytes
    pub fn frame(&mut self) -> Result<Vec<u8>, JsValue> {
        let pixels = self.scene.render_frame().map_err(WebError::from)?;
        Ok(pixels.to_vec())
    }

    /// Render a frame into the canvas with id `canvas_id`
    pub fn render(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let mut presenter = CanvasPresenter::from_element_id(canvas_id)?;
        self.scene.present(&mut presenter)?;
        Ok(())
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    log::debug!("sr3d-web loaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_has_rgba_per_pixel() {
        let mut renderer = WebRenderer::new(32, 24).unwrap();
        let frame = renderer.frame().unwrap();
        assert_eq!(frame.len(), 32 * 24 * 4);
        assert!(frame.chunks(4).any(|p| p[3] == 255));
    }

    #[test]
    fn test_resize_changes_frame_length() {
        let mut renderer = WebRenderer::new(16, 16).unwrap();
        renderer.resize(8, 4).unwrap();
        assert_eq!(renderer.frame().unwrap().len(), 8 * 4 * 4);
    }
}

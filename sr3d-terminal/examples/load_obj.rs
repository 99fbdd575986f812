/// Example: Load and render an OBJ file in the terminal
///
/// Usage: cargo run --example load_obj -- path/to/model.obj
///
/// The model is parsed on a background thread; the renderer starts right
/// away and shows it as soon as the geometry arrives.
use nalgebra::Vector3;
use sr3d_core::geometry::{cube, CUBE_FACE_COLORS};
use sr3d_core::obj::load_obj;
use sr3d_core::{Color, GeometryHandle, SceneObject, Transform};
use sr3d_terminal::logging::{init_logging, LoggingConfig};
use sr3d_terminal::TerminalApp;
use std::env;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::to_file("sr3d-load-obj.log"))?;

    let placement = Transform::at(Vector3::new(0.0, 0.0, 5.0));
    let object = match env::args().nth(1) {
        Some(path) => {
            let handle = GeometryHandle::empty();
            let loader = handle.clone();
            std::thread::spawn(move || match load_obj(&path, Color::CYAN) {
                Ok(geometry) => {
                    log::info!("loaded {} ({} triangles)", path, geometry.triangles.len());
                    loader.set(geometry);
                }
                Err(e) => log::error!("failed to load {}: {}", path, e),
            });
            SceneObject::with_handle("model", handle, placement)
        }
        None => {
            eprintln!("No OBJ file provided, using default cube...");
            SceneObject::new("cube", cube(CUBE_FACE_COLORS), placement)
        }
    };

    let mut app = TerminalApp::new(object)?;
    app.run()
}

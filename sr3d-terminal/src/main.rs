/// SR3D Terminal Demo - Rotating Cube
///
/// Renders a colored cube, or the OBJ model given on the command line,
/// with the software rasterizer in the terminal.
/// Controls:
///   - WASD / Arrow Keys: Rotate the cube
///   - E/R: Roll rotation
///   - I/K, J/L, U/O: Move the camera; ,/. turn it
///   - +/-: Scale the cube
///   - F: Toggle wireframe
///   - Q/ESC: Quit
///
/// Usage: sr3d-terminal [model.obj]
///
/// Logs go to `sr3d-terminal.log`; set `RUST_LOG=debug` for per-frame stats.
use anyhow::Context;
use nalgebra::Vector3;
use sr3d_core::geometry::{cube, CUBE_FACE_COLORS};
use sr3d_core::obj::load_obj;
use sr3d_core::{Color, SceneObject, Transform};
use sr3d_terminal::logging::{init_logging, LoggingConfig};
use sr3d_terminal::TerminalApp;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::to_file("sr3d-terminal.log"))?;

    let placement = Transform::at(Vector3::new(0.0, 0.0, 5.0));
    let object = match std::env::args().nth(1) {
        Some(path) => {
            let geometry = load_obj(&path, Color::CYAN)
                .with_context(|| format!("Failed to load OBJ file {}", path))?;
            println!("Loaded {} triangles from {}", geometry.triangles.len(), path);
            SceneObject::new("model", geometry, placement)
        }
        None => SceneObject::new("cube", cube(CUBE_FACE_COLORS), placement),
    };

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(object)?;
    app.run()?;

    println!("Thank you for using the SR3D Terminal Renderer!");
    Ok(())
}

use nalgebra::{Point3, Vector3};
use sr3d_core::geometry::{cube, triangle, CUBE_FACE_COLORS};
use sr3d_core::obj::parse_obj;
use sr3d_core::{
    Color, GeometryHandle, Matrix, RenderConfig, RenderMode, RotationState, Scene, SceneObject,
    Transform,
};

const SIZE: usize = 120;

fn scene() -> Scene {
    Scene::new(RenderConfig::new(SIZE, SIZE)).unwrap()
}

fn count_color(pixels: &[u8], color: Color) -> usize {
    pixels
        .chunks(4)
        .filter(|p| *p == color.to_rgba())
        .count()
}

#[test]
fn overlap_is_resolved_by_depth_not_order() {
    let near = SceneObject::new("near", triangle(Color::RED), Transform::at(Vector3::new(0.0, 0.0, 4.0)));
    let far = SceneObject::new("far", triangle(Color::BLUE), Transform::at(Vector3::new(0.0, 0.0, 8.0)));

    let mut near_first = scene();
    near_first.add_object(near.clone());
    near_first.add_object(far.clone());
    let a = near_first.render_frame().unwrap().to_vec();

    let mut far_first = scene();
    far_first.add_object(far);
    far_first.add_object(near);
    let b = far_first.render_frame().unwrap().to_vec();

    assert_eq!(a, b);
    assert!(count_color(&a, Color::RED) > 0);
    // the far triangle is smaller and fully hidden behind the near one
    assert_eq!(count_color(&a, Color::BLUE), 0);
}

#[test]
fn model_then_inverse_view_recovers_point() {
    let transform = Transform::new(
        Vector3::new(3.0, -1.0, 12.0),
        RotationState::new(0.3, 0.9, -0.4),
        Vector3::new(1.5, 1.5, 1.5),
    );
    let position = Point3::new(1.0, 2.0, -3.0);
    let rotation = Vector3::new(-0.2, 0.5, 0.1);

    let model = transform.model_matrix().unwrap();
    let view = Matrix::view(&position, &rotation).unwrap();
    let view_inverse = Matrix::translation(&position.coords)
        .try_mul(&Matrix::rotation_zyx(&rotation).unwrap())
        .unwrap();

    let local = Point3::new(0.5, -0.25, 1.0);
    let world = model.transform_point(&local).unwrap().unwrap();
    let in_view = view.try_mul(&model).unwrap().transform_point(&local).unwrap().unwrap();
    let recovered = view_inverse.transform_point(&in_view).unwrap().unwrap();
    assert!((recovered - world).norm() < 1e-4);
}

#[test]
fn camera_movement_changes_the_frame() {
    let mut scene = scene();
    scene.add_object(SceneObject::new(
        "cube",
        cube(CUBE_FACE_COLORS),
        Transform::at(Vector3::new(0.0, 0.0, 10.0)),
    ));
    let centered = count_color(scene.render_frame().unwrap(), Color::BLUE);
    assert!(centered > 0);

    // stepping towards the cube makes its front face larger
    scene.camera_mut().move_by(0.0, 0.0, 4.0);
    let closer = count_color(scene.render_frame().unwrap(), Color::BLUE);
    assert!(closer > centered);

    // turning around leaves nothing in view
    scene.camera_mut().rotate_by(0.0, std::f32::consts::PI, 0.0);
    let pixels = scene.render_frame().unwrap();
    assert!(pixels.iter().all(|&b| b == 0));
    assert_eq!(scene.last_stats().culled_objects, 1);
}

#[test]
fn cube_straddling_the_near_plane_is_clipped() {
    let mut scene = scene();
    scene.add_object(SceneObject::new(
        "cube",
        cube(CUBE_FACE_COLORS),
        Transform::at(Vector3::new(1.5, 0.0, 1.5)),
    ));
    scene.render_frame().unwrap();
    let stats = scene.last_stats();
    assert_eq!(stats.culled_objects, 0);
    // the front face lies entirely in front of the near plane
    assert_eq!(stats.clipped_away, 2);
    // the left face crosses it and keeps its far part
    assert!(stats.drawn > 0);
    assert!(count_color(scene.frame().pixels(), Color::YELLOW) > 0);
}

#[test]
fn geometry_arriving_later_is_picked_up() {
    let mut scene = scene();
    let handle = GeometryHandle::empty();
    scene.add_object(SceneObject::with_handle(
        "model",
        handle.clone(),
        Transform::at(Vector3::new(0.0, 0.0, 5.0)),
    ));
    assert!(scene.render_frame().unwrap().iter().all(|&b| b == 0));

    let loader = std::thread::spawn(move || {
        let text = "v 0 1 0\nv 1 0 0\nv -1 0 0\nf 1 2 3\n";
        handle.set(parse_obj(text, Color::MAGENTA).unwrap());
    });
    loader.join().unwrap();

    assert!(count_color(scene.render_frame().unwrap(), Color::MAGENTA) > 0);
}

#[test]
fn wireframe_mode_draws_fewer_pixels() {
    let mut scene = scene();
    scene.add_object(SceneObject::new(
        "cube",
        cube(CUBE_FACE_COLORS),
        Transform::new(
            Vector3::new(0.0, 0.0, 8.0),
            RotationState::new(0.4, 0.6, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
        ),
    ));
    let filled = scene
        .render_frame()
        .unwrap()
        .chunks(4)
        .filter(|p| p[3] == 255)
        .count();

    scene.set_mode(RenderMode::Wireframe);
    let wire = scene
        .render_frame()
        .unwrap()
        .chunks(4)
        .filter(|p| p[3] == 255)
        .count();

    assert!(wire > 0);
    assert!(wire < filled);
}

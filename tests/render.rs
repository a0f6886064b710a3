use std::fs;

use raycast::DVec3;
use raycast::color::Color;
use raycast::camera::Camera;
use raycast::canvas::Canvas;
use raycast::light::Shading;
use raycast::shape::Primitive;
use raycast::world::World;
use raycast::scene::Scene;
use raycast::error::SceneError;

const HEADER_2X2: &[u8] = b"P6\n2 2\n255\n";

fn ppm_bytes(canvas: &Canvas) -> Vec<u8> {
    let mut out = Vec::new();
    canvas.write_ppm(&mut out).unwrap();
    out
}

#[test]
fn red_sphere_around_camera_without_lights() {
    let scene: Scene = "\
camera, width: 2, height: 2
sphere, color: [1, 0, 0], position: [0, 0, 0], radius: 1
".parse().unwrap();

    // The eye sits inside the sphere, so every primary ray leaves through it.
    let out = ppm_bytes(&scene.render(2, 2, false));

    assert_eq!(&out[..HEADER_2X2.len()], HEADER_2X2);
    assert_eq!(&out[HEADER_2X2.len()..], &[
        255u8, 0, 0, 255, 0, 0,
        255u8, 0, 0, 255, 0, 0,
    ][..]);
}

#[test]
fn central_ray_hits_and_outer_rays_miss() {
    let scene: Scene = "\
camera, width: 2, height: 2
sphere, color: [1, 0, 0], position: [0, 0, -3], radius: 1
".parse().unwrap();

    let canvas = scene.render(3, 3, false);

    for y in 0..3 {
        for x in 0..3 {
            let expected = if (x, y) == (1, 1) {
                Color::red()
            } else {
                Color::black()
            };
            assert_eq!(canvas.read_pixel(x, y).unwrap(), expected,
                "pixel ({}, {})", x, y);
        }
    }
}

#[test]
fn pixels_follow_raster_order() {
    let world = World::new(vec![
        Primitive::plane(DVec3::new(0.0, -1.0, 0.0), DVec3::new(0.0, 1.0, 0.0),
            Color::rgb(0.3, 0.6, 0.9)),
        Primitive::sphere(DVec3::new(1.0, 0.5, -4.0), 1.0, Color::red()),
        Primitive::light(DVec3::new(-2.0, 5.0, 1.0), Color::white()),
    ], Shading::default());
    let camera = Camera::new(2.0, 1.0);
    let (width, height) = (7, 5);

    let canvas = camera.render(&world, width, height);

    assert_eq!(canvas.pixels().len(), width * height);
    for (k, pixel) in canvas.pixels().iter().enumerate() {
        let ray = camera.ray_for_pixel(k % width, k / width, width, height);
        assert_eq!(*pixel, world.color_at(&ray), "pixel {}", k);
    }
}

#[test]
fn positive_y_is_up() {
    // A floor below the eye fills the bottom of the image, never the top.
    let world = World::new(vec![
        Primitive::plane(DVec3::new(0.0, -1.0, 0.0), DVec3::new(0.0, 1.0, 0.0),
            Color::white()),
    ], Shading::default());
    let canvas = Camera::new(2.0, 2.0).render(&world, 4, 4);

    for x in 0..4 {
        assert_eq!(canvas.read_pixel(x, 0).unwrap(), Color::black());
        assert_eq!(canvas.read_pixel(x, 3).unwrap(), Color::white());
    }
}

#[test]
fn shadow_darkens_floor_under_sphere() {
    let world = World::new(vec![
        Primitive::plane(DVec3::new(0.0, -1.0, 0.0), DVec3::new(0.0, 1.0, 0.0),
            Color::white()),
        Primitive::sphere(DVec3::new(0.0, 1.0, -6.0), 1.0, Color::red()),
        Primitive::light(DVec3::new(0.0, 10.0, -6.0), Color::white()),
    ], Shading::default());

    let under = raycast::ray::Ray::new(DVec3::ZERO,
        DVec3::new(0.0, -1.0, -6.0).normalize());
    let beside = raycast::ray::Ray::new(DVec3::ZERO,
        DVec3::new(4.0, -1.0, -6.0).normalize());

    assert_eq!(world.color_at(&under), Color::rgb(0.1, 0.1, 0.1));
    assert!(world.color_at(&beside).r > 0.1);
}

#[test]
fn parallel_and_sequential_renders_write_identical_files() {
    let scene: Scene = "\
camera, width: 1.6, height: 0.9
shading, ambient: 0.15
plane, color: [0.8, 0.8, 0.8], position: [0, -1, 0], normal: [0, 1, 0]
sphere, color: [1, 0.2, 0.2], position: [-0.5, 0, -4], radius: 1
sphere, color: [0.2, 0.2, 1], position: [1.2, -0.3, -3], radius: 0.7
light, color: [1, 1, 1], position: [3, 6, 0]
light, color: [1, 1, 1], position: [-4, 2, -1]
".parse().unwrap();

    let sequential = ppm_bytes(&scene.render(48, 27, false));
    let parallel = ppm_bytes(&scene.render(48, 27, true));

    assert_eq!(sequential, parallel);
}

#[test]
fn scene_file_renders_to_ppm_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scene.txt");
    let output = dir.path().join("out.ppm");

    fs::write(&input, "\
camera, width: 2, height: 2
sphere, color: [0.5, 0.25, 1], position: [0, 0, -5], radius: 2
light, color: [1, 1, 1], position: [4, 4, 0]
").unwrap();

    let scene = Scene::load(&input).unwrap();
    let canvas = scene.render(6, 4, false);
    canvas.save(&output).unwrap();

    let bytes = fs::read(&output).unwrap();
    let header = b"P6\n6 4\n255\n";
    assert_eq!(&bytes[..header.len()], &header[..]);
    assert_eq!(bytes.len(), header.len() + 6 * 4 * 3);

    let body = &bytes[header.len()..];
    for (pixel, written) in canvas.pixels().iter().zip(body.chunks(3)) {
        let expected: Vec<u8> = [pixel.r, pixel.g, pixel.b].iter()
            .map(|c| (c.max(0.0).min(1.0) * 255.0).round() as u8)
            .collect();
        assert_eq!(written, &expected[..]);
    }
}

#[test]
fn json_scene_file_is_detected_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scene.JSON");

    fs::write(&input, r#"{
        "camera": { "width": 2, "height": 2 },
        "objects": [
            { "kind": "sphere", "color": [1, 0, 0], "position": [0, 0, 0],
              "radius": 1 }
        ]
    }"#).unwrap();

    let scene = Scene::load(&input).unwrap();
    let out = ppm_bytes(&scene.render(2, 2, false));

    assert_eq!(&out[HEADER_2X2.len()..], &[255u8, 0, 0].repeat(4)[..]);
}

#[test]
fn missing_scene_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    match Scene::load(&dir.path().join("nope.txt")) {
        Err(SceneError::Io { .. }) => (),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn unwritable_output_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing").join("out.ppm");

    assert!(Canvas::new(2, 2).save(&output).is_err());
}

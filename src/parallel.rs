use std::time::Instant;

use rayon::prelude::*;

use crate::world::World;
use crate::camera::Camera;
use crate::canvas::Canvas;

/// Renders `world` with one rayon task per scanline.
///
/// The world and camera are only read, and every task owns a disjoint row of
/// the canvas, so the result is identical to `Camera::render`.
pub fn parallel_render(world: &World, camera: &Camera, hsize: usize,
    vsize: usize) -> Canvas {
    let mut canvas = Canvas::new(hsize, vsize);
    if hsize == 0 {
        return canvas;
    }

    log::debug!("Rendering {} scanlines on {} threads", vsize,
        rayon::current_num_threads());
    let start = Instant::now();

    canvas.pixels_mut()
        .par_chunks_mut(hsize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let ray = camera.ray_for_pixel(x, y, hsize, vsize);
                *pixel = world.color_at(&ray);
            }
        });

    log::debug!("Parallel render finished in {:?}", start.elapsed());
    canvas
}

#[test]
fn parallel_matches_sequential() {
    use glam::DVec3;
    use crate::color::Color;
    use crate::shape::Primitive;
    use crate::light::Shading;

    let w = World::new(vec![
        Primitive::plane(DVec3::new(0.0, -1.0, 0.0), DVec3::new(0.0, 1.0, 0.0),
            Color::rgb(0.8, 0.8, 0.8)),
        Primitive::sphere(DVec3::new(0.0, 0.0, -4.0), 1.0, Color::red()),
        Primitive::sphere(DVec3::new(1.5, 0.5, -5.0), 0.75,
            Color::rgb(0.2, 0.9, 0.3)),
        Primitive::light(DVec3::new(-3.0, 4.0, 0.0), Color::white()),
        Primitive::light(DVec3::new(2.0, 6.0, -2.0), Color::white()),
    ], Shading::default());
    let c = Camera::new(2.0, 1.5);

    let sequential = c.render(&w, 32, 24);
    let parallel = parallel_render(&w, &c, 32, 24);

    assert_eq!(sequential, parallel);
}

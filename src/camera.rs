use glam::DVec3;

use crate::ray::Ray;
use crate::world::World;
use crate::canvas::Canvas;
use crate::consts::{ CENTER_OFFSET, VIEWPORT_DISTANCE };

/// The scene's camera.
///
/// The camera sits at the origin and looks down the negative Z axis. Its
/// viewport is a `width` by `height` rectangle one unit in front of the eye;
/// every primary ray passes through the center of one pixel on it. The camera
/// cannot be moved or rotated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// The width of the viewport, in world units.
    pub width: f64,

    /// The height of the viewport, in world units.
    pub height: f64,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera { width: 1.0, height: 1.0 }
    }
}

impl Camera {
    pub fn new(width: f64, height: f64) -> Camera {
        Camera { width, height }
    }

    /// Generates the primary ray through pixel `(x, y)` of an `hsize` by
    /// `vsize` image.
    ///
    /// `y` is the image row, counted from the top. Screen-space Y grows
    /// upward, so the viewport row used for the ray is inverted.
    ///
    /// The pixel must lie inside the image: `x < hsize` and `y < vsize`.
    pub fn ray_for_pixel(&self, x: usize, y: usize, hsize: usize, vsize: usize)
        -> Ray {
        debug_assert!(x < hsize && y < vsize,
            "pixel ({}, {}) outside {}x{} image", x, y, hsize, vsize);

        let pixel_width = self.width / hsize as f64;
        let pixel_height = self.height / vsize as f64;

        let row = (vsize - 1 - y) as f64;
        let col = x as f64;

        let px = CENTER_OFFSET - self.width / 2.0 + pixel_width * (col + 0.5);
        let py = CENTER_OFFSET - self.height / 2.0 + pixel_height * (row + 0.5);
        let pz = -VIEWPORT_DISTANCE;

        // pz is never zero, so the direction always normalizes.
        let direction = DVec3::new(px, py, pz).normalize();
        Ray::new(DVec3::ZERO, direction)
    }

    /// Renders `world` into a new `hsize` by `vsize` canvas, one pixel at a
    /// time in raster order.
    pub fn render(&self, world: &World, hsize: usize, vsize: usize) -> Canvas {
        let mut image = Canvas::new(hsize, vsize);

        for y in 0..vsize {
            for x in 0..hsize {
                let ray = self.ray_for_pixel(x, y, hsize, vsize);
                image.write_pixel(x, y, &world.color_at(&ray));
            }
        }

        image
    }
}

#[test]
fn ray_through_center() {
    let c = Camera::new(2.0, 2.0);
    let r = c.ray_for_pixel(1, 1, 3, 3);

    assert_eq!(r.origin, DVec3::ZERO);
    assert!((r.direction - DVec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
}

#[test]
fn top_left_pixel_points_up_and_left() {
    let c = Camera::new(2.0, 2.0);
    let r = c.ray_for_pixel(0, 0, 3, 3);

    let expected = DVec3::new(-2.0 / 3.0, 2.0 / 3.0, -1.0).normalize();
    assert!((r.direction - expected).length() < 1e-12);
}

#[test]
fn bottom_right_pixel_points_down_and_right() {
    let c = Camera::new(4.0, 2.0);
    let r = c.ray_for_pixel(3, 1, 4, 2);

    // px = -2 + 1 * 3.5, py = -1 + 1 * 0.5
    let expected = DVec3::new(1.5, -0.5, -1.0).normalize();
    assert!((r.direction - expected).length() < 1e-12);
}

#[test]
fn primary_rays_are_normalized() {
    let c = Camera::new(3.0, 1.5);

    for y in 0..4 {
        for x in 0..7 {
            let r = c.ray_for_pixel(x, y, 7, 4);
            assert!(crate::feq(r.direction.length(), 1.0));
        }
    }
}

#[test]
fn render_fills_every_pixel() {
    use crate::color::Color;
    use crate::shape::Primitive;
    use crate::light::Shading;

    let w = World::new(vec![
        Primitive::plane(DVec3::new(0.0, 0.0, -10.0), DVec3::new(0.0, 0.0, 1.0),
            Color::rgb(0.0, 0.0, 1.0)),
    ], Shading::default());

    let image = Camera::new(2.0, 2.0).render(&w, 5, 3);

    assert_eq!(image.pixels().len(), 15);
    assert!(image.pixels().iter().all(|&p| p == Color::rgb(0.0, 0.0, 1.0)));
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "outside 4x3 image")]
fn pixel_below_image_is_rejected() {
    Camera::new(2.0, 2.0).ray_for_pixel(0, 3, 4, 3);
}

use glam::DVec3;

/// A ray with an origin and a direction.
///
/// Points along the ray are `origin + t * direction`. The direction is not
/// required to be normalized, but every ray produced by the camera or the
/// shadow tester is.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Ray {
        Ray { origin, direction }
    }

    /// The point at parametric distance `t` along the ray.
    pub fn position(&self, t: f64) -> DVec3 {
        self.origin + t * self.direction
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(DVec3::new(2.0, 3.0, 4.0), DVec3::new(1.0, 0.0, 0.0));

    assert_eq!(r.position(0.0), DVec3::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), DVec3::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), DVec3::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), DVec3::new(4.5, 3.0, 4.0));
}

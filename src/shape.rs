use glam::DVec3;

use crate::ray::Ray;
use crate::color::Color;

/// The geometry carried by a `Primitive`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PrimitiveKind {
    /// A sphere with the given radius, centered at the primitive's position.
    Sphere(f64),

    /// An infinite plane through the primitive's position, with a unit normal.
    Plane(DVec3),

    /// A point light at the primitive's position. Lights are never hit by
    /// primary or shadow rays.
    Light,
}

/// An object in the scene.
///
/// Every primitive has a position and a flat base color. For lights the color
/// is carried along from the scene description but every light contributes
/// at full intensity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub position: DVec3,
    pub color: Color,
}

impl Primitive {
    /// Creates a sphere centered at `position`.
    pub fn sphere(position: DVec3, radius: f64, color: Color) -> Primitive {
        Primitive { kind: PrimitiveKind::Sphere(radius), position, color }
    }

    /// Creates a plane through `position`.
    ///
    /// The normal is normalized here. A zero-length normal is kept as the
    /// zero vector, which never intersects anything.
    pub fn plane(position: DVec3, normal: DVec3, color: Color) -> Primitive {
        Primitive {
            kind: PrimitiveKind::Plane(normal.normalize_or_zero()),
            position,
            color,
        }
    }

    /// Creates a point light at `position`.
    pub fn light(position: DVec3, color: Color) -> Primitive {
        Primitive { kind: PrimitiveKind::Light, position, color }
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, PrimitiveKind::Light)
    }

    /// Intersects a ray with this primitive.
    ///
    /// Returns the parametric distance of the intersection, if any. Lights
    /// never intersect. Planes may report a non-positive distance (the plane
    /// lies behind the ray); callers reject those.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        match self.kind {
            PrimitiveKind::Sphere(radius)
                => intersect_sphere(ray, self.position, radius),
            PrimitiveKind::Plane(normal)
                => intersect_plane(ray, self.position, normal),
            PrimitiveKind::Light => None,
        }
    }

    /// The surface normal at `point`, which is assumed to lie on the surface.
    ///
    /// Returns `None` for lights, and for degenerate geometry where no normal
    /// can be formed (a point at a sphere's center, a zero plane normal).
    pub fn normal_at(&self, point: DVec3) -> Option<DVec3> {
        match self.kind {
            PrimitiveKind::Sphere(_) => (point - self.position).try_normalize(),
            PrimitiveKind::Plane(normal) => normal.try_normalize(),
            PrimitiveKind::Light => None,
        }
    }
}

/// Intersects a ray with a sphere.
///
/// Solves `a*t^2 + b*t + c = 0` for the ray equation. A zero or negative
/// discriminant is a miss (tangent rays included). Of the two roots, the
/// nearest one strictly in front of the ray origin is returned; if both
/// roots are behind the origin, the ray misses.
pub fn intersect_sphere(ray: &Ray, center: DVec3, radius: f64) -> Option<f64> {
    let center_to_origin = ray.origin - center;

    let a = ray.direction.length_squared();
    let b = 2.0 * ray.direction.dot(center_to_origin);
    let c = center_to_origin.length_squared() - radius * radius;

    // A zero direction describes no ray at all.
    if a == 0.0 {
        return None;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let near = (-b - sqrt_disc) / (2.0 * a);
    let far = (-b + sqrt_disc) / (2.0 * a);

    if near > 0.0 {
        Some(near)
    } else if far > 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Intersects a ray with a plane through `point` with normal `normal`.
///
/// The normal is normalized before use. Rays parallel to the plane (and
/// planes with a zero normal) never intersect. Otherwise the distance is
/// returned regardless of its sign.
pub fn intersect_plane(ray: &Ray, point: DVec3, normal: DVec3) -> Option<f64> {
    let normal = normal.try_normalize()?;

    let dist = -normal.dot(point);
    let denominator = normal.dot(ray.direction);

    if denominator == 0.0 {
        return None;
    }

    Some(-(normal.dot(ray.origin) + dist) / denominator)
}

#[cfg(test)]
use crate::feq;

#[test]
fn ray_hits_sphere_from_outside() {
    for &radius in &[0.5, 1.0, 2.0] {
        let r = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::new(0.0, 0.0, 1.0));
        let t = intersect_sphere(&r, DVec3::ZERO, radius).unwrap();

        assert!(feq(t, 5.0 - radius));
    }
}

#[test]
fn ray_hits_offset_sphere_along_negative_normal() {
    let center = DVec3::new(1.0, -2.0, -10.0);
    let surface_normal = DVec3::new(1.0, 1.0, 1.0).normalize();
    let origin = center + surface_normal * 7.0;
    let r = Ray::new(origin, -surface_normal);

    let t = intersect_sphere(&r, center, 3.0).unwrap();
    assert!(feq(t, 4.0));
}

#[test]
fn ray_is_tangent_to_sphere() {
    let r = Ray::new(DVec3::new(0.0, 1.0, -5.0), DVec3::new(0.0, 0.0, 1.0));

    assert_eq!(intersect_sphere(&r, DVec3::ZERO, 1.0), None);
}

#[test]
fn ray_misses_sphere() {
    let r = Ray::new(DVec3::new(0.0, 2.0, -5.0), DVec3::new(0.0, 0.0, 1.0));

    assert_eq!(intersect_sphere(&r, DVec3::ZERO, 1.0), None);
}

#[test]
fn ray_inside_sphere_hits_far_side() {
    let r = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, 1.0));

    let t = intersect_sphere(&r, DVec3::ZERO, 1.0).unwrap();
    assert!(feq(t, 1.0));
}

#[test]
fn sphere_is_behind_ray() {
    let r = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, 1.0));

    assert_eq!(intersect_sphere(&r, DVec3::ZERO, 1.0), None);
}

#[test]
fn zero_direction_never_hits_sphere() {
    let r = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::ZERO);

    assert_eq!(intersect_sphere(&r, DVec3::ZERO, 1.0), None);
}

#[test]
fn ray_intersecting_plane_from_above() {
    let r = Ray::new(DVec3::new(0.0, 1.0, 0.0), DVec3::new(0.0, -1.0, 0.0));

    let t = intersect_plane(&r, DVec3::ZERO, DVec3::new(0.0, 1.0, 0.0));
    assert!(feq(t.unwrap(), 1.0));
}

#[test]
fn plane_normal_is_normalized_before_use() {
    let r = Ray::new(DVec3::new(0.0, 3.0, 0.0), DVec3::new(0.0, -1.0, 0.0));

    let t = intersect_plane(&r, DVec3::new(5.0, 1.0, -2.0),
        DVec3::new(0.0, 4.0, 0.0));
    assert!(feq(t.unwrap(), 2.0));
}

#[test]
fn plane_behind_ray_reports_negative_distance() {
    let r = Ray::new(DVec3::new(0.0, 1.0, 0.0), DVec3::new(0.0, 1.0, 0.0));

    let t = intersect_plane(&r, DVec3::ZERO, DVec3::new(0.0, 1.0, 0.0));
    assert!(feq(t.unwrap(), -1.0));
}

#[test]
fn ray_parallel_to_plane_never_hits() {
    let planes = vec![
        (DVec3::ZERO, DVec3::new(0.0, 1.0, 0.0), DVec3::new(1.0, 0.0, 0.0)),
        (DVec3::new(0.0, 10.0, 0.0), DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, -1.0)),
        (DVec3::new(3.0, -2.0, 1.0), DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 1.0)),
        (DVec3::new(0.0, 0.0, -4.0), DVec3::new(0.0, 0.0, 2.0),
            DVec3::new(1.0, -1.0, 0.0)),
    ];

    for (point, normal, direction) in planes {
        let r = Ray::new(DVec3::ZERO, direction);
        assert_eq!(intersect_plane(&r, point, normal), None);
    }
}

#[test]
fn zero_plane_normal_never_hits() {
    let r = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));

    assert_eq!(intersect_plane(&r, DVec3::new(0.0, 0.0, -1.0), DVec3::ZERO),
        None);
}

#[test]
fn lights_are_never_intersected() {
    let light = Primitive::light(DVec3::new(0.0, 0.0, -1.0), Color::white());
    let r = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));

    assert!(light.is_light());
    assert_eq!(light.intersect(&r), None);
    assert_eq!(light.normal_at(DVec3::ZERO), None);
}

#[test]
fn normal_on_sphere() {
    let s = Primitive::sphere(DVec3::new(0.0, 0.0, -3.0), 2.0, Color::red());

    assert_eq!(s.normal_at(DVec3::new(0.0, 0.0, -1.0)),
        Some(DVec3::new(0.0, 0.0, 1.0)));
    assert_eq!(s.normal_at(DVec3::new(2.0, 0.0, -3.0)),
        Some(DVec3::new(1.0, 0.0, 0.0)));
}

#[test]
fn normal_on_plane_is_stored_normal() {
    let p = Primitive::plane(DVec3::ZERO, DVec3::new(0.0, 3.0, 0.0),
        Color::white());

    assert_eq!(p.normal_at(DVec3::new(7.0, 0.0, -2.0)),
        Some(DVec3::new(0.0, 1.0, 0.0)));
}

use glam::DVec3;

use crate::ray::Ray;
use crate::color::Color;
use crate::shape::Primitive;
use crate::light::{ Shading, lighting };

/// The nearest intersection of a ray with the world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    /// Index of the intersected primitive in `World::objects`.
    pub index: usize,

    /// Parametric distance of the intersection along the ray.
    pub t: f64,
}

/// The primitives of a scene, plus the shading constants used to light them.
///
/// Objects keep the order they were declared in. The world is never mutated
/// while rendering, so it can be shared freely between render threads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct World {
    pub objects: Vec<Primitive>,
    pub shading: Shading,
}

impl World {
    /// Creates an empty world with default shading.
    pub fn empty() -> World {
        Default::default()
    }

    pub fn new(objects: Vec<Primitive>, shading: Shading) -> World {
        World { objects, shading }
    }

    /// Iterates over the positions of all lights in the world.
    pub fn lights(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.objects.iter().filter(|o| o.is_light()).map(|o| o.position)
    }

    /// Finds the nearest primitive a ray hits in front of its origin.
    ///
    /// Lights are skipped. Only strictly positive distances count, and an
    /// intersection replaces the current best only when strictly nearer, so
    /// the first primitive in the list wins exact ties.
    pub fn hit(&self, ray: &Ray) -> Option<Hit> {
        let mut best: Option<Hit> = None;

        for (index, obj) in self.objects.iter().enumerate() {
            if obj.is_light() {
                continue;
            }

            let t = match obj.intersect(ray) {
                Some(t) if t > 0.0 => t,
                _ => continue,
            };

            let nearer = match best {
                Some(b) => t < b.t,
                None => true,
            };

            if nearer {
                best = Some(Hit { index, t });
            }
        }

        best
    }

    /// Determines whether `light` is occluded as seen from `point`.
    ///
    /// `point` lies on the primitive at `hit_index`, which is never tested as
    /// an occluder. Any other non-light primitive intersecting the shadow ray
    /// strictly between the point and the light occludes it.
    pub fn is_shadowed(&self, point: DVec3, hit_index: usize, light: DVec3)
        -> bool {
        let v = light - point;
        let distance = v.length();

        // A light on the surface itself cannot be blocked by anything.
        let direction = match v.try_normalize() {
            Some(d) => d,
            None => return false,
        };

        let r = Ray::new(point, direction);

        self.objects.iter().enumerate()
            .filter(|(index, obj)| *index != hit_index && !obj.is_light())
            .any(|(_, obj)| match obj.intersect(&r) {
                Some(t) => t > 0.0 && t < distance,
                None => false,
            })
    }

    /// Calculates the color for a hit, based on shadows and light.
    ///
    /// A world without any lights is rendered unlit: every surface shows its
    /// flat base color.
    pub fn shade_hit(&self, ray: &Ray, hit: &Hit) -> Color {
        let obj = &self.objects[hit.index];

        let mut lights = self.lights().peekable();
        if lights.peek().is_none() {
            return obj.color.clamp();
        }

        let point = ray.position(hit.t);
        let eyev = -ray.direction.normalize_or_zero();

        let normalv = match obj.normal_at(point) {
            Some(n) => n,
            None => return lighting(&self.shading, obj.color, point, eyev,
                DVec3::ZERO, &[]),
        };

        let visible: Vec<DVec3> = lights
            .filter(|&light| !self.is_shadowed(point, hit.index, light))
            .collect();

        lighting(&self.shading, obj.color, point, eyev, normalv, &visible)
    }

    /// Determines the color seen along a ray. Misses are black.
    pub fn color_at(&self, ray: &Ray) -> Color {
        match self.hit(ray) {
            None => Color::black(),
            Some(hit) => self.shade_hit(ray, &hit),
        }
    }
}

#[cfg(test)]
fn forward_ray() -> Ray {
    Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0))
}

#[test]
fn nearest_sphere_is_hit() {
    let w = World::new(vec![
        Primitive::sphere(DVec3::new(0.0, 0.0, -10.0), 1.0, Color::red()),
        Primitive::sphere(DVec3::new(0.0, 0.0, -5.0), 1.0, Color::white()),
    ], Shading::default());

    let hit = w.hit(&forward_ray()).unwrap();
    assert_eq!(hit.index, 1);
    assert!(crate::feq(hit.t, 4.0));
}

#[test]
fn lights_are_not_geometry() {
    let w = World::new(vec![
        Primitive::light(DVec3::new(0.0, 0.0, -2.0), Color::white()),
        Primitive::sphere(DVec3::new(0.0, 0.0, -5.0), 1.0, Color::red()),
    ], Shading::default());

    assert_eq!(w.hit(&forward_ray()).unwrap().index, 1);
}

#[test]
fn plane_behind_ray_is_not_hit() {
    let w = World::new(vec![
        Primitive::plane(DVec3::new(0.0, 0.0, 3.0), DVec3::new(0.0, 0.0, 1.0),
            Color::white()),
    ], Shading::default());

    assert_eq!(w.hit(&forward_ray()), None);
}

#[test]
fn first_primitive_wins_ties() {
    let s = Primitive::sphere(DVec3::new(0.0, 0.0, -5.0), 1.0, Color::red());
    let w = World::new(vec![s, s], Shading::default());

    assert_eq!(w.hit(&forward_ray()).unwrap().index, 0);
}

#[test]
fn empty_world_is_never_hit() {
    assert_eq!(World::empty().hit(&forward_ray()), None);
}

#[cfg(test)]
fn floor_with(extra: Vec<Primitive>) -> World {
    let mut objects = vec![
        Primitive::plane(DVec3::new(0.0, -1.0, 0.0), DVec3::new(0.0, 1.0, 0.0),
            Color::white()),
    ];
    objects.extend(extra);

    World::new(objects, Shading::default())
}

#[test]
fn sphere_between_point_and_light_occludes() {
    let w = floor_with(vec![
        Primitive::sphere(DVec3::new(0.0, 2.0, -5.0), 1.0, Color::red()),
    ]);

    assert!(w.is_shadowed(DVec3::new(0.0, -1.0, -5.0), 0,
        DVec3::new(0.0, 10.0, -5.0)));
}

#[test]
fn plane_between_point_and_light_occludes() {
    let w = floor_with(vec![
        Primitive::plane(DVec3::new(0.0, 3.0, 0.0), DVec3::new(0.0, -1.0, 0.0),
            Color::white()),
    ]);

    assert!(w.is_shadowed(DVec3::new(0.0, -1.0, -5.0), 0,
        DVec3::new(0.0, 10.0, -5.0)));
}

#[test]
fn occluder_beyond_light_does_not_occlude() {
    let w = floor_with(vec![
        Primitive::sphere(DVec3::new(0.0, 5.0, -5.0), 1.0, Color::red()),
    ]);

    assert!(!w.is_shadowed(DVec3::new(0.0, -1.0, -5.0), 0,
        DVec3::new(0.0, 1.0, -5.0)));
}

#[test]
fn occluder_behind_point_does_not_occlude() {
    let w = floor_with(vec![
        Primitive::sphere(DVec3::new(0.0, -5.0, -5.0), 1.0, Color::red()),
    ]);

    assert!(!w.is_shadowed(DVec3::new(0.0, -1.0, -5.0), 0,
        DVec3::new(0.0, 10.0, -5.0)));
}

#[test]
fn lights_never_occlude() {
    let w = floor_with(vec![
        Primitive::light(DVec3::new(0.0, 2.0, -5.0), Color::white()),
    ]);

    assert!(!w.is_shadowed(DVec3::new(0.0, -1.0, -5.0), 0,
        DVec3::new(0.0, 10.0, -5.0)));
}

#[test]
fn hit_primitive_does_not_shadow_itself() {
    let w = World::new(vec![
        Primitive::sphere(DVec3::ZERO, 1.0, Color::red()),
    ], Shading::default());

    // The shadow ray passes back through the sphere it starts on.
    assert!(!w.is_shadowed(DVec3::new(0.0, 0.0, 1.0), 0,
        DVec3::new(0.0, 0.0, -10.0)));
}

#[test]
fn color_ray_miss() {
    let w = World::new(vec![
        Primitive::sphere(DVec3::new(0.0, 0.0, -5.0), 1.0, Color::red()),
        Primitive::light(DVec3::new(0.0, 5.0, 0.0), Color::white()),
    ], Shading::default());

    let r = Ray::new(DVec3::ZERO, DVec3::new(0.0, 1.0, 0.0));
    assert_eq!(w.color_at(&r), Color::black());
}

#[test]
fn unlit_world_shows_base_color() {
    let w = World::new(vec![
        Primitive::sphere(DVec3::new(0.0, 0.0, -5.0), 1.0,
            Color::rgb(0.2, 0.4, 0.6)),
    ], Shading::default());

    assert_eq!(w.color_at(&forward_ray()), Color::rgb(0.2, 0.4, 0.6));
}

#[test]
fn color_ray_hit_lit_head_on() {
    let w = World::new(vec![
        Primitive::sphere(DVec3::new(0.0, 0.0, -5.0), 1.0,
            Color::rgb(0.2, 0.2, 0.2)),
        Primitive::light(DVec3::ZERO, Color::white()),
    ], Shading::default());

    // ambient 0.1 + diffuse 1.0 + specular 1.0
    assert_eq!(w.color_at(&forward_ray()), Color::rgb(0.42, 0.42, 0.42));
}

#[test]
fn shadowed_hit_keeps_only_ambient() {
    let w = World::new(vec![
        Primitive::sphere(DVec3::new(0.0, 0.0, -5.0), 1.0,
            Color::rgb(1.0, 1.0, 1.0)),
        Primitive::sphere(DVec3::new(0.0, 0.0, -2.0), 0.5,
            Color::rgb(1.0, 1.0, 1.0)),
        Primitive::light(DVec3::ZERO, Color::white()),
    ], Shading::default());

    // The small sphere sits between the far sphere's surface and the light.
    let hit = Hit { index: 0, t: 4.0 };
    assert_eq!(w.shade_hit(&forward_ray(), &hit), Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn plane_facing_away_from_camera_keeps_highlight() {
    let w = World::new(vec![
        Primitive::plane(DVec3::new(0.0, -1.0, 0.0), DVec3::new(0.0, -1.0, 0.0),
            Color::white()),
        Primitive::light(DVec3::new(0.0, 5.0, -5.0), Color::white()),
    ], Shading::default());

    let r = Ray::new(DVec3::ZERO, DVec3::new(0.0, -1.0, -1.0).normalize());
    assert_eq!(w.color_at(&r), Color::rgb(0.7756, 0.7756, 0.7756));
}

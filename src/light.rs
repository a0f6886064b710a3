use glam::DVec3;
use serde::{ Serialize, Deserialize };

use crate::color::Color;
use crate::consts::{ DEFAULT_AMBIENT, DEFAULT_DIFFUSE, DEFAULT_SPECULAR,
    DEFAULT_SHININESS, LIGHT_CONTRIBUTION };

/// Scene-wide Phong constants.
///
/// Primitives only carry a flat base color; how strongly ambient, diffuse and
/// specular light scale that color is decided once for the whole scene.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shading {
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
}

impl Default for Shading {
    fn default() -> Shading {
        Shading {
            ambient: DEFAULT_AMBIENT,
            diffuse: DEFAULT_DIFFUSE,
            specular: DEFAULT_SPECULAR,
            shininess: DEFAULT_SHININESS,
        }
    }
}

/// Reflects a vector across a normal.
pub fn reflect(v: DVec3, normal: DVec3) -> DVec3 {
    v - normal * 2.0 * v.dot(normal)
}

/// Calculates the color of a surface point lit by a set of point lights.
///
/// `eyev` points from the surface toward the eye and `normalv` is the unit
/// surface normal. `visible_lights` holds the positions of the lights which
/// reach `point` unoccluded; occluded lights must already be filtered out.
///
/// The lighting sum starts at the ambient constant. Each visible light adds a
/// diffuse term `max(0, N.L)` and a specular term `max(0, R.V)^shininess`.
/// Normals are used as given, so a surface whose normal faces away from a
/// light still picks up its highlight. The sum scales the base color
/// channel-wise and the result is clamped to `[0, 1]`.
pub fn lighting(shading: &Shading, color: Color, point: DVec3, eyev: DVec3,
    normalv: DVec3, visible_lights: &[DVec3]) -> Color {
    let mut intensity = shading.ambient;

    for light in visible_lights {
        // A light sitting exactly on the point gives no direction.
        let lightv = match (*light - point).try_normalize() {
            Some(v) => v,
            None => continue,
        };

        let light_dot_normal = normalv.dot(lightv).max(0.0);
        let diffuse = shading.diffuse * light_dot_normal;

        let reflectv = reflect(-lightv, normalv);
        let reflect_dot_eye = reflectv.dot(eyev).max(0.0);
        let specular = shading.specular * reflect_dot_eye.powf(shading.shininess);

        intensity += LIGHT_CONTRIBUTION * (diffuse + specular);
    }

    (color * intensity).clamp()
}

#[cfg(test)]
fn book_shading() -> Shading {
    Shading { ambient: 0.1, diffuse: 0.9, specular: 0.9, shininess: 200.0 }
}

#[test]
fn eye_between_light_and_surface() {
    let eyev = DVec3::new(0.0, 0.0, -1.0);
    let normalv = DVec3::new(0.0, 0.0, -1.0);
    let light = DVec3::new(0.0, 0.0, -10.0);

    let res = lighting(&book_shading(), Color::rgb(0.5, 0.5, 0.5), DVec3::ZERO,
        eyev, normalv, &[light]);
    assert_eq!(res, Color::rgb(0.95, 0.95, 0.95));
}

#[test]
fn eye_between_light_and_surface_offset_45() {
    let h = 2.0f64.sqrt() / 2.0;
    let eyev = DVec3::new(0.0, h, h);
    let normalv = DVec3::new(0.0, 0.0, -1.0);
    let light = DVec3::new(0.0, 0.0, -10.0);

    let res = lighting(&book_shading(), Color::rgb(0.5, 0.5, 0.5), DVec3::ZERO,
        eyev, normalv, &[light]);
    assert_eq!(res, Color::rgb(0.5, 0.5, 0.5));
}

#[test]
fn eye_in_path_of_reflection() {
    let h = 2.0f64.sqrt() / 2.0;
    let eyev = DVec3::new(0.0, -h, -h);
    let normalv = DVec3::new(0.0, 0.0, -1.0);
    let light = DVec3::new(0.0, 10.0, -10.0);

    let res = lighting(&book_shading(), Color::rgb(0.5, 0.5, 0.5), DVec3::ZERO,
        eyev, normalv, &[light]);
    assert_eq!(res, Color::rgb(0.8182, 0.8182, 0.8182));
}

#[test]
fn light_behind_surface_leaves_ambient() {
    let eyev = DVec3::new(0.0, 0.0, -1.0);
    let normalv = DVec3::new(0.0, 0.0, -1.0);
    let light = DVec3::new(0.0, 0.0, 10.0);

    let res = lighting(&book_shading(), Color::rgb(0.5, 0.5, 0.5), DVec3::ZERO,
        eyev, normalv, &[light]);
    assert_eq!(res, Color::rgb(0.05, 0.05, 0.05));
}

#[test]
fn highlight_survives_normal_facing_away_from_light() {
    // Floor normal points down, light is above; N.L is about -0.83.
    let h = 2.0f64.sqrt() / 2.0;
    let point = DVec3::new(0.0, -1.0, -1.0);
    let eyev = DVec3::new(0.0, h, h);
    let normalv = DVec3::new(0.0, -1.0, 0.0);
    let light = DVec3::new(0.0, 5.0, -5.0);

    let res = lighting(&Shading::default(), Color::white(), point, eyev,
        normalv, &[light]);
    // 0.1 ambient + 0.98058^20 specular, no diffuse
    assert_eq!(res, Color::rgb(0.7756, 0.7756, 0.7756));
}

#[test]
fn no_visible_lights_leaves_ambient() {
    let res = lighting(&Shading::default(), Color::rgb(1.0, 0.5, 0.0),
        DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0), DVec3::new(0.0, 0.0, -1.0),
        &[]);

    assert_eq!(res, Color::rgb(0.1, 0.05, 0.0));
}

#[test]
fn lights_sum_and_clamp() {
    let eyev = DVec3::new(0.0, 0.0, -1.0);
    let normalv = DVec3::new(0.0, 0.0, -1.0);
    let lights = [DVec3::new(0.0, 0.0, -10.0), DVec3::new(0.0, 0.0, -3.0)];

    let res = lighting(&book_shading(), Color::rgb(1.0, 0.2, 0.0), DVec3::ZERO,
        eyev, normalv, &lights);
    // 0.1 + 2 * (0.9 + 0.9) = 3.7
    assert_eq!(res, Color::rgb(1.0, 0.74, 0.0));
}

#[test]
fn reflect_45() {
    let v = DVec3::new(1.0, -1.0, 0.0);
    let n = DVec3::new(0.0, 1.0, 0.0);

    assert_eq!(reflect(v, n), DVec3::new(1.0, 1.0, 0.0));
}

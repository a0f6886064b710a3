//! Parser for the line-oriented text scene format.
//!
//! Every non-empty line describes one object as a kind followed by
//! comma-separated `key: value` fields. Values are numbers or bracketed
//! three-component vectors:
//!
//! ```text
//! # comments and blank lines are ignored
//! camera, width: 2.0, height: 2.0
//! sphere, color: [1.0, 0, 0], position: [0, 1, -5], radius: 2
//! plane, color: [0, 0, 1.0], position: [0, -1, 0], normal: [0, 1, 0]
//! light, color: [1, 1, 1], position: [5, 5, 0]
//! shading, ambient: 0.2, shininess: 50
//! ```
//!
//! Exactly one camera is required. Primitives keep the order they appear in.

use glam::DVec3;

use crate::color::Color;
use crate::camera::Camera;
use crate::light::Shading;
use crate::world::World;
use crate::shape::Primitive;
use crate::scene::{ Scene, make_camera, make_sphere, make_plane, make_light };
use crate::error::{ Location, SceneError, SceneResult };

/// Parses a complete text scene description.
pub fn parse_scene(source: &str) -> SceneResult<Scene> {
    let mut camera: Option<Camera> = None;
    let mut shading = Shading::default();
    let mut objects: Vec<Primitive> = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let at = Location::Line(i + 1);
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let entry = Entry::parse(at, line)?;
        log::debug!("{}: {} with {} fields", at, entry.kind, entry.fields.len());

        match entry.kind.as_str() {
            "camera" => {
                if camera.is_some() {
                    return Err(SceneError::DuplicateCamera { at });
                }

                entry.allow(&["width", "height"])?;
                camera = Some(make_camera(at,
                    entry.require_number("width")?,
                    entry.require_number("height")?)?);
            },
            "sphere" => {
                entry.allow(&["color", "position", "radius"])?;
                objects.push(make_sphere(at,
                    entry.require_vector("position")?,
                    entry.require_number("radius")?,
                    entry.require_color()?)?);
            },
            "plane" => {
                entry.allow(&["color", "position", "normal"])?;
                objects.push(make_plane(at,
                    entry.require_vector("position")?,
                    entry.require_vector("normal")?,
                    entry.require_color()?)?);
            },
            "light" => {
                entry.allow(&["color", "position"])?;
                let color = match entry.vector("color")? {
                    Some(c) => color_from(c),
                    None => Color::black(),
                };
                objects.push(make_light(at,
                    entry.require_vector("position")?, color)?);
            },
            "shading" => {
                entry.allow(&["ambient", "diffuse", "specular", "shininess"])?;
                if let Some(v) = entry.number("ambient")? { shading.ambient = v; }
                if let Some(v) = entry.number("diffuse")? { shading.diffuse = v; }
                if let Some(v) = entry.number("specular")? { shading.specular = v; }
                if let Some(v) = entry.number("shininess")? { shading.shininess = v; }
            },
            _ => return Err(SceneError::UnknownKind { at, kind: entry.kind.clone() }),
        }
    }

    let camera = camera.ok_or(SceneError::MissingCamera)?;
    Ok(Scene { world: World::new(objects, shading), camera })
}

fn color_from(v: DVec3) -> Color {
    Color::rgb(v.x, v.y, v.z)
}

/// One parsed line: the object kind and its raw `key: value` fields.
struct Entry {
    at: Location,
    kind: String,
    fields: Vec<(String, String)>,
}

impl Entry {
    fn parse(at: Location, line: &str) -> SceneResult<Entry> {
        let mut parts = split_top_level(at, line)?.into_iter();

        // `split_top_level` always yields at least one part.
        let kind = parts.next().unwrap_or_default().to_ascii_lowercase();
        if kind.is_empty() {
            return Err(syntax(at, "missing object kind"));
        }

        let mut fields: Vec<(String, String)> = Vec::new();
        for part in parts {
            let (key, value) = match part.find(':') {
                Some(idx) => (&part[..idx], &part[idx + 1..]),
                None => return Err(syntax(at,
                    &format!("expected \"key: value\", found \"{}\"", part))),
            };

            let key = key.trim().to_ascii_lowercase();
            if fields.iter().any(|(k, _)| *k == key) {
                return Err(syntax(at, &format!("duplicate field \"{}\"", key)));
            }

            fields.push((key, value.trim().to_string()));
        }

        Ok(Entry { at, kind, fields })
    }

    /// Rejects any field not named in `allowed`.
    fn allow(&self, allowed: &[&str]) -> SceneResult<()> {
        match self.fields.iter().find(|(k, _)| !allowed.contains(&k.as_str())) {
            Some((key, _)) => Err(syntax(self.at,
                &format!("unknown field \"{}\" for {}", key, self.kind))),
            None => Ok(()),
        }
    }

    fn raw(&self, key: &str) -> Option<&str> {
        self.fields.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn number(&self, key: &str) -> SceneResult<Option<f64>> {
        match self.raw(key) {
            Some(v) => parse_number(self.at, key, v).map(Some),
            None => Ok(None),
        }
    }

    fn vector(&self, key: &str) -> SceneResult<Option<DVec3>> {
        match self.raw(key) {
            Some(v) => parse_vector(self.at, key, v).map(Some),
            None => Ok(None),
        }
    }

    fn require_number(&self, key: &'static str) -> SceneResult<f64> {
        self.number(key)?.ok_or_else(|| self.missing(key))
    }

    fn require_vector(&self, key: &'static str) -> SceneResult<DVec3> {
        self.vector(key)?.ok_or_else(|| self.missing(key))
    }

    fn require_color(&self) -> SceneResult<Color> {
        let c = color_from(self.require_vector("color")?);

        if [c.r, c.g, c.b].iter().any(|&ch| !(0.0..=1.0).contains(&ch)) {
            log::warn!("{}: color {:?} is outside [0, 1] and will be clamped",
                self.at, c);
        }

        Ok(c)
    }

    fn missing(&self, field: &'static str) -> SceneError {
        SceneError::MissingField { at: self.at, kind: self.kind.clone(), field }
    }
}

fn syntax(at: Location, message: &str) -> SceneError {
    SceneError::Syntax { at, message: message.to_string() }
}

/// Splits a line on commas that are not inside brackets.
fn split_top_level(at: Location, line: &str) -> SceneResult<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in line.chars() {
        match c {
            '[' => {
                depth += 1;
                current.push(c);
            },
            ']' => {
                if depth == 0 {
                    return Err(syntax(at, "unbalanced \"]\""));
                }
                depth -= 1;
                current.push(c);
            },
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            },
            _ => current.push(c),
        }
    }

    if depth != 0 {
        return Err(syntax(at, "unterminated \"[\""));
    }

    parts.push(current.trim().to_string());
    Ok(parts)
}

fn parse_number(at: Location, field: &str, value: &str) -> SceneResult<f64> {
    value.parse::<f64>().map_err(|_| SceneError::InvalidValue {
        at,
        field: field.to_string(),
        message: format!("\"{}\" is not a number", value),
    })
}

fn parse_vector(at: Location, field: &str, value: &str) -> SceneResult<DVec3> {
    let invalid = |message: String| SceneError::InvalidValue {
        at,
        field: field.to_string(),
        message,
    };

    let inner = value.strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or_else(|| invalid(format!("\"{}\" is not a [x, y, z] vector", value)))?;

    let components = inner.split(',')
        .map(|c| parse_number(at, field, c.trim()))
        .collect::<SceneResult<Vec<f64>>>()?;

    match components.as_slice() {
        [x, y, z] => Ok(DVec3::new(*x, *y, *z)),
        _ => Err(invalid(format!("expected 3 components, found {}",
            components.len()))),
    }
}

#[cfg(test)]
const SAMPLE: &str = "\
# A red sphere over a blue floor.
camera, width: 2.0, height: 1.5

sphere, color: [1.0, 0, 0], position: [0, 1, -5], radius: 2
plane, color: [0, 0, 1.0], position: [0, -1, 0], normal: [0, 4, 0]
Light, color: [1, 1, 1], position: [5, 5, 0]
";

#[test]
fn parse_sample_scene() {
    let scene = parse_scene(SAMPLE).unwrap();

    assert_eq!(scene.camera, Camera::new(2.0, 1.5));
    assert_eq!(scene.world.shading, Shading::default());
    assert_eq!(scene.world.objects, vec![
        Primitive::sphere(DVec3::new(0.0, 1.0, -5.0), 2.0, Color::red()),
        Primitive::plane(DVec3::new(0.0, -1.0, 0.0), DVec3::new(0.0, 1.0, 0.0),
            Color::rgb(0.0, 0.0, 1.0)),
        Primitive::light(DVec3::new(5.0, 5.0, 0.0), Color::white()),
    ]);
}

#[test]
fn camera_is_not_a_primitive() {
    let scene = parse_scene("sphere, color: [1, 1, 1], position: [0, 0, -3], \
        radius: 1\ncamera, width: 1, height: 1").unwrap();

    assert_eq!(scene.world.objects.len(), 1);
    assert_eq!(scene.camera, Camera::new(1.0, 1.0));
}

#[test]
fn shading_overrides() {
    let scene = parse_scene("camera, width: 1, height: 1\n\
        shading, ambient: 0.3, shininess: 50").unwrap();

    assert_eq!(scene.world.shading.ambient, 0.3);
    assert_eq!(scene.world.shading.shininess, 50.0);
    assert_eq!(scene.world.shading.diffuse, Shading::default().diffuse);
}

#[test]
fn missing_camera_is_an_error() {
    let err = parse_scene("light, position: [0, 0, 0]").unwrap_err();

    assert_eq!(err.code(), SceneError::MissingCamera.code());
}

#[test]
fn second_camera_is_an_error() {
    let err = parse_scene("camera, width: 1, height: 1\n\
        camera, width: 2, height: 2").unwrap_err();

    match err {
        SceneError::DuplicateCamera { at } => assert_eq!(at, Location::Line(2)),
        _ => panic!("unexpected error: {}", err),
    }
}

#[test]
fn unknown_kind_is_an_error() {
    let err = parse_scene("camera, width: 1, height: 1\n\n\
        cube, position: [0, 0, 0]").unwrap_err();

    match err {
        SceneError::UnknownKind { at, ref kind } => {
            assert_eq!(at, Location::Line(3));
            assert_eq!(kind, "cube");
        },
        _ => panic!("unexpected error: {}", err),
    }
}

#[test]
fn missing_field_is_an_error() {
    let err = parse_scene("camera, width: 1, height: 1\n\
        sphere, color: [1, 0, 0], position: [0, 0, -1]").unwrap_err();

    match err {
        SceneError::MissingField { field, .. } => assert_eq!(field, "radius"),
        _ => panic!("unexpected error: {}", err),
    }
}

#[test]
fn unknown_field_is_an_error() {
    let err = parse_scene("camera, width: 1, height: 1, depth: 3").unwrap_err();

    assert_eq!(err.code(), 3);
}

#[test]
fn malformed_values_are_errors() {
    let bad = [
        "camera, width: wide, height: 1",
        "camera, width: 1, height: 1\nsphere, color: [1, 0], position: [0, 0, 0], radius: 1",
        "camera, width: 1, height: 1\nsphere, color: 1, position: [0, 0, 0], radius: 1",
        "camera, width: 1, height: 1\nsphere, color: [1, 0, 0], position: [0, 0, 0], radius: 0",
        "camera, width: -1, height: 1",
        "camera, width: 1, height: 1\nplane, color: [1, 0, 0], position: [0, 0, 0], normal: [0, 0, 0]",
    ];

    for source in bad.iter() {
        match parse_scene(source) {
            Err(SceneError::InvalidValue { .. }) => (),
            other => panic!("{:?} parsed as {:?}", source, other.map(|_| ())),
        }
    }
}

#[test]
fn unbalanced_brackets_are_errors() {
    let err = parse_scene("camera, width: 1, height: 1\n\
        light, position: [0, 0, 0").unwrap_err();

    assert_eq!(err.code(), 3);
}

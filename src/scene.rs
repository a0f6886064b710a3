use std::fs;
use std::path::Path;
use std::str::FromStr;

use glam::DVec3;
use serde::{ Serialize, Deserialize };

use crate::color::Color;
use crate::shape::Primitive;
use crate::light::Shading;
use crate::world::World;
use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::parallel::parallel_render;
use crate::parser::parse_scene;
use crate::error::{ Location, SceneError, SceneResult };

/// A loaded scene: the primitives to render and the camera looking at them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
}

impl Scene {
    /// Loads a scene description from a file.
    ///
    /// Files with a `.json` extension are read as JSON, anything else as the
    /// line-oriented text format.
    pub fn load(path: &Path) -> SceneResult<Scene> {
        let source = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path.extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let scene = if is_json {
            Scene::from_json(&source)?
        } else {
            source.parse()?
        };

        log::info!("Loaded {} primitives and {} lights from {}",
            scene.world.objects.iter().filter(|o| !o.is_light()).count(),
            scene.world.lights().count(),
            path.display());

        Ok(scene)
    }

    /// Reads a scene from a JSON description.
    pub fn from_json(source: &str) -> SceneResult<Scene> {
        let scene_json: SceneJson = serde_json::from_str(source)?;
        scene_json.into_scene()
    }

    /// Renders the scene into an `hsize` by `vsize` canvas.
    pub fn render(&self, hsize: usize, vsize: usize, parallel: bool)
        -> Canvas {
        if parallel {
            parallel_render(&self.world, &self.camera, hsize, vsize)
        } else {
            self.camera.render(&self.world, hsize, vsize)
        }
    }
}

impl FromStr for Scene {
    type Err = SceneError;

    fn from_str(source: &str) -> SceneResult<Scene> {
        parse_scene(source)
    }
}

/// Validates the viewport dimensions of a camera.
pub(crate) fn make_camera(at: Location, width: f64, height: f64)
    -> SceneResult<Camera> {
    positive(at, "width", width)?;
    positive(at, "height", height)?;

    Ok(Camera::new(width, height))
}

pub(crate) fn make_sphere(at: Location, position: DVec3, radius: f64,
    color: Color) -> SceneResult<Primitive> {
    finite(at, "position", position)?;
    positive(at, "radius", radius)?;

    Ok(Primitive::sphere(position, radius, color))
}

pub(crate) fn make_plane(at: Location, position: DVec3, normal: DVec3,
    color: Color) -> SceneResult<Primitive> {
    finite(at, "position", position)?;
    finite(at, "normal", normal)?;

    if normal.try_normalize().is_none() {
        log::warn!("{}: plane normal {:?} has zero length", at, normal);
        return Err(SceneError::InvalidValue {
            at,
            field: "normal".to_string(),
            message: "must not have zero length".to_string(),
        });
    }

    Ok(Primitive::plane(position, normal, color))
}

pub(crate) fn make_light(at: Location, position: DVec3, color: Color)
    -> SceneResult<Primitive> {
    finite(at, "position", position)?;

    Ok(Primitive::light(position, color))
}

fn positive(at: Location, field: &str, value: f64) -> SceneResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidValue {
            at,
            field: field.to_string(),
            message: format!("must be a positive number, got {}", value),
        })
    }
}

fn finite(at: Location, field: &str, v: DVec3) -> SceneResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(SceneError::InvalidValue {
            at,
            field: field.to_string(),
            message: format!("components must be finite, got {:?}", v),
        })
    }
}

/// The JSON form of a scene description.
///
/// ```json
/// {
///   "camera": { "width": 2.0, "height": 2.0 },
///   "shading": { "ambient": 0.2 },
///   "objects": [
///     { "kind": "sphere", "color": [1, 0, 0], "position": [0, 0, -5],
///       "radius": 1 },
///     { "kind": "light", "position": [5, 5, 0] }
///   ]
/// }
/// ```
#[derive(Serialize, Deserialize)]
pub struct SceneJson {
    camera: CameraJson,
    #[serde(default)]
    shading: Option<Shading>,
    #[serde(default)]
    objects: Vec<ObjectJson>,
}

#[derive(Clone, Serialize, Deserialize)]
struct CameraJson {
    width: f64,
    height: f64,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum ObjectJson {
    Sphere {
        color: [f64; 3],
        position: [f64; 3],
        radius: f64,
    },
    Plane {
        color: [f64; 3],
        position: [f64; 3],
        normal: [f64; 3],
    },
    Light {
        #[serde(default)]
        color: [f64; 3],
        position: [f64; 3],
    },
}

impl SceneJson {
    fn into_scene(self) -> SceneResult<Scene> {
        let camera = make_camera(Location::Camera, self.camera.width,
            self.camera.height)?;

        let objects = self.objects.into_iter()
            .enumerate()
            .map(|(i, obj)| obj.into_primitive(Location::Object(i + 1)))
            .collect::<SceneResult<Vec<Primitive>>>()?;

        let world = World::new(objects, self.shading.unwrap_or_default());
        Ok(Scene { world, camera })
    }
}

impl ObjectJson {
    fn into_primitive(self, at: Location) -> SceneResult<Primitive> {
        match self {
            ObjectJson::Sphere { color, position, radius }
                => make_sphere(at, position.into(), radius, color.into()),
            ObjectJson::Plane { color, position, normal }
                => make_plane(at, position.into(), normal.into(), color.into()),
            ObjectJson::Light { color, position }
                => make_light(at, position.into(), color.into()),
        }
    }
}

#[test]
fn json_scene_loads() {
    let scene = Scene::from_json(r#"{
        "camera": { "width": 2.0, "height": 1.5 },
        "shading": { "ambient": 0.25 },
        "objects": [
            { "kind": "sphere", "color": [1, 0, 0], "position": [0, 0, -5],
              "radius": 2 },
            { "kind": "plane", "color": [0, 0, 1], "position": [0, -1, 0],
              "normal": [0, 2, 0] },
            { "kind": "light", "position": [5, 5, 0] }
        ]
    }"#).unwrap();

    assert_eq!(scene.camera, Camera::new(2.0, 1.5));
    assert_eq!(scene.world.shading.ambient, 0.25);
    assert_eq!(scene.world.shading.shininess, Shading::default().shininess);
    assert_eq!(scene.world.objects, vec![
        Primitive::sphere(DVec3::new(0.0, 0.0, -5.0), 2.0, Color::red()),
        Primitive::plane(DVec3::new(0.0, -1.0, 0.0), DVec3::new(0.0, 1.0, 0.0),
            Color::rgb(0.0, 0.0, 1.0)),
        Primitive::light(DVec3::new(5.0, 5.0, 0.0), Color::black()),
    ]);
}

#[test]
fn json_scene_rejects_bad_radius() {
    let err = Scene::from_json(r#"{
        "camera": { "width": 1, "height": 1 },
        "objects": [
            { "kind": "light", "position": [0, 0, 0] },
            { "kind": "sphere", "color": [1, 0, 0], "position": [0, 0, -5],
              "radius": -1 }
        ]
    }"#).unwrap_err();

    match err {
        SceneError::InvalidValue { at, ref field, .. } => {
            assert_eq!(at, Location::Object(2));
            assert_eq!(field, "radius");
        },
        _ => panic!("unexpected error: {}", err),
    }
}

#[test]
fn json_scene_rejects_unknown_kind() {
    let err = Scene::from_json(r#"{
        "camera": { "width": 1, "height": 1 },
        "objects": [ { "kind": "cube", "position": [0, 0, 0] } ]
    }"#).unwrap_err();

    assert_eq!(err.code(), 9);
}

#[test]
fn json_scene_requires_camera() {
    assert!(Scene::from_json(r#"{ "objects": [] }"#).is_err());
}

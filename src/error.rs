use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Where in a scene description an error was found.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Location {
    /// A 1-based line of a text scene.
    Line(usize),

    /// A 1-based entry of the `objects` array of a JSON scene.
    Object(usize),

    /// The `camera` record of a JSON scene.
    Camera,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line(n) => write!(f, "line {}", n),
            Location::Object(n) => write!(f, "object {}", n),
            Location::Camera => write!(f, "camera"),
        }
    }
}

/// Errors produced while loading a scene description.
///
/// Every variant maps to a stable numeric code (see `code`) which is printed
/// alongside the message so scripted callers can tell failures apart.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("could not read scene file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{at}: {message}")]
    Syntax { at: Location, message: String },

    #[error("{at}: unknown object kind \"{kind}\"")]
    UnknownKind { at: Location, kind: String },

    #[error("{at}: {kind} is missing required field \"{field}\"")]
    MissingField { at: Location, kind: String, field: &'static str },

    #[error("{at}: invalid {field}: {message}")]
    InvalidValue { at: Location, field: String, message: String },

    #[error("scene does not define a camera")]
    MissingCamera,

    #[error("{at}: scene defines more than one camera")]
    DuplicateCamera { at: Location },

    #[error("invalid JSON scene: {0}")]
    Json(#[from] serde_json::Error),
}

impl SceneError {
    /// The numeric error code reported for this failure.
    pub fn code(&self) -> i32 {
        match self {
            SceneError::Io { .. } => 2,
            SceneError::Syntax { .. } => 3,
            SceneError::UnknownKind { .. } => 4,
            SceneError::MissingField { .. } => 5,
            SceneError::InvalidValue { .. } => 6,
            SceneError::MissingCamera => 7,
            SceneError::DuplicateCamera { .. } => 8,
            SceneError::Json(_) => 9,
        }
    }
}

/// Errors produced by a full load, render and write cycle.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("could not write image to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("image of {width}x{height} pixels is too large")]
    ImageSize {
        width: usize,
        height: usize,
    },
}

impl RenderError {
    /// Checks that a `width` by `height` image can be allocated.
    pub fn check_size(width: usize, height: usize) -> Result<(), RenderError> {
        match width.checked_mul(height) {
            Some(_) => Ok(()),
            None => Err(RenderError::ImageSize { width, height }),
        }
    }

    /// The numeric error code reported for this failure.
    pub fn code(&self) -> i32 {
        match self {
            RenderError::Scene(e) => e.code(),
            RenderError::Write { .. } => 10,
            RenderError::ImageSize { .. } => 11,
        }
    }

    /// The process exit status used for this failure.
    pub fn exit_status(&self) -> i32 {
        match self {
            RenderError::Scene(_) => 3,
            RenderError::Write { .. } => 4,
            RenderError::ImageSize { .. } => 2,
        }
    }
}

pub type SceneResult<T> = Result<T, SceneError>;

#[test]
fn scene_error_codes_are_distinct() {
    let errors = vec![
        SceneError::Syntax { at: Location::Line(1), message: String::new() },
        SceneError::UnknownKind { at: Location::Line(1),
            kind: "cube".to_string() },
        SceneError::MissingField { at: Location::Line(1),
            kind: "sphere".to_string(), field: "radius" },
        SceneError::InvalidValue { at: Location::Object(1),
            field: "radius".to_string(), message: String::new() },
        SceneError::MissingCamera,
        SceneError::DuplicateCamera { at: Location::Line(2) },
    ];

    let mut codes: Vec<i32> = errors.iter().map(|e| e.code()).collect();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn messages_name_the_location() {
    let e = SceneError::InvalidValue { at: Location::Line(4),
        field: "radius".to_string(), message: "must be positive".to_string() };
    assert_eq!(e.to_string(), "line 4: invalid radius: must be positive");

    let e = SceneError::UnknownKind { at: Location::Object(2),
        kind: "cube".to_string() };
    assert_eq!(e.to_string(), "object 2: unknown object kind \"cube\"");
}

#[test]
fn write_error_reports_distinct_exit_status() {
    let e = RenderError::Write {
        path: PathBuf::from("/nonexistent/out.ppm"),
        source: io::Error::new(io::ErrorKind::NotFound, "missing"),
    };

    assert_eq!(e.code(), 10);
    assert_eq!(e.exit_status(), 4);
    assert_ne!(RenderError::from(SceneError::MissingCamera).exit_status(),
        e.exit_status());
}

#[test]
fn oversized_image_is_a_usage_error() {
    assert!(RenderError::check_size(1920, 1080).is_ok());

    let e = RenderError::check_size(usize::MAX, 3).unwrap_err();
    assert_eq!(e.code(), 11);
    assert_eq!(e.exit_status(), 2);
    assert_eq!(e.to_string(),
        format!("image of {}x3 pixels is too large", usize::MAX));
}

pub mod consts;
pub mod error;

pub mod color;
pub mod ray;
pub mod shape;
pub mod light;

pub mod world;
pub mod camera;
pub mod scene;
pub mod parser;

pub mod canvas;
pub mod parallel;

pub use glam::DVec3;

use crate::consts::FEQ_EPSILON;

pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}

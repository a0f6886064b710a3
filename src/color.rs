use std::ops::Mul;

use crate::feq;
use crate::consts::PPM_MAX_VALUE;

/// A color.
///
/// Represented with red-green-blue (RGB) channels. Inside the render pipeline
/// each channel is kept in floating point, nominally from 0.0 to 1.0. The only
/// conversion to 8-bit channels happens in `to_bytes`, when a pixel leaves the
/// pipeline for the image writer.
///
/// # Examples
///
/// ```
/// # use raycast::color::Color;
/// let red = Color::red();
/// assert_eq!(red, Color::rgb(1.0, 0.0, 0.0));
/// assert_eq!(red.to_bytes(), [255, 0, 0]);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Colors are compared channel-wise, accounting for possible floating point
/// error.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<[f64; 3]> for Color {
    fn from(v: [f64; 3]) -> Color {
        Color { r: v[0], g: v[1], b: v[2] }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// The color black. Also the background of every scene.
    pub fn black() -> Color {
        Color { r: 0.0, g: 0.0, b: 0.0 }
    }

    /// The color white.
    pub fn white() -> Color {
        Color { r: 1.0, g: 1.0, b: 1.0 }
    }

    /// The color red.
    pub fn red() -> Color {
        Color { r: 1.0, g: 0.0, b: 0.0 }
    }

    /// Clamps every channel to the range `[0.0, 1.0]`.
    ///
    /// NaN channels clamp to 0.0.
    pub fn clamp(&self) -> Color {
        Color {
            r: clamp_channel(self.r),
            g: clamp_channel(self.g),
            b: clamp_channel(self.b),
        }
    }

    /// Converts the color to three 8-bit channels.
    ///
    /// Each byte is `round(clamp(channel, 0, 1) * 255)`. This is the single
    /// place a color is scaled to the output range.
    pub fn to_bytes(&self) -> [u8; 3] {
        let c = self.clamp();
        [to_byte(c.r), to_byte(c.g), to_byte(c.b)]
    }
}

fn clamp_channel(c: f64) -> f64 {
    if c.is_nan() {
        0.0
    } else {
        c.clamp(0.0, 1.0)
    }
}

fn to_byte(c: f64) -> u8 {
    (c * PPM_MAX_VALUE as f64).round() as u8
}

/// Multiplies each channel of a color by a scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

#[test]
fn multiply_color_by_scalar() {
    let c = Color::rgb(0.2, 0.3, 0.4);

    assert_eq!(c * 2.0, Color::rgb(0.4, 0.6, 0.8));
}

#[test]
fn clamp_out_of_range_channels() {
    let c = Color::rgb(1.5, -0.2, f64::NAN).clamp();

    assert_eq!(c, Color::rgb(1.0, 0.0, 0.0));
}

#[test]
fn bytes_are_rounded_once() {
    assert_eq!(Color::rgb(0.5, 0.25, 1.0).to_bytes(), [128, 64, 255]);
    assert_eq!(Color::rgb(0.001, 0.999, 0.0).to_bytes(), [0, 255, 0]);
}

#[test]
fn bytes_never_leave_range() {
    assert_eq!(Color::rgb(7.0, -3.0, 1.0000001).to_bytes(), [255, 0, 255]);
}

use std::io;
use std::io::{ BufWriter, Write };
use std::fs::File;
use std::path::Path;

use crate::color::Color;
use crate::consts::PPM_MAX_VALUE;

/// A canvas for drawing pixels.
///
/// The canvas stores the resultant color of every primary ray, flattened in
/// raster order: left to right across a row, rows from top to bottom. Colors
/// stay in floating point until the canvas is written out, which is where
/// they are converted to bytes.
///
/// Images are written as binary PPM (`P6`).
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a black canvas with specified width and height.
    ///
    /// The whole `width * height` pixel buffer is allocated up front.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`. Use `Canvas::try_new`
    /// for sizes that come from user input.
    pub fn new(width: usize, height: usize) -> Canvas {
        match Canvas::try_new(width, height) {
            Some(canvas) => canvas,
            None => panic!("canvas of {}x{} pixels is too large", width, height),
        }
    }

    /// Creates a black canvas, or `None` if the pixel count overflows.
    pub fn try_new(width: usize, height: usize) -> Option<Canvas> {
        let len = width.checked_mul(height)?;

        Some(Canvas {
            width,
            height,
            pixels: vec![Color::black(); len]
        })
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `y` is the row of the pixel and `x`
    /// the column, both zero-indexed from the top-left corner.
    ///
    /// # Examples
    ///
    /// ```
    /// # use raycast::color::Color;
    /// # use raycast::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`, or `None` if the
    /// location is out-of-bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// All pixels in raster order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Writes the canvas as a binary PPM image.
    ///
    /// The header is `P6\n<width> <height>\n255\n`, followed by three bytes
    /// (red, green, blue) per pixel in raster order.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n{}\n", self.width, self.height, PPM_MAX_VALUE)?;

        for pixel in self.pixels.iter() {
            out.write_all(&pixel.to_bytes())?;
        }

        out.flush()
    }

    /// Saves a canvas to a PPM file, creating or truncating it.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.pixels().len(), 200);
    assert!(c.pixels().iter().all(|&p| p == Color::black()));
}

#[test]
fn overflowing_size_is_refused() {
    assert!(Canvas::try_new(usize::MAX, 2).is_none());
    assert_eq!(Canvas::try_new(3, 2).map(|c| c.pixels().len()), Some(6));
}

#[test]
fn out_of_bounds_pixels_are_ignored() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(2, 0, &Color::red());
    c.write_pixel(0, 2, &Color::red());

    assert_eq!(c.read_pixel(2, 0), None);
    assert!(c.pixels().iter().all(|&p| p == Color::black()));
}

#[test]
fn ppm_header_and_length() {
    let c = Canvas::new(5, 3);
    let mut out: Vec<u8> = Vec::new();
    c.write_ppm(&mut out).unwrap();

    let header = b"P6\n5 3\n255\n";
    assert_eq!(&out[..header.len()], &header[..]);
    assert_eq!(out.len(), header.len() + 5 * 3 * 3);
}

#[test]
fn ppm_pixels_in_raster_order() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(1, 0, &Color::rgb(1.0, 0.0, 0.0));
    c.write_pixel(0, 1, &Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(1, 1, &Color::rgb(1.5, -0.5, 0.2));

    let mut out: Vec<u8> = Vec::new();
    c.write_ppm(&mut out).unwrap();

    let body = &out[b"P6\n2 2\n255\n".len()..];
    assert_eq!(body, &[
        0u8, 0, 0,
        255, 0, 0,
        0, 128, 0,
        255, 0, 51,
    ][..]);
}

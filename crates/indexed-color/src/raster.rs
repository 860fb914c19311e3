//! Source rasters.
//!
//! The pipeline reads pixels through [`PixelSource`], a row-major view of an
//! in-memory image. [`RgbaImage`] is the owned implementation used by the
//! front end and by tests.

use crate::color::{Rgb, Rgba};
use crate::error::QuantizeError;

/// A row-major raster of straight-alpha pixels.
///
/// `row(y)` must return exactly `width()` pixels for every `y` in
/// `0..height()`.
pub trait PixelSource {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Pixels of scanline `y`, left to right.
    fn row(&self, y: usize) -> &[Rgba];

    /// All scanlines, top to bottom.
    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { source: self, y: 0 }
    }
}

/// Iterator over the scanlines of a [`PixelSource`].
pub struct Rows<'a, S: PixelSource> {
    source: &'a S,
    y: usize,
}

impl<'a, S: PixelSource> Iterator for Rows<'a, S> {
    type Item = &'a [Rgba];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.source.height() {
            return None;
        }
        let row = self.source.row(self.y);
        self.y += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.source.height().saturating_sub(self.y);
        (remaining, Some(remaining))
    }
}

impl<S: PixelSource> ExactSizeIterator for Rows<'_, S> {}

/// An owned RGBA image stored row-major.
///
/// # Example
///
/// ```
/// use indexed_color::{PixelSource, Rgba, RgbaImage};
///
/// let image = RgbaImage::from_fn(3, 2, |x, y| Rgba::new(x as u8, y as u8, 0, 255));
/// assert_eq!(image.row(1)[2], Rgba::new(2, 1, 0, 255));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pixels: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl RgbaImage {
    /// Wrap a pixel buffer.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::InvalidArgument`] if `pixels.len() != width * height`.
    pub fn new(pixels: Vec<Rgba>, width: usize, height: usize) -> Result<Self, QuantizeError> {
        if pixels.len() != width * height {
            return Err(QuantizeError::invalid(format!(
                "pixel buffer length {} does not match dimensions {}x{}",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Build from interleaved `[R, G, B, A, ...]` bytes.
    pub fn from_rgba_bytes(bytes: &[u8], width: usize, height: usize) -> Result<Self, QuantizeError> {
        if bytes.len() != width * height * 4 {
            return Err(QuantizeError::invalid(format!(
                "byte buffer length {} does not match dimensions {}x{}x4",
                bytes.len(),
                width,
                height
            )));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
            .collect();
        Self::new(pixels, width, height)
    }

    /// Build a fully opaque image from colors.
    pub fn from_colors(colors: &[Rgb], width: usize, height: usize) -> Result<Self, QuantizeError> {
        Self::new(colors.iter().map(|&c| Rgba::opaque(c)).collect(), width, height)
    }

    /// Build by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }
}

impl PixelSource for RgbaImage {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn row(&self, y: usize) -> &[Rgba] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }
}

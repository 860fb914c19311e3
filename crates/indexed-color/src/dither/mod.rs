//! Raster to palette index mapping.
//!
//! [`quantize`] returns a lazy iterator that yields one row of palette
//! indices per source scanline, top to bottom. Two strategies exist:
//!
//! - **Nearest neighbor**: every pixel maps to its closest palette slot.
//! - **Error diffusion**: the difference between the adjusted pixel and its
//!   chosen slot is passed on to unvisited neighbors through a [`Kernel`].
//!
//! Only `max_dy + 1` error rows are kept alive, so memory does not grow with
//! the image height.
//!
//! # Example
//!
//! ```
//! use indexed_color::{quantize, Palette, Rgb, Rgba, RgbaImage, Strategy};
//!
//! let image = RgbaImage::from_fn(4, 2, |x, _| Rgba::new(x as u8 * 80, 0, 0, 255));
//! let palette = Palette::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 0, 0)], false).unwrap();
//!
//! let rows: Vec<Vec<u8>> = quantize(&image, &palette, &Strategy::NearestNeighbor)
//!     .unwrap()
//!     .collect();
//! assert_eq!(rows, vec![vec![0, 0, 1, 1], vec![0, 0, 1, 1]]);
//! ```

mod kernel;

use std::iter::FusedIterator;

pub use kernel::{DiffusionLevel, Kernel};

use crate::color::Rgb;
use crate::error::QuantizeError;
use crate::palette::{NearestColorIndex, Palette};
use crate::raster::PixelSource;

/// How source pixels are turned into palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Closest palette slot, no state between pixels.
    NearestNeighbor,
    /// Closest slot to the pixel plus the error diffused so far.
    ErrorDiffusion(Kernel),
}

impl Default for Strategy {
    fn default() -> Self {
        DiffusionLevel::default().into()
    }
}

impl From<DiffusionLevel> for Strategy {
    fn from(level: DiffusionLevel) -> Self {
        Strategy::ErrorDiffusion(level.kernel())
    }
}

/// Sliding window of error rows.
///
/// `rows[0]` is the current scanline, `rows[1]` the next one, and so on.
/// Every row is padded by `pad` cells on both sides; contributions that land
/// in the padding are never read and get cleared when the row is recycled.
#[derive(Debug)]
struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    pad: usize,
}

impl ErrorBuffer {
    fn new(width: usize, pad: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth)
                .map(|_| vec![[0.0; 3]; width + 2 * pad])
                .collect(),
            pad,
        }
    }

    /// Error accumulated at column `x` of the current row.
    #[inline]
    fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x + self.pad]
    }

    /// Add `error` at column `x + dx` of row `dy`. `|dx|` must not exceed
    /// the padding and `dy` must be below the row depth.
    #[inline]
    fn add_error(&mut self, x: usize, dx: i32, dy: usize, error: [f32; 3]) {
        let col = (x + self.pad).wrapping_add_signed(dx as isize);
        let cell = &mut self.rows[dy][col];
        for c in 0..3 {
            cell[c] += error[c];
        }
    }

    /// Move to the next scanline, recycling the finished row as the last.
    fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

struct Diffusion {
    kernel: Kernel,
    buffer: ErrorBuffer,
}

/// Start quantizing `source` against `palette`.
///
/// Nothing is computed until rows are pulled from the returned iterator.
///
/// When the palette reserves a transparent slot, pixels with alpha of 128
/// or less map to slot 0 and pass on no error. Otherwise alpha is ignored.
///
/// # Errors
///
/// [`QuantizeError::InvalidArgument`] if the palette has no opaque slot to
/// match against.
pub fn quantize<'a, S: PixelSource>(
    source: &'a S,
    palette: &'a Palette,
    strategy: &Strategy,
) -> Result<IndexRows<'a, S>, QuantizeError> {
    let index = NearestColorIndex::new(palette)?;
    let diffusion = match strategy {
        Strategy::NearestNeighbor => None,
        Strategy::ErrorDiffusion(kernel) => Some(Diffusion {
            buffer: ErrorBuffer::new(source.width(), kernel.reach(), kernel.max_dy() + 1),
            kernel: kernel.clone(),
        }),
    };

    tracing::debug!(
        width = source.width(),
        height = source.height(),
        palette = palette.len(),
        diffusion = diffusion.is_some(),
        "Quantizing raster"
    );

    Ok(IndexRows {
        source,
        palette,
        index,
        diffusion,
        y: 0,
    })
}

/// Lazy iterator over rows of palette indices, see [`quantize`].
pub struct IndexRows<'a, S: PixelSource> {
    source: &'a S,
    palette: &'a Palette,
    index: NearestColorIndex<'a>,
    diffusion: Option<Diffusion>,
    y: usize,
}

impl<'a, S: PixelSource> IndexRows<'a, S> {
    #[inline]
    pub fn palette(&self) -> &'a Palette {
        self.palette
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.source.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.source.height()
    }
}

impl<S: PixelSource> Iterator for IndexRows<'_, S> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.y >= self.source.height() {
            return None;
        }
        let row = self.source.row(self.y);
        let transparent = self.palette.transparent_index().map(|i| i as u8);
        let mut out = Vec::with_capacity(row.len());

        match &mut self.diffusion {
            None => {
                for pixel in row {
                    let idx = match transparent {
                        Some(t) if !pixel.is_opaque() => t,
                        _ => self.index.lookup(pixel.rgb()),
                    };
                    out.push(idx);
                }
            }
            Some(Diffusion { kernel, buffer }) => {
                let divisor = kernel.divisor() as f32;
                for (x, pixel) in row.iter().enumerate() {
                    if let Some(t) = transparent.filter(|_| !pixel.is_opaque()) {
                        out.push(t);
                        continue;
                    }

                    let err = buffer.get_accumulated(x);
                    let adjusted = Rgb::new(
                        adjust(pixel.r, err[0]),
                        adjust(pixel.g, err[1]),
                        adjust(pixel.b, err[2]),
                    );
                    let idx = self.index.lookup(adjusted);
                    let chosen = self.palette.color(idx as usize);
                    let error = [
                        adjusted.r as f32 - chosen.r as f32,
                        adjusted.g as f32 - chosen.g as f32,
                        adjusted.b as f32 - chosen.b as f32,
                    ];

                    for &(dx, dy, weight) in kernel.entries() {
                        let share = weight as f32 / divisor;
                        buffer.add_error(
                            x,
                            dx,
                            dy,
                            [error[0] * share, error[1] * share, error[2] * share],
                        );
                    }
                    out.push(idx);
                }
                buffer.advance_row();
            }
        }

        self.y += 1;
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.source.height().saturating_sub(self.y);
        (remaining, Some(remaining))
    }
}

impl<S: PixelSource> ExactSizeIterator for IndexRows<'_, S> {}

impl<S: PixelSource> FusedIterator for IndexRows<'_, S> {}

/// Source channel plus accumulated error, rounded and clamped to `0..=255`.
#[inline]
fn adjust(value: u8, error: f32) -> u8 {
    (value as f32 + error).round().clamp(0.0, 255.0) as u8
}

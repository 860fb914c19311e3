//! Quantizer builder, the ergonomic entry point for the crate.
//!
//! [`Quantizer`] wraps the whole pipeline (frequency table, median cut,
//! palette, index mapping) behind a fluent builder.

use crate::dither::{quantize, Strategy};
use crate::error::QuantizeError;
use crate::output::IndexedImage;
use crate::palette::{Palette, PaletteBuilder};
use crate::raster::PixelSource;
use crate::table::{ColorFrequencyTable, MedianCutReducer};

/// High-level quantization builder.
///
/// - Configuration methods consume and return `self`
/// - [`quantize()`](Self::quantize) takes `&self`, so one quantizer can be
///   reused across images
///
/// Defaults: no transparent slot, optimized slot ordering, Floyd-Steinberg
/// error diffusion.
///
/// # Example
///
/// ```
/// use indexed_color::{Quantizer, Rgba, RgbaImage, Strategy};
///
/// let image = RgbaImage::from_fn(8, 8, |x, y| Rgba::new(x as u8 * 32, y as u8 * 32, 0, 255));
/// let result = Quantizer::new(4)
///     .strategy(Strategy::NearestNeighbor)
///     .quantize(&image)
///     .unwrap();
///
/// assert_eq!(result.width(), 8);
/// assert!(result.palette().len() <= 4);
/// ```
#[derive(Debug, Clone)]
pub struct Quantizer {
    max_colors: usize,
    transparent_slot: bool,
    optimize_ordering: bool,
    strategy: Strategy,
}

impl Quantizer {
    /// A quantizer producing at most `max_colors` opaque colors.
    ///
    /// `max_colors` is validated when the pipeline runs: it must be at least
    /// 2, and at most 256 (255 with a transparent slot).
    pub fn new(max_colors: usize) -> Self {
        Self {
            max_colors,
            transparent_slot: false,
            optimize_ordering: true,
            strategy: Strategy::default(),
        }
    }

    /// Reserve palette slot 0 for pixels with alpha of 128 or less.
    #[inline]
    pub fn transparent_slot(mut self, enabled: bool) -> Self {
        self.transparent_slot = enabled;
        self
    }

    /// Use the popcount-permuted slot order.
    #[inline]
    pub fn optimize_ordering(mut self, enabled: bool) -> Self {
        self.optimize_ordering = enabled;
        self
    }

    #[inline]
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Count, reduce and build the palette for `source`.
    ///
    /// # Errors
    ///
    /// - [`QuantizeError::InvalidArgument`] if `max_colors < 2`, or the
    ///   source has no opaque pixel and no transparent slot is reserved
    /// - [`QuantizeError::TooManyColors`] if `max_colors` exceeds the
    ///   palette budget and the source has that many colors
    pub fn palette_for<S: PixelSource>(&self, source: &S) -> Result<Palette, QuantizeError> {
        let table = ColorFrequencyTable::from_raster(source);
        let reduced = MedianCutReducer::reduce(&table, self.max_colors)?;
        PaletteBuilder::new()
            .transparent_slot(self.transparent_slot)
            .optimize_ordering(self.optimize_ordering)
            .build(&reduced)
    }

    /// Run the full pipeline and collect the result.
    ///
    /// # Errors
    ///
    /// Everything [`palette_for`](Self::palette_for) returns, and
    /// [`QuantizeError::InvalidArgument`] if the source is fully transparent.
    pub fn quantize<S: PixelSource>(&self, source: &S) -> Result<IndexedImage, QuantizeError> {
        let palette = self.palette_for(source)?;
        let rows = quantize(source, &palette, &self.strategy)?;
        let (width, height) = (rows.width(), rows.height());
        let image = IndexedImage::from_rows(rows, width, height, palette.clone());

        tracing::debug!(
            width,
            height,
            colors = palette.len(),
            "Quantized image"
        );
        Ok(image)
    }
}

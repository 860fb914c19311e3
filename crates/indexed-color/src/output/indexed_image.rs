//! IndexedImage: palette indices plus the palette they refer to.

use crate::color::Rgba;
use crate::error::QuantizeError;
use crate::palette::Palette;

/// The collected output of the quantization pipeline.
///
/// Stores one `u8` palette index per pixel in row-major order, along with
/// the image dimensions and the palette the indices point into.
///
/// # Example
///
/// ```
/// use indexed_color::{IndexedImage, Palette, Rgb};
///
/// let palette = Palette::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)], false).unwrap();
/// let image = IndexedImage::new(vec![0, 1, 1, 0], 2, 2, palette).unwrap();
///
/// assert_eq!(image.rows().collect::<Vec<_>>(), vec![&[0, 1][..], &[1, 0][..]]);
/// assert_eq!(image.to_rgba().len(), 2 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    /// Palette indices, one per pixel, row-major order.
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl IndexedImage {
    /// # Errors
    ///
    /// [`QuantizeError::InvalidArgument`] if `indices.len() != width * height`
    /// or an index is outside the palette.
    pub fn new(
        indices: Vec<u8>,
        width: usize,
        height: usize,
        palette: Palette,
    ) -> Result<Self, QuantizeError> {
        if indices.len() != width * height {
            return Err(QuantizeError::invalid(format!(
                "indices length {} does not match dimensions {}x{}",
                indices.len(),
                width,
                height
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= palette.len()) {
            return Err(QuantizeError::invalid(format!(
                "index {bad} is outside a palette of {} slots",
                palette.len()
            )));
        }
        Ok(Self {
            indices,
            width,
            height,
            palette,
        })
    }

    /// Build from rows already known to be valid.
    pub(crate) fn from_rows(
        rows: impl Iterator<Item = Vec<u8>>,
        width: usize,
        height: usize,
        palette: Palette,
    ) -> Self {
        let mut indices = Vec::with_capacity(width * height);
        for row in rows {
            indices.extend_from_slice(&row);
        }
        debug_assert_eq!(indices.len(), width * height);
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Index rows, top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        // chunks_exact(0) panics; a zero-width image has empty rows.
        let width = self.width.max(1);
        let rows = if self.width == 0 { 0 } else { self.height };
        self.indices.chunks_exact(width).take(rows)
    }

    /// Decode to `[R, G, B, A, ...]` bytes. The transparent slot renders
    /// with alpha 0, every other slot is opaque.
    ///
    /// The returned buffer has length `width * height * 4`.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.indices.len() * 4);
        for &idx in &self.indices {
            let Rgba { r, g, b, a } = self.palette.rgba(idx as usize);
            rgba.extend_from_slice(&[r, g, b, a]);
        }
        rgba
    }

    /// How often each slot is used, indexed by slot.
    pub fn histogram(&self) -> Vec<u64> {
        let mut counts = vec![0u64; self.palette.len()];
        for &idx in &self.indices {
            counts[idx as usize] += 1;
        }
        counts
    }
}

//! Color frequency table.

use std::collections::BTreeMap;

use crate::color::{Rgb, Rgba};
use crate::error::QuantizeError;
use crate::raster::PixelSource;

/// Distinct opaque colors and how often each occurs.
///
/// Entries are kept in canonical order: ascending red, then green, then
/// blue. That order is what the canonical palette mode assigns slots by and
/// what median cut starts from, so iteration never depends on hashing.
///
/// # Invariants
///
/// - every stored occurrence count is positive
/// - `total_count()` equals the sum of all occurrence counts
///
/// # Example
///
/// ```
/// use indexed_color::{ColorFrequencyTable, Rgb};
///
/// let mut table = ColorFrequencyTable::new();
/// table.add(255, 0, 0, 3).unwrap();
/// table.add(0, 0, 255, 1).unwrap();
/// table.add(255, 0, 0, 2).unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.total_count(), 6);
/// assert_eq!(table.occurrences(Rgb::new(255, 0, 0)), 5);
/// assert_eq!(table.ordered_colors(), vec![Rgb::new(0, 0, 255), Rgb::new(255, 0, 0)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorFrequencyTable {
    counts: BTreeMap<Rgb, u64>,
    total: u64,
}

impl ColorFrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every opaque pixel of `source`.
    pub fn from_raster<S: PixelSource>(source: &S) -> Self {
        let mut table = Self::new();
        table.count_raster(source);
        table
    }

    /// Add `occurrence` pixels of the color `(r, g, b)`.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::InvalidArgument`] if `occurrence <= 0`, a channel is
    /// outside `0..=255`, or the total count would exceed `u64::MAX`. The
    /// table is left unchanged on error.
    pub fn add(&mut self, r: i64, g: i64, b: i64, occurrence: i64) -> Result<(), QuantizeError> {
        if occurrence <= 0 {
            return Err(QuantizeError::invalid(format!(
                "occurrence must be greater than 0, got {occurrence}"
            )));
        }
        let color = Rgb::try_new(r, g, b)?;
        self.try_insert(color, occurrence as u64)
    }

    /// Add `occurrence` pixels of an already validated color.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::InvalidArgument`] if `occurrence` is zero or the total
    /// count would exceed `u64::MAX`.
    pub fn add_color(&mut self, color: Rgb, occurrence: u64) -> Result<(), QuantizeError> {
        if occurrence == 0 {
            return Err(QuantizeError::invalid("occurrence must be greater than 0"));
        }
        self.try_insert(color, occurrence)
    }

    fn try_insert(&mut self, color: Rgb, occurrence: u64) -> Result<(), QuantizeError> {
        self.check_room(occurrence)?;
        self.insert(color, occurrence);
        Ok(())
    }

    fn check_room(&self, extra: u64) -> Result<(), QuantizeError> {
        match self.total.checked_add(extra) {
            Some(_) => Ok(()),
            None => Err(QuantizeError::invalid(format!(
                "total count overflows: {} + {extra}",
                self.total
            ))),
        }
    }

    /// Callers guarantee `total + occurrence` fits in a `u64`. Every entry is
    /// bounded by the total, so the entry cannot overflow either.
    #[inline]
    pub(crate) fn insert(&mut self, color: Rgb, occurrence: u64) {
        *self.counts.entry(color).or_insert(0) += occurrence;
        self.total += occurrence;
    }

    /// Count every pixel of `source` whose alpha exceeds 128, in row-major
    /// order. Mostly transparent pixels are skipped silently.
    ///
    /// Returns the number of pixels that were counted.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::InvalidArgument`] if the raster could push the total
    /// count past `u64::MAX`. The table is left unchanged on error.
    pub fn add_from_raster<S: PixelSource>(&mut self, source: &S) -> Result<u64, QuantizeError> {
        let pixels = (source.width() as u64).saturating_mul(source.height() as u64);
        self.check_room(pixels)?;
        Ok(self.count_raster(source))
    }

    fn count_raster<S: PixelSource>(&mut self, source: &S) -> u64 {
        let mut counted = 0;
        for row in source.rows() {
            for pixel in row.iter().filter(|p| p.is_opaque()) {
                self.insert(pixel.rgb(), 1);
                counted += 1;
            }
        }
        tracing::debug!(
            width = source.width(),
            height = source.height(),
            counted,
            distinct = self.len(),
            "Counted raster colors"
        );
        counted
    }

    /// Add every entry of `other` into this table.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::InvalidArgument`] if the combined total count would
    /// exceed `u64::MAX`. The table is left unchanged on error.
    pub fn merge(&mut self, other: &ColorFrequencyTable) -> Result<(), QuantizeError> {
        self.check_room(other.total)?;
        for (&color, &count) in &other.counts {
            self.insert(color, count);
        }
        Ok(())
    }

    /// Number of distinct colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of pixels represented, i.e. the sum of all occurrences.
    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total
    }

    /// Occurrences of `color`, zero when absent.
    #[inline]
    pub fn occurrences(&self, color: Rgb) -> u64 {
        self.counts.get(&color).copied().unwrap_or(0)
    }

    #[inline]
    pub fn contains(&self, color: Rgb) -> bool {
        self.counts.contains_key(&color)
    }

    /// Entries in canonical order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Rgb, u64)> + '_ {
        self.counts.iter().map(|(&color, &count)| (color, count))
    }

    /// Colors in canonical (red, green, blue ascending) order.
    pub fn ordered_colors(&self) -> Vec<Rgb> {
        self.counts.keys().copied().collect()
    }

    /// Colors in canonical order as pixels, optionally preceded by a fully
    /// transparent placeholder.
    pub fn colors(&self, prepend_transparent: bool) -> Vec<Rgba> {
        let mut colors = Vec::with_capacity(self.len() + prepend_transparent as usize);
        if prepend_transparent {
            colors.push(Rgba::new(0, 0, 0, 0));
        }
        colors.extend(self.counts.keys().map(|&c| Rgba::opaque(c)));
        colors
    }

    /// True when both tables hold the same colors, regardless of counts.
    pub fn same_colors(&self, other: &ColorFrequencyTable) -> bool {
        self.len() == other.len() && self.counts.keys().eq(other.counts.keys())
    }
}

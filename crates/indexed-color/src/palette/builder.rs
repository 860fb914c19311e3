//! Palette construction from a frequency table.

use super::palette::{Palette, PaletteOrdering, MAX_PALETTE_SLOTS};
use super::permutation::PermutationTable;
use crate::color::Rgb;
use crate::error::QuantizeError;
use crate::table::ColorFrequencyTable;

/// Builds a [`Palette`] from a [`ColorFrequencyTable`].
///
/// In canonical mode the colors take consecutive slots in table order. In
/// optimized mode the colors are sorted by ascending frequency (ties by
/// packed RGB value) and the `i`-th one lands in slot `π(i + offset)` of the
/// popcount permutation, so the most frequent colors get the indices with
/// the most set bits. The palette is then padded to `2^depth` slots; unused
/// slots repeat the first opaque color, so they never win a lookup.
///
/// # Example
///
/// ```
/// use indexed_color::{ColorFrequencyTable, PaletteBuilder, Rgb};
///
/// let mut table = ColorFrequencyTable::new();
/// table.add(255, 0, 0, 10).unwrap();
/// table.add(0, 0, 255, 1).unwrap();
///
/// let palette = PaletteBuilder::new().transparent_slot(true).build(&table).unwrap();
/// assert_eq!(palette.colors(), &[Rgb::BLACK, Rgb::new(0, 0, 255), Rgb::new(255, 0, 0)]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PaletteBuilder {
    include_transparent: bool,
    optimize: bool,
}

impl PaletteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve slot 0 for transparency.
    pub fn transparent_slot(mut self, include: bool) -> Self {
        self.include_transparent = include;
        self
    }

    /// Use the popcount-permuted slot order.
    pub fn optimize_ordering(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Build the palette for `table`.
    ///
    /// # Errors
    ///
    /// - [`QuantizeError::TooManyColors`] if the table holds more than 256
    ///   colors, or more than 255 with a transparent slot
    /// - [`QuantizeError::InvalidArgument`] if the table is empty and no
    ///   transparent slot is requested
    pub fn build(&self, table: &ColorFrequencyTable) -> Result<Palette, QuantizeError> {
        let count = table.len();
        if count > MAX_PALETTE_SLOTS {
            return Err(QuantizeError::TooManyColors {
                count,
                max: MAX_PALETTE_SLOTS,
            });
        }
        if self.include_transparent && count > MAX_PALETTE_SLOTS - 1 {
            return Err(QuantizeError::TooManyColors {
                count,
                max: MAX_PALETTE_SLOTS - 1,
            });
        }
        if count == 0 && !self.include_transparent {
            return Err(QuantizeError::invalid(
                "cannot build a palette from an empty color table",
            ));
        }

        let palette = if self.optimize {
            self.build_optimized(table)?
        } else {
            self.build_canonical(table)
        };

        tracing::debug!(
            colors = count,
            slots = palette.len(),
            transparent = self.include_transparent,
            ordering = ?palette.ordering(),
            "Built palette"
        );
        Ok(palette)
    }

    fn build_canonical(&self, table: &ColorFrequencyTable) -> Palette {
        let mut slots = Vec::with_capacity(table.len() + self.include_transparent as usize);
        if self.include_transparent {
            slots.push(Rgb::BLACK);
        }
        slots.extend(table.iter().map(|(color, _)| color));
        Palette::from_slots(slots, self.include_transparent, PaletteOrdering::Canonical)
    }

    fn build_optimized(&self, table: &ColorFrequencyTable) -> Result<Palette, QuantizeError> {
        if table.is_empty() {
            // Only the transparent slot; there is no opaque color to pad with.
            return Ok(Palette::from_slots(
                vec![Rgb::BLACK],
                true,
                PaletteOrdering::Optimized,
            ));
        }
        let offset = self.include_transparent as usize;
        let used = table.len() + offset;
        let depth = PermutationTable::depth_for(used).ok_or(QuantizeError::TooManyColors {
            count: table.len(),
            max: MAX_PALETTE_SLOTS - offset,
        })?;
        let permutation = PermutationTable::for_depth(depth)?;

        let mut by_frequency: Vec<(Rgb, u64)> = table.iter().collect();
        by_frequency.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.packed().cmp(&b.0.packed())));

        let mut slots: Vec<Option<Rgb>> = vec![None; permutation.len()];
        if self.include_transparent {
            slots[permutation.get(0)] = Some(Rgb::BLACK);
        }
        for (i, &(color, _)) in by_frequency.iter().enumerate() {
            slots[permutation.get(i + offset)] = Some(color);
        }

        // Padding repeats the first opaque slot. π(offset) is the lowest
        // opaque index, so a duplicate never wins a nearest-color tie.
        let fill = slots[permutation.get(offset)].unwrap_or(Rgb::BLACK);
        let slots = slots.into_iter().map(|s| s.unwrap_or(fill)).collect();
        Ok(Palette::from_slots(
            slots,
            self.include_transparent,
            PaletteOrdering::Optimized,
        ))
    }
}

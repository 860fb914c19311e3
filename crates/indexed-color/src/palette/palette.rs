//! The immutable palette produced by [`PaletteBuilder`](super::PaletteBuilder).

use crate::color::{Rgb, Rgba};
use crate::error::QuantizeError;

/// Largest number of slots an indexed image can address with 8-bit indices.
pub const MAX_PALETTE_SLOTS: usize = 256;

/// How palette slots were assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteOrdering {
    /// Colors in ascending red, green, blue order.
    #[default]
    Canonical,
    /// Colors placed by the popcount permutation, least frequent first.
    /// The palette is padded to a power-of-two length.
    Optimized,
}

/// An ordered list of up to 256 colors.
///
/// When a transparent slot is reserved it is always index 0; its stored color
/// is [`Rgb::BLACK`] and carries no meaning.
///
/// # Example
///
/// ```
/// use indexed_color::{Palette, Rgb};
///
/// let palette = Palette::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)], true).unwrap();
/// assert_eq!(palette.len(), 3);
/// assert_eq!(palette.transparent_index(), Some(0));
/// assert_eq!(palette.color(2), Rgb::new(255, 255, 255));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    slots: Vec<Rgb>,
    transparent: bool,
    ordering: PaletteOrdering,
}

impl Palette {
    /// Create a palette from explicit colors, in the given slot order.
    ///
    /// With `transparent_slot`, a transparent entry is inserted at index 0
    /// and `colors` start at index 1.
    ///
    /// # Errors
    ///
    /// - [`QuantizeError::InvalidArgument`] if the palette would have no slots
    /// - [`QuantizeError::TooManyColors`] if it would have more than 256
    pub fn new(colors: Vec<Rgb>, transparent_slot: bool) -> Result<Self, QuantizeError> {
        let max = MAX_PALETTE_SLOTS - transparent_slot as usize;
        if colors.len() > max {
            return Err(QuantizeError::TooManyColors {
                count: colors.len(),
                max,
            });
        }
        if colors.is_empty() && !transparent_slot {
            return Err(QuantizeError::invalid("a palette needs at least one slot"));
        }

        let mut slots = Vec::with_capacity(colors.len() + transparent_slot as usize);
        if transparent_slot {
            slots.push(Rgb::BLACK);
        }
        slots.extend(colors);
        Ok(Self::from_slots(slots, transparent_slot, PaletteOrdering::Canonical))
    }

    /// Wrap fully assigned slots. Callers guarantee `1..=256` entries.
    pub(crate) fn from_slots(slots: Vec<Rgb>, transparent: bool, ordering: PaletteOrdering) -> Self {
        debug_assert!(!slots.is_empty() && slots.len() <= MAX_PALETTE_SLOTS);
        Self {
            slots,
            transparent,
            ordering,
        }
    }

    /// Number of slots, including a reserved transparent slot.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`: palettes have at least one slot.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Color stored in slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn color(&self, idx: usize) -> Rgb {
        self.slots[idx]
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<Rgb> {
        self.slots.get(idx).copied()
    }

    /// All slots in index order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.slots
    }

    /// Slot `idx` as a pixel; the transparent slot has alpha 0.
    #[inline]
    pub fn rgba(&self, idx: usize) -> Rgba {
        if self.is_transparent(idx) {
            Rgba::new(0, 0, 0, 0)
        } else {
            Rgba::opaque(self.slots[idx])
        }
    }

    #[inline]
    pub fn has_transparent_slot(&self) -> bool {
        self.transparent
    }

    /// `Some(0)` when a transparent slot is reserved.
    #[inline]
    pub fn transparent_index(&self) -> Option<usize> {
        self.transparent.then_some(0)
    }

    #[inline]
    pub fn is_transparent(&self, idx: usize) -> bool {
        self.transparent && idx == 0
    }

    #[inline]
    pub fn ordering(&self) -> PaletteOrdering {
        self.ordering
    }

    /// Smallest bit depth (1..=8) able to address every slot.
    pub fn bit_depth(&self) -> u8 {
        let mut depth = 1;
        while (1usize << depth) < self.slots.len() {
            depth += 1;
        }
        depth
    }

    /// Nearest opaque slot to `color` by squared RGB distance, lowest index
    /// on ties. `None` when the palette holds only the transparent slot.
    pub fn nearest(&self, color: Rgb) -> Option<usize> {
        let first = self.transparent as usize;
        let mut best: Option<(usize, u32)> = None;
        for (idx, &slot) in self.slots.iter().enumerate().skip(first) {
            let dist = color.distance_squared(slot);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((idx, dist)),
            }
            if dist == 0 {
                break;
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// `[R, G, B, ...]` bytes for a PLTE-style color table.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.slots.iter().flat_map(|c| c.to_bytes()).collect()
    }
}

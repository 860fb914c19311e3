//! Memoized nearest-color lookup.

use std::collections::HashMap;

use super::palette::Palette;
use crate::color::Rgb;
use crate::error::QuantizeError;

/// Cached results are dropped once this many distinct colors were seen.
const CACHE_LIMIT: usize = 1 << 16;

/// Maps arbitrary colors to the index of the closest palette slot.
///
/// Distance is squared Euclidean in RGB; ties go to the lowest index. The
/// reserved transparent slot is never a candidate. Results are memoized per
/// color, so the index must not be shared between threads without a lock;
/// create one per worker instead.
///
/// # Example
///
/// ```
/// use indexed_color::{NearestColorIndex, Palette, Rgb};
///
/// let palette = Palette::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)], false).unwrap();
/// let mut index = NearestColorIndex::new(&palette).unwrap();
/// assert_eq!(index.lookup(Rgb::new(200, 180, 190)), 1);
/// assert_eq!(index.lookup(Rgb::new(20, 40, 10)), 0);
/// ```
#[derive(Debug, Clone)]
pub struct NearestColorIndex<'a> {
    palette: &'a Palette,
    cache: HashMap<Rgb, u8>,
}

impl<'a> NearestColorIndex<'a> {
    /// # Errors
    ///
    /// [`QuantizeError::InvalidArgument`] if the palette has no opaque slot.
    pub fn new(palette: &'a Palette) -> Result<Self, QuantizeError> {
        let opaque_slots = palette.len() - palette.has_transparent_slot() as usize;
        if opaque_slots == 0 {
            return Err(QuantizeError::invalid(
                "palette has no opaque color to match against",
            ));
        }
        Ok(Self {
            palette,
            cache: HashMap::new(),
        })
    }

    #[inline]
    pub fn palette(&self) -> &'a Palette {
        self.palette
    }

    /// Index of the palette slot closest to `color`.
    pub fn lookup(&mut self, color: Rgb) -> u8 {
        if let Some(&idx) = self.cache.get(&color) {
            return idx;
        }
        let idx = self.lookup_uncached(color);
        if self.cache.len() >= CACHE_LIMIT {
            self.cache.clear();
        }
        self.cache.insert(color, idx);
        idx
    }

    /// Same as [`lookup`](Self::lookup) without touching the cache.
    pub fn lookup_uncached(&self, color: Rgb) -> u8 {
        // `new` guarantees an opaque slot, and palettes hold at most 256 slots.
        self.palette.nearest(color).unwrap_or(0) as u8
    }

    /// Number of memoized colors.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

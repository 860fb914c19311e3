//! Palettes and nearest-color matching.
//!
//! [`PaletteBuilder`] turns a frequency table into a [`Palette`], either in
//! canonical color order or in the popcount-permuted order described in
//! [`PermutationTable`]. [`NearestColorIndex`] maps arbitrary colors onto
//! the slots of a palette.

mod builder;
mod nearest;
mod palette;
mod permutation;

pub use builder::PaletteBuilder;
pub use nearest::NearestColorIndex;
pub use palette::{Palette, PaletteOrdering, MAX_PALETTE_SLOTS};
pub use permutation::PermutationTable;

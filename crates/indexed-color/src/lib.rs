//! indexed-color: reduce full-color rasters to indexed palettes
//!
//! This library builds a frequency table of the opaque colors in a raster,
//! reduces it with frequency-weighted median cut, assigns palette slots and
//! maps every pixel to a slot, optionally diffusing the quantization error.
//!
//! # Quick Start
//!
//! The [`Quantizer`] builder runs the whole pipeline:
//!
//! ```
//! use indexed_color::{DiffusionLevel, Quantizer, Rgba, RgbaImage};
//!
//! let image = RgbaImage::from_fn(16, 16, |x, y| Rgba::new(x as u8 * 16, y as u8 * 16, 64, 255));
//! let result = Quantizer::new(8)
//!     .strategy(DiffusionLevel::Least.into())
//!     .quantize(&image)
//!     .unwrap();
//!
//! assert_eq!(result.indices().len(), 16 * 16);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! PixelSource ──> ColorFrequencyTable ──> MedianCutReducer ──> PaletteBuilder
//!      │                                                            │
//!      └──────────────> quantize(source, palette, strategy) <───────┘
//!                                  │
//!                          IndexRows (lazy, one Vec<u8> per scanline)
//! ```
//!
//! Each stage is usable on its own:
//!
//! ```
//! use indexed_color::{
//!     quantize, ColorFrequencyTable, MedianCutReducer, PaletteBuilder, Rgba, RgbaImage,
//!     Strategy,
//! };
//!
//! let image = RgbaImage::from_fn(4, 4, |x, _| Rgba::new(x as u8 * 60, 0, 0, 255));
//! let table = ColorFrequencyTable::from_raster(&image);
//! let reduced = MedianCutReducer::reduce(&table, 2).unwrap();
//! let palette = PaletteBuilder::new().build(&reduced).unwrap();
//!
//! for row in quantize(&image, &palette, &Strategy::NearestNeighbor).unwrap() {
//!     assert_eq!(row.len(), 4);
//! }
//! ```
//!
//! # Transparency
//!
//! Only pixels with alpha above 128 are counted into a table. A palette can
//! reserve slot 0 for transparency; the quantizer then maps every other
//! pixel to that slot.
//!
//! # Slot Ordering
//!
//! Canonical palettes list colors in ascending red, green, blue order.
//! Optimized palettes place the least frequent colors in the slots with the
//! fewest set bits (see [`PermutationTable`]), which tends to help the
//! compressor of indexed formats.

pub mod api;
pub mod color;
pub mod dither;
pub mod error;
pub mod output;
pub mod palette;
pub mod raster;
pub mod table;

#[cfg(test)]
mod domain_tests;

pub use api::Quantizer;
pub use color::{Axis, Rgb, Rgba, ALPHA_THRESHOLD};
pub use dither::{quantize, DiffusionLevel, IndexRows, Kernel, Strategy};
pub use error::QuantizeError;
pub use output::IndexedImage;
pub use palette::{
    NearestColorIndex, Palette, PaletteBuilder, PaletteOrdering, PermutationTable,
    MAX_PALETTE_SLOTS,
};
pub use raster::{PixelSource, RgbaImage, Rows};
pub use table::{ColorFrequencyTable, MedianCutReducer};

//! Output types for the quantization pipeline.
//!
//! [`IndexedImage`] stores palette indices with dimension metadata and an
//! owned [`Palette`](crate::palette::Palette). RGBA pixels are computed on
//! demand.

mod indexed_image;

pub use indexed_image::IndexedImage;

//! Color frequency tables and their median-cut reduction.
//!
//! A [`ColorFrequencyTable`] records how often each opaque color occurs in
//! one or more rasters. [`MedianCutReducer`] shrinks such a table to a target
//! number of frequency-weighted representative colors.

mod frequency;
mod median_cut;
mod text;

pub use frequency::ColorFrequencyTable;
pub use median_cut::MedianCutReducer;

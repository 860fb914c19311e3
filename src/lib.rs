//! palcut - reduce PNG images to indexed palettes
//!
//! Command-line front end for the `indexed-color` crate.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;

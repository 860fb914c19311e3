//! High-level API: the [`Quantizer`] builder.

mod builder;

pub use builder::Quantizer;

pub mod pipeline;

pub use pipeline::{palette_lines, HistogramSummary, QuantizePipeline, QuantizeReport};

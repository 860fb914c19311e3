use std::path::Path;

use indexed_color::{ColorFrequencyTable, IndexedImage, Palette, Quantizer, RgbaImage};
use serde::Serialize;

use crate::error::AppError;
use crate::models::AppConfig;
use crate::rendering::{encode_indexed_png, read_png, recompress};

/// Summary of one `quantize` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantizeReport {
    pub width: usize,
    pub height: usize,
    /// Distinct opaque colors in the source
    pub source_colors: usize,
    /// Palette slots written to the PLTE chunk
    pub palette_slots: usize,
    pub bit_depth: u8,
    pub size_bytes: usize,
}

/// The `--json` output of `histogram`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistogramSummary {
    /// Number of distinct opaque colors
    pub distinct: usize,
    /// Number of opaque pixels
    pub total: u64,
}

impl From<&ColorFrequencyTable> for HistogramSummary {
    fn from(table: &ColorFrequencyTable) -> Self {
        Self {
            distinct: table.len(),
            total: table.total_count(),
        }
    }
}

/// Pipeline that orchestrates decode → quantize → encode
pub struct QuantizePipeline {
    config: AppConfig,
}

impl QuantizePipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The core quantizer for the current settings.
    ///
    /// With a transparent slot only 255 slots remain for colors, so
    /// `max_colors` is capped accordingly.
    pub fn quantizer(&self) -> Quantizer {
        let max_colors = if self.config.transparent {
            self.config.max_colors.min(255)
        } else {
            self.config.max_colors
        };
        Quantizer::new(max_colors)
            .transparent_slot(self.config.transparent)
            .optimize_ordering(self.config.optimize_order)
            .strategy(self.config.dither.strategy())
    }

    /// Quantize a decoded image.
    pub fn quantize_image(&self, image: &RgbaImage) -> Result<IndexedImage, AppError> {
        Ok(self.quantizer().quantize(image)?)
    }

    /// Quantize a decoded image and encode it as an indexed PNG.
    pub fn quantize_to_png(&self, image: &RgbaImage) -> Result<(Vec<u8>, IndexedImage), AppError> {
        let indexed = self.quantize_image(image)?;
        let png_bytes = encode_indexed_png(&indexed)?;
        let png_bytes = if self.config.recompress {
            recompress(png_bytes)
        } else {
            png_bytes
        };
        Ok((png_bytes, indexed))
    }

    /// Read `input`, quantize it and write the indexed PNG to `output`.
    pub fn quantize_file(&self, input: &Path, output: &Path) -> Result<QuantizeReport, AppError> {
        let image = read_png(input)?;
        let source_colors = ColorFrequencyTable::from_raster(&image).len();
        let (png_bytes, indexed) = self.quantize_to_png(&image)?;
        std::fs::write(output, &png_bytes).map_err(|e| AppError::io(output, e))?;

        let report = QuantizeReport {
            width: indexed.width(),
            height: indexed.height(),
            source_colors,
            palette_slots: indexed.palette().len(),
            bit_depth: indexed.palette().bit_depth(),
            size_bytes: png_bytes.len(),
        };
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            width = report.width,
            height = report.height,
            source_colors = report.source_colors,
            palette_slots = report.palette_slots,
            size_bytes = report.size_bytes,
            "Quantized image"
        );
        Ok(report)
    }

    /// Frequency table of the opaque pixels of `input`.
    pub fn histogram_file(&self, input: &Path) -> Result<ColorFrequencyTable, AppError> {
        let image = read_png(input)?;
        Ok(ColorFrequencyTable::from_raster(&image))
    }

    /// Palette that `quantize` would use for `input`.
    pub fn palette_file(&self, input: &Path) -> Result<Palette, AppError> {
        let image = read_png(input)?;
        Ok(self.quantizer().palette_for(&image)?)
    }
}

/// One line per palette slot: `#rrggbb`, or `transparent` for a reserved
/// transparent slot.
pub fn palette_lines(palette: &Palette) -> Vec<String> {
    palette
        .colors()
        .iter()
        .enumerate()
        .map(|(i, color)| {
            if palette.is_transparent(i) {
                "transparent".to_string()
            } else {
                color.to_hex()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DitherSetting;
    use indexed_color::{Rgb, Rgba};
    use pretty_assertions::assert_eq;

    fn config(max_colors: usize, transparent: bool) -> AppConfig {
        AppConfig {
            max_colors,
            dither: DitherSetting::None,
            transparent,
            optimize_order: false,
            recompress: false,
        }
    }

    #[test]
    fn test_palette_lines() {
        let palette = Palette::new(vec![Rgb::new(255, 0, 16), Rgb::new(0, 0, 0)], true).unwrap();
        assert_eq!(
            palette_lines(&palette),
            vec!["transparent", "#ff0010", "#000000"]
        );
    }

    #[test]
    fn test_transparent_caps_max_colors() {
        // 256 distinct colors with a transparent slot must still fit.
        let image = RgbaImage::from_fn(16, 16, |x, y| {
            Rgba::new((x * 16) as u8, (y * 16) as u8, 0, 255)
        });
        let pipeline = QuantizePipeline::new(config(256, true));
        let indexed = pipeline.quantize_image(&image).unwrap();
        assert!(indexed.palette().len() <= 256);
        assert_eq!(indexed.palette().transparent_index(), Some(0));
    }

    #[test]
    fn test_quantize_to_png_without_recompress() {
        let image = RgbaImage::from_fn(5, 4, |x, _| Rgba::new(x as u8 * 50, 0, 0, 255));
        let pipeline = QuantizePipeline::new(config(2, false));
        let (png_bytes, indexed) = pipeline.quantize_to_png(&image).unwrap();
        assert_eq!(&png_bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(indexed.palette().len(), 2);
    }

    #[test]
    fn test_histogram_summary() {
        let mut table = ColorFrequencyTable::new();
        table.add(1, 2, 3, 5).unwrap();
        table.add(3, 2, 1, 1).unwrap();
        let summary = HistogramSummary::from(&table);
        assert_eq!(
            serde_json::to_string(&summary).unwrap(),
            r#"{"distinct":2,"total":6}"#
        );
    }
}

//! Assertion helpers for tests.

use std::collections::HashSet;
use std::path::Path;

use indexed_color::{PixelSource, Rgba, RgbaImage};
use palcut::rendering::decode_png;
use pretty_assertions::assert_eq;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Header facts of an encoded PNG
#[derive(Debug)]
pub struct PngHeader {
    pub width: u32,
    pub height: u32,
    pub color_type: png::ColorType,
    pub bit_depth: png::BitDepth,
    pub palette_len: Option<usize>,
    pub trns: Option<Vec<u8>>,
}

/// Assert bytes start with the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(PNG_SIGNATURE),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Read the header of the PNG at `path` without expanding its pixels
pub fn read_header(path: &Path) -> PngHeader {
    let bytes = std::fs::read(path).expect("Failed to read output PNG");
    assert_png(&bytes);
    let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    let reader = decoder.read_info().expect("Failed to read PNG header");
    let info = reader.info();
    PngHeader {
        width: info.width,
        height: info.height,
        color_type: info.color_type,
        bit_depth: info.bit_depth,
        palette_len: info.palette.as_ref().map(|p| p.len() / 3),
        trns: info.trns.as_ref().map(|t| t.to_vec()),
    }
}

/// Decode the PNG at `path` to RGBA
pub fn read_pixels(path: &Path) -> RgbaImage {
    let bytes = std::fs::read(path).expect("Failed to read output PNG");
    decode_png(&bytes).expect("Output should decode")
}

/// Assert an image uses at most `max` distinct colors
pub fn assert_color_count_at_most(image: &RgbaImage, max: usize) {
    let distinct: HashSet<Rgba> = image.pixels().iter().copied().collect();
    assert!(
        distinct.len() <= max,
        "Expected at most {} colors, found {}",
        max,
        distinct.len()
    );
}

/// Assert two images have identical dimensions and pixels
pub fn assert_same_pixels(actual: &RgbaImage, expected: &RgbaImage) {
    assert_eq!(
        (actual.width(), actual.height()),
        (expected.width(), expected.height()),
        "Image dimensions differ"
    );
    assert_eq!(actual.pixels(), expected.pixels());
}

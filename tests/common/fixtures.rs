//! Test fixtures: source images and a scratch directory to write them to.

use std::path::{Path, PathBuf};

use indexed_color::{PixelSource, Rgba, RgbaImage};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Scratch directory removed when dropped
pub struct TestDir {
    dir: tempfile::TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `image` as an 8-bit RGBA PNG and return its path.
    pub fn write_png(&self, name: &str, image: &RgbaImage) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, rgba_png(image)).expect("Failed to write fixture PNG");
        path
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("Failed to write fixture file");
        path
    }
}

/// Encode an image as a truecolor PNG with alpha.
pub fn rgba_png(image: &RgbaImage) -> Vec<u8> {
    let data: Vec<u8> = image
        .pixels()
        .iter()
        .flat_map(|p| [p.r, p.g, p.b, p.a])
        .collect();
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width() as u32, image.height() as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("Failed to write PNG header");
        writer
            .write_image_data(&data)
            .expect("Failed to write PNG data");
    }
    buf
}

/// Smooth red/green gradient with a constant blue channel.
pub fn gradient(width: usize, height: usize) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba::new(
            (x * 255 / (width - 1).max(1)) as u8,
            (y * 255 / (height - 1).max(1)) as u8,
            96,
            255,
        )
    })
}

/// Uniformly random opaque pixels from a fixed seed.
pub fn noise(width: usize, height: usize, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbaImage::from_fn(width, height, |_, _| {
        Rgba::new(rng.gen(), rng.gen(), rng.gen(), 255)
    })
}

/// Four flat quadrants: red, green, blue and white.
pub fn quadrants(width: usize, height: usize) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        match (x < width / 2, y < height / 2) {
            (true, true) => Rgba::new(255, 0, 0, 255),
            (false, true) => Rgba::new(0, 255, 0, 255),
            (true, false) => Rgba::new(0, 0, 255, 255),
            (false, false) => Rgba::new(255, 255, 255, 255),
        }
    })
}

/// `image` with a one-pixel fully transparent border.
pub fn with_transparent_border(image: &RgbaImage) -> RgbaImage {
    let (w, h) = (image.width(), image.height());
    RgbaImage::from_fn(w, h, |x, y| {
        if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
            Rgba::new(0, 0, 0, 0)
        } else {
            image.pixel(x, y)
        }
    })
}

pub fn exists(path: &Path) -> bool {
    path.metadata().map(|m| m.len() > 0).unwrap_or(false)
}

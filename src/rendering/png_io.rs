use crate::error::AppError;
use indexed_color::{IndexedImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Read and decode a PNG file.
pub fn read_png(path: &Path) -> Result<RgbaImage, AppError> {
    let bytes = std::fs::read(path).map_err(|e| AppError::io(path, e))?;
    let image = decode_png(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        size_bytes = bytes.len(),
        "Read PNG"
    );
    Ok(image)
}

/// Decode PNG bytes of any color type and bit depth to 8-bit RGBA.
///
/// Palette and low-bit-depth images are expanded, 16-bit channels are
/// stripped to 8 bits and a tRNS chunk becomes an alpha channel.
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, AppError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let data = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(AppError::UnsupportedPng(format!(
            "unexpected bit depth {:?} after expansion",
            info.bit_depth
        )));
    }

    let pixels: Vec<Rgba> = match info.color_type {
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
            .collect(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .map(|p| Rgba::new(p[0], p[1], p[2], 255))
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .map(|p| Rgba::new(p[0], p[0], p[0], p[1]))
            .collect(),
        png::ColorType::Grayscale => data.iter().map(|&v| Rgba::new(v, v, v, 255)).collect(),
        png::ColorType::Indexed => {
            return Err(AppError::UnsupportedPng(
                "indexed data was not expanded".to_string(),
            ))
        }
    };

    Ok(RgbaImage::new(
        pixels,
        info.width as usize,
        info.height as usize,
    )?)
}

/// Encode an indexed image as a palette PNG.
///
/// The bit depth is the smallest of 1, 2, 4 or 8 that addresses every
/// palette slot. A reserved transparent slot is written as a one-entry
/// tRNS chunk with alpha 0.
pub fn encode_indexed_png(image: &IndexedImage) -> Result<Vec<u8>, AppError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(AppError::UnsupportedPng(format!(
            "cannot encode a {}x{} image",
            image.width(),
            image.height()
        )));
    }
    let width = u32::try_from(image.width())
        .map_err(|_| AppError::UnsupportedPng(format!("width {} is too large", image.width())))?;
    let height = u32::try_from(image.height()).map_err(|_| {
        AppError::UnsupportedPng(format!("height {} is too large", image.height()))
    })?;

    let palette = image.palette();
    let (depth, bits) = match palette.bit_depth() {
        1 => (png::BitDepth::One, 1),
        2 => (png::BitDepth::Two, 2),
        3..=4 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    };
    let plte = palette.to_rgb_bytes();
    let trns = palette.transparent_index().map(|_| [0u8]);
    let packed = if bits == 8 {
        image.indices().to_vec()
    } else {
        pack_nbits(image.indices(), width, bits)
    };

    let png_bytes = encode_png(
        width,
        height,
        depth,
        &plte,
        trns.as_ref().map(|t| &t[..]),
        &packed,
    )?;
    tracing::debug!(
        width,
        height,
        bits,
        palette = palette.len(),
        size_bytes = png_bytes.len(),
        "Encoded indexed PNG"
    );
    Ok(png_bytes)
}

/// Re-compress with oxipng (zopfli + adaptive filter selection). Falls back
/// to the input if oxipng fails.
pub fn recompress(png_bytes: Vec<u8>) -> Vec<u8> {
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => {
            tracing::debug!(
                before = png_bytes.len(),
                after = optimized.len(),
                "Recompressed PNG"
            );
            optimized
        }
        Err(e) => {
            tracing::warn!(%e, "oxipng failed, keeping unoptimized PNG");
            png_bytes
        }
    }
}

/// Encode packed palette indices as a PNG (fast settings, oxipng may
/// re-compress afterwards).
fn encode_png(
    width: u32,
    height: u32,
    bit_depth: png::BitDepth,
    plte: &[u8],
    trns: Option<&[u8]>,
    packed: &[u8],
) -> Result<Vec<u8>, AppError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        encoder.set_palette(plte);
        if let Some(trns) = trns {
            encoder.set_trns(trns);
        }
        let mut writer = encoder.write_header()?;
        writer.write_image_data(packed)?;
    }
    Ok(buf.into_inner())
}

/// Pack palette indices into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / width as usize;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}

//! Domain-critical regression tests for indexed-color.
//!
//! These tests cover whole-pipeline behavior rather than single modules.
//! Each test documents the regression it guards against.

#[cfg(test)]
mod domain_tests {
    use crate::api::Quantizer;
    use crate::color::{Rgb, Rgba};
    use crate::dither::{quantize, DiffusionLevel, Kernel, Strategy};
    use crate::palette::{Palette, PaletteBuilder};
    use crate::raster::{PixelSource, RgbaImage};
    use crate::table::{ColorFrequencyTable, MedianCutReducer};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn seven_by_seven() -> RgbaImage {
        RgbaImage::from_fn(7, 7, |x, y| {
            Rgba::new(x as u8 * 30, y as u8 * 30, (x + y) as u8, 255)
        })
    }

    fn noise_image(seed: u64, width: usize, height: usize) -> RgbaImage {
        let mut rng = StdRng::seed_from_u64(seed);
        RgbaImage::from_fn(width, height, |_, _| {
            Rgba::new(rng.gen(), rng.gen(), rng.gen(), 255)
        })
    }

    fn kernels() -> Vec<Kernel> {
        vec![
            Kernel::sierra_lite(),
            Kernel::floyd_steinberg(),
            Kernel::jarvis_judice_ninke(),
        ]
    }

    // ========================================================================
    // Median cut on a known image
    // ========================================================================

    /// If this breaks, it means: the split order (red first, left half gets
    /// the floor), the tie-break on green, or the truncating weighted mean
    /// changed. Worked out by hand:
    ///
    /// - sorted by red, the left 24 pixels are columns 0..=2 plus column 3
    ///   rows 0..=2 (ties on red fall through to green)
    /// - left:  red 900/24, green 1980/24, blue 96/24  -> (37, 82, 4)
    /// - right: red 3510/25, green 2430/25, blue 198/25 -> (140, 97, 7)
    #[test]
    fn test_seven_by_seven_reduced_to_two() {
        let table = ColorFrequencyTable::from_raster(&seven_by_seven());
        assert_eq!(table.len(), 49);
        assert_eq!(table.total_count(), 49);

        let reduced = MedianCutReducer::reduce(&table, 2).unwrap();
        assert_eq!(
            reduced.to_string(),
            "ColorFrequencyTable[(37,82,4)x24,(140,97,7)x25]"
        );
    }

    /// If this breaks, it means: the palette built from the reduced 7x7
    /// table no longer maps the dark corner and the bright corner to
    /// different slots.
    #[test]
    fn test_seven_by_seven_nearest_neighbor() {
        let image = seven_by_seven();
        let result = Quantizer::new(2)
            .optimize_ordering(false)
            .strategy(Strategy::NearestNeighbor)
            .quantize(&image)
            .unwrap();
        assert_eq!(
            result.palette().colors(),
            &[Rgb::new(37, 82, 4), Rgb::new(140, 97, 7)]
        );
        let rows: Vec<&[u8]> = result.rows().collect();
        assert_eq!(rows[0][0], 0);
        assert_eq!(rows[6][6], 1);
    }

    // ========================================================================
    // Conservation through the whole pipeline
    // ========================================================================

    /// If this breaks, it means: reduction dropped or double counted pixels,
    /// so the palette is weighted by the wrong frequencies.
    #[test]
    fn test_reduction_conserves_pixels_for_every_target() {
        let image = noise_image(11, 40, 40);
        let table = ColorFrequencyTable::from_raster(&image);
        for max in [2, 3, 7, 64, 255, 256, 2000] {
            let reduced = MedianCutReducer::reduce(&table, max).unwrap();
            assert_eq!(reduced.total_count(), 1600, "max_colors = {max}");
            assert!(reduced.len() <= max);
        }
    }

    // ========================================================================
    // Valid indices for all palette sizes and strategies
    // ========================================================================

    /// If this breaks, it means: a strategy produced an index outside the
    /// palette, or mapped an opaque pixel onto the reserved transparent slot.
    #[test]
    fn test_valid_indices_for_all_palette_sizes() {
        let image = noise_image(3, 24, 24);
        let mut strategies = vec![Strategy::NearestNeighbor];
        strategies.extend(kernels().into_iter().map(Strategy::ErrorDiffusion));

        for max in [2, 3, 4, 15, 16, 17, 100, 255] {
            for transparent in [false, true] {
                for optimize in [false, true] {
                    let quantizer = Quantizer::new(max)
                        .transparent_slot(transparent)
                        .optimize_ordering(optimize);
                    let palette = quantizer.palette_for(&image).unwrap();
                    for strategy in &strategies {
                        for row in quantize(&image, &palette, strategy).unwrap() {
                            assert_eq!(row.len(), 24);
                            for idx in row {
                                assert!((idx as usize) < palette.len());
                                assert!(!palette.is_transparent(idx as usize));
                            }
                        }
                    }
                }
            }
        }
    }

    // ========================================================================
    // Determinism
    // ========================================================================

    /// If this breaks, it means: some stage depends on hash iteration order
    /// or another source of nondeterminism.
    #[test]
    fn test_pipeline_is_deterministic() {
        let image = noise_image(5, 32, 20);
        for level in [DiffusionLevel::Least, DiffusionLevel::Medium, DiffusionLevel::Most] {
            let quantizer = Quantizer::new(12).strategy(level.into());
            let a = quantizer.quantize(&image).unwrap();
            let b = quantizer.quantize(&image).unwrap();
            assert_eq!(a.indices(), b.indices());
            assert_eq!(a.palette(), b.palette());
        }
    }

    // ========================================================================
    // Exactness when nothing needs reducing
    // ========================================================================

    /// If this breaks, it means: an image that already fits in the palette
    /// no longer round-trips exactly through quantization.
    #[test]
    fn test_few_colors_reproduce_exactly() {
        let colors = [
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(17, 17, 17),
            Rgb::new(240, 240, 240),
        ];
        let image = RgbaImage::from_fn(10, 10, |x, y| Rgba::opaque(colors[(x * 3 + y) % 5]));
        for strategy in [Strategy::NearestNeighbor, Strategy::default()] {
            let result = Quantizer::new(8).strategy(strategy).quantize(&image).unwrap();
            let expected: Vec<u8> = image
                .pixels()
                .iter()
                .flat_map(|p| [p.r, p.g, p.b, p.a])
                .collect();
            assert_eq!(result.to_rgba(), expected);
        }
    }

    // ========================================================================
    // Optimized ordering
    // ========================================================================

    /// If this breaks, it means: the optimized palette no longer gives the
    /// most frequent color the slot with the most set bits.
    #[test]
    fn test_optimized_ordering_gives_most_frequent_color_densest_slot() {
        let mut table = ColorFrequencyTable::new();
        table.add(10, 10, 10, 1).unwrap();
        table.add(20, 20, 20, 5).unwrap();
        table.add(30, 30, 30, 50).unwrap();
        table.add(40, 40, 40, 500).unwrap();

        let palette = PaletteBuilder::new().optimize_ordering(true).build(&table).unwrap();
        assert_eq!(palette.len(), 4);
        assert_eq!(palette.color(0), Rgb::new(10, 10, 10));
        assert_eq!(palette.color(3), Rgb::new(40, 40, 40));
    }

    /// If this breaks, it means: padding slots of an optimized palette hold
    /// a color that does not belong to the image.
    #[test]
    fn test_optimized_padding_repeats_first_opaque_slot() {
        let mut table = ColorFrequencyTable::new();
        for i in 0..5 {
            table.add(i * 40, 0, 0, i + 1).unwrap();
        }
        let palette = PaletteBuilder::new().optimize_ordering(true).build(&table).unwrap();
        assert_eq!(palette.len(), 8);
        let used: Vec<Rgb> = table.ordered_colors();
        for &c in palette.colors() {
            assert!(used.contains(&c));
        }
    }

    /// If this breaks, it means: with a transparent slot, padding slots of an
    /// optimized palette became opaque black and captured dark pixels.
    #[test]
    fn test_transparent_padding_does_not_capture_dark_pixels() {
        let image = RgbaImage::from_fn(2, 2, |x, y| match (x, y) {
            (0, 0) => Rgba::new(4, 4, 4, 255),
            (1, 0) => Rgba::new(36, 36, 36, 255),
            (0, 1) => Rgba::new(200, 200, 200, 255),
            _ => Rgba::new(220, 220, 220, 255),
        });
        let result = Quantizer::new(2)
            .transparent_slot(true)
            .strategy(Strategy::NearestNeighbor)
            .quantize(&image)
            .unwrap();

        let palette = result.palette();
        assert_eq!(palette.len(), 4);
        assert_eq!(palette.color(1), Rgb::new(20, 20, 20));
        assert_eq!(palette.color(2), Rgb::new(210, 210, 210));
        assert_eq!(result.indices(), &[1, 1, 2, 2]);
        assert_eq!(
            &result.to_rgba()[..4],
            &[20, 20, 20, 255],
            "REGRESSION: dark pixel rendered from a padding slot"
        );
    }

    // ========================================================================
    // Error diffusion tone
    // ========================================================================

    /// If this breaks, it means: error diffusion lost or amplified error,
    /// so a flat 25% gray no longer dithers to about a quarter white pixels.
    #[test]
    fn test_error_diffusion_preserves_mean_tone() {
        let palette = Palette::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)], false).unwrap();
        let size = 32;
        let image = RgbaImage::from_fn(size, size, |_, _| Rgba::new(64, 64, 64, 255));
        for kernel in kernels() {
            let white = quantize(&image, &palette, &Strategy::ErrorDiffusion(kernel.clone()))
                .unwrap()
                .flatten()
                .filter(|&idx| idx == 1)
                .count();
            let ratio = white as f64 / (size * size) as f64;
            assert!(
                (ratio - 0.25).abs() < 0.05,
                "REGRESSION: {kernel:?} produced {ratio:.3} white, expected ~0.25"
            );
        }
    }

    /// If this breaks, it means: nearest-neighbor mapping started carrying
    /// state between pixels.
    #[test]
    fn test_nearest_neighbor_is_stateless() {
        let palette = Palette::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)], false).unwrap();
        let image = RgbaImage::from_fn(16, 16, |_, _| Rgba::new(100, 100, 100, 255));
        let all_black = quantize(&image, &palette, &Strategy::NearestNeighbor)
            .unwrap()
            .flatten()
            .all(|idx| idx == 0);
        assert!(all_black);
    }

    // ========================================================================
    // Streaming
    // ========================================================================

    /// If this breaks, it means: rows are no longer produced lazily in
    /// scanline order, or a partial read disturbs the remaining rows.
    #[test]
    fn test_rows_stream_in_order() {
        let image = noise_image(9, 13, 9);
        let palette = Quantizer::new(6).palette_for(&image).unwrap();
        let strategy = Strategy::ErrorDiffusion(Kernel::jarvis_judice_ninke());

        let collected: Vec<Vec<u8>> = quantize(&image, &palette, &strategy).unwrap().collect();
        let mut rows = quantize(&image, &palette, &strategy).unwrap();
        assert_eq!(rows.len(), image.height());
        for expected in &collected {
            assert_eq!(rows.next().as_ref(), Some(expected));
        }
        assert_eq!(rows.next(), None);
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// If this breaks, it means: merging tables of several frames no longer
    /// produces the same palette as one table over all pixels.
    #[test]
    fn test_merged_tables_match_combined_raster() {
        let a = noise_image(21, 10, 10);
        let b = noise_image(22, 10, 10);

        let mut merged = ColorFrequencyTable::from_raster(&a);
        merged.merge(&ColorFrequencyTable::from_raster(&b)).unwrap();

        let mut combined = ColorFrequencyTable::new();
        combined.add_from_raster(&a).unwrap();
        combined.add_from_raster(&b).unwrap();

        assert_eq!(merged, combined);
        assert_eq!(
            MedianCutReducer::reduce(&merged, 16).unwrap(),
            MedianCutReducer::reduce(&combined, 16).unwrap()
        );
    }
}

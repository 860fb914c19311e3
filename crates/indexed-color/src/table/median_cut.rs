//! Frequency-weighted median-cut color reduction.
//!
//! The table is flattened once into a single `Vec` and split recursively in
//! place: every level sorts its sub-slice along one axis, halves it by color
//! count and recurses into the two halves with `split_at_mut`. No container is
//! built per level.
//!
//! ```text
//!   level 0: sort by red   -> [ left half | right half ]
//!   level 1: sort by green -> [ ll | lr ]   [ rl | rr ]
//!   level 2: sort by blue  -> ...
//! ```
//!
//! The axis cycles red, green, blue regardless of the spread of each
//! cluster. Each leaf emits the frequency-weighted mean of its colors.

use super::frequency::ColorFrequencyTable;
use crate::color::{Axis, Rgb};
use crate::error::QuantizeError;

/// Median-cut reducer.
///
/// # Example
///
/// ```
/// use indexed_color::{ColorFrequencyTable, MedianCutReducer};
///
/// let mut table = ColorFrequencyTable::new();
/// for v in 0..10 {
///     table.add(v * 20, 0, 0, 1).unwrap();
/// }
///
/// let reduced = MedianCutReducer::reduce(&table, 4).unwrap();
/// assert_eq!(reduced.len(), 4);
/// assert_eq!(reduced.total_count(), table.total_count());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianCutReducer;

impl MedianCutReducer {
    /// Reduce `table` to at most `max_colors` weighted-average colors.
    ///
    /// Tables that already fit are returned unchanged. The total occurrence
    /// count is conserved exactly. Distinct clusters whose means coincide
    /// collapse into one entry, so the result may hold fewer than
    /// `max_colors` colors.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::InvalidArgument`] if `max_colors < 2`.
    pub fn reduce(
        table: &ColorFrequencyTable,
        max_colors: usize,
    ) -> Result<ColorFrequencyTable, QuantizeError> {
        if max_colors < 2 {
            return Err(QuantizeError::invalid(format!(
                "max_colors must be at least 2, got {max_colors}"
            )));
        }
        if table.len() <= max_colors {
            return Ok(table.clone());
        }

        let mut entries: Vec<(Rgb, u64)> = table.iter().collect();
        let mut reduced = ColorFrequencyTable::new();
        split(&mut entries, max_colors, Axis::Red, &mut reduced);

        tracing::debug!(
            input_colors = table.len(),
            output_colors = reduced.len(),
            max_colors,
            pixels = reduced.total_count(),
            "Median cut finished"
        );
        Ok(reduced)
    }
}

/// Split `entries` into `target` clusters along `axis`.
///
/// Requires `entries.len() >= target >= 1`. The root call satisfies this
/// because the table is larger than `max_colors`; halving both sides with
/// floor on the left keeps it true at every level.
fn split(entries: &mut [(Rgb, u64)], target: usize, axis: Axis, out: &mut ColorFrequencyTable) {
    debug_assert!(target >= 1 && entries.len() >= target);

    if target == 1 {
        let (mean, weight) = weighted_mean(entries);
        out.insert(mean, weight);
        return;
    }

    entries.sort_unstable_by(|a, b| axis.compare(a.0, b.0));

    let mid = entries.len() / 2;
    let (left, right) = entries.split_at_mut(mid);
    let next = axis.next();
    split(left, target / 2, next, out);
    split(right, target - target / 2, next, out);
}

/// Per-channel frequency-weighted mean with truncating division, and the
/// summed frequency of the cluster.
///
/// Sums are `u128`: a channel times a `u64` count, summed over a table whose
/// total fits in `u64`, stays below `2^72`.
fn weighted_mean(entries: &[(Rgb, u64)]) -> (Rgb, u64) {
    let mut sums = [0u128; 3];
    let mut weight = 0u128;
    for &(color, freq) in entries {
        let freq = freq as u128;
        sums[0] += color.r as u128 * freq;
        sums[1] += color.g as u128 * freq;
        sums[2] += color.b as u128 * freq;
        weight += freq;
    }
    // Each mean is bounded by the largest channel value in the cluster.
    let mean = Rgb::new(
        (sums[0] / weight) as u8,
        (sums[1] / weight) as u8,
        (sums[2] / weight) as u8,
    );
    (mean, weight as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_table(seed: u64, colors: usize) -> ColorFrequencyTable {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut table = ColorFrequencyTable::new();
        while table.len() < colors {
            table
                .add(
                    rng.gen_range(0..256),
                    rng.gen_range(0..256),
                    rng.gen_range(0..256),
                    rng.gen_range(1..50),
                )
                .unwrap();
        }
        table
    }

    #[test]
    fn test_rejects_max_colors_below_two() {
        let table = random_table(1, 10);
        assert!(matches!(
            MedianCutReducer::reduce(&table, 1),
            Err(QuantizeError::InvalidArgument(_))
        ));
        assert!(MedianCutReducer::reduce(&table, 0).is_err());
    }

    #[test]
    fn test_identity_when_table_fits() {
        let table = random_table(2, 16);
        assert_eq!(MedianCutReducer::reduce(&table, 16).unwrap(), table);
        assert_eq!(MedianCutReducer::reduce(&table, 200).unwrap(), table);
    }

    #[test]
    fn test_conserves_total_count() {
        for (seed, max) in [(3, 2), (4, 3), (5, 17), (6, 255), (7, 256)] {
            let table = random_table(seed, 400);
            let reduced = MedianCutReducer::reduce(&table, max).unwrap();
            assert_eq!(reduced.total_count(), table.total_count());
            assert!(reduced.len() <= max);
        }
    }

    #[test]
    fn test_deterministic() {
        let table = random_table(8, 1000);
        let a = MedianCutReducer::reduce(&table, 64).unwrap();
        let b = MedianCutReducer::reduce(&table, 64).unwrap();
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_weighted_mean_truncates() {
        let entries = [(Rgb::new(0, 0, 0), 1), (Rgb::new(255, 3, 1), 2)];
        // red: 510 / 3 = 170, green: 6 / 3 = 2, blue: 2 / 3 = 0
        assert_eq!(weighted_mean(&entries), (Rgb::new(170, 2, 0), 3));
    }

    #[test]
    fn test_split_by_count_not_frequency() {
        // One dominant dark color and three light ones: the split point is
        // the middle of the sorted list, whatever the frequencies are.
        let mut table = ColorFrequencyTable::new();
        table.add(0, 0, 0, 1000).unwrap();
        table.add(10, 0, 0, 1).unwrap();
        table.add(200, 0, 0, 1).unwrap();
        table.add(210, 0, 0, 1).unwrap();

        let reduced = MedianCutReducer::reduce(&table, 2).unwrap();
        // left: (0,0,0)x1000 + (10,0,0)x1 -> red 10/1001 = 0
        // right: (200,0,0) + (210,0,0)     -> red 205
        assert_eq!(
            reduced.to_string(),
            "ColorFrequencyTable[(0,0,0)x1001,(205,0,0)x2]"
        );
    }

    #[test]
    fn test_uneven_targets_give_left_the_floor_half() {
        // Five colors on the red axis into three clusters:
        // left = 2 colors -> 1 cluster, right = 3 colors -> 2 clusters.
        let mut table = ColorFrequencyTable::new();
        for r in [0, 10, 100, 200, 250] {
            table.add(r, 0, 0, 1).unwrap();
        }
        let reduced = MedianCutReducer::reduce(&table, 3).unwrap();
        // right half [100, 200, 250] is split on green (all zero), ties fall
        // through blue then red, so it stays in red order: [100] | [200, 250]
        assert_eq!(
            reduced.to_string(),
            "ColorFrequencyTable[(5,0,0)x2,(100,0,0),(225,0,0)x2]"
        );
    }

    #[test]
    fn test_coinciding_means_merge() {
        // left:  (1,0,0) + (1,0,1) -> (1, 0, 1/2)   = (1,0,0)
        // right: (1,1,0) + (2,0,0) -> (3/2, 1/2, 0) = (1,0,0)
        let mut table = ColorFrequencyTable::new();
        table.add(1, 0, 0, 1).unwrap();
        table.add(1, 0, 1, 1).unwrap();
        table.add(1, 1, 0, 1).unwrap();
        table.add(2, 0, 0, 1).unwrap();
        let reduced = MedianCutReducer::reduce(&table, 2).unwrap();
        assert_eq!(reduced.to_string(), "ColorFrequencyTable[(1,0,0)x4]");
    }

    #[test]
    fn test_huge_counts_do_not_overflow_mean() {
        let mut table = ColorFrequencyTable::new();
        table.add(255, 0, 0, i64::MAX).unwrap();
        table.add(0, 0, 0, 1).unwrap();
        table.add(10, 0, 0, 1).unwrap();
        let reduced = MedianCutReducer::reduce(&table, 2).unwrap();
        // right: (10 + 255 * (2^63 - 1)) / 2^63 truncates to 254
        assert_eq!(
            reduced.to_string(),
            "ColorFrequencyTable[(0,0,0),(254,0,0)x9223372036854775808]"
        );
        assert_eq!(reduced.total_count(), table.total_count());
    }
}

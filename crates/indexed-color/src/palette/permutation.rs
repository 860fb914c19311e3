//! Popcount-ordered slot permutations.
//!
//! For a bit depth `d`, the permutation lists every integer in `[0, 2^d)`
//! sorted by the number of set bits and then by value:
//!
//! ```text
//! d = 3:  0 | 1 2 4 | 3 5 6 | 7
//! ```
//!
//! The `i`-th color handed to the optimized palette lands in slot `π_d(i)`.
//! Tables are generated on first use and shared for the process lifetime.

use std::sync::OnceLock;

use crate::error::QuantizeError;

/// Smallest supported depth.
pub const MIN_DEPTH: u8 = 1;
/// Largest supported depth.
pub const MAX_DEPTH: u8 = 8;

static TABLES: OnceLock<Vec<PermutationTable>> = OnceLock::new();

/// A bijection on `[0, 2^depth)`.
///
/// # Example
///
/// ```
/// use indexed_color::PermutationTable;
///
/// let table = PermutationTable::for_depth(4).unwrap();
/// assert_eq!(
///     table.as_slice(),
///     &[0, 1, 2, 4, 8, 3, 5, 6, 9, 10, 12, 7, 11, 13, 14, 15]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationTable {
    depth: u8,
    order: Vec<u8>,
}

impl PermutationTable {
    /// The shared table for `depth`.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::InvalidArgument`] unless `1 <= depth <= 8`.
    pub fn for_depth(depth: u8) -> Result<&'static PermutationTable, QuantizeError> {
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
            return Err(QuantizeError::invalid(format!(
                "permutation depth must be between {MIN_DEPTH} and {MAX_DEPTH}, got {depth}"
            )));
        }
        let tables = TABLES.get_or_init(|| (MIN_DEPTH..=MAX_DEPTH).map(Self::generate).collect());
        Ok(&tables[(depth - MIN_DEPTH) as usize])
    }

    /// Smallest depth whose `2^depth` covers `slots`, if any.
    pub fn depth_for(slots: usize) -> Option<u8> {
        (MIN_DEPTH..=MAX_DEPTH).find(|&d| (1usize << d) >= slots)
    }

    fn generate(depth: u8) -> Self {
        let mut order: Vec<u8> = (0..(1u16 << depth)).map(|v| v as u8).collect();
        order.sort_by_key(|&v| (v.count_ones(), v));
        Self { depth, order }
    }

    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `π(i)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn get(&self, i: usize) -> usize {
        self.order[i] as usize
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.order
    }
}

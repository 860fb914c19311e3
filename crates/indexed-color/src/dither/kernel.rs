//! Error diffusion kernel definitions.
//!
//! A kernel is written as rows of integer weights. Row 0 lists the weights
//! of the pixels to the right of the current one, starting at `dx = 1`.
//! Every later row has an odd width and is centered under the current
//! column:
//!
//! ```text
//! Floyd-Steinberg:      X 7        [[7], [3, 5, 1]]
//!                     3 5 1
//! ```
//!
//! The divisor is the sum of all weights, so the full error is propagated.

use std::fmt;
use std::str::FromStr;

use crate::error::QuantizeError;

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`: `dx` is the horizontal offset (positive
/// is right), `dy` is the row offset (0 is the current row) and the share of
/// error passed on is `weight / divisor`.
///
/// # Buffer Sizing
///
/// `max_dy + 1` error rows are needed, each padded by `reach` cells on both
/// sides so that contributions outside the image can be written and
/// dropped without bounds checks.
///
/// # Example
///
/// ```
/// use indexed_color::Kernel;
///
/// let kernel = Kernel::new(&[&[7], &[3, 5, 1]]).unwrap();
/// assert_eq!(kernel, Kernel::floyd_steinberg());
/// assert_eq!(kernel.divisor(), 16);
/// assert_eq!(kernel.width(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    entries: Vec<(i32, usize, u32)>,
    divisor: u32,
    max_dy: usize,
    reach: usize,
}

impl Kernel {
    /// Build a kernel from its weight rows.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::InvalidArgument`] if there are no rows, a row below
    /// the first has an even width, or every weight is zero.
    pub fn new(rows: &[&[u32]]) -> Result<Self, QuantizeError> {
        let Some((first, below)) = rows.split_first() else {
            return Err(QuantizeError::invalid("kernel needs at least one row"));
        };

        let mut entries = Vec::new();
        let mut reach = first.len();
        for (dx, &weight) in first.iter().enumerate() {
            entries.push((dx as i32 + 1, 0, weight));
        }
        for (i, row) in below.iter().enumerate() {
            if row.len() % 2 == 0 {
                return Err(QuantizeError::invalid(format!(
                    "kernel row {} has even width {}; rows below the first must be centered",
                    i + 1,
                    row.len()
                )));
            }
            let half = row.len() / 2;
            reach = reach.max(half);
            for (j, &weight) in row.iter().enumerate() {
                entries.push((j as i32 - half as i32, i + 1, weight));
            }
        }

        entries.retain(|&(_, _, weight)| weight > 0);
        let divisor: u32 = entries.iter().map(|&(_, _, w)| w).sum();
        if divisor == 0 {
            return Err(QuantizeError::invalid("kernel weights must not all be zero"));
        }
        let max_dy = entries.iter().map(|&(_, dy, _)| dy).max().unwrap_or(0);

        Ok(Self {
            entries,
            divisor,
            max_dy,
            reach,
        })
    }

    /// Sierra Lite, 3 neighbors:
    ///
    /// ```text
    ///   X 2
    /// 1 1 0
    /// ```
    pub fn sierra_lite() -> Self {
        Self::from_preset(&[&[2], &[1, 1, 0]])
    }

    /// Floyd-Steinberg, 4 neighbors:
    ///
    /// ```text
    ///   X 7
    /// 3 5 1
    /// ```
    pub fn floyd_steinberg() -> Self {
        Self::from_preset(&[&[7], &[3, 5, 1]])
    }

    /// Jarvis-Judice-Ninke, 12 neighbors:
    ///
    /// ```text
    ///     X 7 5
    /// 3 5 7 5 3
    /// 1 3 5 3 1
    /// ```
    pub fn jarvis_judice_ninke() -> Self {
        Self::from_preset(&[&[7, 5], &[3, 5, 7, 5, 3], &[1, 3, 5, 3, 1]])
    }

    fn from_preset(rows: &[&[u32]]) -> Self {
        match Self::new(rows) {
            Ok(kernel) => kernel,
            Err(e) => unreachable!("preset kernel is invalid: {e}"),
        }
    }

    /// `(dx, dy, weight)` for every non-zero weight.
    #[inline]
    pub fn entries(&self) -> &[(i32, usize, u32)] {
        &self.entries
    }

    #[inline]
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Number of rows below the current one the kernel writes to.
    #[inline]
    pub fn max_dy(&self) -> usize {
        self.max_dy
    }

    /// Largest horizontal distance the kernel writes to.
    #[inline]
    pub fn reach(&self) -> usize {
        self.reach
    }

    /// Width of the footprint, `2 * reach + 1`.
    #[inline]
    pub fn width(&self) -> usize {
        2 * self.reach + 1
    }
}

/// The three kernel presets by strength of diffusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffusionLevel {
    /// Sierra Lite
    Least,
    /// Floyd-Steinberg
    #[default]
    Medium,
    /// Jarvis-Judice-Ninke
    Most,
}

impl DiffusionLevel {
    pub fn kernel(self) -> Kernel {
        match self {
            DiffusionLevel::Least => Kernel::sierra_lite(),
            DiffusionLevel::Medium => Kernel::floyd_steinberg(),
            DiffusionLevel::Most => Kernel::jarvis_judice_ninke(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiffusionLevel::Least => "least",
            DiffusionLevel::Medium => "medium",
            DiffusionLevel::Most => "most",
        }
    }
}

impl fmt::Display for DiffusionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffusionLevel {
    type Err = QuantizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "least" => Ok(DiffusionLevel::Least),
            "medium" => Ok(DiffusionLevel::Medium),
            "most" => Ok(DiffusionLevel::Most),
            other => Err(QuantizeError::invalid(format!(
                "unknown diffusion level '{other}' (expected least, medium or most)"
            ))),
        }
    }
}

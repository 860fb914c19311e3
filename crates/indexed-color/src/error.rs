//! Error type for the color-reduction pipeline.
//!
//! Every fallible operation in the crate returns [`QuantizeError`]. Errors are
//! raised at the point of detection and never recovered internally: callers
//! decide whether to retry with different parameters (a larger `max_colors`,
//! no transparent slot, ...).

use thiserror::Error;

/// Error type for color tables, palettes and quantizers.
///
/// # Example
///
/// ```
/// use indexed_color::{ColorFrequencyTable, QuantizeError};
///
/// let mut table = ColorFrequencyTable::new();
/// let err = table.add(300, 0, 0, 1).unwrap_err();
/// assert!(matches!(err, QuantizeError::InvalidArgument(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantizeError {
    /// A caller-supplied value is outside its allowed domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The color table does not fit in the requested palette.
    #[error("too many colors ({count}) for a palette (max is {max})")]
    TooManyColors {
        /// Number of distinct colors in the table
        count: usize,
        /// Number of slots available for those colors
        max: usize,
    },

    /// The canonical text form of a table could not be parsed.
    #[error("parse error at byte {position}: {message}")]
    Parse {
        /// Byte offset into the input where parsing failed
        position: usize,
        /// What the parser expected
        message: String,
    },
}

impl QuantizeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        QuantizeError::InvalidArgument(message.into())
    }

    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        QuantizeError::Parse {
            position,
            message: message.into(),
        }
    }
}

//! Color and pixel types.
//!
//! [`Rgb`] is the key type of every table and palette in the crate. Its
//! derived ordering compares red, then green, then blue, which is exactly the
//! canonical table order. [`Rgba`] is a source pixel as read from a raster.

use std::cmp::Ordering;
use std::fmt;

use crate::error::QuantizeError;

/// Pixels with an alpha value at or below this threshold are treated as
/// transparent. Only `a > ALPHA_THRESHOLD` counts as opaque.
pub const ALPHA_THRESHOLD: u8 = 128;

/// An opaque 8-bit-per-channel RGB color.
///
/// The derived `Ord` is lexicographic over `(r, g, b)`.
///
/// # Example
///
/// ```
/// use indexed_color::Rgb;
///
/// let teal = Rgb::new(0, 128, 128);
/// assert_eq!(teal.packed(), 0x008080);
/// assert_eq!(teal.to_hex(), "#008080");
/// assert!(Rgb::try_new(0, 256, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Black, also the payload of a reserved transparent palette slot.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from wide integer channels, rejecting anything outside
    /// `0..=255` with [`QuantizeError::InvalidArgument`].
    pub fn try_new(r: i64, g: i64, b: i64) -> Result<Self, QuantizeError> {
        Ok(Self {
            r: checked_channel("r", r)?,
            g: checked_channel("g", g)?,
            b: checked_channel("b", b)?,
        })
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// The color as `0xRRGGBB`.
    #[inline]
    pub fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Value of one channel.
    #[inline]
    pub fn channel(self, axis: Axis) -> u8 {
        match axis {
            Axis::Red => self.r,
            Axis::Green => self.g,
            Axis::Blue => self.b,
        }
    }

    /// Squared Euclidean distance in RGB space.
    #[inline]
    pub fn distance_squared(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Lowercase `#rrggbb` notation.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.r, self.g, self.b)
    }
}

fn checked_channel(name: &str, value: i64) -> Result<u8, QuantizeError> {
    u8::try_from(value).map_err(|_| {
        QuantizeError::invalid(format!("{name} must be between 0 and 255, got {value}"))
    })
}

/// A source pixel with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// A fully opaque pixel of the given color.
    #[inline]
    pub const fn opaque(color: Rgb) -> Self {
        Self::new(color.r, color.g, color.b, 255)
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// The color channels, ignoring alpha.
    #[inline]
    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// True when the pixel is more than 50% opaque (`a > 128`).
    ///
    /// Alpha is tested as stored; color channels are not un-premultiplied.
    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a > ALPHA_THRESHOLD
    }
}

/// A channel axis of the RGB cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Red,
    Green,
    Blue,
}

impl Axis {
    /// The next axis in the fixed red → green → blue → red cycle.
    #[inline]
    pub fn next(self) -> Axis {
        match self {
            Axis::Red => Axis::Green,
            Axis::Green => Axis::Blue,
            Axis::Blue => Axis::Red,
        }
    }

    /// Total order on colors keyed by this axis.
    ///
    /// Ties fall through to the next two axes in cycle order and finally to
    /// the packed color value, so sorting is fully deterministic.
    #[inline]
    pub fn compare(self, a: Rgb, b: Rgb) -> Ordering {
        let second = self.next();
        let third = second.next();
        a.channel(self)
            .cmp(&b.channel(self))
            .then_with(|| a.channel(second).cmp(&b.channel(second)))
            .then_with(|| a.channel(third).cmp(&b.channel(third)))
            .then_with(|| a.packed().cmp(&b.packed()))
    }
}

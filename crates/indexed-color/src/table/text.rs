//! Canonical text form of a [`ColorFrequencyTable`].
//!
//! ```text
//! ColorFrequencyTable[(r,g,b)xN,(r,g,b),...]
//! ```
//!
//! The `xN` suffix is omitted when a color occurs exactly once. This form is
//! meant for test fixtures and log output, not for persistence.

use std::fmt;
use std::str::FromStr;

use super::frequency::ColorFrequencyTable;
use crate::color::Rgb;
use crate::error::QuantizeError;

const TYPE_NAME: &str = "ColorFrequencyTable";

impl fmt::Display for ColorFrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TYPE_NAME}[")?;
        for (i, (color, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{color}")?;
            if count > 1 {
                write!(f, "x{count}")?;
            }
        }
        f.write_str("]")
    }
}

impl FromStr for ColorFrequencyTable {
    type Err = QuantizeError;

    /// Parse the canonical text form.
    ///
    /// Parsing is strict: no whitespace, channels in `0..=255`, explicit
    /// counts greater than zero, and no color listed twice.
    ///
    /// # Example
    ///
    /// ```
    /// use indexed_color::{ColorFrequencyTable, Rgb};
    ///
    /// let table: ColorFrequencyTable = "ColorFrequencyTable[(0,0,0)x3,(255,255,255)]"
    ///     .parse()
    ///     .unwrap();
    /// assert_eq!(table.total_count(), 4);
    /// assert_eq!(table.occurrences(Rgb::new(255, 255, 255)), 1);
    /// assert_eq!(table.to_string(), "ColorFrequencyTable[(0,0,0)x3,(255,255,255)]");
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor::new(s);
        cursor.expect_str(TYPE_NAME)?;
        cursor.expect(b'[')?;

        let mut table = ColorFrequencyTable::new();
        if cursor.eat(b']') {
            cursor.expect_end()?;
            return Ok(table);
        }

        loop {
            let start = cursor.pos;
            let (color, count) = parse_entry(&mut cursor)?;
            if table.contains(color) {
                return Err(QuantizeError::parse(
                    start,
                    format!("color {color} listed more than once"),
                ));
            }
            table.add_color(color, count)?;

            if cursor.eat(b',') {
                continue;
            }
            cursor.expect(b']')?;
            cursor.expect_end()?;
            return Ok(table);
        }
    }
}

fn parse_entry(cursor: &mut Cursor<'_>) -> Result<(Rgb, u64), QuantizeError> {
    cursor.expect(b'(')?;
    let r = cursor.channel()?;
    cursor.expect(b',')?;
    let g = cursor.channel()?;
    cursor.expect(b',')?;
    let b = cursor.channel()?;
    cursor.expect(b')')?;

    let count = if cursor.eat(b'x') {
        let at = cursor.pos;
        let count = cursor.number()?;
        if count == 0 {
            return Err(QuantizeError::parse(at, "count must be greater than 0"));
        }
        count
    } else {
        1
    };
    Ok((Rgb::new(r, g, b), count))
}

/// Byte cursor over the input, tracking the offset for error messages.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), QuantizeError> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", byte as char)))
        }
    }

    fn expect_str(&mut self, s: &str) -> Result<(), QuantizeError> {
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            self.pos += s.len();
            Ok(())
        } else {
            Err(QuantizeError::parse(self.pos, format!("expected '{s}'")))
        }
    }

    fn expect_end(&self) -> Result<(), QuantizeError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.unexpected("end of input")),
        }
    }

    fn number(&mut self) -> Result<u64, QuantizeError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.unexpected("a decimal number"));
        }
        // Only ASCII digits were consumed, so the slice is valid UTF-8.
        let digits = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| QuantizeError::parse(start, "invalid number"))?;
        digits
            .parse::<u64>()
            .map_err(|e| QuantizeError::parse(start, format!("invalid number: {e}")))
    }

    fn channel(&mut self) -> Result<u8, QuantizeError> {
        let start = self.pos;
        let value = self.number()?;
        u8::try_from(value).map_err(|_| {
            QuantizeError::parse(start, format!("channel value {value} is out of range"))
        })
    }

    fn unexpected(&self, expected: &str) -> QuantizeError {
        let found = match self.peek() {
            Some(b) => format!("'{}'", b as char),
            None => "end of input".to_string(),
        };
        QuantizeError::parse(self.pos, format!("expected {expected}, found {found}"))
    }
}

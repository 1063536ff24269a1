//! ANSI color codes.
//!
//! [`Color`] covers the 3/4-bit palette (with bold "bright" variants) and 24-bit
//! truecolor values parsed from `#RRGGBB` strings.

use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// SGR sequence that resets all attributes.
pub const RESET: &str = "\x1b[0m";

/// A terminal foreground color.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    /// Red.
    Red,
    /// Green.
    Green,
    /// Yellow.
    Yellow,
    /// Blue.
    Blue,
    /// Magenta.
    Magenta,
    /// Cyan.
    Cyan,
    /// White.
    White,
    /// Gray.
    Gray,
    /// Bright red (bold).
    BrightRed,
    /// Bright green (bold).
    BrightGreen,
    /// Bright yellow (bold).
    BrightYellow,
    /// Bright blue (bold).
    BrightBlue,
    /// Bright magenta (bold).
    BrightMagenta,
    /// Bright cyan (bold).
    BrightCyan,
    /// Bright white (bold).
    BrightWhite,
    /// Explicit attribute reset; renders as [`RESET`].
    Reset,
    /// 24-bit color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parses a `#RRGGBB` string into [`Color::Rgb`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHexColor`] when the input is not exactly seven bytes
    /// starting with `#` followed by six hex digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulse_progress::Color;
    ///
    /// assert_eq!(Color::from_hex("#ff8000").unwrap(), Color::Rgb(255, 128, 0));
    /// assert!(Color::from_hex("ff8000").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || Error::InvalidHexColor { input: hex.into() };

        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Returns the SGR escape sequence selecting this color.
    #[must_use]
    pub fn ansi_code(self) -> String {
        let code = match self {
            Self::Red => "\x1b[31m",
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Blue => "\x1b[34m",
            Self::Magenta => "\x1b[35m",
            Self::Cyan => "\x1b[36m",
            Self::White => "\x1b[37m",
            Self::Gray => "\x1b[90m",
            Self::BrightRed => "\x1b[1;31m",
            Self::BrightGreen => "\x1b[1;32m",
            Self::BrightYellow => "\x1b[1;33m",
            Self::BrightBlue => "\x1b[1;34m",
            Self::BrightMagenta => "\x1b[1;35m",
            Self::BrightCyan => "\x1b[1;36m",
            Self::BrightWhite => "\x1b[1;37m",
            Self::Reset => RESET,
            Self::Rgb(r, g, b) => return format!("\x1b[38;2;{r};{g};{b}m"),
        };
        code.to_owned()
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ansi_code())
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, RESET};
    use crate::Error;

    /// Named Palette
    /// Verifies plain and bold variants map to the expected SGR codes.
    #[test]
    fn test_named_codes() {
        assert_eq!(Color::Red.ansi_code(), "\x1b[31m");
        assert_eq!(Color::Gray.ansi_code(), "\x1b[90m");
        assert_eq!(Color::BrightCyan.ansi_code(), "\x1b[1;36m");
        assert_eq!(Color::Reset.ansi_code(), RESET);
    }

    /// Truecolor
    /// Verifies hex parsing (either case) and the 24-bit sequence.
    #[test]
    fn test_hex_codes() {
        let c: Color = "#0A1bFf".parse().unwrap();
        assert_eq!(c, Color::Rgb(10, 27, 255));
        assert_eq!(c.ansi_code(), "\x1b[38;2;10;27;255m");
        assert_eq!(c.to_string(), c.ansi_code());
    }

    /// Hex Rejection
    /// Malformed strings fail fast with a format error instead of a fallback color.
    #[test]
    fn test_hex_rejection() {
        for bad in ["", "#", "123456", "#12345", "#1234567", "#12345g", "#+12345", "#é1234"] {
            assert_eq!(
                Color::from_hex(bad),
                Err(Error::InvalidHexColor { input: bad.into() }),
                "{bad:?} should be rejected"
            );
        }
    }
}

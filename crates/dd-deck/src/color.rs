//! RGB colors.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// A 24-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Create a color from its components.
    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse six hex digits (`"3366ff"`), without the leading `#`.
    ///
    /// Returns `None` unless the input is exactly six hex digits.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let component = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(component(0)?, component(2)?, component(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl FromStr for Color {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.strip_prefix('#').unwrap_or(s)).ok_or(())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("ff0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_hex("00Ff7f"), Some(Color::rgb(0, 255, 127)));
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert_eq!(Color::from_hex("ff00"), None);
        assert_eq!(Color::from_hex("gg0000"), None);
        assert_eq!(Color::from_hex("ff00001"), None);
    }

    #[test]
    fn test_from_str_accepts_hash() {
        assert_eq!("#336699".parse(), Ok(Color::rgb(0x33, 0x66, 0x99)));
    }

    #[test]
    fn test_display_uppercase() {
        assert_eq!(Color::rgb(0xab, 0x01, 0xff).to_string(), "AB01FF");
    }
}

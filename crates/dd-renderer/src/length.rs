//! Dimension literals and their resolution to EMU.
//!
//! A literal is `<sign><digits>[.<digits>][unit]` with unit one of `cp`, `cm`,
//! `emu`, `in`, `mm`, `pt` or `%`. A missing unit means inches. Parsing keeps
//! the magnitude as written; conversion and rounding happen in
//! [`Length::resolve`], because percentages need the slide size.

use dd_deck::{EMU_PER_CENTIPOINT, EMU_PER_CM, EMU_PER_INCH, EMU_PER_MM, EMU_PER_POINT, Emu};

/// Unit suffix of a length literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Centipoint,
    Centimeter,
    Emu,
    Inch,
    Millimeter,
    Point,
    Percent,
}

impl Unit {
    const SUFFIXES: [(&'static str, Unit); 7] = [
        ("emu", Unit::Emu),
        ("cp", Unit::Centipoint),
        ("cm", Unit::Centimeter),
        ("in", Unit::Inch),
        ("mm", Unit::Millimeter),
        ("pt", Unit::Point),
        ("%", Unit::Percent),
    ];

    fn from_suffix(suffix: &str) -> Option<Self> {
        Self::SUFFIXES
            .iter()
            .find(|(s, _)| *s == suffix)
            .map(|(_, unit)| *unit)
    }

    /// EMU per unit; `None` for percentages.
    #[must_use]
    pub fn emu_per_unit(self) -> Option<i64> {
        match self {
            Self::Centipoint => Some(EMU_PER_CENTIPOINT),
            Self::Centimeter => Some(EMU_PER_CM),
            Self::Emu => Some(1),
            Self::Inch => Some(EMU_PER_INCH),
            Self::Millimeter => Some(EMU_PER_MM),
            Self::Point => Some(EMU_PER_POINT),
            Self::Percent => None,
        }
    }
}

/// Slide axis a percentage is measured against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Axis for an option key.
    ///
    /// `left`, `width`, `margin_left` and `margin_right` are horizontal;
    /// every other key is vertical.
    #[must_use]
    pub fn for_key(key: &str) -> Self {
        match key {
            "left" | "width" | "margin_left" | "margin_right" => Self::Horizontal,
            _ => Self::Vertical,
        }
    }
}

/// Slide dimensions used to resolve percentages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlideSize {
    pub width: Emu,
    pub height: Emu,
}

impl SlideSize {
    fn along(self, axis: Axis) -> Emu {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// A parsed, unresolved length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Length {
    pub magnitude: f64,
    pub unit: Option<Unit>,
}

impl Length {
    /// Parse a length literal. Returns `None` if the input is malformed.
    ///
    /// ```
    /// use dd_renderer::length::{Length, Unit};
    ///
    /// let len = Length::parse("-2.5cm").unwrap();
    /// assert_eq!(len.magnitude, -2.5);
    /// assert_eq!(len.unit, Some(Unit::Centimeter));
    /// assert!(Length::parse("wide").is_none());
    /// ```
    #[must_use]
    pub fn parse(literal: &str) -> Option<Self> {
        let s = literal.trim();
        let (sign, s) = match s.as_bytes().first()? {
            b'-' => (-1.0, &s[1..]),
            b'+' => (1.0, &s[1..]),
            _ => (1.0, s),
        };

        let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
        if int_len == 0 {
            return None;
        }
        let mut number_len = int_len;
        if let Some(rest) = s[int_len..].strip_prefix('.') {
            let frac_len = rest.bytes().take_while(u8::is_ascii_digit).count();
            if frac_len == 0 {
                return None;
            }
            number_len += 1 + frac_len;
        }

        let magnitude: f64 = s[..number_len].parse().ok()?;
        let suffix = &s[number_len..];
        let unit = if suffix.is_empty() {
            None
        } else {
            Some(Unit::from_suffix(suffix)?)
        };

        Some(Self {
            magnitude: sign * magnitude,
            unit,
        })
    }

    /// Resolve to EMU, rounding to the nearest integer.
    ///
    /// Percentages are taken of the whole slide's width or height according to
    /// `axis`, independent of any enclosing box. A missing unit is inches.
    #[must_use]
    pub fn resolve(&self, axis: Axis, slide: SlideSize) -> Emu {
        match self.unit.unwrap_or(Unit::Inch).emu_per_unit() {
            Some(per_unit) => Emu::scaled(self.magnitude, per_unit),
            None => Emu::scaled(self.magnitude / 100.0 * slide.along(axis).as_f64(), 1),
        }
    }

    /// Resolve with the axis derived from the option key.
    #[must_use]
    pub fn resolve_for(&self, key: &str, slide: SlideSize) -> Emu {
        self.resolve(Axis::for_key(key), slide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SLIDE: SlideSize = SlideSize {
        width: Emu(12_192_000),
        height: Emu(6_858_000),
    };

    fn emu(literal: &str) -> Emu {
        Length::parse(literal).unwrap().resolve(Axis::Horizontal, SLIDE)
    }

    #[test]
    fn test_absolute_units() {
        assert_eq!(emu("1in"), Emu(914_400));
        assert_eq!(emu("2cm"), Emu(720_000));
        assert_eq!(emu("10mm"), Emu(360_000));
        assert_eq!(emu("12pt"), Emu(152_400));
        assert_eq!(emu("100cp"), Emu(12_700));
        assert_eq!(emu("5000emu"), Emu(5_000));
    }

    #[test]
    fn test_negative_flips_sign() {
        for unit in ["cm", "in", "mm", "pt", "emu", "cp"] {
            let pos = emu(&format!("3.5{unit}"));
            let neg = emu(&format!("-3.5{unit}"));
            assert_eq!(neg, Emu(-pos.get()), "unit {unit}");
        }
    }

    #[test]
    fn test_missing_unit_is_inches() {
        let len = Length::parse("1.5").unwrap();
        assert_eq!(len.unit, None);
        assert_eq!(len.resolve(Axis::Vertical, SLIDE), Emu(1_371_600));
    }

    #[test]
    fn test_fractional_rounding() {
        assert_eq!(emu("0.1mm"), Emu(3_600));
        assert_eq!(emu("1.5cp"), Emu(191));
        assert_eq!(emu("0.3emu"), Emu(0));
    }

    #[test]
    fn test_percent_uses_axis() {
        let half = Length::parse("50%").unwrap();
        assert_eq!(half.resolve_for("width", SLIDE), Emu(6_096_000));
        assert_eq!(half.resolve_for("left", SLIDE), Emu(6_096_000));
        assert_eq!(half.resolve_for("margin_right", SLIDE), Emu(6_096_000));
        assert_eq!(half.resolve_for("top", SLIDE), Emu(3_429_000));
        assert_eq!(half.resolve_for("height", SLIDE), Emu(3_429_000));
        assert_eq!(half.resolve_for("margin_bottom", SLIDE), Emu(3_429_000));
    }

    #[test]
    fn test_percent_rounds_to_nearest() {
        let size = SlideSize {
            width: Emu(3),
            height: Emu(3),
        };
        assert_eq!(Length::parse("50%").unwrap().resolve(Axis::Horizontal, size), Emu(2));
        assert_eq!(Length::parse("10%").unwrap().resolve(Axis::Horizontal, size), Emu(0));
    }

    #[test]
    fn test_malformed() {
        for bad in ["", "-", "in", ".5in", "5.in", "5px", "5 in", "five", "5in3", "--5"] {
            assert_eq!(Length::parse(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn test_plus_sign_and_whitespace() {
        assert_eq!(Length::parse(" +2pt ").unwrap().magnitude, 2.0);
    }
}

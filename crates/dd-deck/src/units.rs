//! Length units of the document format.

use serde::{Deserialize, Serialize};

/// EMU per inch.
pub const EMU_PER_INCH: i64 = 914_400;
/// EMU per centimeter.
pub const EMU_PER_CM: i64 = 360_000;
/// EMU per millimeter.
pub const EMU_PER_MM: i64 = 36_000;
/// EMU per typographic point.
pub const EMU_PER_POINT: i64 = 12_700;
/// EMU per centipoint (1/100 pt).
pub const EMU_PER_CENTIPOINT: i64 = 127;
/// EMU per pixel at 96 dpi.
pub const EMU_PER_PIXEL: i64 = 9_525;

/// A distance in English Metric Units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Emu(pub i64);

impl Emu {
    /// Zero length.
    pub const ZERO: Self = Self(0);

    /// Convert a value in inches, rounding to the nearest EMU.
    #[must_use]
    pub fn from_inches(inches: f64) -> Self {
        Self::scaled(inches, EMU_PER_INCH)
    }

    /// Convert a value in points, rounding to the nearest EMU.
    #[must_use]
    pub fn from_points(points: f64) -> Self {
        Self::scaled(points, EMU_PER_POINT)
    }

    /// Multiply `value` by `per_unit` and round to the nearest EMU.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn scaled(value: f64, per_unit: i64) -> Self {
        Self((value * per_unit as f64).round() as i64)
    }

    /// Raw EMU value.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }

    /// Value as a float, for ratio computations.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl std::ops::Add for Emu {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::fmt::Display for Emu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}emu", self.0)
    }
}

/// Position and size of a shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
    pub height: Emu,
}

impl Rect {
    /// Create a rectangle from its four components.
    #[must_use]
    pub fn new(left: Emu, top: Emu, width: Emu, height: Emu) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    #[must_use]
    pub fn sized(width: Emu, height: Emu) -> Self {
        Self::new(Emu::ZERO, Emu::ZERO, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_inches() {
        assert_eq!(Emu::from_inches(1.0), Emu(914_400));
        assert_eq!(Emu::from_inches(0.5), Emu(457_200));
        assert_eq!(Emu::from_inches(-2.0), Emu(-1_828_800));
    }

    #[test]
    fn test_from_points_rounds() {
        assert_eq!(Emu::from_points(1.0), Emu(12_700));
        assert_eq!(Emu::scaled(0.001, EMU_PER_CENTIPOINT), Emu(0));
        assert_eq!(Emu::scaled(1.5, EMU_PER_CENTIPOINT), Emu(191));
    }

    #[test]
    fn test_serialize_transparent() {
        let json = serde_json::to_string(&Emu(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_rect_sized() {
        let rect = Rect::sized(Emu(10), Emu(20));
        assert_eq!(rect.left, Emu::ZERO);
        assert_eq!(rect.height, Emu(20));
    }
}

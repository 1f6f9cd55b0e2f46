//! Typed option records, one per directive.
//!
//! Each record coerces the options it recognizes through a per-key parser.
//! Unknown keys are dropped and malformed values become `None`; neither is an
//! error. When a key repeats, the last occurrence wins.

use dd_deck::{Color, Emu, Rect};

use super::DirectiveArgs;
use super::values::{parse_color, parse_float, parse_font_size, parse_int_list, parse_string};
use crate::length::{Length, SlideSize};

/// Vertical alignment of text inside a box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

impl VAlign {
    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "top" => Some(Self::Top),
            "middle" => Some(Self::Middle),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// Option record of a directive.
pub trait DirectiveOptions: Default {
    /// Directive name.
    const NAME: &'static str;

    /// Apply one option. Returns `false` if the key is not recognized.
    fn set(&mut self, key: &str, value: &str) -> bool;

    /// Build the record from parsed arguments.
    #[must_use]
    fn from_args(args: &DirectiveArgs) -> Self {
        let mut options = Self::default();
        for (key, value) in args.iter() {
            if !options.set(key, value) {
                tracing::debug!(directive = Self::NAME, key, "Ignoring unknown option");
            }
        }
        options
    }
}

/// Optional position and size, each independently absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub left: Option<Length>,
    pub top: Option<Length>,
    pub width: Option<Length>,
    pub height: Option<Length>,
}

impl Geometry {
    fn set(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "left" => &mut self.left,
            "top" => &mut self.top,
            "width" => &mut self.width,
            "height" => &mut self.height,
            _ => return false,
        };
        *slot = Length::parse(value);
        true
    }

    /// Resolve each dimension that is set, taking the rest from `base`.
    #[must_use]
    pub fn place(&self, base: Rect, slide: SlideSize) -> Rect {
        let resolve = |length: Option<Length>, key: &str, fallback: Emu| {
            length.map_or(fallback, |l| l.resolve_for(key, slide))
        };
        Rect::new(
            resolve(self.left, "left", base.left),
            resolve(self.top, "top", base.top),
            resolve(self.width, "width", base.width),
            resolve(self.height, "height", base.height),
        )
    }
}

/// `box`: a positioned text container with a markdown body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxOptions {
    pub geometry: Geometry,
    pub bg_color: Option<Color>,
    /// Background opacity in `0.0..=1.0`.
    pub bg_alpha: Option<f64>,
    pub font_size: Option<f64>,
    pub valign: Option<VAlign>,
    pub column_widths: Option<Vec<u32>>,
}

impl DirectiveOptions for BoxOptions {
    const NAME: &'static str = "box";

    fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "bg_color" => self.bg_color = parse_color(value),
            "bg_alpha" => {
                self.bg_alpha = parse_float(value).filter(|a| (0.0..=1.0).contains(a));
            }
            "font_size" => self.font_size = parse_font_size(value),
            "valign" => self.valign = VAlign::parse(value),
            "column_widths" => self.column_widths = parse_int_list(value),
            _ => return self.geometry.set(key, value),
        }
        true
    }
}

/// `img`: a picture placed on the current slide.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImgOptions {
    /// Image path, from the directive argument.
    pub src: String,
    pub geometry: Geometry,
    /// Clockwise rotation in degrees.
    pub rotation: Option<f64>,
}

impl DirectiveOptions for ImgOptions {
    const NAME: &'static str = "img";

    fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "rotation" => self.rotation = parse_float(value),
            _ => return self.geometry.set(key, value),
        }
        true
    }

    fn from_args(args: &DirectiveArgs) -> Self {
        let mut options = Self {
            src: args.argument.trim().to_owned(),
            ..Self::default()
        };
        for (key, value) in args.iter() {
            if !options.set(key, value) {
                tracing::debug!(directive = Self::NAME, key, "Ignoring unknown option");
            }
        }
        options
    }
}

/// `title`: in-place changes to the title region.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TitleOptions {
    pub geometry: Geometry,
    pub bg_color: Option<Color>,
    pub margin_left: Option<Length>,
    pub margin_right: Option<Length>,
    pub margin_top: Option<Length>,
    pub margin_bottom: Option<Length>,
}

impl DirectiveOptions for TitleOptions {
    const NAME: &'static str = "title";

    fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "bg_color" => self.bg_color = parse_color(value),
            "margin_left" => self.margin_left = Length::parse(value),
            "margin_right" => self.margin_right = Length::parse(value),
            "margin_top" => self.margin_top = Length::parse(value),
            "margin_bottom" => self.margin_bottom = Length::parse(value),
            _ => return self.geometry.set(key, value),
        }
        true
    }
}

/// `slide`: layout change and background image for the current slide.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlideOptions {
    /// Background image path.
    pub background: Option<String>,
    /// Layout template name.
    pub layout: Option<String>,
    /// Background image geometry.
    pub geometry: Geometry,
}

impl DirectiveOptions for SlideOptions {
    const NAME: &'static str = "slide";

    fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "background" => self.background = parse_string(value),
            "layout" => self.layout = parse_string(value),
            _ => return self.geometry.set(key, value),
        }
        true
    }
}

/// `textstyle`: a style scope around a markdown body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextStyleOptions {
    pub font_size: Option<f64>,
    pub color: Option<Color>,
    pub font_name: Option<String>,
}

impl DirectiveOptions for TextStyleOptions {
    const NAME: &'static str = "textstyle";

    fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "font_size" => self.font_size = parse_font_size(value),
            "color" => self.color = parse_color(value),
            "font_name" => self.font_name = parse_string(value),
            _ => return false,
        }
        true
    }
}

/// `setstyle`: style changes for the rest of the enclosing scope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SetStyleOptions {
    pub font_size: Option<f64>,
    pub color: Option<Color>,
    pub font_name: Option<String>,
    pub column_widths: Option<Vec<u32>>,
}

impl DirectiveOptions for SetStyleOptions {
    const NAME: &'static str = "setstyle";

    fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "font_size" => self.font_size = parse_font_size(value),
            "color" => self.color = parse_color(value),
            "font_name" => self.font_name = parse_string(value),
            "column_widths" => self.column_widths = parse_int_list(value),
            _ => return false,
        }
        true
    }
}

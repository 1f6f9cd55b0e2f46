//! Style cascade.
//!
//! Visual attributes resolve as: explicit value on the node, then the
//! nearest style frame, then the component default.

use dd_deck::Color;

use crate::directive::VAlign;
use crate::error::RenderError;

/// A set of style attributes, each independently absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    pub italic: Option<bool>,
    pub bold: Option<bool>,
    pub underline: Option<bool>,
    pub fontname: Option<String>,
    /// Font size in points.
    pub font_size: Option<f64>,
    pub color: Option<Color>,
    pub bg_color: Option<Color>,
    pub bg_alpha: Option<f64>,
    pub valign: Option<VAlign>,
    pub indent_level: Option<u8>,
    pub show_bullet: Option<bool>,
    /// `true` for numbered lists.
    pub list_order: Option<bool>,
    pub column_widths: Option<Vec<u32>>,
    /// When not set to `true`, newlines in runs become spaces.
    pub verbatim: Option<bool>,
}

impl Style {
    /// Engine defaults of a fresh slide.
    #[must_use]
    pub fn slide_default() -> Self {
        Self {
            verbatim: Some(false),
            ..Self::default()
        }
    }

    /// Overwrite every attribute set in `overrides`.
    pub fn merge(&mut self, overrides: &Style) {
        merge_field(&mut self.italic, &overrides.italic);
        merge_field(&mut self.bold, &overrides.bold);
        merge_field(&mut self.underline, &overrides.underline);
        merge_field(&mut self.fontname, &overrides.fontname);
        merge_field(&mut self.font_size, &overrides.font_size);
        merge_field(&mut self.color, &overrides.color);
        merge_field(&mut self.bg_color, &overrides.bg_color);
        merge_field(&mut self.bg_alpha, &overrides.bg_alpha);
        merge_field(&mut self.valign, &overrides.valign);
        merge_field(&mut self.indent_level, &overrides.indent_level);
        merge_field(&mut self.show_bullet, &overrides.show_bullet);
        merge_field(&mut self.list_order, &overrides.list_order);
        merge_field(&mut self.column_widths, &overrides.column_widths);
        merge_field(&mut self.verbatim, &overrides.verbatim);
    }

    /// Attributes of `self`, falling back to `inherited` where absent.
    #[must_use]
    pub fn resolve(&self, inherited: &Style) -> Style {
        let mut resolved = inherited.clone();
        resolved.merge(self);
        resolved
    }
}

fn merge_field<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        slot.clone_from(value);
    }
}

/// Stack of style frames.
#[derive(Debug, Default)]
pub struct StyleStack {
    frames: Vec<Style>,
}

impl StyleStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `partial` merged onto a copy of the top frame, or onto an empty
    /// frame when `inherit` is false.
    pub fn push(&mut self, partial: &Style, inherit: bool) {
        let mut frame = match (inherit, self.frames.last()) {
            (true, Some(top)) => top.clone(),
            _ => Style::default(),
        };
        frame.merge(partial);
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Result<Style, RenderError> {
        self.frames.pop().ok_or(RenderError::UnbalancedScope("style"))
    }

    /// Merge `partial` into the top frame without pushing.
    pub fn set_in_place(&mut self, partial: &Style) -> Result<(), RenderError> {
        let top = self
            .frames
            .last_mut()
            .ok_or(RenderError::UnbalancedScope("style"))?;
        top.merge(partial);
        Ok(())
    }

    pub fn top(&self) -> Option<&Style> {
        self.frames.last()
    }

    /// Top frame, or an empty style outside any scope.
    pub fn current(&self) -> Style {
        self.top().cloned().unwrap_or_default()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn red() -> Color {
        Color::rgb(255, 0, 0)
    }

    fn green() -> Color {
        Color::rgb(0, 255, 0)
    }

    #[test]
    fn test_merge_keeps_unset_attributes() {
        let mut style = Style {
            bold: Some(true),
            font_size: Some(18.0),
            ..Style::default()
        };
        style.merge(&Style {
            font_size: Some(24.0),
            ..Style::default()
        });
        assert_eq!(style.bold, Some(true));
        assert_eq!(style.font_size, Some(24.0));
    }

    #[test]
    fn test_resolve_prefers_explicit() {
        let explicit = Style {
            font_size: Some(12.0),
            ..Style::default()
        };
        let inherited = Style {
            font_size: Some(24.0),
            color: Some(red()),
            ..Style::default()
        };
        let resolved = explicit.resolve(&inherited);
        assert_eq!(resolved.font_size, Some(12.0));
        assert_eq!(resolved.color, Some(red()));
    }

    #[test]
    fn test_nested_scopes() {
        let mut stack = StyleStack::new();
        stack.push(&Style::slide_default(), false);
        stack.push(
            &Style {
                color: Some(red()),
                ..Style::default()
            },
            true,
        );
        stack.push(
            &Style {
                color: Some(green()),
                ..Style::default()
            },
            true,
        );
        assert_eq!(stack.current().color, Some(green()));
        assert_eq!(stack.current().verbatim, Some(false));

        stack.pop().unwrap();
        assert_eq!(stack.current().color, Some(red()));
        stack.pop().unwrap();
        assert_eq!(stack.current().color, None);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_non_inheriting_push() {
        let mut stack = StyleStack::new();
        stack.push(
            &Style {
                bold: Some(true),
                ..Style::default()
            },
            true,
        );
        stack.push(&Style::slide_default(), false);
        assert_eq!(stack.current(), Style::slide_default());
    }

    #[test]
    fn test_set_in_place_visible_to_nested_scopes() {
        let mut stack = StyleStack::new();
        stack.push(&Style::slide_default(), false);
        stack
            .set_in_place(&Style {
                font_size: Some(24.0),
                ..Style::default()
            })
            .unwrap();
        assert_eq!(stack.depth(), 1);
        stack.push(&Style::default(), true);
        assert_eq!(stack.current().font_size, Some(24.0));
    }

    #[test]
    fn test_unbalanced_pop() {
        let mut stack = StyleStack::new();
        assert!(matches!(
            stack.pop(),
            Err(RenderError::UnbalancedScope("style"))
        ));
        assert!(stack.set_in_place(&Style::default()).is_err());
    }
}

//! Layout context: the bounds, cursor and style stacks of a render pass.
//!
//! A slide pushes onto all three stacks, a box pushes onto all three, a
//! table cell pushes only a cursor. Scopes close in reverse order.

use dd_deck::{ParagraphRef, Rect, TextFrameRef};

use crate::error::RenderError;
use crate::style::{Style, StyleStack};

/// Text-insertion cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    /// Frame receiving new paragraphs. `None` when the slide has no content
    /// region.
    pub target: Option<TextFrameRef>,
    /// Whether the frame's first paragraph is still unused.
    pub virgin: bool,
    /// Paragraph receiving new runs.
    pub paragraph: Option<ParagraphRef>,
}

impl Cursor {
    fn fresh(target: Option<TextFrameRef>) -> Self {
        Self {
            target,
            virgin: true,
            paragraph: None,
        }
    }
}

/// Stack depths, for checking scope symmetry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Depths {
    pub bounds: usize,
    pub cursors: usize,
    pub styles: usize,
}

#[derive(Debug, Default)]
pub struct LayoutContext {
    bounds: Vec<Option<Rect>>,
    cursors: Vec<Cursor>,
    styles: StyleStack,
}

impl LayoutContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a slide scope: its content region, a fresh cursor and a
    /// non-inheriting style frame with engine defaults.
    pub fn open_slide(&mut self, region: Option<Rect>, target: Option<TextFrameRef>) {
        self.bounds.push(region);
        self.cursors.push(Cursor::fresh(target));
        self.styles.push(&Style::slide_default(), false);
    }

    pub fn close_slide(&mut self) -> Result<(), RenderError> {
        self.styles.pop()?;
        self.pop_cursor()?;
        self.pop_bounds()
    }

    /// Open a box scope. The style frame inherits from the enclosing one.
    pub fn open_box(&mut self, bounds: Rect, target: TextFrameRef, style: &Style) {
        self.bounds.push(Some(bounds));
        self.cursors.push(Cursor::fresh(Some(target)));
        self.styles.push(style, true);
    }

    pub fn close_box(&mut self) -> Result<(), RenderError> {
        self.styles.pop()?;
        self.pop_cursor()?;
        self.pop_bounds()
    }

    /// Open a table cell scope over the current bounds and style.
    pub fn open_cell(&mut self, target: TextFrameRef) {
        self.cursors.push(Cursor::fresh(Some(target)));
    }

    pub fn close_cell(&mut self) -> Result<(), RenderError> {
        self.pop_cursor()
    }

    pub fn push_style(&mut self, style: &Style) {
        self.styles.push(style, true);
    }

    pub fn pop_style(&mut self) -> Result<(), RenderError> {
        self.styles.pop().map(drop)
    }

    /// Change the current style frame for the rest of its scope.
    pub fn set_style(&mut self, style: &Style) -> Result<(), RenderError> {
        self.styles.set_in_place(style)
    }

    pub fn style(&self) -> Style {
        self.styles.current()
    }

    /// Current container bounds. `None` outside any slide or on a slide
    /// without a content region.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds.last().copied().flatten()
    }

    /// Base rectangle for new containers: current bounds, else the slide.
    pub fn base_rect(&self, slide: Rect) -> Rect {
        self.bounds().unwrap_or(slide)
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursors.last()
    }

    pub fn cursor_mut(&mut self) -> Option<&mut Cursor> {
        self.cursors.last_mut()
    }

    /// Whether the current scope has somewhere to put body text.
    pub fn has_content_region(&self) -> bool {
        self.cursor().is_some_and(|cursor| cursor.target.is_some())
    }

    pub fn depths(&self) -> Depths {
        Depths {
            bounds: self.bounds.len(),
            cursors: self.cursors.len(),
            styles: self.styles.depth(),
        }
    }

    fn pop_bounds(&mut self) -> Result<(), RenderError> {
        self.bounds
            .pop()
            .map(drop)
            .ok_or(RenderError::UnbalancedScope("bounds"))
    }

    fn pop_cursor(&mut self) -> Result<(), RenderError> {
        self.cursors
            .pop()
            .map(drop)
            .ok_or(RenderError::UnbalancedScope("cursor"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dd_deck::{Emu, ShapeId};
    use pretty_assertions::assert_eq;

    fn rect(left: i64, top: i64, width: i64, height: i64) -> Rect {
        Rect::new(Emu(left), Emu(top), Emu(width), Emu(height))
    }

    #[test]
    fn test_slide_without_content_region() {
        let mut ctx = LayoutContext::new();
        ctx.open_slide(None, None);
        assert_eq!(ctx.bounds(), None);
        assert!(!ctx.has_content_region());
        assert_eq!(ctx.base_rect(rect(0, 0, 100, 50)), rect(0, 0, 100, 50));
        assert_eq!(ctx.style(), Style::slide_default());
    }

    #[test]
    fn test_box_scope_is_symmetric() {
        let mut ctx = LayoutContext::new();
        let body = TextFrameRef::shape(0, ShapeId(2));
        ctx.open_slide(Some(rect(10, 20, 300, 400)), Some(body));
        let before = ctx.depths();

        let frame = TextFrameRef::shape(0, ShapeId(3));
        let style = Style {
            font_size: Some(18.0),
            ..Style::default()
        };
        ctx.open_box(rect(1, 2, 3, 4), frame, &style);
        assert_eq!(ctx.bounds(), Some(rect(1, 2, 3, 4)));
        assert_eq!(ctx.cursor().map(|c| c.target), Some(Some(frame)));
        assert_eq!(ctx.style().font_size, Some(18.0));
        assert_eq!(ctx.style().verbatim, Some(false));

        ctx.close_box().unwrap();
        assert_eq!(ctx.depths(), before);
        assert_eq!(ctx.cursor().map(|c| c.target), Some(Some(body)));
    }

    #[test]
    fn test_cell_scope_keeps_bounds_and_style() {
        let mut ctx = LayoutContext::new();
        ctx.open_slide(Some(rect(0, 0, 10, 10)), None);
        let before = ctx.depths();

        ctx.open_cell(TextFrameRef::cell(0, ShapeId(3), 1, 2));
        assert_eq!(ctx.depths().bounds, before.bounds);
        assert_eq!(ctx.depths().styles, before.styles);
        assert_eq!(ctx.depths().cursors, before.cursors + 1);
        assert!(ctx.has_content_region());

        ctx.close_cell().unwrap();
        assert_eq!(ctx.depths(), before);
    }

    #[test]
    fn test_cursor_paragraph_restored_after_scope() {
        let mut ctx = LayoutContext::new();
        let body = TextFrameRef::shape(0, ShapeId(2));
        ctx.open_slide(None, Some(body));
        let para = ParagraphRef {
            frame: body,
            index: 0,
        };
        if let Some(cursor) = ctx.cursor_mut() {
            cursor.paragraph = Some(para);
            cursor.virgin = false;
        }

        ctx.open_cell(TextFrameRef::cell(0, ShapeId(3), 0, 0));
        assert_eq!(ctx.cursor().and_then(|c| c.paragraph), None);
        ctx.close_cell().unwrap();
        assert_eq!(ctx.cursor().and_then(|c| c.paragraph), Some(para));
    }

    #[test]
    fn test_unbalanced_close() {
        let mut ctx = LayoutContext::new();
        assert!(matches!(
            ctx.close_cell(),
            Err(RenderError::UnbalancedScope("cursor"))
        ));
        assert!(ctx.close_slide().is_err());
        assert!(ctx.set_style(&Style::default()).is_err());
    }
}

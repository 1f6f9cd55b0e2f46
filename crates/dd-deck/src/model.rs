//! Slide content types.

use std::path::PathBuf;

use serde::Serialize;

use crate::{Color, Emu, Rect};

/// Identifier of a shape, unique within its slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShapeId(pub u32);

/// Address of a text frame: a shape's own frame or a table cell's frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextFrameRef {
    /// Slide index.
    pub slide: usize,
    /// Shape owning the frame.
    pub shape: ShapeId,
    /// `(row, column)` when the frame belongs to a table cell.
    pub cell: Option<(usize, usize)>,
}

impl TextFrameRef {
    /// Frame of a shape.
    #[must_use]
    pub fn shape(slide: usize, shape: ShapeId) -> Self {
        Self {
            slide,
            shape,
            cell: None,
        }
    }

    /// Frame of a table cell.
    #[must_use]
    pub fn cell(slide: usize, table: ShapeId, row: usize, column: usize) -> Self {
        Self {
            slide,
            shape: table,
            cell: Some((row, column)),
        }
    }
}

/// Address of a paragraph within a text frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParagraphRef {
    pub frame: TextFrameRef,
    pub index: usize,
}

/// One slide.
#[derive(Clone, Debug, Serialize)]
pub struct Slide {
    /// Name of the layout the slide was created from.
    pub layout: String,
    /// Shapes in z-order, back to front.
    pub shapes: Vec<Shape>,
    #[serde(skip)]
    pub(crate) next_id: u32,
}

impl Slide {
    pub(crate) fn new(layout: &str) -> Self {
        Self {
            layout: layout.to_owned(),
            shapes: Vec::new(),
            next_id: 1,
        }
    }

    pub(crate) fn push(&mut self, rect: Rect, kind: ShapeKind) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.shapes.push(Shape {
            id,
            rect,
            kind,
            fill: None,
            rotation: None,
        });
        id
    }

    /// Find a shape by id.
    #[must_use]
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub(crate) fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub(crate) fn position(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    /// The title placeholder, if the slide still has one.
    #[must_use]
    pub fn title(&self) -> Option<&Shape> {
        self.shapes
            .iter()
            .find(|s| matches!(s.kind, ShapeKind::Title { .. }))
    }

    /// The body placeholder (content region), if the layout has one.
    #[must_use]
    pub fn body(&self) -> Option<&Shape> {
        self.shapes
            .iter()
            .find(|s| matches!(s.kind, ShapeKind::Body { .. }))
    }
}

/// A shape on a slide.
#[derive(Clone, Debug, Serialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(flatten)]
    pub kind: ShapeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    /// Clockwise rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl Shape {
    /// The shape's own text frame, if it has one.
    #[must_use]
    pub fn text_frame(&self) -> Option<&TextFrame> {
        match &self.kind {
            ShapeKind::Title { text } | ShapeKind::Body { text } | ShapeKind::TextBox { text } => {
                Some(text)
            }
            ShapeKind::Picture(_) | ShapeKind::Table(_) => None,
        }
    }

    pub(crate) fn text_frame_mut(&mut self) -> Option<&mut TextFrame> {
        match &mut self.kind {
            ShapeKind::Title { text } | ShapeKind::Body { text } | ShapeKind::TextBox { text } => {
                Some(text)
            }
            ShapeKind::Picture(_) | ShapeKind::Table(_) => None,
        }
    }

    /// The table, if this shape is one.
    #[must_use]
    pub fn table(&self) -> Option<&Table> {
        match &self.kind {
            ShapeKind::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// What a shape is.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    /// Title placeholder.
    Title { text: TextFrame },
    /// Body placeholder.
    Body { text: TextFrame },
    /// Free text box.
    TextBox { text: TextFrame },
    /// Raster picture.
    Picture(Picture),
    /// Fixed-size table.
    Table(Table),
}

/// Solid background fill.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Fill {
    pub color: Color,
    /// Opacity in `0.0..=1.0`; fully opaque when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

/// Picture source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Picture {
    pub src: PathBuf,
}

/// Vertical text anchoring within a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Top,
    Middle,
    Bottom,
}

/// Inner margins of a text frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Margins {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Emu>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Emu>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Emu>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Emu>,
}

/// Text container: an ordered list of paragraphs plus frame properties.
///
/// A new frame always holds one empty paragraph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextFrame {
    pub paragraphs: Vec<Paragraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    /// Word wrapping; inherited from the layout when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_wrap: Option<bool>,
    #[serde(skip_serializing_if = "is_default_margins")]
    pub margins: Margins,
}

fn is_default_margins(margins: &Margins) -> bool {
    *margins == Margins::default()
}

impl Default for TextFrame {
    fn default() -> Self {
        Self {
            paragraphs: vec![Paragraph::default()],
            anchor: None,
            word_wrap: None,
            margins: Margins::default(),
        }
    }
}

impl TextFrame {
    /// Frame holding a single run of text.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut frame = Self::default();
        frame.set_text(text);
        frame
    }

    /// Replace all content with a single run of text.
    pub fn set_text(&mut self, text: &str) {
        let mut paragraph = Paragraph::default();
        if !text.is_empty() {
            paragraph.runs.push(Run {
                text: text.to_owned(),
                font: Font::default(),
            });
        }
        self.paragraphs = vec![paragraph];
    }

    /// Concatenated text of all paragraphs, separated by newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Paragraph bullet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bullet {
    /// Literal bullet character.
    Char(char),
    /// Arabic numbering followed by a period.
    AutoNumber,
}

/// One paragraph of runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Paragraph {
    /// Outline level, `0` for top level.
    pub level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet: Option<Bullet>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Concatenated run text.
    #[must_use]
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Text with uniform formatting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Run {
    pub text: String,
    #[serde(skip_serializing_if = "Font::is_empty")]
    pub font: Font,
}

/// Run font properties; `None` means inherited from the frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Size in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Font {
    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A table cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Cell {
    pub text: TextFrame,
}

/// Fixed grid of cells, addressed row-major from `(0, 0)`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Table {
    /// Column widths.
    pub columns: Vec<Emu>,
    /// Rows of cells; every row has `columns.len()` cells.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub(crate) fn new(rows: usize, columns: usize, width: Emu) -> Self {
        let column_width = if columns == 0 {
            Emu::ZERO
        } else {
            Emu(width.get() / i64::try_from(columns).unwrap_or(i64::MAX))
        };
        Self {
            columns: vec![column_width; columns],
            rows: (0..rows)
                .map(|_| (0..columns).map(|_| Cell::default()).collect())
                .collect(),
        }
    }

    /// Look up a cell.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(column)
    }

    pub(crate) fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row)?.get_mut(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_frame_has_one_paragraph() {
        let frame = TextFrame::default();
        assert_eq!(frame.paragraphs.len(), 1);
        assert!(frame.paragraphs[0].runs.is_empty());
    }

    #[test]
    fn test_frame_text() {
        let mut frame = TextFrame::with_text("one");
        frame.paragraphs.push(Paragraph {
            runs: vec![Run {
                text: "two".to_owned(),
                font: Font::default(),
            }],
            ..Paragraph::default()
        });
        assert_eq!(frame.text(), "one\ntwo");
    }

    #[test]
    fn test_table_grid() {
        let table = Table::new(3, 2, Emu(1000));
        assert_eq!(table.columns, vec![Emu(500), Emu(500)]);
        assert_eq!(table.rows.len(), 3);
        assert!(table.cell(2, 1).is_some());
        assert!(table.cell(3, 0).is_none());
        assert!(table.cell(0, 2).is_none());
    }

    #[test]
    fn test_slide_shape_ids_are_stable() {
        let mut slide = Slide::new("L");
        let a = slide.push(Rect::default(), ShapeKind::TextBox { text: TextFrame::default() });
        let b = slide.push(Rect::default(), ShapeKind::TextBox { text: TextFrame::default() });
        assert_ne!(a, b);
        slide.shapes.swap(0, 1);
        assert_eq!(slide.shape(a).map(|s| s.id), Some(a));
        assert_eq!(slide.position(a), Some(1));
    }
}

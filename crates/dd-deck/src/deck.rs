//! The presentation document.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::model::{Picture, Shape, ShapeId, ShapeKind, Slide, Table, TextFrame};
use crate::{
    Anchor, Bullet, Color, DeckError, EMU_PER_PIXEL, Emu, Fill, Font, Margins, ParagraphRef, Rect,
    Run, Template, TextFrameRef,
};

/// Callback returning the pixel size `(width, height)` of an image file.
pub type ImageSizeFn = dyn Fn(&Path) -> Result<(u32, u32), DeckError>;

/// Default image size probe: reads the image header with the `image` crate.
fn default_image_size(path: &Path) -> Result<(u32, u32), DeckError> {
    image::image_dimensions(path).map_err(|e| DeckError::Image {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// A presentation built from a [`Template`].
#[derive(Serialize)]
pub struct Deck {
    slide_width: Emu,
    slide_height: Emu,
    slides: Vec<Slide>,
    #[serde(skip)]
    template: Template,
    #[serde(skip)]
    image_size: Option<Box<ImageSizeFn>>,
}

impl Deck {
    /// Create an empty deck.
    #[must_use]
    pub fn new(template: Template) -> Self {
        Self {
            slide_width: template.slide_width,
            slide_height: template.slide_height,
            slides: Vec::new(),
            template,
            image_size: None,
        }
    }

    /// Replace the image size probe.
    #[must_use]
    pub fn with_image_size<F>(mut self, probe: F) -> Self
    where
        F: Fn(&Path) -> Result<(u32, u32), DeckError> + 'static,
    {
        self.image_size = Some(Box::new(probe));
        self
    }

    /// Template the deck was created from.
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Slide width.
    #[must_use]
    pub fn slide_width(&self) -> Emu {
        self.slide_width
    }

    /// Slide height.
    #[must_use]
    pub fn slide_height(&self) -> Emu {
        self.slide_height
    }

    /// All slides in order.
    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Look up a slide.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::NoSuchSlide`] if the index is out of range.
    pub fn slide(&self, index: usize) -> Result<&Slide, DeckError> {
        self.slides.get(index).ok_or(DeckError::NoSuchSlide(index))
    }

    fn slide_mut(&mut self, index: usize) -> Result<&mut Slide, DeckError> {
        self.slides.get_mut(index).ok_or(DeckError::NoSuchSlide(index))
    }

    fn shape_mut(&mut self, slide: usize, shape: ShapeId) -> Result<&mut Shape, DeckError> {
        self.slide_mut(slide)?
            .shape_mut(shape)
            .ok_or(DeckError::NoSuchShape {
                slide,
                shape: shape.0,
            })
    }

    /// Look up a shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide or shape does not exist.
    pub fn shape(&self, slide: usize, shape: ShapeId) -> Result<&Shape, DeckError> {
        self.slide(slide)?
            .shape(shape)
            .ok_or(DeckError::NoSuchShape {
                slide,
                shape: shape.0,
            })
    }

    /// Append a slide using the named layout and return its index.
    ///
    /// The slide gets a title placeholder and, if the layout defines one,
    /// a body placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::UnknownLayout`] if the template has no such layout.
    pub fn add_slide(&mut self, layout: &str) -> Result<usize, DeckError> {
        let template = self
            .template
            .layout(layout)
            .ok_or_else(|| DeckError::UnknownLayout(layout.to_owned()))?;
        let mut slide = Slide::new(&template.name);
        slide.push(
            template.title,
            ShapeKind::Title {
                text: TextFrame::default(),
            },
        );
        if let Some(body) = template.body {
            slide.push(
                body,
                ShapeKind::Body {
                    text: TextFrame::default(),
                },
            );
        }
        self.slides.push(slide);
        Ok(self.slides.len() - 1)
    }

    /// Remove and return the last slide.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::NoSuchSlide`] if the deck is empty.
    pub fn remove_last_slide(&mut self) -> Result<Slide, DeckError> {
        self.slides.pop().ok_or(DeckError::NoSuchSlide(0))
    }

    /// Id of the slide's title placeholder.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide does not exist.
    pub fn title_shape(&self, slide: usize) -> Result<Option<ShapeId>, DeckError> {
        Ok(self.slide(slide)?.title().map(|s| s.id))
    }

    /// Id of the slide's body placeholder.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide does not exist.
    pub fn body_shape(&self, slide: usize) -> Result<Option<ShapeId>, DeckError> {
        Ok(self.slide(slide)?.body().map(|s| s.id))
    }

    /// Replace the title text. Does nothing if the slide has no title.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide does not exist.
    pub fn set_title_text(&mut self, slide: usize, text: &str) -> Result<(), DeckError> {
        if let Some(id) = self.title_shape(slide)? {
            self.text_frame_mut(TextFrameRef::shape(slide, id))?
                .set_text(text);
        }
        Ok(())
    }

    /// Current title text, empty if the slide has no title.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide does not exist.
    pub fn title_text(&self, slide: usize) -> Result<String, DeckError> {
        Ok(self
            .slide(slide)?
            .title()
            .and_then(Shape::text_frame)
            .map(TextFrame::text)
            .unwrap_or_default())
    }

    /// Geometry of a shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide or shape does not exist.
    pub fn shape_rect(&self, slide: usize, shape: ShapeId) -> Result<Rect, DeckError> {
        Ok(self.shape(slide, shape)?.rect)
    }

    /// Move and resize a shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide or shape does not exist.
    pub fn set_shape_rect(
        &mut self,
        slide: usize,
        shape: ShapeId,
        rect: Rect,
    ) -> Result<(), DeckError> {
        self.shape_mut(slide, shape)?.rect = rect;
        Ok(())
    }

    /// Add an empty text box.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide does not exist.
    pub fn add_text_box(&mut self, slide: usize, rect: Rect) -> Result<ShapeId, DeckError> {
        Ok(self.slide_mut(slide)?.push(
            rect,
            ShapeKind::TextBox {
                text: TextFrame::default(),
            },
        ))
    }

    /// Fill a shape with a solid color, keeping any alpha already set.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide or shape does not exist.
    pub fn set_fill(&mut self, slide: usize, shape: ShapeId, color: Color) -> Result<(), DeckError> {
        let shape = self.shape_mut(slide, shape)?;
        let alpha = shape.fill.and_then(|f| f.alpha);
        shape.fill = Some(Fill { color, alpha });
        Ok(())
    }

    /// Set the opacity of an existing solid fill. Shapes without a fill are
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide or shape does not exist.
    pub fn set_fill_alpha(
        &mut self,
        slide: usize,
        shape: ShapeId,
        alpha: f64,
    ) -> Result<(), DeckError> {
        let shape = self.shape_mut(slide, shape)?;
        match shape.fill.as_mut() {
            Some(fill) => fill.alpha = Some(alpha.clamp(0.0, 1.0)),
            None => tracing::debug!(shape = shape.id.0, "Ignoring alpha on shape without fill"),
        }
        Ok(())
    }

    /// Rotate a shape clockwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide or shape does not exist.
    pub fn set_rotation(&mut self, slide: usize, shape: ShapeId, degrees: f64) -> Result<(), DeckError> {
        self.shape_mut(slide, shape)?.rotation = Some(degrees);
        Ok(())
    }

    /// Move a shape to the front of the z-order.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide or shape does not exist.
    pub fn bring_to_front(&mut self, slide: usize, shape: ShapeId) -> Result<(), DeckError> {
        let s = self.slide_mut(slide)?;
        let pos = s.position(shape).ok_or(DeckError::NoSuchShape {
            slide,
            shape: shape.0,
        })?;
        let moved = s.shapes.remove(pos);
        s.shapes.push(moved);
        Ok(())
    }

    /// Move a shape behind every other shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide or shape does not exist.
    pub fn send_to_back(&mut self, slide: usize, shape: ShapeId) -> Result<(), DeckError> {
        let s = self.slide_mut(slide)?;
        let pos = s.position(shape).ok_or(DeckError::NoSuchShape {
            slide,
            shape: shape.0,
        })?;
        let moved = s.shapes.remove(pos);
        s.shapes.insert(0, moved);
        Ok(())
    }

    /// Pixel size of an image file, via the configured probe.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Image`] if the image cannot be read.
    pub fn image_size(&self, path: &Path) -> Result<(u32, u32), DeckError> {
        match &self.image_size {
            Some(probe) => probe(path),
            None => default_image_size(path),
        }
    }

    /// Add a picture at `(left, top)`.
    ///
    /// With one dimension missing, the other is scaled to keep the image's
    /// aspect ratio; with both missing, the native size at 96 dpi is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide does not exist or the image size
    /// cannot be determined.
    pub fn add_picture(
        &mut self,
        slide: usize,
        src: &Path,
        left: Emu,
        top: Emu,
        width: Option<Emu>,
        height: Option<Emu>,
    ) -> Result<ShapeId, DeckError> {
        let (width, height) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                let (px_w, px_h) = self.image_size(src)?;
                scale_picture(px_w, px_h, width, height)
            }
        };
        let rect = Rect::new(left, top, width, height);
        Ok(self.slide_mut(slide)?.push(
            rect,
            ShapeKind::Picture(Picture {
                src: PathBuf::from(src),
            }),
        ))
    }

    /// Add a `rows` x `columns` table with evenly split columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide does not exist.
    pub fn add_table(
        &mut self,
        slide: usize,
        rows: usize,
        columns: usize,
        rect: Rect,
    ) -> Result<ShapeId, DeckError> {
        let table = Table::new(rows, columns, rect.width);
        Ok(self.slide_mut(slide)?.push(rect, ShapeKind::Table(table)))
    }

    /// Set the width of one table column.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not a table or the column is out of range.
    pub fn set_column_width(
        &mut self,
        slide: usize,
        table: ShapeId,
        column: usize,
        width: Emu,
    ) -> Result<(), DeckError> {
        let shape = self.shape_mut(slide, table)?;
        let ShapeKind::Table(t) = &mut shape.kind else {
            return Err(DeckError::NotATable(table.0));
        };
        let slot = t
            .columns
            .get_mut(column)
            .ok_or(DeckError::CellOutOfRange { row: 0, column })?;
        *slot = width;
        Ok(())
    }

    /// Look up a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the addressed shape, cell or frame does not exist.
    pub fn text_frame(&self, frame: TextFrameRef) -> Result<&TextFrame, DeckError> {
        let shape = self.shape(frame.slide, frame.shape)?;
        match frame.cell {
            None => shape.text_frame().ok_or(DeckError::NoTextFrame(frame.shape.0)),
            Some((row, column)) => shape
                .table()
                .ok_or(DeckError::NotATable(frame.shape.0))?
                .cell(row, column)
                .map(|c| &c.text)
                .ok_or(DeckError::CellOutOfRange { row, column }),
        }
    }

    fn text_frame_mut(&mut self, frame: TextFrameRef) -> Result<&mut TextFrame, DeckError> {
        let shape = self.shape_mut(frame.slide, frame.shape)?;
        match frame.cell {
            None => shape
                .text_frame_mut()
                .ok_or(DeckError::NoTextFrame(frame.shape.0)),
            Some((row, column)) => {
                let ShapeKind::Table(table) = &mut shape.kind else {
                    return Err(DeckError::NotATable(frame.shape.0));
                };
                table
                    .cell_mut(row, column)
                    .map(|c| &mut c.text)
                    .ok_or(DeckError::CellOutOfRange { row, column })
            }
        }
    }

    /// Set vertical anchoring of a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame does not exist.
    pub fn set_anchor(&mut self, frame: TextFrameRef, anchor: Anchor) -> Result<(), DeckError> {
        self.text_frame_mut(frame)?.anchor = Some(anchor);
        Ok(())
    }

    /// Set word wrapping of a text frame; `None` inherits from the layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame does not exist.
    pub fn set_word_wrap(&mut self, frame: TextFrameRef, wrap: Option<bool>) -> Result<(), DeckError> {
        self.text_frame_mut(frame)?.word_wrap = wrap;
        Ok(())
    }

    /// Overwrite the margins that are set in `margins`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame does not exist.
    pub fn set_margins(&mut self, frame: TextFrameRef, margins: Margins) -> Result<(), DeckError> {
        let current = &mut self.text_frame_mut(frame)?.margins;
        current.left = margins.left.or(current.left);
        current.right = margins.right.or(current.right);
        current.top = margins.top.or(current.top);
        current.bottom = margins.bottom.or(current.bottom);
        Ok(())
    }

    /// Reference to the first paragraph of a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame does not exist.
    pub fn first_paragraph(&self, frame: TextFrameRef) -> Result<ParagraphRef, DeckError> {
        if self.text_frame(frame)?.paragraphs.is_empty() {
            return Err(DeckError::NoSuchParagraph(0));
        }
        Ok(ParagraphRef { frame, index: 0 })
    }

    /// Append an empty paragraph to a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame does not exist.
    pub fn add_paragraph(&mut self, frame: TextFrameRef) -> Result<ParagraphRef, DeckError> {
        let paragraphs = &mut self.text_frame_mut(frame)?.paragraphs;
        paragraphs.push(crate::Paragraph::default());
        Ok(ParagraphRef {
            frame,
            index: paragraphs.len() - 1,
        })
    }

    fn paragraph_mut(&mut self, paragraph: ParagraphRef) -> Result<&mut crate::Paragraph, DeckError> {
        self.text_frame_mut(paragraph.frame)?
            .paragraphs
            .get_mut(paragraph.index)
            .ok_or(DeckError::NoSuchParagraph(paragraph.index))
    }

    /// Set a paragraph's outline level.
    ///
    /// # Errors
    ///
    /// Returns an error if the paragraph does not exist.
    pub fn set_paragraph_level(&mut self, paragraph: ParagraphRef, level: u8) -> Result<(), DeckError> {
        self.paragraph_mut(paragraph)?.level = level;
        Ok(())
    }

    /// Set a paragraph's bullet.
    ///
    /// # Errors
    ///
    /// Returns an error if the paragraph does not exist.
    pub fn set_bullet(&mut self, paragraph: ParagraphRef, bullet: Bullet) -> Result<(), DeckError> {
        self.paragraph_mut(paragraph)?.bullet = Some(bullet);
        Ok(())
    }

    /// Append a run to a paragraph.
    ///
    /// # Errors
    ///
    /// Returns an error if the paragraph does not exist.
    pub fn add_run(&mut self, paragraph: ParagraphRef, text: &str, font: Font) -> Result<(), DeckError> {
        self.paragraph_mut(paragraph)?.runs.push(Run {
            text: text.to_owned(),
            font,
        });
        Ok(())
    }

    /// Write the deck as pretty-printed JSON.
    ///
    /// The document is written to a temporary file next to `path` and renamed
    /// into place only once fully written, so a failed save never leaves a
    /// truncated file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub fn save(&self, path: &Path) -> Result<(), DeckError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        file.write_all(b"\n")?;
        file.persist(path).map_err(|e| DeckError::Io(e.error))?;
        tracing::info!(path = %path.display(), slides = self.slides.len(), "Saved deck");
        Ok(())
    }
}

/// Compute picture size from its pixel size and the requested dimensions.
fn scale_picture(px_w: u32, px_h: u32, width: Option<Emu>, height: Option<Emu>) -> (Emu, Emu) {
    let native_w = Emu(i64::from(px_w) * EMU_PER_PIXEL);
    let native_h = Emu(i64::from(px_h) * EMU_PER_PIXEL);
    if px_w == 0 || px_h == 0 {
        return (width.unwrap_or(native_w), height.unwrap_or(native_h));
    }
    let ratio = f64::from(px_h) / f64::from(px_w);
    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, Emu::scaled(w.as_f64() * ratio, 1)),
        (None, Some(h)) => (Emu::scaled(h.as_f64() / ratio, 1), h),
        (None, None) => (native_w, native_h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn deck() -> Deck {
        Deck::new(Template::builtin()).with_image_size(|_| Ok((200, 100)))
    }

    #[test]
    fn test_add_slide_creates_placeholders() {
        let mut deck = deck();
        let content = deck.add_slide("Title and Content").unwrap();
        let section = deck.add_slide("Section Header").unwrap();
        assert!(deck.body_shape(content).unwrap().is_some());
        assert!(deck.body_shape(section).unwrap().is_none());
        assert!(deck.title_shape(section).unwrap().is_some());
    }

    #[test]
    fn test_add_slide_unknown_layout() {
        let mut deck = deck();
        let err = deck.add_slide("Nope").unwrap_err();
        assert!(matches!(err, DeckError::UnknownLayout(name) if name == "Nope"));
    }

    #[test]
    fn test_title_roundtrip_and_remove() {
        let mut deck = deck();
        let slide = deck.add_slide("Title Only").unwrap();
        deck.set_title_text(slide, "Agenda").unwrap();
        assert_eq!(deck.title_text(slide).unwrap(), "Agenda");
        let removed = deck.remove_last_slide().unwrap();
        assert_eq!(removed.layout, "Title Only");
        assert!(deck.slides().is_empty());
        assert!(deck.remove_last_slide().is_err());
    }

    #[test]
    fn test_picture_keeps_aspect_ratio() {
        let mut deck = deck();
        let slide = deck.add_slide("Title Only").unwrap();
        let id = deck
            .add_picture(slide, Path::new("a.png"), Emu(0), Emu(0), Some(Emu(1000)), None)
            .unwrap();
        assert_eq!(deck.shape_rect(slide, id).unwrap().height, Emu(500));

        let id = deck
            .add_picture(slide, Path::new("a.png"), Emu(0), Emu(0), None, Some(Emu(1000)))
            .unwrap();
        assert_eq!(deck.shape_rect(slide, id).unwrap().width, Emu(2000));

        let id = deck
            .add_picture(slide, Path::new("a.png"), Emu(0), Emu(0), None, None)
            .unwrap();
        assert_eq!(
            deck.shape_rect(slide, id).unwrap(),
            Rect::new(Emu(0), Emu(0), Emu(200 * EMU_PER_PIXEL), Emu(100 * EMU_PER_PIXEL))
        );
    }

    #[test]
    fn test_picture_probe_error() {
        let mut deck = Deck::new(Template::builtin()).with_image_size(|p| {
            Err(DeckError::Image {
                path: p.to_path_buf(),
                message: "unreadable".to_owned(),
            })
        });
        let slide = deck.add_slide("Title Only").unwrap();
        let result = deck.add_picture(slide, Path::new("x.png"), Emu(0), Emu(0), None, None);
        assert!(matches!(result, Err(DeckError::Image { .. })));
    }

    #[test]
    fn test_z_order() {
        let mut deck = deck();
        let slide = deck.add_slide("Title Only").unwrap();
        let title = deck.title_shape(slide).unwrap().unwrap();
        let boxed = deck.add_text_box(slide, Rect::default()).unwrap();
        deck.send_to_back(slide, boxed).unwrap();
        assert_eq!(deck.slide(slide).unwrap().shapes[0].id, boxed);
        deck.bring_to_front(slide, boxed).unwrap();
        deck.bring_to_front(slide, title).unwrap();
        let ids: Vec<_> = deck.slide(slide).unwrap().shapes.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![boxed, title]);
    }

    #[test]
    fn test_fill_alpha_requires_fill() {
        let mut deck = deck();
        let slide = deck.add_slide("Title Only").unwrap();
        let id = deck.add_text_box(slide, Rect::default()).unwrap();
        deck.set_fill_alpha(slide, id, 0.5).unwrap();
        assert!(deck.shape(slide, id).unwrap().fill.is_none());
        deck.set_fill(slide, id, Color::rgb(1, 2, 3)).unwrap();
        deck.set_fill_alpha(slide, id, 0.5).unwrap();
        assert_eq!(
            deck.shape(slide, id).unwrap().fill,
            Some(Fill {
                color: Color::rgb(1, 2, 3),
                alpha: Some(0.5)
            })
        );
    }

    #[test]
    fn test_table_cells_and_paragraphs() {
        let mut deck = deck();
        let slide = deck.add_slide("Title and Content").unwrap();
        let table = deck
            .add_table(slide, 2, 2, Rect::sized(Emu(1000), Emu(0)))
            .unwrap();
        deck.set_column_width(slide, table, 1, Emu(700)).unwrap();
        assert!(deck.set_column_width(slide, table, 2, Emu(1)).is_err());

        let frame = TextFrameRef::cell(slide, table, 1, 1);
        let first = deck.first_paragraph(frame).unwrap();
        deck.add_run(first, "cell", Font::default()).unwrap();
        let second = deck.add_paragraph(frame).unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(deck.text_frame(frame).unwrap().text(), "cell\n");

        let t = deck.shape(slide, table).unwrap().table().unwrap();
        assert_eq!(t.columns, vec![Emu(500), Emu(700)]);
        assert!(deck.text_frame(TextFrameRef::cell(slide, table, 2, 0)).is_err());
    }

    #[test]
    fn test_save_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        let mut deck = deck();
        let slide = deck.add_slide("Title and Content").unwrap();
        deck.set_title_text(slide, "Hello").unwrap();
        deck.save(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["slides"][0]["layout"], "Title and Content");
        assert_eq!(json["slides"][0]["shapes"][0]["type"], "title");
        assert_eq!(json["slide_width"], 12_192_000);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("deck.json");
        assert!(deck().save(&path).is_err());
        assert!(!path.exists());
    }
}

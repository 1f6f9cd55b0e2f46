//! Document-model adapter.
//!
//! The renderer drives any [`Presentation`]. [`Deck`] is the in-memory
//! implementation that gets serialized to disk.

use std::path::Path;

use dd_deck::{
    Anchor, Bullet, Color, Deck, DeckError, Emu, Font, Margins, ParagraphRef, Rect, ShapeId,
    TextFrameRef,
};

use crate::length::SlideSize;

/// Operations the renderer performs on the output document.
///
/// Slides are addressed by index, shapes by id within their slide and text
/// by frame and paragraph handles.
pub trait Presentation {
    /// Slide dimensions, for percentage lengths.
    fn slide_size(&self) -> SlideSize;

    /// Append a slide with the named layout and return its index.
    fn add_slide(&mut self, layout: &str) -> Result<usize, DeckError>;

    /// Remove the last slide along with everything on it.
    fn remove_last_slide(&mut self) -> Result<(), DeckError>;

    fn set_title(&mut self, slide: usize, text: &str) -> Result<(), DeckError>;

    fn title(&self, slide: usize) -> Result<String, DeckError>;

    fn title_shape(&self, slide: usize) -> Result<Option<ShapeId>, DeckError>;

    /// Body placeholder of the slide and its geometry, if the layout has one.
    fn content_region(&self, slide: usize) -> Result<Option<(ShapeId, Rect)>, DeckError>;

    fn shape_rect(&self, slide: usize, shape: ShapeId) -> Result<Rect, DeckError>;

    fn set_shape_rect(&mut self, slide: usize, shape: ShapeId, rect: Rect)
    -> Result<(), DeckError>;

    fn add_text_box(&mut self, slide: usize, rect: Rect) -> Result<ShapeId, DeckError>;

    fn set_fill(&mut self, slide: usize, shape: ShapeId, color: Color) -> Result<(), DeckError>;

    fn set_fill_alpha(&mut self, slide: usize, shape: ShapeId, alpha: f64)
    -> Result<(), DeckError>;

    fn set_rotation(&mut self, slide: usize, shape: ShapeId, degrees: f64)
    -> Result<(), DeckError>;

    fn bring_to_front(&mut self, slide: usize, shape: ShapeId) -> Result<(), DeckError>;

    fn send_to_back(&mut self, slide: usize, shape: ShapeId) -> Result<(), DeckError>;

    /// Pixel size of an image.
    fn image_size(&self, src: &Path) -> Result<(u32, u32), DeckError>;

    /// Add a picture. A missing dimension follows the image's aspect ratio.
    fn add_picture(
        &mut self,
        slide: usize,
        src: &Path,
        left: Emu,
        top: Emu,
        width: Option<Emu>,
        height: Option<Emu>,
    ) -> Result<ShapeId, DeckError>;

    fn add_table(
        &mut self,
        slide: usize,
        rows: usize,
        columns: usize,
        rect: Rect,
    ) -> Result<ShapeId, DeckError>;

    fn set_column_width(
        &mut self,
        slide: usize,
        table: ShapeId,
        column: usize,
        width: Emu,
    ) -> Result<(), DeckError>;

    fn set_anchor(&mut self, frame: TextFrameRef, anchor: Anchor) -> Result<(), DeckError>;

    fn set_word_wrap(&mut self, frame: TextFrameRef, wrap: Option<bool>) -> Result<(), DeckError>;

    fn set_margins(&mut self, frame: TextFrameRef, margins: Margins) -> Result<(), DeckError>;

    fn first_paragraph(&self, frame: TextFrameRef) -> Result<ParagraphRef, DeckError>;

    fn add_paragraph(&mut self, frame: TextFrameRef) -> Result<ParagraphRef, DeckError>;

    fn set_paragraph_level(&mut self, paragraph: ParagraphRef, level: u8) -> Result<(), DeckError>;

    fn set_bullet(&mut self, paragraph: ParagraphRef, bullet: Bullet) -> Result<(), DeckError>;

    fn add_run(&mut self, paragraph: ParagraphRef, text: &str, font: Font) -> Result<(), DeckError>;
}

impl Presentation for Deck {
    fn slide_size(&self) -> SlideSize {
        SlideSize {
            width: self.slide_width(),
            height: self.slide_height(),
        }
    }

    fn add_slide(&mut self, layout: &str) -> Result<usize, DeckError> {
        Deck::add_slide(self, layout)
    }

    fn remove_last_slide(&mut self) -> Result<(), DeckError> {
        Deck::remove_last_slide(self).map(drop)
    }

    fn set_title(&mut self, slide: usize, text: &str) -> Result<(), DeckError> {
        self.set_title_text(slide, text)
    }

    fn title(&self, slide: usize) -> Result<String, DeckError> {
        self.title_text(slide)
    }

    fn title_shape(&self, slide: usize) -> Result<Option<ShapeId>, DeckError> {
        Deck::title_shape(self, slide)
    }

    fn content_region(&self, slide: usize) -> Result<Option<(ShapeId, Rect)>, DeckError> {
        Ok(self.slide(slide)?.body().map(|shape| (shape.id, shape.rect)))
    }

    fn shape_rect(&self, slide: usize, shape: ShapeId) -> Result<Rect, DeckError> {
        Deck::shape_rect(self, slide, shape)
    }

    fn set_shape_rect(
        &mut self,
        slide: usize,
        shape: ShapeId,
        rect: Rect,
    ) -> Result<(), DeckError> {
        Deck::set_shape_rect(self, slide, shape, rect)
    }

    fn add_text_box(&mut self, slide: usize, rect: Rect) -> Result<ShapeId, DeckError> {
        Deck::add_text_box(self, slide, rect)
    }

    fn set_fill(&mut self, slide: usize, shape: ShapeId, color: Color) -> Result<(), DeckError> {
        Deck::set_fill(self, slide, shape, color)
    }

    fn set_fill_alpha(
        &mut self,
        slide: usize,
        shape: ShapeId,
        alpha: f64,
    ) -> Result<(), DeckError> {
        Deck::set_fill_alpha(self, slide, shape, alpha)
    }

    fn set_rotation(
        &mut self,
        slide: usize,
        shape: ShapeId,
        degrees: f64,
    ) -> Result<(), DeckError> {
        Deck::set_rotation(self, slide, shape, degrees)
    }

    fn bring_to_front(&mut self, slide: usize, shape: ShapeId) -> Result<(), DeckError> {
        Deck::bring_to_front(self, slide, shape)
    }

    fn send_to_back(&mut self, slide: usize, shape: ShapeId) -> Result<(), DeckError> {
        Deck::send_to_back(self, slide, shape)
    }

    fn image_size(&self, src: &Path) -> Result<(u32, u32), DeckError> {
        Deck::image_size(self, src)
    }

    fn add_picture(
        &mut self,
        slide: usize,
        src: &Path,
        left: Emu,
        top: Emu,
        width: Option<Emu>,
        height: Option<Emu>,
    ) -> Result<ShapeId, DeckError> {
        Deck::add_picture(self, slide, src, left, top, width, height)
    }

    fn add_table(
        &mut self,
        slide: usize,
        rows: usize,
        columns: usize,
        rect: Rect,
    ) -> Result<ShapeId, DeckError> {
        Deck::add_table(self, slide, rows, columns, rect)
    }

    fn set_column_width(
        &mut self,
        slide: usize,
        table: ShapeId,
        column: usize,
        width: Emu,
    ) -> Result<(), DeckError> {
        Deck::set_column_width(self, slide, table, column, width)
    }

    fn set_anchor(&mut self, frame: TextFrameRef, anchor: Anchor) -> Result<(), DeckError> {
        Deck::set_anchor(self, frame, anchor)
    }

    fn set_word_wrap(&mut self, frame: TextFrameRef, wrap: Option<bool>) -> Result<(), DeckError> {
        Deck::set_word_wrap(self, frame, wrap)
    }

    fn set_margins(&mut self, frame: TextFrameRef, margins: Margins) -> Result<(), DeckError> {
        Deck::set_margins(self, frame, margins)
    }

    fn first_paragraph(&self, frame: TextFrameRef) -> Result<ParagraphRef, DeckError> {
        Deck::first_paragraph(self, frame)
    }

    fn add_paragraph(&mut self, frame: TextFrameRef) -> Result<ParagraphRef, DeckError> {
        Deck::add_paragraph(self, frame)
    }

    fn set_paragraph_level(&mut self, paragraph: ParagraphRef, level: u8) -> Result<(), DeckError> {
        Deck::set_paragraph_level(self, paragraph, level)
    }

    fn set_bullet(&mut self, paragraph: ParagraphRef, bullet: Bullet) -> Result<(), DeckError> {
        Deck::set_bullet(self, paragraph, bullet)
    }

    fn add_run(&mut self, paragraph: ParagraphRef, text: &str, font: Font) -> Result<(), DeckError> {
        Deck::add_run(self, paragraph, text, font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dd_deck::Template;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_content_region_follows_layout() {
        let mut deck = Deck::new(Template::builtin());
        let section = Presentation::add_slide(&mut deck, "Section Header").unwrap();
        let content = Presentation::add_slide(&mut deck, "Title and Content").unwrap();

        assert_eq!(deck.content_region(section).unwrap(), None);
        let (shape, rect) = deck.content_region(content).unwrap().unwrap();
        assert_eq!(Deck::body_shape(&deck, content).unwrap(), Some(shape));
        assert_eq!(rect, Deck::shape_rect(&deck, content, shape).unwrap());
    }

    #[test]
    fn test_slide_size() {
        let deck = Deck::new(Template::builtin());
        assert_eq!(
            deck.slide_size(),
            SlideSize {
                width: Emu(12_192_000),
                height: Emu(6_858_000),
            }
        );
    }

    #[test]
    fn test_remove_last_slide() {
        let mut deck = Deck::new(Template::builtin());
        Presentation::add_slide(&mut deck, "Title Only").unwrap();
        Presentation::remove_last_slide(&mut deck).unwrap();
        assert!(deck.slides().is_empty());
        assert!(Presentation::remove_last_slide(&mut deck).is_err());
    }
}

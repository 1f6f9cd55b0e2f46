//! Presentation document model for deckdown.
//!
//! This crate holds the output side of the pipeline: a [`Template`] describing
//! the slide size and the named slide layouts, and a [`Deck`] that slides,
//! shapes, text frames, tables and pictures are added to. A finished deck is
//! written as JSON with [`Deck::save`].
//!
//! All geometry is expressed in [`Emu`] (English Metric Units, 914 400 per
//! inch), the fundamental length unit of the document format.
//!
//! # Example
//!
//! ```
//! use dd_deck::{Deck, Template};
//!
//! let mut deck = Deck::new(Template::builtin());
//! let slide = deck.add_slide("Title and Content").unwrap();
//! deck.set_title_text(slide, "Hello").unwrap();
//! assert_eq!(deck.slides().len(), 1);
//! ```

mod color;
mod deck;
mod error;
mod model;
mod template;
mod units;

pub use color::Color;
pub use deck::{Deck, ImageSizeFn};
pub use error::DeckError;
pub use model::{
    Anchor, Bullet, Cell, Fill, Font, Margins, Paragraph, ParagraphRef, Picture, Run, Shape,
    ShapeId, ShapeKind, Slide, Table, TextFrame, TextFrameRef,
};
pub use template::{LayoutTemplate, Template};
pub use units::{
    EMU_PER_CENTIPOINT, EMU_PER_CM, EMU_PER_INCH, EMU_PER_MM, EMU_PER_PIXEL, EMU_PER_POINT, Emu,
    Rect,
};

//! Directive-extended markdown to slide deck renderer.
//!
//! Markdown is parsed into a syntax tree ([`parse_document`]) and then
//! walked once by a [`SlideRenderer`], which drives a [`Presentation`].
//!
//! # Architecture
//!
//! - [`directive`]: line-level grammar for `:::name` blocks (`box`, `img`,
//!   `title`, `slide`, `textstyle`, `setstyle`) and their typed options
//! - [`length`]: length literals resolved to EMU against the slide size
//! - [`LayoutContext`]: container bounds, text cursors and [`StyleStack`]
//!   frames, opened and closed together per scope
//! - [`Highlighter`]: token source for fenced code blocks
//!
//! Headings of level 1 and 2 open slides. Every visual attribute of a run
//! resolves from the explicit node value first, then the style frame.
//!
//! # Example
//!
//! ```
//! use dd_deck::{Deck, Template};
//! use dd_renderer::{RenderOptions, render_markdown};
//!
//! let mut deck = Deck::new(Template::builtin());
//! let markdown = "## Results\n\n:::setstyle font_size=28\n\nAll **green**\n";
//! render_markdown(&mut deck, markdown, RenderOptions::default()).unwrap();
//!
//! assert_eq!(deck.slides().len(), 1);
//! ```

mod ast;
mod backend;
pub mod directive;
mod error;
mod highlight;
mod layout;
pub mod length;
mod markdown;
mod renderer;
mod state;
mod style;

pub use ast::{Node, NodeKind};
pub use backend::Presentation;
pub use error::RenderError;
pub use highlight::{Highlighter, RegexHighlighter, Theme, Token, TokenStyle};
pub use layout::{Cursor, Depths, LayoutContext};
pub use markdown::{parse_document, parse_markdown};
pub use renderer::{RenderOptions, SlideRenderer};
pub use style::{Style, StyleStack};

/// Parse `markdown` and render it into `deck` with the default highlighter.
///
/// # Errors
///
/// Returns the first node failure; slides rendered before it stay in the
/// deck.
pub fn render_markdown<P: Presentation>(
    deck: &mut P,
    markdown: &str,
    options: RenderOptions,
) -> Result<(), RenderError> {
    let document = parse_document(markdown);
    SlideRenderer::new(deck, options).render(&document)
}

//! Directive grammar for slide markup.
//!
//! Six block directives extend markdown: `box`, `img`, `title`, `slide`,
//! `textstyle` and `setstyle`. A directive starts with a marker line:
//!
//! ```text
//! :::box left=10% top=2cm width=50% bg_color=#336699
//!     Indented markdown body.
//! :::img[images/photo.png]{width=4in rotation=15}
//! ```
//!
//! Options are coerced into typed records ([`BoxOptions`], [`ImgOptions`],
//! ...). Unknown keys and malformed values are dropped, never errors.
//!
//! `box` and `textstyle` take an indented body, parsed as plain markdown.
//! Directive markers inside a body are not active and render as text.

mod args;
mod fence;
mod grammar;
mod options;
mod parser;
mod values;

pub use args::DirectiveArgs;
pub use options::{
    BoxOptions, DirectiveOptions, Geometry, ImgOptions, SetStyleOptions, SlideOptions,
    TextStyleOptions, TitleOptions, VAlign,
};
pub use parser::DirectiveName;

pub(crate) use grammar::{Block, split_blocks};

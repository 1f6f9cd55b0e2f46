//! Document model errors.

use std::path::PathBuf;

/// Error returned by [`Deck`](crate::Deck) and [`Template`](crate::Template) operations.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    /// The template has no layout with this name.
    #[error("Slide layout not found in template: {0}")]
    UnknownLayout(String),
    /// Slide index out of range.
    #[error("No slide at index {0}")]
    NoSuchSlide(usize),
    /// Shape id not present on the slide.
    #[error("No shape with id {shape} on slide {slide}")]
    NoSuchShape { slide: usize, shape: u32 },
    /// The addressed shape has no text frame.
    #[error("Shape {0} has no text frame")]
    NoTextFrame(u32),
    /// The addressed shape is not a table.
    #[error("Shape {0} is not a table")]
    NotATable(u32),
    /// Table cell or column out of range.
    #[error("Table cell ({row}, {column}) out of range")]
    CellOutOfRange { row: usize, column: usize },
    /// Paragraph index out of range.
    #[error("No paragraph at index {0}")]
    NoSuchParagraph(usize),
    /// Image dimensions could not be read.
    #[error("Cannot read image {}: {message}", path.display())]
    Image { path: PathBuf, message: String },
    /// Template file not found.
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),
    /// Template TOML could not be parsed.
    #[error("Template parse error: {0}")]
    TemplateParse(#[from] toml::de::Error),
    /// Template is structurally invalid.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

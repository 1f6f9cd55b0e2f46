//! Rendering errors.

use dd_deck::DeckError;

/// Error that aborts a build.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A scope was closed without a matching open.
    #[error("Unbalanced {0} scope: pop without matching push")]
    UnbalancedScope(&'static str),
    /// A node that creates shapes appeared before the first slide.
    #[error("No active slide for {0}")]
    NoActiveSlide(&'static str),
    /// A table cell appeared outside of a table.
    #[error("Table cell outside of a table")]
    NoActiveTable,
    /// Syntax highlighting failed.
    #[error("Cannot highlight {language} code: {message}")]
    Highlight { language: String, message: String },
    /// Rendering a node failed.
    #[error("Failed to render {node}: {source}")]
    Node {
        node: &'static str,
        source: Box<RenderError>,
    },
    /// Document model operation failed.
    #[error(transparent)]
    Deck(#[from] DeckError),
}

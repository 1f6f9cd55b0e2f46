//! CLI error types.

use dd_config::ConfigError;
use dd_deck::DeckError;
use dd_renderer::RenderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Deck(#[from] DeckError),

    #[error("{0}")]
    Render(#[from] RenderError),
}

//! Build a deck from markup read on stdin.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use dd_config::{CliSettings, Config};
use dd_deck::{Deck, Template};
use dd_renderer::{RenderOptions, render_markdown};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for a build.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output document (overrides config, default: out.json).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Slide template (overrides config, default: reference.toml or built-in).
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover deckdown.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self, input: impl Read) -> Result<(), CliError> {
        let output = Output::new();
        let path = self.build(input)?;
        output.wrote(&path);
        Ok(())
    }

    /// Render `input` and save the deck. Returns the output path.
    fn build(self, mut input: impl Read) -> Result<PathBuf, CliError> {
        let cli_settings = CliSettings {
            output: self.output,
            template: self.template,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let template = match &config.build_resolved.template {
            Some(path) => {
                if self.verbose {
                    Output::new().template(path);
                }
                Template::load(path)?
            }
            None => {
                tracing::info!("No template configured, using built-in template");
                Template::builtin()
            }
        };

        let mut markdown = String::new();
        input.read_to_string(&mut markdown)?;

        let mut deck = Deck::new(template);
        render_markdown(&mut deck, &markdown, render_options(&config))?;

        let path = config.build_resolved.output;
        deck.save(&path)?;
        Ok(path)
    }
}

fn render_options(config: &Config) -> RenderOptions {
    RenderOptions {
        section_header_layout: config.layouts.section_header.clone(),
        title_and_content_layout: config.layouts.title_and_content.clone(),
        code_font: config.fonts.code.clone(),
        quote_font: config.fonts.quote.clone(),
        hoist_slide_directives: config.render.hoist_slide_directives,
    }
}

//! deckdown CLI - markdown to slide deck converter.
//!
//! Reads directive-extended markdown on stdin and writes the rendered deck
//! to the configured output file.

mod build;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use build::BuildArgs;
use output::Output;

/// deckdown - markdown to slide deck converter.
#[derive(Parser)]
#[command(name = "deckdown", version, about)]
struct Cli {
    #[command(flatten)]
    build: BuildArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.build.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.build.execute(std::io::stdin().lock()) {
        output.failed(&err);
        std::process::exit(1);
    }
}

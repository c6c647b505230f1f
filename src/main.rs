//! Markview - render a markdown file to styled HTML.
//!
//! # Usage
//!
//! ```bash
//! markview README.md
//! markview --raw README.md
//! markview README.md -o README.html
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use markview::viewer::{ViewMode, Viewer, ViewerError};

/// Render a markdown file to a styled HTML fragment
#[derive(Parser, Debug)]
#[command(name = "markview", version, about, long_about = None)]
struct Cli {
    /// Markdown file to render
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the raw markdown instead of the rendered HTML
    #[arg(long)]
    raw: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut viewer = Viewer::new();
    match viewer.open(&cli.file) {
        Ok(()) => {}
        // The drop target of the original shell ignores non-markdown
        // files without comment; mirror that here.
        Err(ViewerError::UnsupportedExtension(name)) => {
            tracing::debug!(file = %name, "ignoring non-markdown file");
            return Ok(());
        }
        Err(err) => return Err(err).context("Failed to load file"),
    }

    viewer.set_mode(if cli.raw {
        ViewMode::Raw
    } else {
        ViewMode::Pretty
    });

    let Some(content) = viewer.visible() else {
        anyhow::bail!("No document loaded");
    };

    match cli.output {
        Some(path) => std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{content}"),
    }

    Ok(())
}

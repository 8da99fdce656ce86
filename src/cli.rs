//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Rewrite GIF `<img>` tags into `<video>` tags with MP4/WebM sources.
///
/// Reads `index.html` and writes the result to `index.html.new` for review.
/// The input file is never modified.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// HTML file to read (default: index.html)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// File to write the rewritten HTML to (default: <INPUT>.new)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// `loading` value used when an image has none (default: lazy)
    #[arg(short = 'l', long)]
    pub default_loading: Option<String>,

    /// Config file path (default: gif2video.toml, if present)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

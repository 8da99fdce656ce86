//! Migration driver: read the page, rewrite GIF images, write the result.
//!
//! The input file is never touched. The output is only written once the
//! input has been read and rewritten, so a missing or unreadable input leaves
//! no output file behind.

use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::config::Config;
use crate::debug;
use crate::logger;
use crate::rewrite::{GifRewriter, count_gif_references};

// NOTE: No message text from the io::Error here, `{:#}` prints the source chain
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("{} not found", .0.display())]
    MissingInput(PathBuf),

    #[error("failed to read `{}`", .0.display())]
    Read(PathBuf, #[source] io::Error),

    #[error("failed to write `{}`", .0.display())]
    Write(PathBuf, #[source] io::Error),
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Occurrences of `.gif"` in the original document
    pub gif_references: usize,
    /// `<img>` tags actually turned into `<video>` blocks
    pub replaced: usize,
}

/// Rewrite `config.input` into `config.output`.
pub fn run(config: &Config) -> Result<Report, MigrateError> {
    let html = read_input(&config.input)?;
    debug!("migrate"; "read {} bytes from {}", html.len(), config.input.display());

    let rewrite = GifRewriter::new(&config.default_loading).rewrite(&html);
    let gif_references = count_gif_references(&html);

    fs::write(&config.output, &rewrite.html)
        .map_err(|err| MigrateError::Write(config.output.clone(), err))?;

    Ok(Report {
        input: config.input.clone(),
        output: config.output.clone(),
        gif_references,
        replaced: rewrite.replaced,
    })
}

fn read_input(path: &Path) -> Result<String, MigrateError> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => MigrateError::MissingInput(path.to_path_buf()),
        _ => MigrateError::Read(path.to_path_buf(), err),
    })
}

impl Report {
    /// Print the success summary and the suggested follow-up commands.
    pub fn print(&self) {
        let input = self.input.display();
        let output = self.output.display();

        logger::success("Successfully updated HTML");
        logger::success(&format!("Found {} GIF references", self.gif_references));
        debug!("migrate"; "rewrote {} img tag{}", self.replaced, plural_s(self.replaced));
        logger::success(&format!("Output written to: {output}"));

        logger::plain("");
        logger::plain("Next steps:");
        logger::plain(&format!("1. Review the changes: diff {input} {output}"));
        logger::plain(&format!("2. If satisfied, replace: mv {output} {input}"));
    }
}

#[inline]
fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

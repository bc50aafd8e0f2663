//! Error types for the md2tex library.
//!
//! Every failure in this crate is fatal: the conversion is a single
//! synchronous batch with no retry or recovery strategy, so each variant
//! simply aborts the run and surfaces to the caller. The variants mirror the
//! stages of the pipeline — input resolution, front matter extraction, the
//! pandoc subprocess, anchor splicing, image rewriting, and output writing —
//! so the message alone tells you which stage gave up.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the md2tex library.
#[derive(Debug, Error)]
pub enum Md2TexError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Front matter errors ───────────────────────────────────────────────
    /// The document does not start with a well-formed triple-dash block,
    /// or the block is not valid YAML.
    #[error("Invalid YAML front matter: {reason}")]
    InvalidFrontMatter { reason: String },

    /// A required front-matter key (e.g. `title`, `id`) is absent.
    #[error("Front matter is missing required key '{key}'")]
    MissingFrontMatterKey { key: &'static str },

    // ── Pandoc errors ─────────────────────────────────────────────────────
    /// The pandoc binary could not be launched at all.
    #[error(
        "Failed to launch pandoc ('{program}'): {source}\n\
         Install pandoc (https://pandoc.org/installing.html) or point \
         --pandoc at an existing binary."
    )]
    PandocNotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Pandoc ran but exited non-zero.
    #[error("Pandoc failed to convert markdown to latex: {detail}")]
    PandocFailed { detail: String },

    // ── Splice errors ─────────────────────────────────────────────────────
    /// An expected anchor line was absent from the generated LaTeX.
    ///
    /// The splice stage depends on the exact formatting pandoc emits; a
    /// pandoc upgrade that changes its standalone template surfaces here.
    #[error("Anchor line {anchor:?} not found in generated LaTeX\nPandoc's output format may have changed.")]
    AnchorNotFound { anchor: String },

    // ── Image rewriting errors ────────────────────────────────────────────
    /// A remote image could not be downloaded.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// An SVG reference could not be read, parsed, or converted to PDF.
    #[error("Failed to convert SVG '{path}' to PDF: {detail}")]
    SvgConversionFailed { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output LaTeX file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed, or a required setting is absent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

//! # md2tex
//!
//! Convert GitHub-flavored Markdown documents with YAML front matter into
//! styled, PDF-ready LaTeX.
//!
//! ## Why this crate?
//!
//! Pandoc converts markdown to LaTeX well, but it knows nothing about the
//! conventions of controlled documents: a title block built from front
//! matter, running headers carrying the document id and revision, and image
//! references that actually resolve when the `.tex` is compiled. Markdown
//! sources reference remote URLs and SVG files — LaTeX supports neither.
//! This crate wraps pandoc and repairs all of that in one pass.
//!
//! ## Pipeline Overview
//!
//! ```text
//! markdown (+ YAML front matter)
//!  │
//!  ├─ 1. Front matter  split the triple-dash block, parse as YAML
//!  ├─ 2. Pandoc        gfm → standalone LaTeX over stdin/stdout
//!  ├─ 3. Splice        margins, title/toc, fancyhdr headers at anchor lines
//!  ├─ 4. Images        relative-path fixup, URL download, SVG→PDF, width
//!  └─ 5. Output        file path (atomic write) or writer stream
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use md2tex::{convert_to_file, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .manufacturer("Acme Devices Inc.")
//!         .download_to("build/tmp")
//!         .build()?;
//!     let stats = convert_to_file("docs/manual.md", "build/manual.tex", &config)?;
//!     eprintln!("{} lines, {} images", stats.latex_lines, stats.image_refs);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2tex` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! md2tex = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_to_file, convert_to_writer};
pub use error::Md2TexError;
pub use output::{ConversionOutput, ConversionStats, OutputTarget};
pub use pipeline::frontmatter::FrontMatter;

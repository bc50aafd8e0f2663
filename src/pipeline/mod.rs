//! Pipeline stages for Markdown-to-LaTeX conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and confines
//! the assumption about pandoc's exact output format to a single place
//! ([`splice`]), so format drift requires a one-place fix.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ frontmatter ──▶ pandoc ──▶ splice ──▶ images
//! (path)    (YAML block)   (gfm→tex)  (anchors)  (line filters)
//! ```
//!
//! 1. [`input`]       — resolve the input file and derive the folder layout
//! 2. [`frontmatter`] — split off and parse the triple-dash YAML block
//! 3. [`pandoc`]      — shell out to pandoc, markdown in, LaTeX out
//! 4. [`splice`]      — insert margin, title/toc, and header boilerplate at
//!    anchor lines of the generated LaTeX
//! 5. [`images`]      — rewrite every `\includegraphics` reference through a
//!    composed path-filter chain (relative paths, downloads, SVG→PDF) and
//!    inject default width scaling

pub mod frontmatter;
pub mod images;
pub mod input;
pub mod pandoc;
pub mod splice;

//! Conversion results and output writing.
//!
//! The output target is a tagged union selected once at the boundary: either
//! a file path (opened, written atomically, closed) or a caller-supplied
//! writer (written directly). Path output goes through a temp-file + rename
//! so an aborted run never leaves a half-written `.tex` behind.

use crate::error::Md2TexError;
use crate::pipeline::frontmatter::FrontMatter;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of a successful conversion.
#[derive(Debug)]
pub struct ConversionOutput {
    /// The complete generated LaTeX source.
    pub latex: String,
    /// The parsed front matter of the input document.
    pub front_matter: FrontMatter,
    /// Timing and size statistics.
    pub stats: ConversionStats,
}

/// Statistics about a conversion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    /// Lines in the final LaTeX document.
    pub latex_lines: usize,
    /// Image references found and rewritten.
    pub image_refs: usize,
    /// Wall-clock time for the whole run in milliseconds.
    pub total_duration_ms: u64,
    /// Wall-clock time spent inside the pandoc subprocess in milliseconds.
    pub pandoc_duration_ms: u64,
}

/// Where the generated LaTeX goes.
pub enum OutputTarget<W: Write> {
    /// Write to a file at this path (atomic temp + rename).
    Path(PathBuf),
    /// Write directly to a caller-supplied stream.
    Stream(W),
}

/// Write the document to the selected target.
pub fn write_document<W: Write>(
    document: &str,
    target: OutputTarget<W>,
) -> Result<(), Md2TexError> {
    match target {
        OutputTarget::Path(path) => write_to_path(document, &path),
        OutputTarget::Stream(mut writer) => {
            writer
                .write_all(document.as_bytes())
                .map_err(|source| Md2TexError::OutputWriteFailed {
                    path: PathBuf::from("<stream>"),
                    source,
                })
        }
    }
}

/// Atomic write: write to a sibling temp file, then rename into place.
fn write_to_path(document: &str, path: &Path) -> Result<(), Md2TexError> {
    let write_err = |source| Md2TexError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    let tmp_path = path.with_extension("tex.tmp");
    std::fs::write(&tmp_path, document).map_err(write_err)?;
    std::fs::rename(&tmp_path, path).map_err(write_err)?;

    info!("wrote LaTeX output: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_to_path_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("doc.tex");
        write_document::<std::io::Sink>("\\documentclass{}\n", OutputTarget::Path(out.clone()))
            .unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "\\documentclass{}\n");
        assert!(!dir.path().join("doc.tex.tmp").exists());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/deeper/doc.tex");
        write_document::<std::io::Sink>("x", OutputTarget::Path(out.clone())).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn writes_to_stream() {
        let mut buffer: Vec<u8> = Vec::new();
        write_document("content", OutputTarget::Stream(&mut buffer)).unwrap();
        assert_eq!(buffer, b"content");
    }
}

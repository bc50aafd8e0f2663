//! External converter: shell out to pandoc for the GFM → LaTeX step.
//!
//! Pandoc does the heavy lifting of markdown parsing and LaTeX generation;
//! this crate only post-processes its output. The contract is narrow: feed
//! markdown on stdin, read a standalone LaTeX document from stdout, treat a
//! non-zero exit as fatal. `--standalone` matters — the splice stage anchors
//! on the `\documentclass` and `\begin{document}` lines of the standalone
//! template.

use crate::error::Md2TexError;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Arguments passed to pandoc on every invocation.
const PANDOC_ARGS: &[&str] = &[
    "-f",
    "gfm",
    "-t",
    "latex",
    "--standalone",
    "-V",
    "urlcolor=blue",
    "-V",
    "linkcolor=black",
];

/// Convert GitHub-flavored markdown to standalone LaTeX via pandoc.
pub fn markdown_to_latex(markdown: &str, pandoc_path: &Path) -> Result<String, Md2TexError> {
    debug!(pandoc = %pandoc_path.display(), bytes = markdown.len(), "invoking pandoc");

    let mut child = Command::new(pandoc_path)
        .args(PANDOC_ARGS)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Md2TexError::PandocNotFound {
            program: pandoc_path.display().to_string(),
            source,
        })?;

    // stdin handle must be dropped before wait, or pandoc blocks on EOF
    {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Md2TexError::Internal("pandoc stdin was not piped".into()))?;
        stdin
            .write_all(markdown.as_bytes())
            .map_err(|e| Md2TexError::PandocFailed {
                detail: format!("failed to write markdown to pandoc stdin: {e}"),
            })?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| Md2TexError::PandocFailed {
            detail: format!("failed to wait for pandoc: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Md2TexError::PandocFailed {
            detail: format!("exit status {}: {}", output.status, stderr.trim()),
        });
    }

    let latex = String::from_utf8_lossy(&output.stdout).into_owned();
    debug!(bytes = latex.len(), "pandoc conversion complete");
    Ok(latex)
}

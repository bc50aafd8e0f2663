//! Eager (full-document) conversion entry points.
//!
//! The whole run is a single synchronous batch: read the markdown, extract
//! front matter, shell out to pandoc, splice the boilerplate blocks, rewrite
//! image references line by line, and write the result. No retries and no
//! partial output — the first failure aborts the run.

use crate::config::ConversionConfig;
use crate::error::Md2TexError;
use crate::output::{self, ConversionOutput, ConversionStats, OutputTarget};
use crate::pipeline::{frontmatter, images, input, pandoc, splice};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a markdown file to LaTeX.
///
/// This is the primary entry point for the library. The returned
/// [`ConversionOutput`] holds the generated LaTeX in memory; use
/// [`convert_to_file`] or [`convert_to_writer`] to write it out.
///
/// # Errors
/// Any failure is fatal: missing or unreadable input, malformed front
/// matter, a pandoc failure, a missing anchor line in the generated LaTeX,
/// or an image download/conversion failure.
pub fn convert(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2TexError> {
    convert_inner(input_path.as_ref(), None, config)
}

/// Convert a markdown file and write the LaTeX to `output_path`.
///
/// Unless overridden in the config, rewritten image paths are expressed
/// relative to the output file's directory. The write is atomic (temp file +
/// rename), so a failed run never leaves a partial `.tex` behind.
pub fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Md2TexError> {
    let output_path = output_path.as_ref();
    let result = convert_inner(input_path.as_ref(), Some(output_path), config)?;
    output::write_document::<std::io::Sink>(
        &result.latex,
        OutputTarget::Path(output_path.to_path_buf()),
    )?;
    Ok(result.stats)
}

/// Convert a markdown file and write the LaTeX to a caller-supplied stream.
///
/// With no output file to anchor on, rewritten image paths are expressed
/// relative to the configured output base, or the current directory.
pub fn convert_to_writer<W: Write>(
    input_path: impl AsRef<Path>,
    writer: W,
    config: &ConversionConfig,
) -> Result<ConversionStats, Md2TexError> {
    let result = convert_inner(input_path.as_ref(), None, config)?;
    output::write_document(&result.latex, OutputTarget::Stream(writer))?;
    Ok(result.stats)
}

fn convert_inner(
    input_path: &Path,
    output_file: Option<&Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2TexError> {
    let total_start = Instant::now();
    info!("starting conversion: {}", input_path.display());

    // ── Step 1: Resolve input and derive locations ───────────────────────
    let input_path = input::resolve_input(input_path)?;
    let locations = input::determine_locations(
        &input_path,
        config.output_base.as_deref(),
        output_file,
    );

    // ── Step 2: Read the markdown and split off front matter ─────────────
    let raw = std::fs::read_to_string(&input_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => Md2TexError::PermissionDenied {
            path: input_path.clone(),
        },
        _ => Md2TexError::Internal(format!("failed to read '{}': {e}", input_path.display())),
    })?;
    let (markdown, front_matter) = frontmatter::extract(&raw)?;

    // ── Step 3: Convert markdown to LaTeX via pandoc ─────────────────────
    let pandoc_start = Instant::now();
    let latex = pandoc::markdown_to_latex(&markdown, &config.pandoc_path)?;
    let pandoc_duration_ms = pandoc_start.elapsed().as_millis() as u64;
    debug!(ms = pandoc_duration_ms, "pandoc stage complete");

    let mut lines: Vec<String> = latex.split('\n').map(str::to_string).collect();

    // ── Step 4: Splice margin, title, and header boilerplate ─────────────
    splice::add_margins(&mut lines)?;
    splice::add_title_and_toc(&mut lines, &front_matter, config.require_manufacturer()?)?;
    splice::add_header_and_footer(&mut lines, &front_matter)?;

    // ── Step 5: Rewrite image references line by line ────────────────────
    let line_filter = images::build_line_filter(
        &locations.input_folder,
        &locations.output_base,
        config.download_to.as_deref(),
    );

    let mut image_refs = 0;
    let mut filtered = Vec::with_capacity(lines.len());
    for line in &lines {
        image_refs += images::image_ref_count(line);
        filtered.push(line_filter(line)?);
    }

    // ── Step 6: Assemble the document and stats ──────────────────────────
    let stats = ConversionStats {
        latex_lines: filtered.len(),
        image_refs,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        pandoc_duration_ms,
    };

    info!(
        "conversion complete: {} lines, {} image refs, {}ms",
        stats.latex_lines, stats.image_refs, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        latex: filtered.join("\n"),
        front_matter,
        stats,
    })
}

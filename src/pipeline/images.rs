//! Image handling: rewrite `\includegraphics` references line by line.
//!
//! Markdown and LaTeX have conflicting ideas about images. Markdown happily
//! references remote URLs and SVG files; LaTeX can do neither. The fix is a
//! chain of path filters applied to every image reference pandoc emits:
//!
//! 1. **Relative paths** — references are relative to the markdown file,
//!    but must resolve from the output base the `.tex` is compiled in.
//! 2. **Downloads** — remote URLs are fetched into the staging folder and
//!    replaced with local relative paths (skipped entirely when no staging
//!    folder is configured).
//! 3. **SVG → PDF** — `.svg` references are converted to vector PDFs with
//!    the extension swapped, preserving the leaf name.
//!
//! Each filter receives the output of the previous one. The combined path
//! filter is applied to every reference found in a line, and the resulting
//! line then passes through the width filter, which injects a default
//! `width=0.95\textwidth` wherever scaling is missing.
//!
//! The SVG conversion cannot represent every SVG feature (masks, style
//! sheets, embedded bitmaps degrade or disappear), and two SVGs with the
//! same leaf name in different source directories overwrite each other's
//! converted output. Both limitations are accepted.

use crate::error::Md2TexError;
use crate::pipeline::input::relative_to;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A filter mapping one image reference to a possibly rewritten one.
///
/// Filters may perform disk or network I/O; any failure aborts the whole
/// conversion.
pub type PathFilter = Box<dyn Fn(&str) -> Result<String, Md2TexError>>;

/// Default width argument injected where scaling is missing.
const DEFAULT_WIDTH: &str = r"[width=0.95\textwidth]";

static RE_IMAGE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\includegraphics(\[[^\]]*\])?\{([^}]+)\}").unwrap());

// ── Filter composition ───────────────────────────────────────────────────

/// Compose filters left to right: each receives the previous one's output.
pub fn chain_filters(filters: Vec<PathFilter>) -> PathFilter {
    Box::new(move |path| {
        let mut current = path.to_string();
        for filter in &filters {
            current = filter(&current)?;
        }
        Ok(current)
    })
}

/// Rewrite every image reference in `line` through `filter`, leaving the
/// rest of the line untouched.
pub fn rewrite_image_refs(line: &str, filter: &PathFilter) -> Result<String, Md2TexError> {
    let mut result = String::with_capacity(line.len());
    let mut last_end = 0;

    for caps in RE_IMAGE_REF.captures_iter(line) {
        let whole = caps.get(0).expect("capture 0 always present");
        let options = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let path = &caps[2];

        let rewritten = filter(path)?;
        result.push_str(&line[last_end..whole.start()]);
        result.push_str(r"\includegraphics");
        result.push_str(options);
        result.push('{');
        result.push_str(&rewritten);
        result.push('}');
        last_end = whole.end();
    }

    result.push_str(&line[last_end..]);
    Ok(result)
}

/// Number of image references in `line`.
pub fn image_ref_count(line: &str) -> usize {
    RE_IMAGE_REF.find_iter(line).count()
}

// ── Individual filters ───────────────────────────────────────────────────

/// Check if an image reference is a remote URL rather than a local path.
pub fn is_remote_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Check if an image reference points at an SVG, by filename suffix only.
pub fn image_is_svg(path: &str) -> bool {
    path.ends_with(".svg")
}

/// Map markdown-relative local paths to paths relative to the output base.
pub fn relative_path_filter(input_folder: PathBuf, output_base: PathBuf) -> PathFilter {
    Box::new(move |path| {
        if is_remote_url(path) {
            return Ok(path.to_string());
        }
        let source = input_folder.join(path);
        Ok(relative_to(&source, &output_base).display().to_string())
    })
}

/// Build the download filters: empty when no staging folder is configured,
/// otherwise a single filter that fetches remote URLs into `download_to`
/// and substitutes a local relative path.
pub fn download_filters(download_to: Option<&Path>, output_base: &Path) -> Vec<PathFilter> {
    let Some(download_to) = download_to else {
        return Vec::new();
    };
    let download_to = download_to.to_path_buf();
    let output_base = output_base.to_path_buf();

    vec![Box::new(move |path| {
        if !is_remote_url(path) {
            return Ok(path.to_string());
        }
        let destination = download_to.join(url_leaf_name(path));
        download_image(path, &destination)?;
        Ok(relative_to(&destination, &output_base).display().to_string())
    })]
}

/// Fetch `url` into `destination`, sequentially and without retries.
fn download_image(url: &str, destination: &Path) -> Result<(), Md2TexError> {
    info!("downloading remote image: {}", url);

    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Md2TexError::DownloadFailed {
            url: url.to_string(),
            reason: format!("cannot create staging directory: {e}"),
        })?;
    }

    let response = reqwest::blocking::get(url).map_err(|e| Md2TexError::DownloadFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !response.status().is_success() {
        return Err(Md2TexError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response.bytes().map_err(|e| Md2TexError::DownloadFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    std::fs::write(destination, &bytes).map_err(|e| Md2TexError::DownloadFailed {
        url: url.to_string(),
        reason: format!("cannot write '{}': {e}", destination.display()),
    })?;

    debug!(
        bytes = bytes.len(),
        "saved remote image to {}",
        destination.display()
    );
    Ok(())
}

/// Last path segment of a URL, with any query string dropped.
fn url_leaf_name(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    without_query
        .rsplit('/')
        .next()
        .filter(|leaf| !leaf.is_empty())
        .unwrap_or("image")
        .to_string()
}

/// Convert SVG references to PDF siblings at `convert_to`, returning the new
/// reference relative to the output base. Non-SVG paths pass through.
///
/// Destination filename is the source leaf with the extension swapped; two
/// SVGs sharing a leaf name silently overwrite each other.
pub fn svg_to_pdf_filter(convert_to: PathBuf, output_base: PathBuf) -> PathFilter {
    Box::new(move |path| {
        if !image_is_svg(path) {
            return Ok(path.to_string());
        }
        let source = output_base.join(path);
        let leaf = source
            .file_name()
            .ok_or_else(|| Md2TexError::SvgConversionFailed {
                path: source.clone(),
                detail: "reference has no file name".into(),
            })?;
        let destination = convert_to.join(Path::new(leaf).with_extension("pdf"));
        svg_to_pdf(&source, &destination)?;
        Ok(relative_to(&destination, &output_base).display().to_string())
    })
}

/// Render an SVG file to a vector PDF.
fn svg_to_pdf(source: &Path, destination: &Path) -> Result<(), Md2TexError> {
    info!(
        "converting SVG {} -> {}",
        source.display(),
        destination.display()
    );

    let svg = std::fs::read_to_string(source).map_err(|e| Md2TexError::SvgConversionFailed {
        path: source.to_path_buf(),
        detail: format!("cannot read source: {e}"),
    })?;

    let tree = svg2pdf::usvg::Tree::from_str(&svg, &svg2pdf::usvg::Options::default()).map_err(
        |e| Md2TexError::SvgConversionFailed {
            path: source.to_path_buf(),
            detail: format!("SVG parse error: {e}"),
        },
    )?;

    let pdf = svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| Md2TexError::SvgConversionFailed {
        path: source.to_path_buf(),
        detail: format!("PDF conversion error: {e:?}"),
    })?;

    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Md2TexError::SvgConversionFailed {
            path: source.to_path_buf(),
            detail: format!("cannot create destination directory: {e}"),
        })?;
    }

    std::fs::write(destination, pdf).map_err(|e| Md2TexError::SvgConversionFailed {
        path: source.to_path_buf(),
        detail: format!("cannot write '{}': {e}", destination.display()),
    })
}

// ── Width scaling ────────────────────────────────────────────────────────

/// Inject default width scaling any place scaling is missing.
///
/// This is a blind substitution on the literal `\includegraphics{` token:
/// references that already carry bracket options are untouched because the
/// bare token does not appear in them. The original behaviour is kept
/// deliberately; it does not attempt to merge with pre-existing options.
pub fn graphics_width_filter(line: &str) -> String {
    line.replace(
        r"\includegraphics{",
        &format!(r"\includegraphics{DEFAULT_WIDTH}{{"),
    )
}

// ── Composed line filter ─────────────────────────────────────────────────

/// Build the complete line filter for one conversion run.
///
/// Converted SVGs land in the download staging folder when one is
/// configured, otherwise directly in the output base.
pub fn build_line_filter(
    input_folder: &Path,
    output_base: &Path,
    download_to: Option<&Path>,
) -> impl Fn(&str) -> Result<String, Md2TexError> {
    let svg_destination = download_to.unwrap_or(output_base).to_path_buf();

    let mut filters: Vec<PathFilter> = Vec::new();
    filters.push(relative_path_filter(
        input_folder.to_path_buf(),
        output_base.to_path_buf(),
    ));
    filters.extend(download_filters(download_to, output_base));
    filters.push(svg_to_pdf_filter(
        svg_destination,
        output_base.to_path_buf(),
    ));
    let path_filter = chain_filters(filters);

    move |line: &str| {
        let rewritten = rewrite_image_refs(line, &path_filter)?;
        Ok(graphics_width_filter(&rewritten))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="red"/></svg>"#;

    fn passthrough() -> PathFilter {
        Box::new(|p| Ok(p.to_string()))
    }

    #[test]
    fn width_injected_when_missing() {
        let line = r"\includegraphics{figs/a.png}";
        assert_eq!(
            graphics_width_filter(line),
            r"\includegraphics[width=0.95\textwidth]{figs/a.png}"
        );
    }

    #[test]
    fn existing_width_left_untouched() {
        let line = r"\includegraphics[width=0.5\textwidth]{figs/a.png}";
        assert_eq!(graphics_width_filter(line), line);
    }

    #[test]
    fn non_image_line_unchanged() {
        let line = r"\section{Introduction}";
        assert_eq!(graphics_width_filter(line), line);
    }

    #[test]
    fn chain_applies_in_order() {
        let upper: PathFilter = Box::new(|p| Ok(p.to_uppercase()));
        let suffix: PathFilter = Box::new(|p| Ok(format!("{p}!")));
        let chained = chain_filters(vec![upper, suffix]);
        assert_eq!(chained("abc").unwrap(), "ABC!");
    }

    #[test]
    fn chain_propagates_errors() {
        let failing: PathFilter = Box::new(|_| {
            Err(Md2TexError::DownloadFailed {
                url: "u".into(),
                reason: "r".into(),
            })
        });
        let chained = chain_filters(vec![passthrough(), failing]);
        assert!(chained("x").is_err());
    }

    #[test]
    fn rewrite_preserves_surrounding_text_and_options() {
        let reverse: PathFilter = Box::new(|p| Ok(p.chars().rev().collect()));
        let line = r"before \includegraphics[height=2cm]{ab} middle \includegraphics{cd} after";
        let result = rewrite_image_refs(line, &reverse).unwrap();
        assert_eq!(
            result,
            r"before \includegraphics[height=2cm]{ba} middle \includegraphics{dc} after"
        );
    }

    #[test]
    fn rewrite_counts_refs() {
        assert_eq!(image_ref_count(r"no images here"), 0);
        assert_eq!(
            image_ref_count(r"\includegraphics{a} \includegraphics[width=1cm]{b}"),
            2
        );
    }

    #[test]
    fn remote_url_detection() {
        assert!(is_remote_url("https://example.com/a.png"));
        assert!(is_remote_url("http://example.com/a.png"));
        assert!(!is_remote_url("images/a.png"));
        assert!(!is_remote_url("/abs/a.png"));
    }

    #[test]
    fn svg_detection_is_suffix_only() {
        assert!(image_is_svg("diagram.svg"));
        assert!(image_is_svg("a/b/c.svg"));
        assert!(!image_is_svg("photo.png"));
        assert!(!image_is_svg("archive.svg.zip"));
    }

    #[test]
    fn url_leaf_name_strips_query() {
        assert_eq!(url_leaf_name("https://x.io/a/b/logo.png?v=3"), "logo.png");
        assert_eq!(url_leaf_name("https://x.io/"), "image");
    }

    #[test]
    fn relative_filter_maps_into_output_base() {
        let filter = relative_path_filter(PathBuf::from("docs"), PathBuf::from("build"));
        assert_eq!(filter("images/fig.png").unwrap(), "../docs/images/fig.png");
    }

    #[test]
    fn relative_filter_passes_urls_through() {
        let filter = relative_path_filter(PathBuf::from("docs"), PathBuf::from("build"));
        let url = "https://example.com/fig.png";
        assert_eq!(filter(url).unwrap(), url);
    }

    #[test]
    fn download_filters_empty_without_staging_dir() {
        assert!(download_filters(None, Path::new(".")).is_empty());
    }

    #[test]
    fn download_filter_passes_local_paths_through() {
        let filters = download_filters(Some(Path::new("tmp")), Path::new("."));
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0]("images/fig.png").unwrap(), "images/fig.png");
    }

    #[test]
    fn svg_filter_converts_and_renames() {
        let base = tempfile::tempdir().unwrap();
        std::fs::write(base.path().join("diagram.svg"), TINY_SVG).unwrap();
        let staging = base.path().join("tmp");

        let filter = svg_to_pdf_filter(staging.clone(), base.path().to_path_buf());
        let rewritten = filter("diagram.svg").unwrap();

        assert_eq!(rewritten, "tmp/diagram.pdf");
        assert!(staging.join("diagram.pdf").exists());
    }

    #[test]
    fn svg_filter_passes_non_svg_through() {
        let filter = svg_to_pdf_filter(PathBuf::from("tmp"), PathBuf::from("."));
        assert_eq!(filter("photo.png").unwrap(), "photo.png");
    }

    #[test]
    fn svg_filter_fails_on_missing_source() {
        let base = tempfile::tempdir().unwrap();
        let filter = svg_to_pdf_filter(base.path().join("tmp"), base.path().to_path_buf());
        let err = filter("missing.svg").unwrap_err();
        assert!(matches!(err, Md2TexError::SvgConversionFailed { .. }));
    }

    #[test]
    fn composed_filter_rewrites_svg_line_end_to_end() {
        let root = tempfile::tempdir().unwrap();
        let input_folder = root.path().join("docs");
        let output_base = root.path().join("build");
        let staging = output_base.join("tmp");
        std::fs::create_dir_all(&input_folder).unwrap();
        std::fs::create_dir_all(&output_base).unwrap();
        std::fs::write(input_folder.join("diagram.svg"), TINY_SVG).unwrap();

        let line_filter = build_line_filter(&input_folder, &output_base, Some(&staging));
        let line = r"Text \includegraphics{diagram.svg} more text";
        let result = line_filter(line).unwrap();

        assert_eq!(
            result,
            r"Text \includegraphics[width=0.95\textwidth]{tmp/diagram.pdf} more text"
        );
        assert!(staging.join("diagram.pdf").exists());
    }

    #[test]
    fn remote_svg_url_without_staging_fails_in_svg_stage() {
        // Without a staging folder the URL is never downloaded, but the
        // suffix-based SVG detection still matches it; the conversion then
        // fails trying to read the URL as a local file.
        let root = tempfile::tempdir().unwrap();
        let line_filter = build_line_filter(root.path(), root.path(), None);
        let err = line_filter(r"\includegraphics{https://example.com/d.svg}").unwrap_err();
        assert!(matches!(err, Md2TexError::SvgConversionFailed { .. }));
    }

    #[test]
    fn composed_filter_leaves_plain_lines_alone() {
        let root = tempfile::tempdir().unwrap();
        let line_filter = build_line_filter(root.path(), root.path(), None);
        assert_eq!(line_filter(r"\section{A}").unwrap(), r"\section{A}");
    }
}

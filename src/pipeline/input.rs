//! Input resolution: validate the markdown source and derive the folder
//! layout the image filters operate in.
//!
//! Three locations drive every path rewrite:
//!
//! * the **input folder** — image references in the markdown are relative
//!   to the file they appear in;
//! * the **output base** — the generated LaTeX is compiled from here, so
//!   every rewritten reference must resolve relative to it;
//! * the optional **download staging folder** — where remote images and
//!   converted SVGs are materialised (held in
//!   [`crate::config::ConversionConfig`], not here).

use crate::error::Md2TexError;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// The derived folder layout for one conversion run.
#[derive(Debug, Clone)]
pub struct Locations {
    /// Directory containing the input markdown file.
    pub input_folder: PathBuf,
    /// Directory rewritten image paths are expressed relative to.
    pub output_base: PathBuf,
}

/// Validate that the input markdown file exists and is readable.
pub fn resolve_input(path: &Path) -> Result<PathBuf, Md2TexError> {
    if !path.exists() {
        return Err(Md2TexError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Md2TexError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Md2TexError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("resolved input markdown: {}", path.display());
    Ok(path.to_path_buf())
}

/// Derive the folder layout from the input path, an optional explicit output
/// base, and the output file path (when writing to a file).
///
/// Precedence for the output base: explicit override, else the parent of the
/// output file, else the current directory (stream output has no natural
/// base).
pub fn determine_locations(
    input: &Path,
    explicit_output_base: Option<&Path>,
    output_file: Option<&Path>,
) -> Locations {
    let input_folder = parent_or_dot(input);

    let output_base = match (explicit_output_base, output_file) {
        (Some(base), _) => base.to_path_buf(),
        (None, Some(out)) => parent_or_dot(out),
        (None, None) => PathBuf::from("."),
    };

    debug!(
        input_folder = %input_folder.display(),
        output_base = %output_base.display(),
        "determined locations"
    );

    Locations {
        input_folder,
        output_base,
    }
}

fn parent_or_dot(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Express `path` relative to `base`, walking up with `..` where needed.
///
/// Mirrors `os.path.relpath`: when one argument is absolute and the other
/// relative, both are first resolved against the current directory —
/// otherwise the common-prefix walk would count `..` steps from the
/// filesystem root. Beyond that the computation is lexical (`.` segments
/// dropped, nothing touched on disk), keeping the filters pure given their
/// configuration.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() != base.is_absolute() {
        if let Ok(cwd) = std::env::current_dir() {
            return relative_components(&cwd.join(path), &cwd.join(base));
        }
    }
    relative_components(path, base)
}

fn relative_components(path: &Path, base: &Path) -> PathBuf {
    let path_components: Vec<Component<'_>> = normalise(path);
    let base_components: Vec<Component<'_>> = normalise(base);

    let common = path_components
        .iter()
        .zip(base_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..base_components.len() {
        result.push("..");
    }
    for component in &path_components[common..] {
        result.push(component.as_os_str());
    }

    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

fn normalise(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_is_not_found() {
        let err = resolve_input(Path::new("/no/such/file.md")).unwrap_err();
        assert!(matches!(err, Md2TexError::FileNotFound { .. }));
    }

    #[test]
    fn existing_input_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.md");
        std::fs::write(&file, "# hi\n").unwrap();
        assert_eq!(resolve_input(&file).unwrap(), file);
    }

    #[test]
    fn locations_default_to_output_parent() {
        let locations = determine_locations(
            Path::new("docs/manual.md"),
            None,
            Some(Path::new("build/manual.tex")),
        );
        assert_eq!(locations.input_folder, PathBuf::from("docs"));
        assert_eq!(locations.output_base, PathBuf::from("build"));
    }

    #[test]
    fn explicit_base_wins() {
        let locations = determine_locations(
            Path::new("docs/manual.md"),
            Some(Path::new("release")),
            Some(Path::new("build/manual.tex")),
        );
        assert_eq!(locations.output_base, PathBuf::from("release"));
    }

    #[test]
    fn stream_output_uses_current_dir() {
        let locations = determine_locations(Path::new("manual.md"), None, None);
        assert_eq!(locations.input_folder, PathBuf::from("."));
        assert_eq!(locations.output_base, PathBuf::from("."));
    }

    #[test]
    fn relative_to_sibling() {
        assert_eq!(
            relative_to(Path::new("docs/images/fig.png"), Path::new("build")),
            PathBuf::from("../docs/images/fig.png")
        );
    }

    #[test]
    fn relative_to_nested() {
        assert_eq!(
            relative_to(Path::new("build/tmp/fig.pdf"), Path::new("build")),
            PathBuf::from("tmp/fig.pdf")
        );
    }

    #[test]
    fn relative_to_same_dir() {
        assert_eq!(
            relative_to(Path::new("build"), Path::new("build")),
            PathBuf::from(".")
        );
    }

    #[test]
    fn relative_to_mixed_relative_path_absolute_base() {
        // A relative path against an absolute base must resolve via the
        // current directory, not walk up from the filesystem root.
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            relative_to(Path::new("manual.png"), &cwd.join("tmp/out")),
            PathBuf::from("../../manual.png")
        );
    }

    #[test]
    fn relative_to_mixed_absolute_path_relative_base() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            relative_to(&cwd.join("assets/fig.png"), Path::new("build")),
            PathBuf::from("../assets/fig.png")
        );
    }

    #[test]
    fn relative_to_ignores_cur_dir_segments() {
        assert_eq!(
            relative_to(Path::new("./docs/fig.png"), Path::new(".")),
            PathBuf::from("docs/fig.png")
        );
    }
}

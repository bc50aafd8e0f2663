//! Configuration types for Markdown-to-LaTeX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs between the library and the CLI and to diff
//! two runs to understand why their outputs differ.

use crate::error::Md2TexError;
use std::path::PathBuf;

/// Configuration for a Markdown-to-LaTeX conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use md2tex::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .manufacturer("Acme")
///     .download_to("tmp")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Base directory the rewritten image paths are expressed relative to.
    ///
    /// Image references in the generated LaTeX must resolve from wherever
    /// the `.tex` file is compiled. If `None`, the parent directory of the
    /// output file is used, or the current directory when writing to a
    /// stream.
    pub output_base: Option<PathBuf>,

    /// Staging directory for downloaded remote images and converted SVGs.
    ///
    /// When `None`, remote image URLs pass through untouched, so LaTeX
    /// fails to include them at compile time — except URLs ending in
    /// `.svg`, which the suffix-based SVG filter still picks up and fails
    /// on inside md2tex (it cannot read a URL from disk). When set,
    /// converted SVGs land here too instead of the output base.
    pub download_to: Option<PathBuf>,

    /// Manufacturer name rendered into `\author{}`.
    ///
    /// Supplied by the operator rather than the document: the same markdown
    /// source is typically built by different organisations. Required by the
    /// title and header splice; conversion fails without it.
    pub manufacturer: Option<String>,

    /// Pandoc binary to invoke. Default: `pandoc` (resolved via PATH).
    pub pandoc_path: PathBuf,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_base: None,
            download_to: None,
            manufacturer: None,
            pandoc_path: PathBuf::from("pandoc"),
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The manufacturer name, or an error naming the missing setting.
    pub(crate) fn require_manufacturer(&self) -> Result<&str, Md2TexError> {
        self.manufacturer.as_deref().ok_or_else(|| {
            Md2TexError::InvalidConfig(
                "manufacturer name is required to render the \\author{} block \
                 (set it with ConversionConfigBuilder::manufacturer or --manufacturer)"
                    .into(),
            )
        })
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn output_base(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_base = Some(dir.into());
        self
    }

    pub fn download_to(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.download_to = Some(dir.into());
        self
    }

    pub fn manufacturer(mut self, name: impl Into<String>) -> Self {
        self.config.manufacturer = Some(name.into());
        self
    }

    pub fn pandoc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pandoc_path = path.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Md2TexError> {
        let c = &self.config;
        if c.pandoc_path.as_os_str().is_empty() {
            return Err(Md2TexError::InvalidConfig(
                "pandoc path must not be empty".into(),
            ));
        }
        if let Some(ref dir) = c.download_to {
            if dir.as_os_str().is_empty() {
                return Err(Md2TexError::InvalidConfig(
                    "download staging directory must not be empty".into(),
                ));
            }
        }
        if let Some(ref name) = c.manufacturer {
            if name.trim().is_empty() {
                return Err(Md2TexError::InvalidConfig(
                    "manufacturer name must not be blank".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

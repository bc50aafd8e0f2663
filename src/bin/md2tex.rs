//! CLI binary for md2tex.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` and prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use md2tex::{convert_to_file, convert_to_writer, ConversionConfig};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (stdout)
  md2tex manual.md --manufacturer "Acme Devices Inc."

  # Convert to file; image paths resolve from the output directory
  md2tex manual.md -o build/manual.tex --manufacturer "Acme Devices Inc."

  # Download remote images and stage converted SVGs under build/tmp
  md2tex manual.md -o build/manual.tex --download-to build/tmp \
      --manufacturer "Acme Devices Inc."

  # Use a specific pandoc binary
  md2tex manual.md --pandoc /opt/pandoc/bin/pandoc --manufacturer Acme

The input must carry YAML front matter with at least `title` and `id`
(optionally `revision`), delimited by `---` lines."#;

/// Convert GitHub-flavored Markdown with YAML front matter into styled LaTeX.
#[derive(Parser, Debug)]
#[command(name = "md2tex", version, about, after_help = AFTER_HELP)]
struct Cli {
    /// Input markdown file
    input: PathBuf,

    /// Output LaTeX file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory rewritten image paths are expressed relative to
    /// (default: the output file's directory)
    #[arg(long, value_name = "DIR")]
    output_base: Option<PathBuf>,

    /// Staging directory for downloaded remote images and converted SVGs;
    /// remote URLs are left untouched when omitted
    #[arg(long, value_name = "DIR")]
    download_to: Option<PathBuf>,

    /// Manufacturer name rendered into the \author{} block
    #[arg(long, env = "MD2TEX_MANUFACTURER")]
    manufacturer: Option<String>,

    /// Pandoc binary to invoke
    #[arg(long, default_value = "pandoc")]
    pandoc: PathBuf,

    /// Verbose logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "md2tex=info",
        _ => "md2tex=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut builder = ConversionConfig::builder().pandoc_path(&cli.pandoc);
    if let Some(base) = &cli.output_base {
        builder = builder.output_base(base);
    }
    if let Some(dir) = &cli.download_to {
        builder = builder.download_to(dir);
    }
    if let Some(name) = &cli.manufacturer {
        builder = builder.manufacturer(name.as_str());
    }
    let config = builder.build().context("invalid configuration")?;

    let stats = match &cli.output {
        Some(output) => convert_to_file(&cli.input, output, &config)
            .with_context(|| format!("converting '{}'", cli.input.display()))?,
        None => convert_to_writer(&cli.input, io::stdout().lock(), &config)
            .with_context(|| format!("converting '{}'", cli.input.display()))?,
    };

    // Summary goes to stderr so stdout stays clean LaTeX when piping.
    let plain = !io::stderr().is_terminal();
    let summary = format!(
        "{} lines, {} image refs  {}",
        stats.latex_lines,
        stats.image_refs,
        if plain {
            format!("({}ms, pandoc {}ms)", stats.total_duration_ms, stats.pandoc_duration_ms)
        } else {
            dim(&format!(
                "({}ms, pandoc {}ms)",
                stats.total_duration_ms, stats.pandoc_duration_ms
            ))
        },
    );
    if plain {
        eprintln!("converted: {summary}");
    } else {
        eprintln!("{} {} {summary}", green("✔"), bold("converted:"));
    }

    Ok(())
}

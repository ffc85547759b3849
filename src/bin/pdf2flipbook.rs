//! CLI binary for pdf2flipbook.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, runs the conversion, and packages the result to a
//! directory or ZIP file.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2flipbook::{
    convert, package, ConversionConfig, ConversionRequest, TesseractRecognizer, TextRecognizer,
    ViewerOptions,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
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
  # Basic conversion (writes ./document-flipbook/)
  pdf2flipbook document.pdf

  # Named output directory and title
  pdf2flipbook zpravodaj.pdf -o out --title "Zpravodaj 09/2025"

  # OCR search data (Czech) and a download button
  pdf2flipbook zpravodaj.pdf --ocr --download

  # English OCR at higher render DPI
  pdf2flipbook scan.pdf --ocr --ocr-lang eng --dpi 200

  # Package as a ZIP archive instead of a directory
  pdf2flipbook document.pdf --zip document-flipbook.zip

REQUIREMENTS:
  Rendering needs the pdfium shared library (system install, or point
  PDFIUM_LIB_PATH at a copy). --ocr shells out to the `tesseract`
  executable; install it together with the language pack you pass to
  --ocr-lang (e.g. tesseract-ocr-ces).
"#;

/// Convert a PDF document into a static HTML flipbook.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2flipbook",
    version,
    about = "Convert a PDF document into a static HTML flipbook",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF file to convert.
    input: PathBuf,

    /// Output directory (default: "<input stem>-flipbook").
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a ZIP archive to this path instead of a directory.
    #[arg(long, conflicts_with = "output")]
    zip: Option<PathBuf>,

    /// Flipbook title (default: the input file stem).
    #[arg(short, long)]
    title: Option<String>,

    /// Rendering DPI (72–400).
    #[arg(long, env = "FLIPBOOK_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// Run OCR over the pages and embed search data.
    #[arg(long, env = "FLIPBOOK_OCR")]
    ocr: bool,

    /// OCR language model (tesseract code, e.g. ces, eng, ces+eng).
    #[arg(long, env = "FLIPBOOK_OCR_LANG", default_value = "ces")]
    ocr_lang: String,

    /// Bundle the source PDF and show a download button.
    #[arg(long)]
    download: bool,

    /// Disable the zoom buttons in the generated viewer.
    #[arg(long)]
    no_zoom: bool,

    /// Disable the page-menu overlay in the generated viewer.
    #[arg(long)]
    no_menu: bool,

    /// Include the AI-summary placeholder button in the toolbar.
    #[arg(long)]
    ai_summary: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    if !cli.input.exists() {
        bail!("PDF file not found: {}", cli.input.display());
    }

    let pdf = std::fs::read(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let title = cli.title.clone().unwrap_or_else(|| {
        cli.input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Flipbook".to_string())
    });

    let config = ConversionConfig::builder()
        .dpi(cli.dpi)
        .extract_text(cli.ocr)
        .ocr_language(cli.ocr_lang.clone())
        .include_source_pdf(cli.download)
        .viewer(ViewerOptions {
            search: true,
            zoom_panel: !cli.no_zoom,
            sidebar_menu: !cli.no_menu,
            download_button: cli.download,
            ai_summary_stub: cli.ai_summary,
        })
        .build()
        .context("Invalid configuration")?;

    if cli.ocr && !TesseractRecognizer.is_available() && !cli.quiet {
        eprintln!(
            "warning: tesseract executable not found; pages will have empty search text"
        );
    }

    let spinner = if cli.quiet {
        None
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Converting {}…", cli.input.display()));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    };

    let request = ConversionRequest::new(pdf, title);
    let result = convert(&request, &config).context("Conversion failed")?;

    // ── Package ──────────────────────────────────────────────────────────
    let destination = if let Some(ref zip_path) = cli.zip {
        let bytes = package::zip::write(&result).context("ZIP packaging failed")?;
        std::fs::write(zip_path, &bytes)
            .with_context(|| format!("Failed to write {}", zip_path.display()))?;
        zip_path.clone()
    } else {
        let out_dir = cli.output.clone().unwrap_or_else(|| {
            let stem = cli
                .input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "flipbook".to_string());
            PathBuf::from(format!("{stem}-flipbook"))
        });
        package::dir::write(&result, &out_dir).context("Packaging failed")?;
        out_dir
    };

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    if !cli.quiet {
        eprintln!(
            "{} {} pages  {}ms  →  {}",
            green("✔"),
            bold(&result.page_count.to_string()),
            result.stats.total_duration_ms,
            bold(&destination.display().to_string()),
        );
        if config.extract_text {
            let recognized = result.page_count - result.stats.ocr_failed_pages;
            eprintln!(
                "   {}",
                dim(&format!(
                    "OCR: {recognized}/{} pages recognised",
                    result.page_count
                ))
            );
        }
        if cli.zip.is_none() {
            eprintln!("   {}", dim("Open index.html in a browser to view"));
        }
    }

    Ok(())
}

//! # pdf2flipbook
//!
//! Convert PDF documents into self-contained, browser-viewable flipbooks.
//!
//! ## What is a flipbook?
//!
//! A static website bundle simulating a page-turning book viewer: one JPEG
//! per page, a thumbnail strip, optional OCR-derived search data, and a
//! generated HTML/CSS/JS viewer. Drop the bundle on any static host (or
//! open `index.html` from disk) and it works — no server component.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Rasterize  render each page via pdfium → JPEG q85 + ≤200×300 thumb q75
//!  ├─ 2. Extract    optional per-page OCR (tesseract); failures degrade, never abort
//!  ├─ 3. Assemble   deterministic HTML/CSS/JS from one parameterised template
//!  └─ 4. Package    directory tree, in-memory ZIP, or S3 prefix
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2flipbook::{convert, ConversionConfig, ConversionRequest};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pdf = std::fs::read("zpravodaj.pdf")?;
//!     let request = ConversionRequest::new(pdf, "Zpravodaj 09/2025");
//!     let config = ConversionConfig::builder().extract_text(true).build()?;
//!
//!     let result = convert(&request, &config)?;
//!     pdf2flipbook::package::dir::write(&result, "zpravodaj-flipbook".as_ref())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | The `pdf2flipbook` binary (clap + anyhow + indicatif) |
//! | `server` | off     | The `flipbook-server` binary (axum + sqlx conversion log) |
//! | `s3`     | off     | The object-storage packaging destination (aws-sdk-s3) |
//!
//! ## Requirements
//!
//! Rasterization binds to the pdfium shared library at runtime (system
//! install or `PDFIUM_LIB_PATH`). OCR shells out to the `tesseract`
//! executable with the requested language pack installed; pages that fail
//! to recognise degrade to empty search text.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod package;
pub mod pipeline;
pub mod templates;

#[cfg(feature = "server")]
pub mod log;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, ViewerOptions};
pub use convert::{convert, convert_blocking, convert_with_recognizer};
pub use error::FlipbookError;
pub use output::{
    Assets, ConversionRequest, ConversionResult, ConversionStats, PageImage, PageText, SearchData,
};
pub use pipeline::extract::{TesseractRecognizer, TextRecognizer};

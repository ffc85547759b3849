//! Error types for the pdf2flipbook library.
//!
//! One enum covers every fatal failure mode: [`FlipbookError`] is returned
//! from the top-level `convert*` functions and from the packaging
//! destinations, and the conversion is abandoned as a whole.
//!
//! Per-page OCR failure is deliberately **not** an error type. Recognition
//! quality is inherently unreliable, so a page that fails to recognise
//! degrades to empty text instead of aborting the batch. That outcome is
//! carried in [`crate::output::PageText`] so the degrade-don't-abort policy
//! is visible in the type rather than hidden in a catch block.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2flipbook library.
#[derive(Debug, Error)]
pub enum FlipbookError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The request payload is empty or is not a PDF at all.
    ///
    /// Raised before any pipeline stage runs.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    // ── Decode errors ─────────────────────────────────────────────────────
    /// The rasterization engine could not open the document
    /// (corrupt, encrypted, or unsupported).
    #[error("Cannot decode PDF: {detail}")]
    Decode { detail: String },

    /// Rendering failed for a specific page after the document opened.
    #[error("Rasterization failed for page {page}: {detail}")]
    PageRender { page: usize, detail: String },

    /// JPEG encoding failed for a rendered page.
    #[error("Image encoding failed for page {page}: {detail}")]
    PageEncode { page: usize, detail: String },

    // ── Packaging errors ──────────────────────────────────────────────────
    /// A destination write failed. The whole conversion fails; the caller
    /// must treat the bundle as not produced even if some entries were
    /// already written.
    #[error("Packaging to {destination} failed: {detail}")]
    Packaging { destination: String, detail: String },

    /// Could not create or write a file in the output directory.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

//! The conversion routine every front door funnels into.
//!
//! Strictly linear: validate input, rasterize, optionally extract text,
//! assemble assets, compute stats. Each stage runs to completion or the
//! whole conversion fails; there is no suspend/resume and no partial result
//! visible to the caller.
//!
//! The pipeline is synchronous and blocking by design — one request, one
//! logical thread of control. Async callers (the HTTP front door) wrap it
//! in `tokio::task::spawn_blocking`; see [`convert_blocking`].

use crate::config::ConversionConfig;
use crate::error::FlipbookError;
use crate::output::{slugify, ConversionRequest, ConversionResult, ConversionStats, SearchData};
use crate::pipeline::extract::{extract_text, TesseractRecognizer, TextRecognizer};
use crate::pipeline::{assemble, rasterize};
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF into an in-memory flipbook bundle.
///
/// Uses the Tesseract backend when `config.extract_text` is set; inject a
/// different backend via [`convert_with_recognizer`].
///
/// # Errors
/// Returns [`FlipbookError::InvalidInput`] for a missing/non-PDF payload
/// before any stage runs, and [`FlipbookError::Decode`] when the document
/// cannot be opened. Per-page OCR failure is not an error (see
/// [`crate::output::PageText`]).
pub fn convert(
    request: &ConversionRequest,
    config: &ConversionConfig,
) -> Result<ConversionResult, FlipbookError> {
    convert_with_recognizer(request, config, &TesseractRecognizer)
}

/// [`convert`] with a caller-supplied OCR backend.
pub fn convert_with_recognizer(
    request: &ConversionRequest,
    config: &ConversionConfig,
    recognizer: &dyn TextRecognizer,
) -> Result<ConversionResult, FlipbookError> {
    let total_start = Instant::now();
    validate_pdf_payload(&request.pdf)?;
    info!(
        "Starting conversion: '{}' ({} bytes)",
        request.title,
        request.pdf.len()
    );

    // ── Rasterize ────────────────────────────────────────────────────────
    let rasterize_start = Instant::now();
    let pages = rasterize::rasterize(&request.pdf, config)?;
    let rasterize_duration_ms = rasterize_start.elapsed().as_millis() as u64;
    info!(
        "Rasterized {} pages in {}ms",
        pages.len(),
        rasterize_duration_ms
    );

    // ── Extract text (optional) ──────────────────────────────────────────
    let mut ocr_duration_ms = 0;
    let mut ocr_failed_pages = 0;
    let search = if config.extract_text {
        let ocr_start = Instant::now();
        let texts = extract_text(&pages, recognizer, config);
        ocr_duration_ms = ocr_start.elapsed().as_millis() as u64;
        ocr_failed_pages = texts.values().filter(|t| t.is_failed()).count();
        debug!(
            "OCR finished in {}ms ({} pages failed)",
            ocr_duration_ms, ocr_failed_pages
        );
        Some(SearchData::from_page_texts(&texts))
    } else {
        None
    };

    // ── Assemble assets ──────────────────────────────────────────────────
    let source_pdf_name = config
        .include_source_pdf
        .then(|| format!("{}.pdf", slugify(&request.title)));
    let assets = assemble::assemble(
        pages.len(),
        &request.title,
        search.as_ref(),
        &config.viewer,
        source_pdf_name.as_deref(),
    );

    let page_count = pages.len();
    let stats = ConversionStats {
        page_count,
        ocr_failed_pages,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        rasterize_duration_ms,
        ocr_duration_ms,
    };
    info!(
        "Conversion complete: {} pages in {}ms",
        page_count, stats.total_duration_ms
    );

    Ok(ConversionResult {
        pages,
        search,
        assets,
        source_pdf: config
            .include_source_pdf
            .then(|| request.pdf.clone()),
        source_pdf_name,
        title: request.title.clone(),
        page_count,
        stats,
    })
}

/// Run [`convert`] on the blocking thread pool.
///
/// pdfium and the OCR engine are both CPU-bound blocking work; this keeps
/// them off the async executor's worker threads.
pub async fn convert_blocking(
    request: ConversionRequest,
    config: ConversionConfig,
) -> Result<ConversionResult, FlipbookError> {
    tokio::task::spawn_blocking(move || convert(&request, &config))
        .await
        .map_err(|e| FlipbookError::Internal(format!("conversion task panicked: {e}")))?
}

/// Reject empty or non-PDF payloads before any pipeline stage runs.
fn validate_pdf_payload(bytes: &[u8]) -> Result<(), FlipbookError> {
    if bytes.is_empty() {
        return Err(FlipbookError::InvalidInput {
            reason: "PDF payload is empty".into(),
        });
    }
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let magic: Vec<u8> = bytes.iter().take(4).copied().collect();
        return Err(FlipbookError::InvalidInput {
            reason: format!("payload is not a PDF (first bytes: {magic:?})"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_an_input_error() {
        let request = ConversionRequest::new(Vec::new(), "Empty");
        let err = convert(&request, &ConversionConfig::default()).unwrap_err();
        assert!(matches!(err, FlipbookError::InvalidInput { .. }));
    }

    #[test]
    fn wrong_magic_is_an_input_error() {
        let request = ConversionRequest::new(b"PK\x03\x04not a pdf".to_vec(), "Zip");
        let err = convert(&request, &ConversionConfig::default()).unwrap_err();
        match err {
            FlipbookError::InvalidInput { reason } => {
                assert!(reason.contains("not a PDF"), "got: {reason}")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn magic_check_accepts_pdf_header() {
        assert!(validate_pdf_payload(b"%PDF-1.7\n...").is_ok());
    }
}

//! Input and output types for a conversion run.
//!
//! Everything here is plain owned data: the pipeline produces a
//! [`ConversionResult`] in memory and hands it to a packaging destination.
//! Nothing is persisted independently of the run's output bundle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable input to one conversion run.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Raw PDF bytes.
    pub pdf: Vec<u8>,
    /// Display title, embedded (escaped) into the generated HTML.
    pub title: String,
}

impl ConversionRequest {
    pub fn new(pdf: Vec<u8>, title: impl Into<String>) -> Self {
        Self {
            pdf,
            title: title.into(),
        }
    }
}

/// One rendered page: full-size and thumbnail JPEG bytes.
///
/// Ordinals are 1-based, dense, and match the source PDF's physical page
/// order — they are the canonical numbering for every later stage.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub ordinal: u32,
    pub full: Vec<u8>,
    pub thumb: Vec<u8>,
}

/// Per-page text extraction outcome.
///
/// A page that fails to recognise degrades to empty text instead of aborting
/// the batch; the failure detail is kept for logging but renders as `""`
/// everywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageText {
    Recognized(String),
    Failed { detail: String },
}

impl PageText {
    /// The text as embedded in search data: recognised text, or the empty
    /// string for a failed page.
    pub fn as_str(&self) -> &str {
        match self {
            PageText::Recognized(text) => text,
            PageText::Failed { .. } => "",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageText::Failed { .. })
    }
}

/// The client-side search payload: `{"pages": {"1": "...", ...}}`.
///
/// Keys are stringified ordinals to match the JSON shape the viewer script
/// consumes. The same serialisation is embedded in `index.html` and written
/// as `search_data.json`, so both forms always carry the identical mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchData {
    pub pages: BTreeMap<String, String>,
}

impl SearchData {
    /// Build the payload from the extractor's ordinal-keyed mapping.
    pub fn from_page_texts(texts: &BTreeMap<u32, PageText>) -> Self {
        let pages = texts
            .iter()
            .map(|(ordinal, text)| (ordinal.to_string(), text.as_str().to_string()))
            .collect();
        Self { pages }
    }

    /// Serialise to the JSON document written as `search_data.json`.
    pub fn to_json(&self) -> String {
        // BTreeMap keys give a stable order, so this is byte-deterministic.
        serde_json::to_string_pretty(self).expect("search data serialises")
    }
}

/// The three generated viewer documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assets {
    pub html: String,
    pub css: String,
    pub js: String,
}

/// Wall-clock accounting for one conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    pub page_count: usize,
    /// Pages whose OCR pass failed (0 when extraction is disabled).
    pub ocr_failed_pages: usize,
    pub total_duration_ms: u64,
    pub rasterize_duration_ms: u64,
    pub ocr_duration_ms: u64,
}

/// The full output of one conversion run — the sole unit handed to any
/// packaging destination.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Rendered pages in source order, ordinals 1..N.
    pub pages: Vec<PageImage>,
    /// Search payload; present only when extraction ran.
    pub search: Option<SearchData>,
    /// Generated viewer documents.
    pub assets: Assets,
    /// Source PDF carried through for the download button, when requested.
    pub source_pdf: Option<Vec<u8>>,
    /// File name the source PDF is bundled under (slug of the title).
    pub source_pdf_name: Option<String>,
    pub title: String,
    pub page_count: usize,
    pub stats: ConversionStats,
}

/// Derive a filesystem- and URL-safe slug from a display title.
///
/// Mirrors the naming used for download filenames and storage prefixes:
/// lowercase, whitespace and path separators collapsed to `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for ch in title.chars() {
        let ch = ch.to_lowercase().next().unwrap_or(ch);
        if ch.is_alphanumeric() {
            slug.push(ch);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "flipbook".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_page_text_renders_empty() {
        let t = PageText::Failed {
            detail: "engine crashed".into(),
        };
        assert_eq!(t.as_str(), "");
        assert!(t.is_failed());
    }

    #[test]
    fn search_data_keys_are_stringified_ordinals() {
        let mut texts = BTreeMap::new();
        texts.insert(1, PageText::Recognized("hello".into()));
        texts.insert(2, PageText::Failed { detail: "x".into() });
        let data = SearchData::from_page_texts(&texts);
        assert_eq!(data.pages.get("1").map(String::as_str), Some("hello"));
        assert_eq!(data.pages.get("2").map(String::as_str), Some(""));
    }

    #[test]
    fn search_data_json_has_pages_envelope() {
        let mut texts = BTreeMap::new();
        texts.insert(1, PageText::Recognized("obsah".into()));
        let json = SearchData::from_page_texts(&texts).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pages"]["1"], "obsah");
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Zpravodaj 09/2025"), "zpravodaj-09-2025");
        assert_eq!(slugify("  Hello   World  "), "hello-world");
        assert_eq!(slugify("///"), "flipbook");
    }
}

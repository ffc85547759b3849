//! Configuration types for PDF-to-flipbook conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across front doors, serialise them for logging,
//! and diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on documented
//! defaults for the rest.

use crate::error::FlipbookError;
use serde::{Deserialize, Serialize};

/// Configuration for a PDF-to-flipbook conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2flipbook::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .dpi(150)
///     .extract_text(true)
///     .ocr_language("eng")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Rendering DPI used when rasterizing each PDF page. Range: 72–400. Default: 150.
    ///
    /// 150 DPI keeps on-screen pages sharp while the full bundle of a typical
    /// 30-page newsletter stays under a few tens of megabytes. Increase for
    /// small-print documents; decrease when bundle size matters more.
    pub dpi: u32,

    /// JPEG quality for full-size page images. Default: 85.
    pub page_quality: u8,

    /// JPEG quality for thumbnails. Default: 75.
    pub thumb_quality: u8,

    /// Thumbnail bounding box, width then height, in pixels. Default: 200×300.
    ///
    /// Thumbnails are scaled to fit inside this box with the aspect ratio
    /// preserved; pages already smaller than the box are left untouched.
    pub thumb_bounds: (u32, u32),

    /// Run OCR over the rendered pages and embed search data. Default: false.
    pub extract_text: bool,

    /// Language model passed to the OCR engine. Default: "ces".
    pub ocr_language: String,

    /// Maximum image width handed to the OCR engine, in pixels. Default: 2000.
    ///
    /// Recognition cost grows with pixel count while accuracy plateaus well
    /// below print resolution. Pages wider than this are downsampled (aspect
    /// preserved) before recognition; the bundled page image is unaffected.
    pub ocr_max_width: u32,

    /// Carry the source PDF into the bundle for the download button. Default: false.
    pub include_source_pdf: bool,

    /// Feature switches for the generated viewer.
    pub viewer: ViewerOptions,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: 150,
            page_quality: 85,
            thumb_quality: 75,
            thumb_bounds: (200, 300),
            extract_text: false,
            ocr_language: "ces".to_string(),
            ocr_max_width: 2000,
            include_source_pdf: false,
            viewer: ViewerOptions::default(),
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
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn page_quality(mut self, q: u8) -> Self {
        self.config.page_quality = q.clamp(1, 100);
        self
    }

    pub fn thumb_quality(mut self, q: u8) -> Self {
        self.config.thumb_quality = q.clamp(1, 100);
        self
    }

    pub fn thumb_bounds(mut self, width: u32, height: u32) -> Self {
        self.config.thumb_bounds = (width.max(16), height.max(16));
        self
    }

    pub fn extract_text(mut self, v: bool) -> Self {
        self.config.extract_text = v;
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn ocr_max_width(mut self, px: u32) -> Self {
        self.config.ocr_max_width = px.max(100);
        self
    }

    pub fn include_source_pdf(mut self, v: bool) -> Self {
        self.config.include_source_pdf = v;
        self
    }

    pub fn viewer(mut self, options: ViewerOptions) -> Self {
        self.config.viewer = options;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, FlipbookError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 400 {
            return Err(FlipbookError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                c.dpi
            )));
        }
        if c.ocr_language.is_empty() {
            return Err(FlipbookError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        if !c
            .ocr_language
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '+')
        {
            // Language codes go straight onto the OCR engine's command line.
            return Err(FlipbookError::InvalidConfig(format!(
                "OCR language '{}' contains invalid characters",
                c.ocr_language
            )));
        }
        Ok(self.config)
    }
}

/// Feature switches for the generated viewer documents.
///
/// One parameterised template per document type, selected here, replaces the
/// historical practice of keeping a separately edited copy of the template
/// for each feature combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerOptions {
    /// In-browser full-text search overlay (requires search data). Default: true.
    pub search: bool,
    /// Zoom in/out buttons and scale transform on the page container. Default: true.
    pub zoom_panel: bool,
    /// Page-list menu overlay. Default: true.
    pub sidebar_menu: bool,
    /// Download button linking to the bundled source PDF. Default: false.
    pub download_button: bool,
    /// Placeholder button for a not-yet-available AI page summary. Default: false.
    pub ai_summary_stub: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            search: true,
            zoom_panel: true,
            sidebar_menu: true,
            download_button: false,
            ai_summary_stub: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let c = ConversionConfig::default();
        assert_eq!(c.dpi, 150);
        assert_eq!(c.page_quality, 85);
        assert_eq!(c.thumb_quality, 75);
        assert_eq!(c.thumb_bounds, (200, 300));
        assert!(!c.extract_text);
        assert_eq!(c.ocr_language, "ces");
        assert_eq!(c.ocr_max_width, 2000);
    }

    #[test]
    fn builder_clamps_dpi() {
        let c = ConversionConfig::builder().dpi(9999).build().unwrap();
        assert_eq!(c.dpi, 400);
        let c = ConversionConfig::builder().dpi(10).build().unwrap();
        assert_eq!(c.dpi, 72);
    }

    #[test]
    fn builder_rejects_shell_metacharacters_in_language() {
        let result = ConversionConfig::builder().ocr_language("ces; rm -rf /").build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_accepts_combined_language_codes() {
        let c = ConversionConfig::builder()
            .ocr_language("ces+eng")
            .build()
            .unwrap();
        assert_eq!(c.ocr_language, "ces+eng");
    }
}

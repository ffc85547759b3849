//! Text extraction: per-page OCR over the rendered page images.
//!
//! This is the only stage where graceful degradation is a deliberate design
//! choice. OCR engines fail in uninteresting ways (glyph soup, locale
//! issues, missing language packs) and none of them justify losing the
//! whole conversion — a page that fails to recognise becomes
//! [`PageText::Failed`] and the batch carries on. The returned mapping
//! always has exactly one entry per input page.
//!
//! The engine itself sits behind [`TextRecognizer`] so tests can inject a
//! mock and alternative backends can be added without touching the stage.

use crate::config::ConversionConfig;
use crate::output::{PageImage, PageText};
use image::imageops::FilterType;
use std::collections::BTreeMap;
use std::process::Command;
use tracing::{debug, warn};

/// An OCR backend: image bytes in, recognised text out.
///
/// Implementations receive a PNG (lossless input keeps glyph edges crisp)
/// already downsampled to the configured recognition width.
pub trait TextRecognizer {
    /// Short backend name, for logs.
    fn name(&self) -> &str;

    /// Whether the backend can run on this machine.
    fn is_available(&self) -> bool;

    /// Recognise text in the image. Errors are strings: the stage turns
    /// them into [`PageText::Failed`], never into a fatal error.
    fn recognize(&self, image_png: &[u8], language: &str) -> Result<String, String>;
}

/// Tesseract backend, invoked through the `tesseract` executable.
///
/// `--oem 3` selects the default engine; `--psm 3` is full automatic page
/// segmentation, the right mode for whole newsletter pages.
#[derive(Debug, Default)]
pub struct TesseractRecognizer;

impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn recognize(&self, image_png: &[u8], language: &str) -> Result<String, String> {
        let scratch = tempfile::tempdir().map_err(|e| format!("scratch dir: {e}"))?;
        let input_path = scratch.path().join("page.png");
        // Tesseract appends ".txt" to the output base itself.
        let output_base = scratch.path().join("out");

        std::fs::write(&input_path, image_png).map_err(|e| format!("write scratch: {e}"))?;

        let output = Command::new("tesseract")
            .arg(&input_path)
            .arg(&output_base)
            .arg("-l")
            .arg(language)
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg("3")
            .output()
            .map_err(|e| format!("spawn tesseract: {e}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("tesseract exited with error: {}", stderr.trim()));
        }

        let text_path = scratch.path().join("out.txt");
        std::fs::read_to_string(&text_path).map_err(|e| format!("read output: {e}"))
        // `scratch` drops here and removes both files.
    }
}

/// Run OCR over every page, isolating per-page failures.
///
/// Uses the full-size image, not the thumbnail — resolution matters for
/// recognition accuracy. Returns a dense mapping with exactly one entry per
/// page in the rasterizer's ordinal numbering.
pub fn extract_text(
    pages: &[PageImage],
    recognizer: &dyn TextRecognizer,
    config: &ConversionConfig,
) -> BTreeMap<u32, PageText> {
    let mut texts = BTreeMap::new();

    for page in pages {
        let outcome = match recognition_input(&page.full, config.ocr_max_width) {
            Ok(png) => recognizer
                .recognize(&png, &config.ocr_language)
                .map(|raw| normalize_text(&raw)),
            Err(detail) => Err(detail),
        };

        let entry = match outcome {
            Ok(text) => {
                debug!("OCR page {}: {} chars", page.ordinal, text.len());
                PageText::Recognized(text)
            }
            Err(detail) => {
                warn!(
                    "OCR failed on page {} ({}): {}",
                    page.ordinal,
                    recognizer.name(),
                    detail
                );
                PageText::Failed { detail }
            }
        };
        texts.insert(page.ordinal, entry);
    }

    texts
}

/// Decode a page JPEG, cap its width at `max_width` (aspect preserved), and
/// re-encode it as PNG for the recognizer.
///
/// The cap bounds recognition cost on large renders; accuracy plateaus well
/// below print resolution.
fn recognition_input(full_jpeg: &[u8], max_width: u32) -> Result<Vec<u8>, String> {
    let img = image::load_from_memory(full_jpeg).map_err(|e| format!("decode page: {e}"))?;

    let img = if img.width() > max_width {
        img.resize(max_width, u32::MAX, FilterType::Lanczos3)
    } else {
        img
    };

    let mut buf = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut buf),
        image::ImageFormat::Png,
    )
    .map_err(|e| format!("encode recognition input: {e}"))?;
    Ok(buf)
}

/// Normalise raw engine output: unify line endings, strip outer whitespace.
fn normalize_text(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConversionConfig;
    use image::{Rgb, RgbImage};

    /// Recognizer that succeeds or fails per ordinal, in call order.
    struct ScriptedRecognizer {
        script: std::cell::RefCell<Vec<Result<String, String>>>,
    }

    impl ScriptedRecognizer {
        fn new(script: Vec<Result<String, String>>) -> Self {
            Self {
                script: std::cell::RefCell::new(script),
            }
        }
    }

    impl TextRecognizer for ScriptedRecognizer {
        fn name(&self) -> &str {
            "scripted"
        }
        fn is_available(&self) -> bool {
            true
        }
        fn recognize(&self, _image_png: &[u8], _language: &str) -> Result<String, String> {
            self.script.borrow_mut().remove(0)
        }
    }

    fn jpeg_page(ordinal: u32) -> PageImage {
        let img = RgbImage::from_pixel(40, 60, Rgb([255, 255, 255]));
        let mut buf = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, 85);
        encoder.encode_image(&img).unwrap();
        PageImage {
            ordinal,
            full: buf.clone(),
            thumb: buf,
        }
    }

    #[test]
    fn one_failed_page_does_not_abort_the_batch() {
        let pages: Vec<PageImage> = (1..=5).map(jpeg_page).collect();
        let recognizer = ScriptedRecognizer::new(vec![
            Ok("jedna".into()),
            Ok("dva".into()),
            Err("engine crashed".into()),
            Ok("čtyři".into()),
            Ok("pět".into()),
        ]);
        let config = ConversionConfig::default();

        let texts = extract_text(&pages, &recognizer, &config);

        assert_eq!(texts.len(), 5);
        assert_eq!(texts[&3].as_str(), "");
        assert!(texts[&3].is_failed());
        assert_eq!(texts[&1].as_str(), "jedna");
        assert_eq!(texts[&5].as_str(), "pět");
    }

    #[test]
    fn mapping_is_dense_even_when_every_page_fails() {
        let pages: Vec<PageImage> = (1..=3).map(jpeg_page).collect();
        let recognizer = ScriptedRecognizer::new(vec![
            Err("a".into()),
            Err("b".into()),
            Err("c".into()),
        ]);
        let texts = extract_text(&pages, &recognizer, &ConversionConfig::default());
        assert_eq!(texts.len(), 3);
        assert!(texts.values().all(|t| t.is_failed()));
    }

    #[test]
    fn recognized_text_is_normalized() {
        let pages = vec![jpeg_page(1)];
        let recognizer = ScriptedRecognizer::new(vec![Ok("  Obsah\r\nstrany\r\n".into())]);
        let texts = extract_text(&pages, &recognizer, &ConversionConfig::default());
        assert_eq!(texts[&1].as_str(), "Obsah\nstrany");
    }

    #[test]
    fn recognition_input_caps_width() {
        let img = RgbImage::from_pixel(3000, 1000, Rgb([0, 0, 0]));
        let mut buf = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, 85);
        encoder.encode_image(&img).unwrap();

        let png = recognition_input(&buf, 2000).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 2000);
        // Aspect preserved within rounding.
        assert!((decoded.height() as i64 - 666).abs() <= 1);
    }

    #[test]
    fn undecodable_page_becomes_failed_entry() {
        let pages = vec![PageImage {
            ordinal: 1,
            full: b"not a jpeg".to_vec(),
            thumb: vec![],
        }];
        let recognizer = ScriptedRecognizer::new(vec![]);
        let texts = extract_text(&pages, &recognizer, &ConversionConfig::default());
        assert_eq!(texts.len(), 1);
        assert!(texts[&1].is_failed());
    }
}

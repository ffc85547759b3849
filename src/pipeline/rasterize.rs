//! PDF rasterization: render every page to full-size and thumbnail JPEGs.
//!
//! ## Why open from bytes?
//!
//! Every front door already holds the PDF in memory (multipart upload,
//! base64 body, or a file the CLI just read), so the document is opened with
//! `load_pdf_from_byte_slice` and no temporary file is ever needed.
//!
//! ## Resource release
//!
//! The pdfium document handle lives only inside [`rasterize`]; it is dropped
//! on every exit path, including a mid-loop page failure, so the engine's
//! native resources are released deterministically.
//!
//! pdfium is CPU-bound and not async-safe; async callers must wrap this
//! stage in `tokio::task::spawn_blocking` (the server front door does).

use crate::config::ConversionConfig;
use crate::error::FlipbookError;
use crate::output::PageImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// PDFs declare physical sizes in points at 72 per inch; rendering at
/// `dpi / 72` scale maps points to the requested pixel density.
const PDF_NATIVE_DPI: f32 = 72.0;

/// Render every page of `pdf_bytes` into full-size and thumbnail JPEGs.
///
/// Returns one [`PageImage`] per source page, ordinals `1..=N` in the PDF's
/// internal page order — the canonical numbering for the rest of the
/// pipeline. Fails with [`FlipbookError::Decode`] when the document cannot
/// be opened (corrupt, encrypted, truncated).
pub fn rasterize(
    pdf_bytes: &[u8],
    config: &ConversionConfig,
) -> Result<Vec<PageImage>, FlipbookError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .map_err(|e| FlipbookError::Decode {
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    let total = pages.len() as usize;
    info!("PDF opened: {} pages", total);

    let scale = config.dpi as f32 / PDF_NATIVE_DPI;
    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

    let mut results = Vec::with_capacity(total);

    for (idx, page) in pages.iter().enumerate() {
        let ordinal = (idx + 1) as u32;

        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| FlipbookError::PageRender {
                    page: idx + 1,
                    detail: format!("{e:?}"),
                })?;

        // JPEG has no alpha channel; pdfium renders onto an opaque white
        // background, so dropping to RGB loses nothing.
        let rgb = bitmap.as_image().to_rgb8();
        debug!(
            "Rendered page {} → {}x{} px",
            ordinal,
            rgb.width(),
            rgb.height()
        );

        let full = encode_jpeg(&rgb, config.page_quality).map_err(|detail| {
            FlipbookError::PageEncode {
                page: idx + 1,
                detail,
            }
        })?;

        let thumb_rgb = make_thumbnail(&rgb, config.thumb_bounds);
        let thumb = encode_jpeg(&thumb_rgb, config.thumb_quality).map_err(|detail| {
            FlipbookError::PageEncode {
                page: idx + 1,
                detail,
            }
        })?;

        results.push(PageImage {
            ordinal,
            full,
            thumb,
        });
    }

    Ok(results)
}

/// Scale `page` to fit inside `bounds` (width, height), preserving aspect
/// ratio. Pages already inside the box are returned unscaled.
fn make_thumbnail(page: &RgbImage, bounds: (u32, u32)) -> RgbImage {
    let (max_w, max_h) = bounds;
    if page.width() <= max_w && page.height() <= max_h {
        return page.clone();
    }
    DynamicImage::ImageRgb8(page.clone())
        .resize(max_w, max_h, FilterType::Lanczos3)
        .to_rgb8()
}

/// Encode an RGB raster as JPEG at the given quality.
fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(img).map_err(|e| e.to_string())?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([200, 30, 30]))
    }

    #[test]
    fn encode_jpeg_produces_decodable_bytes() {
        let bytes = encode_jpeg(&solid(12, 8), 85).expect("encode should succeed");
        let decoded = image::load_from_memory(&bytes).expect("valid JPEG");
        assert_eq!(decoded.width(), 12);
        assert_eq!(decoded.height(), 8);
    }

    #[test]
    fn thumbnail_fits_bounds_and_preserves_aspect() {
        let thumb = make_thumbnail(&solid(1000, 1500), (200, 300));
        assert!(thumb.width() <= 200);
        assert!(thumb.height() <= 300);
        // 2:3 source into a 2:3 box fills it exactly.
        assert_eq!((thumb.width(), thumb.height()), (200, 300));
    }

    #[test]
    fn thumbnail_of_wide_page_is_width_bound() {
        let thumb = make_thumbnail(&solid(2000, 500), (200, 300));
        assert_eq!(thumb.width(), 200);
        assert_eq!(thumb.height(), 50);
    }

    #[test]
    fn small_page_is_not_upscaled() {
        let thumb = make_thumbnail(&solid(90, 120), (200, 300));
        assert_eq!((thumb.width(), thumb.height()), (90, 120));
    }
}

//! Packaging: materialise a [`ConversionResult`] into a destination.
//!
//! Three destinations share one layout contract, produced by [`bundle`]:
//!
//! ```text
//! index.html
//! css/style.css
//! js/flipbook.js
//! files/pages/{1..N}.jpg
//! files/thumb/{1..N}.jpg
//! search_data.json        (when extraction ran)
//! {slug}.pdf              (when the source PDF is carried through)
//! ```
//!
//! Every destination writes exactly these entries, in this order. The path
//! templates are the binding contract with the assembler's generated HTML —
//! change one and the other breaks.

pub mod dir;
pub mod zip;

#[cfg(feature = "s3")]
pub mod s3;

use crate::output::ConversionResult;

/// One file of the output bundle: destination-relative path, MIME type,
/// and content.
#[derive(Debug, Clone)]
pub struct BundleEntry {
    pub path: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Flatten a conversion result into the destination-agnostic entry list.
pub fn bundle(result: &ConversionResult) -> Vec<BundleEntry> {
    let mut entries = Vec::with_capacity(result.pages.len() * 2 + 5);

    entries.push(BundleEntry {
        path: "index.html".into(),
        content_type: "text/html",
        bytes: result.assets.html.clone().into_bytes(),
    });
    entries.push(BundleEntry {
        path: "css/style.css".into(),
        content_type: "text/css",
        bytes: result.assets.css.clone().into_bytes(),
    });
    entries.push(BundleEntry {
        path: "js/flipbook.js".into(),
        content_type: "application/javascript",
        bytes: result.assets.js.clone().into_bytes(),
    });

    for page in &result.pages {
        entries.push(BundleEntry {
            path: format!("files/pages/{}.jpg", page.ordinal),
            content_type: "image/jpeg",
            bytes: page.full.clone(),
        });
    }
    for page in &result.pages {
        entries.push(BundleEntry {
            path: format!("files/thumb/{}.jpg", page.ordinal),
            content_type: "image/jpeg",
            bytes: page.thumb.clone(),
        });
    }

    if let Some(ref search) = result.search {
        entries.push(BundleEntry {
            path: "search_data.json".into(),
            content_type: "application/json",
            bytes: search.to_json().into_bytes(),
        });
    }

    if let (Some(pdf), Some(name)) = (&result.source_pdf, &result.source_pdf_name) {
        entries.push(BundleEntry {
            path: name.clone(),
            content_type: "application/pdf",
            bytes: pdf.clone(),
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{Assets, ConversionStats, PageImage, PageText, SearchData};
    use std::collections::BTreeMap;

    pub(crate) fn sample_result(pages: usize, with_search: bool) -> ConversionResult {
        let page_images: Vec<PageImage> = (1..=pages as u32)
            .map(|ordinal| PageImage {
                ordinal,
                full: vec![0xFF, 0xD8, ordinal as u8],
                thumb: vec![0xFF, 0xD8, 0x00, ordinal as u8],
            })
            .collect();

        let search = with_search.then(|| {
            let mut texts = BTreeMap::new();
            for ordinal in 1..=pages as u32 {
                texts.insert(ordinal, PageText::Recognized(format!("strana {ordinal}")));
            }
            SearchData::from_page_texts(&texts)
        });

        let assets = crate::pipeline::assemble::assemble(
            pages,
            "Testovací zpravodaj",
            search.as_ref(),
            &crate::config::ViewerOptions::default(),
            None,
        );

        ConversionResult {
            pages: page_images,
            search,
            assets,
            source_pdf: None,
            source_pdf_name: None,
            title: "Testovací zpravodaj".into(),
            page_count: pages,
            stats: ConversionStats::default(),
        }
    }

    #[test]
    fn bundle_contains_every_contract_path() {
        let entries = bundle(&sample_result(3, true));
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();

        assert_eq!(paths[0], "index.html");
        assert!(paths.contains(&"css/style.css"));
        assert!(paths.contains(&"js/flipbook.js"));
        for ordinal in 1..=3 {
            assert!(paths.contains(&format!("files/pages/{ordinal}.jpg").as_str()));
            assert!(paths.contains(&format!("files/thumb/{ordinal}.jpg").as_str()));
        }
        assert!(paths.contains(&"search_data.json"));
    }

    #[test]
    fn bundle_without_search_omits_json() {
        let entries = bundle(&sample_result(2, false));
        assert!(entries.iter().all(|e| e.path != "search_data.json"));
    }

    #[test]
    fn every_html_page_reference_has_a_bundle_entry() {
        let result = sample_result(5, false);
        let entries = bundle(&result);
        let paths: std::collections::HashSet<&str> =
            entries.iter().map(|e| e.path.as_str()).collect();

        for ordinal in 1..=result.page_count {
            let referenced = format!("files/thumb/{ordinal}.jpg");
            assert!(result.assets.html.contains(&referenced));
            assert!(paths.contains(referenced.as_str()));
            assert!(paths.contains(format!("files/pages/{ordinal}.jpg").as_str()));
        }
    }

    #[test]
    fn source_pdf_is_bundled_under_its_slug() {
        let mut result = sample_result(1, false);
        result.source_pdf = Some(b"%PDF-1.4".to_vec());
        result.source_pdf_name = Some("testovaci-zpravodaj.pdf".into());
        let entries = bundle(&result);
        let entry = entries
            .iter()
            .find(|e| e.path == "testovaci-zpravodaj.pdf")
            .expect("pdf entry");
        assert_eq!(entry.content_type, "application/pdf");
    }
}

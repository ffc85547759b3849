//! In-memory ZIP destination.
//!
//! The complete archive is buffered in memory before returning — the
//! archive is the HTTP response body for the ZIP front doors, and typical
//! bundles are tens of megabytes, so streaming buys nothing here.

use crate::error::FlipbookError;
use crate::output::ConversionResult;
use crate::package::bundle;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Build a deflate-compressed ZIP of the bundle.
pub fn write(result: &ConversionResult) -> Result<Vec<u8>, FlipbookError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in bundle(result) {
        writer
            .start_file(entry.path.as_str(), options)
            .map_err(|e| zip_error(&entry.path, e.to_string()))?;
        writer
            .write_all(&entry.bytes)
            .map_err(|e| zip_error(&entry.path, e.to_string()))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| zip_error("archive", e.to_string()))?;
    Ok(cursor.into_inner())
}

fn zip_error(path: &str, detail: String) -> FlipbookError {
    FlipbookError::Packaging {
        destination: format!("zip:{path}"),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::tests::sample_result;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn archive_round_trips_the_bundle_contract() {
        let result = sample_result(3, true);
        let bytes = write(&result).expect("zip should succeed");

        let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("valid zip");

        let mut html = String::new();
        archive
            .by_name("index.html")
            .expect("index.html present")
            .read_to_string(&mut html)
            .unwrap();

        // Every page/thumbnail path the HTML references must exist in the
        // archive, for every ordinal.
        for ordinal in 1..=result.page_count {
            let page_path = format!("files/pages/{ordinal}.jpg");
            let thumb_path = format!("files/thumb/{ordinal}.jpg");
            assert!(html.contains(&thumb_path), "HTML must reference {thumb_path}");
            assert!(archive.by_name(&page_path).is_ok(), "missing {page_path}");
            assert!(archive.by_name(&thumb_path).is_ok(), "missing {thumb_path}");
        }

        assert!(archive.by_name("css/style.css").is_ok());
        assert!(archive.by_name("js/flipbook.js").is_ok());
        assert!(archive.by_name("search_data.json").is_ok());
    }

    #[test]
    fn search_json_in_archive_matches_embedded_payload() {
        let result = sample_result(2, true);
        let bytes = write(&result).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let mut json = String::new();
        archive
            .by_name("search_data.json")
            .unwrap()
            .read_to_string(&mut json)
            .unwrap();

        assert_eq!(json, result.search.as_ref().unwrap().to_json());
        // The identical serialisation is embedded in the HTML.
        assert!(result.assets.html.contains(&json));
    }

    #[test]
    fn empty_document_produces_minimal_archive() {
        let result = sample_result(0, false);
        let bytes = write(&result).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 3); // index.html, css, js
    }
}

//! Local-directory destination: write the bundle as an on-disk tree.

use crate::error::FlipbookError;
use crate::output::ConversionResult;
use crate::package::bundle;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write the bundle under `output_dir`, creating directories as needed.
///
/// Returns the path to the written `index.html`. Any write failure fails the
/// whole packaging operation; already-written files are not cleaned up, but
/// the caller must treat the bundle as not produced.
pub fn write(result: &ConversionResult, output_dir: &Path) -> Result<PathBuf, FlipbookError> {
    for entry in bundle(result) {
        let target = output_dir.join(&entry.path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|source| FlipbookError::OutputWriteFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&target, &entry.bytes).map_err(|source| {
            FlipbookError::OutputWriteFailed {
                path: target.clone(),
                source,
            }
        })?;
    }

    let index = output_dir.join("index.html");
    info!("Flipbook written to {}", index.display());
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::tests::sample_result;

    #[test]
    fn writes_full_tree() {
        let dir = tempfile::tempdir().unwrap();
        let result = sample_result(2, true);

        let index = write(&result, dir.path()).expect("write should succeed");

        assert_eq!(index, dir.path().join("index.html"));
        assert!(dir.path().join("css/style.css").is_file());
        assert!(dir.path().join("js/flipbook.js").is_file());
        assert!(dir.path().join("files/pages/1.jpg").is_file());
        assert!(dir.path().join("files/pages/2.jpg").is_file());
        assert!(dir.path().join("files/thumb/2.jpg").is_file());
        assert!(dir.path().join("search_data.json").is_file());

        let html = std::fs::read_to_string(index).unwrap();
        assert!(html.contains("files/pages/2.jpg"));
    }

    #[test]
    fn unwritable_destination_is_a_packaging_error() {
        let result = sample_result(1, false);
        let err = write(&result, Path::new("/proc/definitely-not-writable")).unwrap_err();
        assert!(matches!(err, FlipbookError::OutputWriteFailed { .. }));
    }
}

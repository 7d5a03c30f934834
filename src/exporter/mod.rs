// file: src/exporter/mod.rs
// description: export module for TEI-derived artifacts
// reference: internal module structure

pub mod json;
pub mod text;

pub use json::{ExportManifest, JsonExporter};
pub use text::{TextExportSummary, TextExporter};

use crate::error::{HarvestError, Result};
use crate::tei::TEI_SUFFIX;
use std::path::{Path, PathBuf};

/// TEI files in a directory, sorted by name for stable export order.
pub(crate) fn list_tei_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(|source| HarvestError::FileOperation {
        path: dir.to_path_buf(),
        source,
    })? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if TEI_SUFFIX.is_match(&name) {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

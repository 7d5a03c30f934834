// file: src/exporter/text.rs
// description: regenerate clean text files from saved TEI without the server

use crate::error::{HarvestError, Result};
use crate::exporter::list_tei_files;
use crate::tei::{TEI_SUFFIX, TextCleaner, parse_tei};
use crate::utils::{OperationTimer, Validator};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct TextExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct TextExportSummary {
    pub written: usize,
    pub skipped: usize,
}

impl TextExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Re-run text cleaning over a directory of saved TEI. Lets a changed
    /// stop pattern be applied without reprocessing any PDF.
    pub fn export_tei_dir(
        &self,
        tei_dir: &Path,
        cleaner: &TextCleaner,
    ) -> Result<TextExportSummary> {
        Validator::validate_directory(tei_dir)?;
        info!("Regenerating clean text into {}", self.output_dir.display());
        let timer = OperationTimer::new("text export");

        let mut summary = TextExportSummary::default();

        for tei_path in list_tei_files(tei_dir)? {
            let name = tei_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let xml =
                fs::read_to_string(&tei_path).map_err(|source| HarvestError::FileOperation {
                    path: tei_path.clone(),
                    source,
                })?;

            let tei = match parse_tei(&xml, &name) {
                Ok(tei) => tei,
                Err(e) => {
                    warn!("Skipping {}: {}", name, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            let stem = TEI_SUFFIX.replace(&name, "").to_string();
            let out_path = self.output_dir.join(format!("{}.txt", stem));
            fs::write(&out_path, cleaner.render(&tei))?;
            summary.written += 1;
        }

        timer.finish_with_count(summary.written);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_text_export_round() {
        let tei_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        fs::write(
            tei_dir.path().join("paper.tei.xml"),
            r#"<TEI><teiHeader><fileDesc><titleStmt><title>T</title></titleStmt></fileDesc></teiHeader>
               <text><body><p>Body.</p></body></text></TEI>"#,
        )
        .unwrap();

        let exporter = TextExporter::new(out_dir.path()).unwrap();
        let summary = exporter
            .export_tei_dir(tei_dir.path(), &TextCleaner::default())
            .unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped, 0);

        let text = fs::read_to_string(out_dir.path().join("paper.txt")).unwrap();
        assert_eq!(text, "TITLE: T\n\nBody.");
    }

    #[test]
    fn test_text_export_skips_malformed() {
        let tei_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        fs::write(tei_dir.path().join("broken.tei.xml"), "<TEI><p></q></TEI>").unwrap();

        let exporter = TextExporter::new(out_dir.path()).unwrap();
        let summary = exporter
            .export_tei_dir(tei_dir.path(), &TextCleaner::default())
            .unwrap();

        assert_eq!(summary.written, 0);
        assert_eq!(summary.skipped, 1);
        assert!(!out_dir.path().join("broken.txt").exists());
    }
}

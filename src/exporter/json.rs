// file: src/exporter/json.rs
// description: json export of extracted document metadata from saved TEI

use crate::error::{HarvestError, Result};
use crate::exporter::list_tei_files;
use crate::models::ExtractedDocument;
use crate::tei::{TEI_SUFFIX, TextCleaner, parse_tei};
use crate::utils::{OperationTimer, Validator};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub total_documents: usize,
    pub skipped: usize,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Parse every saved TEI file and write one JSON document per paper plus
    /// a manifest. Unparseable TEI is skipped and counted, never fatal.
    pub fn export_tei_dir(
        &self,
        tei_dir: &Path,
        cleaner: &TextCleaner,
        pretty: bool,
    ) -> Result<ExportManifest> {
        Validator::validate_directory(tei_dir)?;
        info!("Starting JSON export to {}", self.output_dir.display());
        let timer = OperationTimer::new("json export");

        let mut files = Vec::new();
        let mut skipped = 0;

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
                    skipped += 1;
                    continue;
                }
            };

            let clean_text = cleaner.render(&tei);
            let document = ExtractedDocument::new(name.clone(), None, &xml, tei, clean_text);

            let stem = TEI_SUFFIX.replace(&name, "").to_string();
            let out_name = format!("{}.json", stem);
            let payload = if pretty {
                serde_json::to_string_pretty(&document)
            } else {
                serde_json::to_string(&document)
            }
            .map_err(|e| HarvestError::Serialization(e.to_string()))?;

            fs::write(self.output_dir.join(&out_name), payload)?;
            files.push(out_name);
        }

        let manifest = ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            total_documents: files.len(),
            skipped,
            files,
        };

        let manifest_json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| HarvestError::Serialization(e.to_string()))?;
        fs::write(self.output_dir.join("manifest.json"), manifest_json)?;

        timer.finish_with_count(manifest.total_documents);
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const TEI_FIXTURE: &str = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
      <teiHeader>
        <fileDesc><titleStmt><title>Exported Paper</title></titleStmt></fileDesc>
        <profileDesc>
          <textClass><keywords><term>export</term></keywords></textClass>
        </profileDesc>
      </teiHeader>
      <text><body><p>Some body.</p></body></text>
    </TEI>"#;

    #[test]
    fn test_export_writes_documents_and_manifest() {
        let tei_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        fs::write(tei_dir.path().join("paper.tei.xml"), TEI_FIXTURE).unwrap();
        fs::write(tei_dir.path().join("broken.tei.xml"), "<TEI><p></q></TEI>").unwrap();

        let exporter = JsonExporter::new(out_dir.path()).unwrap();
        let manifest = exporter
            .export_tei_dir(tei_dir.path(), &TextCleaner::default(), true)
            .unwrap();

        assert_eq!(manifest.total_documents, 1);
        assert_eq!(manifest.skipped, 1);
        assert_eq!(manifest.files, vec!["paper.json"]);

        let payload = fs::read_to_string(out_dir.path().join("paper.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["title"], "Exported Paper");
        assert_eq!(value["keywords"][0], "export");
        assert!(out_dir.path().join("manifest.json").exists());
    }

    #[test]
    fn test_export_empty_dir_yields_empty_manifest() {
        let tei_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();

        let exporter = JsonExporter::new(out_dir.path()).unwrap();
        let manifest = exporter
            .export_tei_dir(tei_dir.path(), &TextCleaner::default(), false)
            .unwrap();

        assert_eq!(manifest.total_documents, 0);
        assert!(manifest.files.is_empty());
    }

    #[test]
    fn test_export_missing_dir_fails() {
        let out_dir = TempDir::new().unwrap();
        let exporter = JsonExporter::new(out_dir.path()).unwrap();

        let result =
            exporter.export_tei_dir(Path::new("/nonexistent/tei"), &TextCleaner::default(), false);
        assert!(result.is_err());
    }
}

// file: src/corpus/scanner.rs
// description: Directory walking and PDF discovery with filtering
// reference: https://docs.rs/walkdir

use crate::config::PipelineConfig;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct PdfScanner {
    config: PipelineConfig,
}

#[derive(Debug, Clone)]
pub struct ScannedPdf {
    pub path: PathBuf,
    pub relative_path: String,
    pub size: u64,
    pub modified: u64,
}

impl ScannedPdf {
    pub fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.relative_path.clone())
    }

    pub fn tei_file_name(&self) -> String {
        format!("{}.tei.xml", self.file_stem())
    }

    pub fn txt_file_name(&self) -> String {
        format!("{}.txt", self.file_stem())
    }
}

impl PdfScanner {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn scan_directory(&self, root: &Path) -> Result<Vec<ScannedPdf>> {
        info!("Scanning directory: {}", root.display());
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();

            if self.should_skip(path) {
                debug!("Skipping file: {}", path.display());
                continue;
            }

            if let Some(extension) = path.extension()
                && extension.eq_ignore_ascii_case("pdf")
                && let Ok(metadata) = entry.metadata()
            {
                let size = metadata.len();
                let max_size = (self.config.max_file_size_mb * 1024 * 1024) as u64;

                if size > max_size {
                    debug!(
                        "Skipping large file ({} MB): {}",
                        size / 1024 / 1024,
                        path.display()
                    );
                    continue;
                }

                let modified = metadata
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                    .map(|d| d.as_secs())
                    .unwrap_or(0);

                let relative_path = path
                    .strip_prefix(root)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .to_string();

                files.push(ScannedPdf {
                    path: path.to_path_buf(),
                    relative_path,
                    size,
                    modified,
                });
            }
        }

        // Deterministic processing order regardless of directory iteration.
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        info!("Found {} PDF files", files.len());
        Ok(files)
    }

    fn should_skip(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.config.skip_patterns {
            if pattern.contains('*') {
                let pattern_without_star = pattern.replace("*.", ".");
                if path_str.ends_with(&pattern_without_star) {
                    return true;
                }
            } else if path_str.contains(pattern) {
                return true;
            }
        }

        false
    }

    /// Drop PDFs whose TEI output already exists, so an interrupted run can
    /// resume where it stopped. `force_reprocess` disables the filter.
    pub fn filter_processed(&self, files: Vec<ScannedPdf>, tei_dir: &Path) -> Vec<ScannedPdf> {
        if self.config.force_reprocess {
            return files;
        }

        files
            .into_iter()
            .filter(|file| {
                let tei_path = tei_dir.join(file.tei_file_name());
                if tei_path.is_file() {
                    debug!(
                        "Skipping already processed file: {} ({})",
                        file.relative_path,
                        tei_path.display()
                    );
                    false
                } else {
                    true
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            skip_patterns: vec![],
            force_reprocess: false,
            max_file_size_mb: 50,
        }
    }

    #[test]
    fn test_scan_directory_finds_pdfs_sorted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.pdf"), "%PDF-1.4").unwrap();
        fs::write(temp.path().join("a.PDF"), "%PDF-1.4").unwrap();
        fs::write(temp.path().join("notes.txt"), "not a pdf").unwrap();

        let scanner = PdfScanner::new(test_config());
        let files = scanner.scan_directory(temp.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].relative_path, "a.PDF");
        assert_eq!(files[1].relative_path, "b.pdf");
    }

    #[test]
    fn test_skip_patterns() {
        let mut config = test_config();
        config.skip_patterns = vec!["*.tmp".to_string(), "drafts/".to_string()];
        let scanner = PdfScanner::new(config);

        assert!(scanner.should_skip(Path::new("partial.tmp")));
        assert!(scanner.should_skip(Path::new("drafts/paper.pdf")));
        assert!(!scanner.should_skip(Path::new("paper.pdf")));
    }

    #[test]
    fn test_large_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("big.pdf"), vec![0u8; 2 * 1024 * 1024]).unwrap();

        let mut config = test_config();
        config.max_file_size_mb = 1;
        let scanner = PdfScanner::new(config);

        let files = scanner.scan_directory(temp.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_output_file_names() {
        let file = ScannedPdf {
            path: PathBuf::from("/articles/nested/paper.v2.pdf"),
            relative_path: "nested/paper.v2.pdf".to_string(),
            size: 10,
            modified: 0,
        };

        assert_eq!(file.tei_file_name(), "paper.v2.tei.xml");
        assert_eq!(file.txt_file_name(), "paper.v2.txt");
    }

    #[test]
    fn test_filter_processed_skips_existing_tei() {
        let input = TempDir::new().unwrap();
        let tei_dir = TempDir::new().unwrap();
        fs::write(input.path().join("done.pdf"), "%PDF-1.4").unwrap();
        fs::write(input.path().join("new.pdf"), "%PDF-1.4").unwrap();
        fs::write(tei_dir.path().join("done.tei.xml"), "<TEI/>").unwrap();

        let scanner = PdfScanner::new(test_config());
        let files = scanner.scan_directory(input.path()).unwrap();
        let remaining = scanner.filter_processed(files, tei_dir.path());

        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].relative_path, "new.pdf");
    }

    #[test]
    fn test_filter_processed_with_force() {
        let input = TempDir::new().unwrap();
        let tei_dir = TempDir::new().unwrap();
        fs::write(input.path().join("done.pdf"), "%PDF-1.4").unwrap();
        fs::write(tei_dir.path().join("done.tei.xml"), "<TEI/>").unwrap();

        let mut config = test_config();
        config.force_reprocess = true;
        let scanner = PdfScanner::new(config);

        let files = scanner.scan_directory(input.path()).unwrap();
        let remaining = scanner.filter_processed(files, tei_dir.path());
        assert_eq!(remaining.len(), 1);
    }
}

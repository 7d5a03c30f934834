// file: src/pipeline/processor.rs
// description: converts scanned PDFs into TEI and clean-text artifacts
// reference: uploads to GROBID, parses TEI, and prepares document models

use crate::client::GrobidClient;
use crate::config::Config;
use crate::corpus::ScannedPdf;
use crate::error::{HarvestError, Result};
use crate::models::ExtractedDocument;
use crate::tei::{TextCleaner, parse_tei};
use crate::utils::Validator;
use std::time::Duration;
use tracing::{debug, warn};

pub struct PdfProcessor {
    client: GrobidClient,
    cleaner: TextCleaner,
    config: Config,
}

impl PdfProcessor {
    pub fn new(config: Config, client: GrobidClient) -> Result<Self> {
        let cleaner = TextCleaner::new(&config.extraction.stop_headings)?;

        Ok(Self {
            client,
            cleaner,
            config,
        })
    }

    pub fn cleaner(&self) -> &TextCleaner {
        &self.cleaner
    }

    /// Upload one PDF and return the TEI XML, retrying transient failures
    /// (saturated server, transport errors) up to `max_retries` attempts.
    pub async fn fetch_tei(&self, file: &ScannedPdf) -> Result<String> {
        let pdf = tokio::fs::read(&file.path)
            .await
            .map_err(|source| HarvestError::FileOperation {
                path: file.path.clone(),
                source,
            })?;

        let file_name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.relative_path.clone());

        let max_retries = self.config.batch.max_retries;
        let mut attempt = 1;

        loop {
            debug!(
                "Uploading {} (attempt {}/{})",
                file.relative_path, attempt, max_retries
            );

            match self
                .client
                .process_fulltext(pdf.clone(), &file_name, &self.config.extraction)
                .await
            {
                Ok(tei_xml) => {
                    Validator::validate_content_not_empty(&tei_xml)?;
                    return Ok(tei_xml);
                }
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    warn!(
                        "Attempt {} failed for {}: {} (retrying in {}s)",
                        attempt, file.relative_path, e, self.config.batch.retry_delay_secs
                    );
                    tokio::time::sleep(Duration::from_secs(self.config.batch.retry_delay_secs))
                        .await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Parse TEI and render the clean text. Purely local, so it also backs
    /// the offline `extract` and `export` commands.
    pub fn extract(
        &self,
        source_file: &str,
        pdf_size: Option<u64>,
        tei_xml: &str,
    ) -> Result<ExtractedDocument> {
        let tei = parse_tei(tei_xml, source_file)?;
        let clean_text = self.cleaner.render(&tei);

        Ok(ExtractedDocument::new(
            source_file.to_string(),
            pdf_size,
            tei_xml,
            tei,
            clean_text,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_processor() -> PdfProcessor {
        let config = Config::default_config();
        let client = GrobidClient::new(config.server.clone()).unwrap();
        PdfProcessor::new(config, client).unwrap()
    }

    #[test]
    fn test_extract_builds_document() {
        let processor = test_processor();
        let tei = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
          <teiHeader>
            <fileDesc><titleStmt><title>Sample Paper</title></titleStmt></fileDesc>
            <profileDesc><abstract><p>Short abstract.</p></abstract></profileDesc>
          </teiHeader>
          <text><body>
            <head>Intro</head><p>Body text.</p>
            <head>References</head><p>Doe 2020.</p>
          </body></text>
        </TEI>"#;

        let doc = processor.extract("paper.pdf", Some(100), tei).unwrap();

        assert_eq!(doc.source_file, "paper.pdf");
        assert_eq!(doc.title.as_deref(), Some("Sample Paper"));
        assert_eq!(
            doc.clean_text,
            "TITLE: Sample Paper\n\nABSTRACT: Short abstract.\n\nIntro\n\nBody text."
        );
        assert_eq!(doc.pdf_size, Some(100));
    }

    #[test]
    fn test_extract_rejects_malformed_tei() {
        let processor = test_processor();
        let result = processor.extract("broken.pdf", None, "<TEI><p>x</q></TEI>");
        assert!(matches!(result, Err(HarvestError::Tei { .. })));
    }

    #[test]
    fn test_custom_stop_headings_from_config() {
        let mut config = Config::default_config();
        config.extraction.stop_headings = "appendix".to_string();
        let client = GrobidClient::new(config.server.clone()).unwrap();
        let processor = PdfProcessor::new(config, client).unwrap();

        let tei = r#"<TEI><text><body>
            <p>Kept references mention.</p><head>Appendix</head><p>Dropped.</p>
        </body></text></TEI>"#;

        let doc = processor.extract("paper.pdf", None, tei).unwrap();
        assert_eq!(doc.clean_text, "Kept references mention.");
    }
}

// file: src/models/document.rs
// description: extracted document model with hashing and serialization
// reference: internal data structures

use crate::tei::TeiDocument;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Everything harvested from one paper: the header metadata, the clean text
/// rendition, and bookkeeping about the TEI it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub source_file: String,
    pub title: Option<String>,
    pub keywords: Vec<String>,
    pub abstract_text: Option<String>,
    pub clean_text: String,
    pub tei_hash: String,
    pub tei_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_size: Option<u64>,
    pub processed_at: u64,
}

impl ExtractedDocument {
    pub fn new(
        source_file: String,
        pdf_size: Option<u64>,
        tei_xml: &str,
        tei: TeiDocument,
        clean_text: String,
    ) -> Self {
        let tei_hash = Self::compute_hash(tei_xml);
        let tei_size = tei_xml.len() as u64;
        let processed_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            source_file,
            title: tei.title,
            keywords: tei.keywords,
            abstract_text: tei.abstract_text,
            clean_text,
            tei_hash,
            tei_size,
            pdf_size,
            processed_at,
        }
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn has_metadata(&self) -> bool {
        self.title.is_some() || !self.keywords.is_empty() || self.abstract_text.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_tei_doc() -> TeiDocument {
        TeiDocument {
            title: Some("A Title".to_string()),
            keywords: vec!["kw".to_string()],
            abstract_text: None,
            body_blocks: vec!["Body.".to_string()],
        }
    }

    #[test]
    fn test_document_creation() {
        let doc = ExtractedDocument::new(
            "paper.pdf".to_string(),
            Some(2048),
            "<TEI/>",
            sample_tei_doc(),
            "TITLE: A Title".to_string(),
        );

        assert_eq!(doc.source_file, "paper.pdf");
        assert_eq!(doc.title.as_deref(), Some("A Title"));
        assert_eq!(doc.tei_size, 7);
        assert_eq!(doc.pdf_size, Some(2048));
        assert!(!doc.tei_hash.is_empty());
        assert!(doc.has_metadata());
    }

    #[test]
    fn test_hash_consistency() {
        let hash1 = ExtractedDocument::compute_hash("<TEI>same</TEI>");
        let hash2 = ExtractedDocument::compute_hash("<TEI>same</TEI>");
        assert_eq!(hash1, hash2);

        let hash3 = ExtractedDocument::compute_hash("<TEI>other</TEI>");
        assert_ne!(hash1, hash3);
    }

    #[test]
    fn test_pdf_size_omitted_from_json_when_absent() {
        let doc = ExtractedDocument::new(
            "paper.tei.xml".to_string(),
            None,
            "<TEI/>",
            TeiDocument::default(),
            String::new(),
        );

        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("pdf_size"));
        assert!(!doc.has_metadata());
    }
}

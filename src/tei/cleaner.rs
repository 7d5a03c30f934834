// file: src/tei/cleaner.rs
// description: clean plain-text rendering of parsed TEI documents
// reference: output format TITLE / KEYWORDS / ABSTRACT / body

use crate::error::{HarvestError, Result};
use crate::tei::patterns::DEFAULT_STOP_HEADINGS;
use crate::tei::reader::TeiDocument;
use regex::Regex;

/// Renders a [`TeiDocument`] as labelled plain text, truncating the body at
/// the first match of the stop pattern (references, bibliography, and
/// similar trailing sections).
pub struct TextCleaner {
    stop: Regex,
}

impl TextCleaner {
    pub fn new(stop_headings: &str) -> Result<Self> {
        let stop = Regex::new(&format!("(?i){}", stop_headings)).map_err(|e| {
            HarvestError::Config(format!("stop_headings is not a valid regex: {}", e))
        })?;
        Ok(Self { stop })
    }

    pub fn render(&self, doc: &TeiDocument) -> String {
        let mut sections = Vec::new();

        if let Some(title) = &doc.title {
            sections.push(format!("TITLE: {}", title));
        }

        if !doc.keywords.is_empty() {
            sections.push(format!("KEYWORDS: {}", doc.keywords.join(", ")));
        }

        if let Some(abstract_text) = &doc.abstract_text {
            sections.push(format!("ABSTRACT: {}", abstract_text));
        }

        let body = self.truncate_body(&doc.body_blocks.join("\n\n"));
        if !body.is_empty() {
            sections.push(body);
        }

        sections.join("\n\n")
    }

    /// The stop pattern matches anywhere in the assembled body, not only at
    /// block starts, so a heading like "5. References" still truncates.
    fn truncate_body(&self, body: &str) -> String {
        match self.stop.find(body) {
            Some(m) => body[..m.start()].trim_end().to_string(),
            None => body.trim_end().to_string(),
        }
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_HEADINGS).expect("default stop pattern is valid")
    }
}

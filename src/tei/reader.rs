// file: src/tei/reader.rs
// description: streaming TEI XML reader for GROBID fulltext output
// reference: https://docs.rs/quick-xml

use crate::error::{HarvestError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Structured view of a GROBID TEI document: header metadata plus the body
/// text blocks in document order.
#[derive(Debug, Clone, Default)]
pub struct TeiDocument {
    pub title: Option<String>,
    pub keywords: Vec<String>,
    pub abstract_text: Option<String>,
    pub body_blocks: Vec<String>,
}

impl TeiDocument {
    pub fn has_metadata(&self) -> bool {
        self.title.is_some() || !self.keywords.is_empty() || self.abstract_text.is_some()
    }
}

/// Body elements whose text forms one output block each. Nested occurrences
/// collapse into the outermost capture, so a paragraph inside a figure is
/// emitted once.
const BODY_BLOCK_TAGS: [&[u8]; 5] = [b"head", b"p", b"label", b"list", b"figure"];

enum CaptureKind {
    Title,
    Term,
    Abstract,
    Block,
}

struct Capture {
    kind: CaptureKind,
    depth: usize,
    fragments: Vec<String>,
}

impl Capture {
    fn new(kind: CaptureKind) -> Self {
        Self {
            kind,
            depth: 1,
            fragments: Vec::new(),
        }
    }

    fn push_text(&mut self, text: &str) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.fragments.push(trimmed.to_string());
        }
    }
}

fn is_block_tag(name: &[u8]) -> bool {
    BODY_BLOCK_TAGS.contains(&name)
}

/// Parse a TEI XML string into a [`TeiDocument`].
///
/// `source` names the originating file for error reporting only. Elements are
/// matched by local name, so the TEI namespace prefix does not matter.
pub fn parse_tei(xml: &str, source: &str) -> Result<TeiDocument> {
    let mut reader = Reader::from_str(xml);

    let mut doc = TeiDocument::default();
    let mut capture: Option<Capture> = None;

    let mut in_header = false;
    let mut in_title_stmt = false;
    let mut in_keywords = false;
    let mut in_body = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if let Some(cap) = capture.as_mut() {
                    cap.depth += 1;
                    continue;
                }

                match e.local_name().as_ref() {
                    b"teiHeader" => in_header = true,
                    b"titleStmt" if in_header => in_title_stmt = true,
                    b"title" if in_title_stmt && doc.title.is_none() => {
                        capture = Some(Capture::new(CaptureKind::Title));
                    }
                    b"keywords" if in_header => in_keywords = true,
                    b"term" if in_keywords => {
                        capture = Some(Capture::new(CaptureKind::Term));
                    }
                    b"abstract" if in_header => {
                        capture = Some(Capture::new(CaptureKind::Abstract));
                    }
                    b"body" => in_body = true,
                    name if in_body && is_block_tag(name) => {
                        capture = Some(Capture::new(CaptureKind::Block));
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(cap) = capture.as_mut() {
                    let text = e.unescape().map_err(|err| HarvestError::Tei {
                        file: source.to_string(),
                        message: err.to_string(),
                    })?;
                    cap.push_text(&text);
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(cap) = capture.as_mut() {
                    cap.push_text(&String::from_utf8_lossy(e));
                }
            }
            Ok(Event::End(ref e)) => {
                let closed = match capture.as_mut() {
                    Some(cap) => {
                        cap.depth -= 1;
                        cap.depth == 0
                    }
                    None => false,
                };

                if closed {
                    if let Some(cap) = capture.take() {
                        let text = cap.fragments.join(" ");
                        if !text.is_empty() {
                            match cap.kind {
                                CaptureKind::Title => doc.title = Some(text),
                                CaptureKind::Term => doc.keywords.push(text),
                                CaptureKind::Abstract => doc.abstract_text = Some(text),
                                CaptureKind::Block => doc.body_blocks.push(text),
                            }
                        }
                    }
                } else if capture.is_none() {
                    match e.local_name().as_ref() {
                        b"teiHeader" => in_header = false,
                        b"titleStmt" => in_title_stmt = false,
                        b"keywords" => in_keywords = false,
                        b"body" => in_body = false,
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(HarvestError::Tei {
                    file: source.to_string(),
                    message: e.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(doc)
}

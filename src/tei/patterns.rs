// file: src/tei/patterns.rs
// description: compiled regex patterns for TEI text cleaning
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

/// Trailing sections that end the useful body text of a paper.
pub const DEFAULT_STOP_HEADINGS: &str = "references|bibliography|acknowledg|agradecimientos";

lazy_static! {
    pub static ref TEI_SUFFIX: Regex =
        Regex::new(r"(?i)\.tei\.xml$").expect("TEI_SUFFIX regex is valid");
}

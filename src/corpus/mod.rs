// file: src/corpus/mod.rs
// description: input corpus discovery module exports
// reference: internal module structure

pub mod scanner;

pub use scanner::{PdfScanner, ScannedPdf};

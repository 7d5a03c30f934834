// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod client;
pub mod config;
pub mod corpus;
pub mod error;
pub mod exporter;
pub mod models;
pub mod pipeline;
pub mod tei;
pub mod utils;

pub use client::GrobidClient;
pub use config::{
    BatchConfig, Config, ExtractionConfig, PipelineConfig, ServerConfig, StorageConfig,
};
pub use corpus::{PdfScanner, ScannedPdf};
pub use error::{HarvestError, Result};
pub use exporter::{ExportManifest, JsonExporter, TextExportSummary, TextExporter};
pub use models::ExtractedDocument;
pub use pipeline::{BatchOrchestrator, PdfProcessor, PipelineStats, ProgressTracker};
pub use tei::{TeiDocument, TextCleaner, parse_tei};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};

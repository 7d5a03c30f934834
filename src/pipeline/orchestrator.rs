// file: src/pipeline/orchestrator.rs
// description: coordinates PDF discovery, batched GROBID calls, and output writing
// reference: orchestrates the asynchronous harvesting workflow

use crate::client::GrobidClient;
use crate::config::Config;
use crate::corpus::{PdfScanner, ScannedPdf};
use crate::error::{HarvestError, Result};
use crate::pipeline::processor::PdfProcessor;
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::utils::{OperationTimer, Validator};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct BatchOrchestrator {
    config: Config,
    client: GrobidClient,
    processor: Arc<PdfProcessor>,
}

/// What survived for a single file. The TEI is written before text
/// extraction runs, so a cleaning failure still leaves the XML on disk.
enum FileOutcome {
    Complete,
    TeiOnly(HarvestError),
}

impl BatchOrchestrator {
    pub fn new(config: Config) -> Result<Self> {
        let client = GrobidClient::new(config.server.clone())?;
        let processor = Arc::new(PdfProcessor::new(config.clone(), client.clone())?);

        Ok(Self {
            config,
            client,
            processor,
        })
    }

    pub async fn run(&self, limit: Option<usize>, force: bool) -> Result<PipelineStats> {
        info!("Starting GROBID harvesting pipeline");
        let timer = OperationTimer::new("harvest");

        if self.config.server.startup_wait_secs > 0 {
            info!(
                "Waiting up to {}s for GROBID at {}",
                self.config.server.startup_wait_secs,
                self.client.base_url()
            );
            self.client
                .wait_until_alive(Duration::from_secs(self.config.server.startup_wait_secs))
                .await;
        }

        let files = self.scan_files(force).await?;
        let files: Vec<ScannedPdf> = match limit {
            Some(n) => files.into_iter().take(n).collect(),
            None => files,
        };

        if files.is_empty() {
            warn!("No PDF files to process");
            timer.finish();
            return Ok(PipelineStats::new());
        }

        let tei_dir = self.config.storage.tei_dir();
        let txt_dir = self.config.storage.txt_dir();
        std::fs::create_dir_all(&tei_dir)?;
        std::fs::create_dir_all(&txt_dir)?;

        let batch_size = self.config.batch.batch_size;
        let total_batches = files.len().div_ceil(batch_size);
        info!(
            "Processing {} PDFs in {} batches of up to {}",
            files.len(),
            total_batches,
            batch_size
        );

        let progress = Arc::new(ProgressTracker::new(files.len()));

        for (idx, batch) in files.chunks(batch_size).enumerate() {
            let batch_num = idx + 1;

            if !self.ensure_server_alive().await {
                error!(
                    "GROBID not available, stopping after {} of {} batches",
                    idx, total_batches
                );
                break;
            }

            progress.set_message(format!("Batch {}/{}", batch_num, total_batches));
            info!(
                "Processing batch {}/{} with {} files",
                batch_num,
                total_batches,
                batch.len()
            );

            self.process_batch(batch, &tei_dir, &txt_dir, &progress)
                .await;

            if batch_num % self.config.batch.restart_hint_every == 0 {
                info!(
                    "{} batches completed; consider restarting GROBID if throughput degrades",
                    batch_num
                );
            }

            let pause = self.config.batch.pause_between_batches_secs;
            if batch_num < total_batches && pause > 0 {
                debug!("Pausing {}s before next batch", pause);
                tokio::time::sleep(Duration::from_secs(pause)).await;
            }
        }

        let stats = progress.get_stats();
        progress.finish();
        timer.finish_with_count(stats.files_processed);

        self.log_final_stats(&stats);

        Ok(stats)
    }

    async fn scan_files(&self, force_reprocess: bool) -> Result<Vec<ScannedPdf>> {
        let input_dir = self.config.storage.input_dir.clone();
        Validator::validate_directory(&input_dir)?;

        let mut pipeline_config = self.config.pipeline.clone();
        pipeline_config.force_reprocess = force_reprocess || pipeline_config.force_reprocess;
        let tei_dir = self.config.storage.tei_dir();

        let files = tokio::task::spawn_blocking(move || {
            let scanner = PdfScanner::new(pipeline_config);
            let files = scanner.scan_directory(&input_dir)?;
            Ok::<_, HarvestError>(scanner.filter_processed(files, &tei_dir))
        })
        .await
        .map_err(|e| HarvestError::Validation(format!("File scanning task failed: {}", e)))??;

        Ok(files)
    }

    /// The liveness gate between batches: one delayed re-probe, then the run
    /// aborts rather than hammering a dead server.
    async fn ensure_server_alive(&self) -> bool {
        if self.client.is_alive().await {
            return true;
        }

        warn!(
            "GROBID did not answer the liveness probe, retrying in {}s",
            self.config.batch.retry_delay_secs
        );
        tokio::time::sleep(Duration::from_secs(self.config.batch.retry_delay_secs)).await;

        self.client.is_alive().await
    }

    async fn process_batch(
        &self,
        batch: &[ScannedPdf],
        tei_dir: &Path,
        txt_dir: &Path,
        progress: &Arc<ProgressTracker>,
    ) {
        let tasks = batch.iter().cloned().map(|file| {
            let processor = Arc::clone(&self.processor);
            let progress = Arc::clone(progress);
            let tei_dir = tei_dir.to_path_buf();
            let txt_dir = txt_dir.to_path_buf();

            async move {
                match Self::process_file(&processor, &file, &tei_dir, &txt_dir).await {
                    Ok(outcome) => {
                        progress.add_bytes_processed(file.size);
                        progress.add_tei_saved();

                        match outcome {
                            FileOutcome::Complete => {
                                progress.add_document();
                                progress.inc_files_processed();
                                debug!("Processed {}", file.relative_path);
                            }
                            FileOutcome::TeiOnly(e) => {
                                warn!(
                                    "TEI saved but text extraction failed for {}: {}",
                                    file.relative_path, e
                                );
                                progress.inc_files_failed();
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Failed to process {}: {}", file.relative_path, e);
                        progress.inc_files_failed();
                    }
                }
            }
        });

        stream::iter(tasks)
            .buffer_unordered(self.config.batch.parallel_uploads)
            .collect::<Vec<_>>()
            .await;
    }

    async fn process_file(
        processor: &PdfProcessor,
        file: &ScannedPdf,
        tei_dir: &Path,
        txt_dir: &Path,
    ) -> Result<FileOutcome> {
        let tei_xml = processor.fetch_tei(file).await?;
        write_atomic(&tei_dir.join(file.tei_file_name()), tei_xml.as_bytes()).await?;

        match processor.extract(&file.relative_path, Some(file.size), &tei_xml) {
            Ok(document) => {
                write_atomic(
                    &txt_dir.join(file.txt_file_name()),
                    document.clean_text.as_bytes(),
                )
                .await?;
                Ok(FileOutcome::Complete)
            }
            Err(e) => Ok(FileOutcome::TeiOnly(e)),
        }
    }

    fn log_final_stats(&self, stats: &PipelineStats) {
        info!("=== Harvest Execution Summary ===");
        info!("Duration: {} seconds", stats.duration_secs);
        info!("Files processed: {}", stats.files_processed);
        info!("Files failed: {}", stats.files_failed);
        info!("Success rate: {:.2}%", stats.success_rate());
        info!("TEI documents saved: {}", stats.tei_saved);
        info!("Clean texts written: {}", stats.documents_created);
        info!(
            "Processing speed: {:.2} files/sec",
            stats.files_per_second()
        );
        info!(
            "Throughput: {:.2} MB/sec",
            stats.bytes_per_second() / 1_048_576.0
        );
        info!("=================================");
    }
}

/// Write through a sibling temp file and rename, so interrupted runs never
/// leave partial TEI or text under the final names.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp: PathBuf = path.with_extension("part");

    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|source| HarvestError::FileOperation {
            path: tmp.clone(),
            source,
        })?;

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|source| HarvestError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(())
}

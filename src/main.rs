// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use grobid_harvest::{
    BatchOrchestrator, Config, GrobidClient, HealthReport, HealthStatus, JsonExporter,
    TextCleaner, TextExporter, utils::logging,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "grobid_harvest")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Batch harvesting pipeline for academic PDFs via GROBID", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the GROBID server answers its liveness endpoint
    Check {
        #[arg(long, value_name = "SECS")]
        wait: Option<u64>,
    },

    /// Scan the input directory and feed PDFs to GROBID in batches
    Process {
        #[arg(long, value_name = "DIR")]
        input: Option<PathBuf>,

        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[arg(long, value_name = "NUM")]
        limit: Option<usize>,

        #[arg(long)]
        force: bool,
    },

    /// Regenerate clean text files from previously saved TEI
    Extract {
        #[arg(long, value_name = "DIR")]
        tei: Option<PathBuf>,

        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Export extracted metadata as JSON documents with a manifest
    Export {
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logger(cli.color, cli.verbose);

    info!("GROBID Harvest Pipeline");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Check { wait } => {
            cmd_check(&config, wait).await?;
        }
        Commands::Process {
            input,
            output,
            limit,
            force,
        } => {
            cmd_process(config, input, output, limit, force).await?;
        }
        Commands::Extract { tei, output } => {
            cmd_extract(&config, tei, output)?;
        }
        Commands::Export { output, pretty } => {
            cmd_export(&config, output, pretty)?;
        }
    }

    Ok(())
}

async fn cmd_check(config: &Config, wait: Option<u64>) -> Result<()> {
    let client =
        GrobidClient::new(config.server.clone()).context("Failed to create GROBID client")?;

    if let Some(wait_secs) = wait
        && wait_secs > 0
    {
        info!(
            "Waiting up to {}s for GROBID at {}",
            wait_secs,
            client.base_url()
        );
        client
            .wait_until_alive(Duration::from_secs(wait_secs))
            .await;
    }

    let check = client.health_check().await;
    let report = HealthReport::new(vec![check], env!("CARGO_PKG_VERSION").to_string());

    println!("{}", report.format());

    match report.overall_status {
        HealthStatus::Healthy => {
            println!("{}", logging::format_success("GROBID is ready"));
        }
        HealthStatus::Degraded => {
            println!(
                "{}",
                logging::format_warning("GROBID is reachable but responding slowly")
            );
        }
        HealthStatus::Unhealthy => {
            println!("{}", logging::format_error("GROBID is not reachable"));
            return Err(anyhow::anyhow!(
                "GROBID server at {} is not reachable",
                config.server.base_url
            ));
        }
    }

    Ok(())
}

async fn cmd_process(
    mut config: Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    limit: Option<usize>,
    force: bool,
) -> Result<()> {
    if let Some(input) = input {
        config.storage.input_dir = input;
    }
    if let Some(output) = output {
        config.storage.output_dir = output;
    }

    info!(
        "Harvesting PDFs from {} into {}",
        config.storage.input_dir.display(),
        config.storage.output_dir.display()
    );

    let orchestrator =
        BatchOrchestrator::new(config).context("Failed to create batch orchestrator")?;
    let stats = orchestrator.run(limit, force).await?;

    if stats.files_failed > 0 {
        warn!(
            "Run finished with {} failed file(s); re-run to retry them",
            stats.files_failed
        );
    }

    Ok(())
}

fn cmd_extract(
    config: &Config,
    tei: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let tei_dir = tei.unwrap_or_else(|| config.storage.tei_dir());
    let txt_dir = output.unwrap_or_else(|| config.storage.txt_dir());

    let cleaner = TextCleaner::new(&config.extraction.stop_headings)
        .context("Failed to compile stop pattern")?;
    let exporter = TextExporter::new(txt_dir).context("Failed to create text exporter")?;

    let summary = exporter.export_tei_dir(&tei_dir, &cleaner)?;
    info!(
        "Extracted {} text file(s), skipped {}",
        summary.written, summary.skipped
    );

    Ok(())
}

fn cmd_export(config: &Config, output: Option<PathBuf>, pretty: bool) -> Result<()> {
    let output_dir = output.unwrap_or_else(|| config.storage.export_dir());
    let tei_dir = config.storage.tei_dir();

    let cleaner = TextCleaner::new(&config.extraction.stop_headings)
        .context("Failed to compile stop pattern")?;
    let exporter = JsonExporter::new(output_dir).context("Failed to create JSON exporter")?;

    let manifest = exporter.export_tei_dir(&tei_dir, &cleaner, pretty)?;
    info!(
        "Export complete: {} document(s), {} skipped",
        manifest.total_documents, manifest.skipped
    );

    Ok(())
}

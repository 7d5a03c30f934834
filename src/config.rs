// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{HarvestError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub batch: BatchConfig,
    pub storage: StorageConfig,
    pub pipeline: PipelineConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub health_timeout_secs: u64,
    pub startup_wait_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub max_retries: usize,
    pub retry_delay_secs: u64,
    pub pause_between_batches_secs: u64,
    pub restart_hint_every: usize,
    pub parallel_uploads: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl StorageConfig {
    pub fn tei_dir(&self) -> PathBuf {
        self.output_dir.join("tei")
    }

    pub fn txt_dir(&self) -> PathBuf {
        self.output_dir.join("txt")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.output_dir.join("json")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub skip_patterns: Vec<String>,
    pub force_reprocess: bool,
    pub max_file_size_mb: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    pub consolidate_header: bool,
    pub consolidate_citations: bool,
    /// Regex alternation truncating body text at trailing sections.
    pub stop_headings: String,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GROBID_HARVEST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| HarvestError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| HarvestError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:8070".to_string(),
                request_timeout_secs: 300,
                health_timeout_secs: 5,
                startup_wait_secs: 0,
            },
            batch: BatchConfig {
                batch_size: 5,
                max_retries: 3,
                retry_delay_secs: 30,
                pause_between_batches_secs: 60,
                restart_hint_every: 5,
                parallel_uploads: 5,
            },
            storage: StorageConfig {
                input_dir: PathBuf::from("./articles"),
                output_dir: PathBuf::from("./results"),
            },
            pipeline: PipelineConfig {
                skip_patterns: vec![".git/*".to_string(), "*.tmp".to_string()],
                force_reprocess: false,
                max_file_size_mb: 50,
            },
            extraction: ExtractionConfig {
                consolidate_header: false,
                consolidate_citations: false,
                stop_headings: crate::tei::DEFAULT_STOP_HEADINGS.to_string(),
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.batch.batch_size == 0 {
            return Err(HarvestError::Config(
                "batch_size must be greater than 0".to_string(),
            ));
        }

        if self.batch.max_retries == 0 {
            return Err(HarvestError::Config(
                "max_retries must be greater than 0".to_string(),
            ));
        }

        if self.batch.parallel_uploads == 0 {
            return Err(HarvestError::Config(
                "parallel_uploads must be greater than 0".to_string(),
            ));
        }

        if !self.server.base_url.starts_with("http://")
            && !self.server.base_url.starts_with("https://")
        {
            return Err(HarvestError::Config(format!(
                "base_url must be an http(s) URL: {}",
                self.server.base_url
            )));
        }

        regex::Regex::new(&format!("(?i){}", self.extraction.stop_headings)).map_err(|e| {
            HarvestError::Config(format!("stop_headings is not a valid regex: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch.batch_size, 5);
        assert_eq!(config.server.base_url, "http://localhost:8070");
    }

    #[test]
    fn test_storage_subdirectories() {
        let config = Config::default_config();
        assert_eq!(config.storage.tei_dir(), PathBuf::from("./results/tei"));
        assert_eq!(config.storage.txt_dir(), PathBuf::from("./results/txt"));
    }

    #[test]
    fn test_validation_rejects_zero_batch_size() {
        let mut config = Config::default_config();
        config.batch.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let mut config = Config::default_config();
        config.server.base_url = "localhost:8070".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_stop_pattern() {
        let mut config = Config::default_config();
        config.extraction.stop_headings = "(unclosed".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.toml");
        fs::write(
            &path,
            r#"
[server]
base_url = "http://grobid.internal:8070"
request_timeout_secs = 120
health_timeout_secs = 3
startup_wait_secs = 0

[batch]
batch_size = 10
max_retries = 2
retry_delay_secs = 5
pause_between_batches_secs = 0
restart_hint_every = 5
parallel_uploads = 4

[storage]
input_dir = "/data/articles"
output_dir = "/data/results"

[pipeline]
skip_patterns = []
force_reprocess = false
max_file_size_mb = 50

[extraction]
consolidate_header = false
consolidate_citations = true
stop_headings = "references|bibliography"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.base_url, "http://grobid.internal:8070");
        assert_eq!(config.batch.batch_size, 10);
        assert!(config.extraction.consolidate_citations);
    }
}

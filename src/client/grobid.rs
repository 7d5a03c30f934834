// file: src/client/grobid.rs
// description: HTTP client for the GROBID fulltext processing API
// reference: https://grobid.readthedocs.io/en/latest/Grobid-service/

use crate::config::{ExtractionConfig, ServerConfig};
use crate::error::{HarvestError, Result};
use crate::utils::telemetry::HealthCheck;
use reqwest::{Client, StatusCode, multipart};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const ISALIVE_PATH: &str = "api/isalive";
const FULLTEXT_PATH: &str = "api/processFulltextDocument";

/// Above this round-trip time the health check reports the server as
/// degraded rather than healthy.
const DEGRADED_THRESHOLD: Duration = Duration::from_secs(2);

const STARTUP_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct GrobidClient {
    http: Client,
    config: ServerConfig,
}

impl GrobidClient {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Liveness probe against `api/isalive`. Any transport failure or
    /// non-2xx status counts as dead.
    pub async fn is_alive(&self) -> bool {
        let url = self.endpoint(ISALIVE_PATH);
        let result = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(self.config.health_timeout_secs))
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("GROBID liveness probe failed: {}", e);
                false
            }
        }
    }

    pub async fn health_check(&self) -> HealthCheck {
        let start = Instant::now();
        let alive = self.is_alive().await;
        let elapsed = start.elapsed();

        if !alive {
            HealthCheck::unhealthy(
                "grobid",
                format!("no response from {}", self.config.base_url),
                elapsed,
            )
        } else if elapsed > DEGRADED_THRESHOLD {
            HealthCheck::degraded(
                "grobid",
                format!("slow response ({} ms)", elapsed.as_millis()),
                elapsed,
            )
        } else {
            HealthCheck::healthy("grobid", elapsed)
        }
    }

    /// Poll the liveness endpoint until the server answers or `wait` runs
    /// out. Covers the window between launching GROBID and it accepting
    /// requests.
    pub async fn wait_until_alive(&self, wait: Duration) -> bool {
        let deadline = Instant::now() + wait;

        loop {
            if self.is_alive().await {
                return true;
            }
            if Instant::now() >= deadline {
                warn!(
                    "GROBID at {} still not alive after {:.0}s",
                    self.config.base_url,
                    wait.as_secs_f64()
                );
                return false;
            }
            debug!("GROBID not ready yet, polling again");
            tokio::time::sleep(STARTUP_POLL_INTERVAL).await;
        }
    }

    /// Submit one PDF to `api/processFulltextDocument` and return the TEI
    /// XML body.
    ///
    /// Status handling: 204 means GROBID could not extract anything from the
    /// document; 503 means every server thread is busy and the request is
    /// worth retrying.
    pub async fn process_fulltext(
        &self,
        pdf: Vec<u8>,
        file_name: &str,
        extraction: &ExtractionConfig,
    ) -> Result<String> {
        let url = self.endpoint(FULLTEXT_PATH);

        let part = multipart::Part::bytes(pdf)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;

        let form = multipart::Form::new()
            .part("input", part)
            .text("consolidateHeader", flag(extraction.consolidate_header))
            .text(
                "consolidateCitations",
                flag(extraction.consolidate_citations),
            );

        debug!("Submitting {} to {}", file_name, url);
        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();

        match status {
            StatusCode::NO_CONTENT => Err(HarvestError::Server {
                status: status.as_u16(),
                body: format!("no extractable content in {}", file_name),
            }),
            s if s.is_success() => Ok(response.text().await?),
            s => {
                let body = response.text().await.unwrap_or_default();
                Err(HarvestError::Server {
                    status: s.as_u16(),
                    body: crate::utils::Validator::truncate_text(body.trim(), 200),
                })
            }
        }
    }
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

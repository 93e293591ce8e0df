//! Run configuration assembled from command-line flags and environment
//! variables.
//!
//! Flags are described in [`crate::cli::Cli`]. The API key and server may also
//! come from `MAILCHIMP_API_KEY` / `MAILCHIMP_SERVER`.
//!
//! ## Optional Variables
//!
//! - `MCTL_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `MCTL_RETRY_ATTEMPTS` - Retries for transient failures (default: 1, max: 5)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//!
//! A `.env` file in the working directory is loaded first (see `main.rs`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;

use crate::application::services::ReportSettings;
use crate::cli::Cli;
use crate::domain::aggregator::ThresholdPolicy;
use crate::infrastructure::mailchimp::ClientSettings;

/// Maximum number of retries allowed for a single request.
const MAX_RETRY_ATTEMPTS: usize = 5;

/// Mailchimp data center prefix, e.g. `us7`.
const DATA_CENTER_PATTERN: &str = r"^[a-z]+[0-9]+$";

/// Configuration for one report run.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub server: String,
    pub list_id: String,
    pub since: NaiveDate,
    pub before: NaiveDate,
    pub minimum_clicks: u64,
    pub threshold_policy: ThresholdPolicy,
    pub output: PathBuf,
    /// Overwrite an existing output file without confirmation.
    pub assume_yes: bool,
    pub http_timeout_secs: u64,
    pub retry_attempts: usize,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Builds the configuration from parsed flags and the environment.
    pub fn from_cli(cli: Cli) -> Self {
        let http_timeout_secs = env::var("MCTL_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let retry_attempts = env::var("MCTL_RETRY_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Self {
            api_key: cli.api_key.trim().to_string(),
            server: cli.server.trim().to_ascii_lowercase(),
            list_id: cli.list_id.trim().to_string(),
            since: cli.since,
            before: cli.before,
            minimum_clicks: cli.minimum_clicks,
            threshold_policy: cli.threshold_policy,
            output: cli.output,
            assume_yes: cli.yes,
            http_timeout_secs,
            retry_attempts,
            log_level,
            log_format,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the API key or list ID is empty
    /// - `server` is not a data center prefix such as `us7`
    /// - `since` is not before `before`
    /// - the timeout is zero or the retry budget exceeds 5
    /// - `log_format` is not `text` or `json`
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            anyhow::bail!("API key must not be empty");
        }

        if self.list_id.is_empty() {
            anyhow::bail!("List ID must not be empty");
        }

        let server_pattern = Regex::new(DATA_CENTER_PATTERN).context("Invalid server pattern")?;
        if !server_pattern.is_match(&self.server) {
            anyhow::bail!(
                "Server must be a Mailchimp data center such as 'us7', got '{}'",
                self.server
            );
        }

        if self.since >= self.before {
            anyhow::bail!(
                "--since ({}) must be earlier than --before ({})",
                self.since,
                self.before
            );
        }

        if self.http_timeout_secs == 0 {
            anyhow::bail!("MCTL_HTTP_TIMEOUT_SECS must be greater than 0");
        }

        if self.retry_attempts > MAX_RETRY_ATTEMPTS {
            anyhow::bail!(
                "MCTL_RETRY_ATTEMPTS must be at most {}, got {}",
                MAX_RETRY_ATTEMPTS,
                self.retry_attempts
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        Ok(())
    }

    /// Returns the data center named by the API key when it differs from
    /// `server`.
    ///
    /// Keys end in `-<dc>`, so a mismatch usually means the wrong `--server`.
    pub fn server_mismatch(&self) -> Option<&str> {
        let (_, key_server) = self.api_key.rsplit_once('-')?;
        let is_data_center =
            Regex::new(DATA_CENTER_PATTERN).is_ok_and(|pattern| pattern.is_match(key_server));

        (is_data_center && key_server != self.server).then_some(key_server)
    }

    /// Settings for the platform client.
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            api_key: self.api_key.clone(),
            server: self.server.clone(),
            timeout: Duration::from_secs(self.http_timeout_secs),
            retry_attempts: self.retry_attempts,
        }
    }

    /// Thresholding settings for the report.
    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            minimum_clicks: self.minimum_clicks,
            threshold_policy: self.threshold_policy,
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  API key: {}", mask_api_key(&self.api_key));
        tracing::info!("  Server: {}", self.server);
        tracing::info!("  List: {}", self.list_id);
        tracing::info!("  Window: {} - {}", self.since, self.before);
        tracing::info!(
            "  Minimum clicks: {} ({})",
            self.minimum_clicks,
            self.threshold_policy
        );
        tracing::info!("  Output: {}", self.output.display());
        tracing::info!(
            "  HTTP timeout: {}s, retries: {}",
            self.http_timeout_secs,
            self.retry_attempts
        );
    }
}

/// Masks an API key for logging, keeping only the last four characters of
/// the secret and the data center suffix.
///
/// - `0123456789abcdef-us7` → `************cdef-us7`
fn mask_api_key(key: &str) -> String {
    let (secret, suffix) = match key.rsplit_once('-') {
        Some((secret, dc)) => (secret, format!("-{dc}")),
        None => (key, String::new()),
    };

    let visible = 4.min(secret.len() / 4);
    let split = secret.len() - visible;
    match (secret.get(..split), secret.get(split..)) {
        (Some(hidden), Some(tail)) => {
            format!("{}{}{}", "*".repeat(hidden.chars().count()), tail, suffix)
        }
        _ => format!("{}{}", "*".repeat(secret.chars().count()), suffix),
    }
}

/// Builds and validates the configuration.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load(cli: Cli) -> Result<Config> {
    let config = Config::from_cli(cli);
    config.validate()?;
    Ok(config)
}

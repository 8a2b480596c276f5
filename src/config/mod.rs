//! Configuration management for the archive crawler
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. Command-line flags override individual values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Archive layout and publisher heuristics
    pub archive: ArchiveConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Identifying User-Agent sent with every request
    pub user_agent: String,

    /// Politeness delay between fetch iterations, in seconds
    pub delay_secs: f64,
}

/// Shape of the archive being walked and the publisher it mirrors.
///
/// Every "fixed" token the classifiers and the resolver match against
/// lives here so a different collection can be targeted from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Hostname of the archive itself; anything else is external
    pub archive_domain: String,

    /// Path segment shared by every page of the collection
    pub collection_path: String,

    /// Token that marks a year page path
    pub year_marker: String,

    /// Token in an iframe path that marks an embedded document viewer
    pub viewer_marker: String,

    /// Id of the date list container; `{segment}` is the month URL's last segment
    pub date_container_id: String,

    /// Both classes must be present on a call-to-action anchor
    pub button_classes: Vec<String>,

    /// Case-insensitive phrase on a call-to-action anchor
    pub call_to_action: String,

    /// Publisher URL template; `{id}` is the archive record id
    pub publisher_template: String,

    /// Substrings identifying known publisher hosts
    pub publisher_domains: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(timeout) = std::env::var("TOISCRAPE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.crawler.request_timeout_secs = timeout;
        }

        if let Ok(user_agent) = std::env::var("TOISCRAPE_USER_AGENT") {
            config.crawler.user_agent = user_agent;
        }

        if let Some(delay) = std::env::var("TOISCRAPE_DELAY")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
        {
            config.crawler.delay_secs = delay;
        }

        if let Ok(domain) = std::env::var("TOISCRAPE_ARCHIVE_DOMAIN") {
            config.archive.archive_domain = domain;
        }

        if let Ok(level) = std::env::var("TOISCRAPE_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(format) = std::env::var("TOISCRAPE_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.crawler.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if !self.crawler.delay_secs.is_finite() || self.crawler.delay_secs < 0.0 {
            anyhow::bail!("delay_secs must be a non-negative number");
        }

        if self.crawler.user_agent.trim().is_empty() {
            anyhow::bail!("user_agent must not be empty");
        }

        if self.archive.archive_domain.is_empty() {
            anyhow::bail!("archive_domain must not be empty");
        }

        if !self.archive.publisher_template.contains("{id}") {
            anyhow::bail!("publisher_template must contain an {{id}} placeholder");
        }

        if !self.archive.date_container_id.contains("{segment}") {
            anyhow::bail!("date_container_id must contain a {{segment}} placeholder");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_secs)
    }

    /// Get the politeness delay as Duration
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.crawler.delay_secs.max(0.0))
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 15,
            user_agent: String::from("ndli-toi-scraper/1.0 (+https://github.com/)"),
            delay_secs: 1.0,
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            archive_domain: String::from("ndl.gov.in"),
            collection_path: String::from("/nw_document/toi/timesofindia"),
            year_marker: String::from("thetoi_"),
            viewer_marker: String::from("viewer"),
            date_container_id: String::from("date-list-{segment}"),
            button_classes: vec![String::from("btn"), String::from("btn-original")],
            call_to_action: String::from("read original article"),
            publisher_template: String::from(
                "https://timesofindia.indiatimes.com/articleshow/{id}.cms",
            ),
            publisher_domains: vec![
                String::from("timesofindia.indiatimes.com"),
                String::from("indiatimes.com"),
                String::from("toi.in"),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

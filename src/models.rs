// Core data structures for the archive crawler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A link found while classifying a page, optionally labelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    pub label: Option<String>,
    pub url: String, // always absolute
}

impl LinkCandidate {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            url: url.into(),
        }
    }

    /// Label, or the URL when the link has none
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.url)
    }
}

/// One headline or title discovered by the hierarchical walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub year_url: String,
    pub month_url: String,
    pub date_url: String,
    pub title: String,
    pub article_url: Option<String>,
    pub external_url: Option<String>,
}

/// One article-like page discovered by the flat crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: Option<String>,
    pub text: Option<String>,
}

/// Running counters for a crawl
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    pub pages_fetched: u32,
    pub fetch_failures: u32,
    pub records_written: u32,
    pub started_at: DateTime<Utc>,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            pages_fetched: 0,
            fetch_failures: 0,
            records_written: 0,
            started_at: Utc::now(),
        }
    }

    pub fn record_page(&mut self) {
        self.pages_fetched += 1;
    }

    pub fn record_failure(&mut self) {
        self.fetch_failures += 1;
    }

    pub fn record_written(&mut self) {
        self.records_written += 1;
    }

    /// Seconds elapsed since the crawl started
    pub fn duration_secs(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }

    /// Failed fetches as a percentage of all fetch attempts
    pub fn failure_rate(&self) -> f64 {
        let attempts = self.pages_fetched + self.fetch_failures;
        if attempts == 0 {
            0.0
        } else {
            (self.fetch_failures as f64 / attempts as f64) * 100.0
        }
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

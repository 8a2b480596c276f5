//! Crawl orchestration
//!
//! Two traversal modes, each owning its mutable state:
//!
//! - [`FlatCrawl`]: breadth-first crawl from a start URL, recording every
//!   article-like page as a [`PageRecord`]
//! - [`ArchiveWalk`]: year → month → date → headline walk of the archive
//!   hierarchy, recording one [`ArticleRecord`] per title
//!
//! Requests are strictly sequential; a fixed delay between them is the
//! only rate limiting.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use toiscrape::crawler::fetcher::ArchiveFetcher;
//! use toiscrape::crawler::pipeline::{FlatCrawl, PipelineConfig};
//! use toiscrape::storage::JsonlWriter;
//!
//! # async fn example() -> toiscrape::error::Result<()> {
//! let fetcher = ArchiveFetcher::new("toiscrape/1.0", Duration::from_secs(15))?;
//! let config = PipelineConfig {
//!     max_pages: Some(50),
//!     ..Default::default()
//! };
//! let writer = JsonlWriter::create(Path::new("output.jsonl"))?;
//!
//! let stats = FlatCrawl::new(&fetcher, &config, writer)
//!     .run("https://www.ndl.gov.in/nw_document/toi/timesofindia")
//!     .await?;
//! println!("Wrote {} records", stats.records_written);
//! # Ok(())
//! # }
//! ```

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

use crate::config::ArchiveConfig;
use crate::crawler::fetcher::ArchiveFetcher;
use crate::crawler::list::{scan_all_links, scan_headlines, ArchiveNavigator};
use crate::crawler::resolve::ExternalResolver;
use crate::crawler::url::{netloc, same_suffix_domain};
use crate::error::Result;
use crate::models::{ArticleRecord, CrawlStats, PageRecord};
use crate::parser::{extract_article, extract_title_list, looks_like_article};
use crate::storage::JsonlWriter;
use crate::utils::{cap, truncate_text};
use crate::utils::error::CrawlerError;

// ============================================================================
// Configuration
// ============================================================================

/// Limits and switches for a crawl run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pages to fetch successfully in flat mode (None = unlimited)
    pub max_pages: Option<usize>,

    pub max_years: Option<usize>,
    pub max_months: Option<usize>,
    pub max_dates: Option<usize>,

    /// Titles recorded per date page
    pub max_titles: Option<usize>,

    /// Pause between requests
    pub delay: Duration,

    /// Resolve each headline's external publisher URL
    pub resolve_externals: bool,

    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            max_years: None,
            max_months: None,
            max_dates: None,
            max_titles: None,
            delay: Duration::from_secs(1),
            resolve_externals: false,
            show_progress: true,
        }
    }
}

const PROGRESS_MESSAGE_CHARS: usize = 80;

fn progress_bar(len: Option<usize>, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }

    match len {
        Some(len) => {
            let pb = ProgressBar::new(len as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            {
                pb.set_style(style.progress_chars("█▓░"));
            }
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {pos} {wide_msg}") {
                pb.set_style(style);
            }
            pb
        }
    }
}

// ============================================================================
// Flat crawl
// ============================================================================

/// Breadth-first crawl over the start URL's domain
pub struct FlatCrawl<'a> {
    fetcher: &'a ArchiveFetcher,
    config: &'a PipelineConfig,
    writer: JsonlWriter,

    /// Every URL ever enqueued; never pruned
    visited: HashSet<String>,
    queue: VecDeque<String>,
    stats: CrawlStats,
}

impl<'a> FlatCrawl<'a> {
    pub fn new(fetcher: &'a ArchiveFetcher, config: &'a PipelineConfig, writer: JsonlWriter) -> Self {
        Self {
            fetcher,
            config,
            writer,
            visited: HashSet::new(),
            queue: VecDeque::new(),
            stats: CrawlStats::new(),
        }
    }

    /// Crawl until the queue empties or `max_pages` pages have been fetched
    ///
    /// Failed fetches are logged, not counted as pages, and the crawl moves
    /// on after the usual delay.
    ///
    /// # Errors
    ///
    /// - `CrawlerError::InvalidUrl` if the start URL does not parse or has no host
    /// - Storage errors from writing a record
    pub async fn run(mut self, start_url: &str) -> Result<CrawlStats> {
        // Seed with the serialized form so discovered links compare equal
        let start = Url::parse(start_url)
            .map_err(|_| CrawlerError::InvalidUrl(start_url.to_string()))?
            .to_string();
        let host = netloc(&start).ok_or_else(|| CrawlerError::InvalidUrl(start_url.to_string()))?;
        let limit = cap(self.config.max_pages);

        tracing::info!(start = %start, max_pages = ?self.config.max_pages, "Starting flat crawl");

        self.visited.insert(start.clone());
        self.queue.push_back(start);

        let progress = progress_bar(self.config.max_pages, self.config.show_progress);

        while (self.stats.pages_fetched as usize) < limit {
            let Some(url) = self.queue.pop_front() else {
                tracing::debug!("Queue exhausted");
                break;
            };
            progress.set_message(truncate_text(&url, PROGRESS_MESSAGE_CHARS));

            let Some(html) = self.fetcher.try_fetch(&url).await else {
                self.stats.record_failure();
                tokio::time::sleep(self.config.delay).await;
                continue;
            };
            self.stats.record_page();

            if looks_like_article(&html) {
                let article = extract_article(&html);
                self.writer.write_record(&PageRecord {
                    url: url.clone(),
                    title: article.title,
                    text: article.text,
                })?;
                self.stats.record_written();
            }

            let mut enqueued = 0usize;
            for link in scan_all_links(&html, &url) {
                if same_suffix_domain(&host, &link) && self.visited.insert(link.clone()) {
                    self.queue.push_back(link);
                    enqueued += 1;
                }
            }

            tracing::debug!(url = %url, enqueued, queued = self.queue.len(), "Processed page");
            progress.inc(1);
            tokio::time::sleep(self.config.delay).await;
        }

        progress.finish_and_clear();
        tracing::info!(
            pages = self.stats.pages_fetched,
            failures = self.stats.fetch_failures,
            records = self.stats.records_written,
            "Flat crawl finished"
        );

        Ok(self.stats)
    }
}

// ============================================================================
// Hierarchical walk
// ============================================================================

/// Year/month/date/headline walk of the archive
///
/// Months and dates are not deduplicated across years; a page linked from
/// two years is walked twice.
pub struct ArchiveWalk<'a> {
    fetcher: &'a ArchiveFetcher,
    archive: &'a ArchiveConfig,
    config: &'a PipelineConfig,
    writer: JsonlWriter,
    stats: CrawlStats,
}

impl<'a> ArchiveWalk<'a> {
    pub fn new(
        fetcher: &'a ArchiveFetcher,
        archive: &'a ArchiveConfig,
        config: &'a PipelineConfig,
        writer: JsonlWriter,
    ) -> Self {
        Self {
            fetcher,
            archive,
            config,
            writer,
            stats: CrawlStats::new(),
        }
    }

    /// Walk the hierarchy below `start_url`
    ///
    /// # Errors
    ///
    /// - `CrawlerError::Fetch` if the start page or any year or month page
    ///   cannot be fetched
    /// - Storage errors from writing a record
    pub async fn run(mut self, start_url: &str) -> Result<CrawlStats> {
        let navigator = ArchiveNavigator::new(self.fetcher, self.archive);
        let resolver = ExternalResolver::new(self.fetcher, self.archive);

        let years = navigator.list_years(start_url).await?;
        if years.is_empty() {
            tracing::warn!(start = %start_url, "Start page lists no year pages");
            return Ok(self.stats);
        }

        tracing::info!(
            start = %start_url,
            years = years.len(),
            resolve_externals = self.config.resolve_externals,
            "Starting archive walk"
        );

        let progress = progress_bar(None, self.config.show_progress);

        for year_url in years.iter().take(cap(self.config.max_years)) {
            let months = navigator.list_months(year_url).await?;

            for month_url in months.iter().take(cap(self.config.max_months)) {
                let dates = navigator.list_dates(month_url).await?;

                for date in dates.iter().take(cap(self.config.max_dates)) {
                    progress.set_message(truncate_text(
                        &format!("{} ({})", date.display_label(), month_url),
                        PROGRESS_MESSAGE_CHARS,
                    ));

                    self.walk_date(&resolver, year_url, month_url, &date.url).await?;

                    progress.inc(1);
                    tokio::time::sleep(self.config.delay).await;
                }
            }

            tokio::time::sleep(self.config.delay).await;
        }

        progress.finish_and_clear();
        tracing::info!(
            dates = self.stats.pages_fetched,
            failures = self.stats.fetch_failures,
            records = self.stats.records_written,
            "Archive walk finished"
        );

        Ok(self.stats)
    }

    async fn walk_date(
        &mut self,
        resolver: &ExternalResolver<'_>,
        year_url: &str,
        month_url: &str,
        date_url: &str,
    ) -> Result<()> {
        let Some(html) = self.fetcher.try_fetch(date_url).await else {
            self.stats.record_failure();
            return Ok(());
        };
        self.stats.record_page();

        let items: Vec<(String, Option<String>)> = if self.config.resolve_externals {
            scan_headlines(&html, date_url, self.archive)
                .into_iter()
                .map(|h| (h.display_label().to_string(), Some(h.url)))
                .collect()
        } else {
            extract_title_list(&html)
                .into_iter()
                .map(|title| (title, None))
                .collect()
        };

        tracing::debug!(date = %date_url, items = items.len(), "Walking date page");

        for (title, article_url) in items.into_iter().take(cap(self.config.max_titles)) {
            let external_url = match &article_url {
                Some(url) if self.config.resolve_externals => resolver.resolve(url).await,
                _ => None,
            };

            self.writer.write_record(&ArticleRecord {
                year_url: year_url.to_string(),
                month_url: month_url.to_string(),
                date_url: date_url.to_string(),
                title,
                article_url,
                external_url,
            })?;
            self.stats.record_written();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.delay, Duration::from_secs(1));
        assert!(config.max_pages.is_none());
        assert!(!config.resolve_externals);
    }

    #[test]
    fn test_hidden_progress_bar() {
        assert!(progress_bar(Some(3), false).is_hidden());
    }
}

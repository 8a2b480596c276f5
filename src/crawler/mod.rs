//! Archive crawling
//!
//! This module fetches archive pages, classifies their links, resolves
//! archived articles to their publisher URLs and drives the two crawl
//! modes over them.

pub mod fetcher;
pub mod headers;
pub mod list;
pub mod pipeline;
pub mod resolve;
pub mod url;

pub use fetcher::ArchiveFetcher;
pub use list::ArchiveNavigator;
pub use pipeline::{ArchiveWalk, FlatCrawl, PipelineConfig};
pub use resolve::ExternalResolver;

use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::CrawlStats;
use crate::storage::JsonlWriter;

/// Main crawler structure
pub struct Crawler {
    /// Shared single-attempt fetcher
    fetcher: ArchiveFetcher,

    /// Configuration
    config: Config,
}

impl Crawler {
    /// Create a new crawler instance
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built
    pub fn new(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::config(e.to_string()))?;

        let fetcher = ArchiveFetcher::new(&config.crawler.user_agent, config.request_timeout())?;

        Ok(Self { fetcher, config })
    }

    pub fn fetcher(&self) -> &ArchiveFetcher {
        &self.fetcher
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn navigator(&self) -> ArchiveNavigator<'_> {
        ArchiveNavigator::new(&self.fetcher, &self.config.archive)
    }

    pub fn resolver(&self) -> ExternalResolver<'_> {
        ExternalResolver::new(&self.fetcher, &self.config.archive)
    }

    /// Breadth-first crawl from `start_url`, writing page records to `output`
    pub async fn crawl_flat(
        &self,
        start_url: &str,
        output: &Path,
        pipeline: &PipelineConfig,
    ) -> Result<CrawlStats> {
        let writer = JsonlWriter::create(output)?;
        FlatCrawl::new(&self.fetcher, pipeline, writer)
            .run(start_url)
            .await
    }

    /// Walk the archive hierarchy from `start_url`, writing article records to `output`
    pub async fn walk_archive(
        &self,
        start_url: &str,
        output: &Path,
        pipeline: &PipelineConfig,
    ) -> Result<CrawlStats> {
        let writer = JsonlWriter::create(output)?;
        ArchiveWalk::new(&self.fetcher, &self.config.archive, pipeline, writer)
            .run(start_url)
            .await
    }
}

//! toiscrape - Times of India archive crawler
//!
//! Walks the National Digital Library's Times of India collection
//! (year → month → date → article pages), extracts titles and article text,
//! and recovers each archived article's original publisher URL.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Fetching, link classification, URL resolution and the crawl modes
//! - [`parser`] - HTML parsing and data extraction
//! - [`models`] - Core data structures and types
//! - [`storage`] - JSON-lines output
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use toiscrape::config::Config;
//! use toiscrape::crawler::{Crawler, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let crawler = Crawler::new(config)?;
//!     let stats = crawler
//!         .walk_archive(
//!             "https://www.ndl.gov.in/nw_document/toi/timesofindia",
//!             Path::new("archive.jsonl"),
//!             &PipelineConfig::default(),
//!         )
//!         .await?;
//!     println!("{} records", stats.records_written);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{Crawler, PipelineConfig};
    pub use crate::error::{Error, ErrorCategory, Result, ScraperErrorTrait};
    pub use crate::models::{ArticleRecord, CrawlStats, LinkCandidate, PageRecord};
    pub use crate::storage::JsonlWriter;
}

// Direct re-exports for convenience
pub use models::{ArticleRecord, CrawlStats, LinkCandidate, PageRecord};

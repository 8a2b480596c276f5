pub mod archive;
pub mod crawl;

// Re-export command functions for convenience
pub use archive::{archive, ArchiveParams, ListMode};
pub use crawl::{crawl, CrawlParams};

//! Output storage
//!
//! Crawl results are written as newline-delimited JSON.

pub mod jsonl;

pub use jsonl::JsonlWriter;

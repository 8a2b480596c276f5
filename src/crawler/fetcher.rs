//! HTTP fetcher for archive pages
//!
//! This module provides the single-attempt HTTP fetcher used by every crawl
//! step, with features including:
//! - Fixed timeout and identifying headers
//! - Charset detection from the Content-Type header or a `<meta charset>` tag
//! - Two call conventions: [`ArchiveFetcher::fetch`] propagates failures,
//!   [`ArchiveFetcher::try_fetch`] logs them and yields `None`
//! - A redirect-following probe that never reads the response body
//!
//! Requests are never retried.

use crate::crawler::headers::build_archive_headers;
use crate::utils::error::FetchError;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::Regex;
use reqwest::{Client, Response};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([A-Za-z0-9_\-:]+)"#).unwrap()
});

/// Outcome of a redirect-following probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Status of the final response in the redirect chain
    pub status: u16,

    /// URL the redirect chain ended at
    pub final_url: String,
}

/// Single-attempt fetcher for archive and publisher pages
pub struct ArchiveFetcher {
    /// HTTP client with configured timeout and default headers
    client: Client,
}

impl ArchiveFetcher {
    /// Create a new fetcher
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Identifying User-Agent header value
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .default_headers(build_archive_headers(user_agent))
            .timeout(timeout)
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a page body, propagating any failure
    ///
    /// Used for pages the crawl cannot continue without (start, year and
    /// month pages).
    ///
    /// # Errors
    ///
    /// - `FetchError::InvalidUrl` if the URL does not parse
    /// - `FetchError::Timeout` if the request timed out
    /// - `FetchError::Status` for any non-2xx response
    /// - `FetchError::Http` for other transport failures
    /// - `FetchError::Decode` if the body cannot be decoded
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        tracing::debug!(url = %url, "Fetching URL");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        self.decode_response(response).await
    }

    /// Fetch a page body, absorbing any failure
    ///
    /// Failures are logged at warn level and reported as `None`, so leaf
    /// pages can be skipped without aborting the crawl.
    pub async fn try_fetch(&self, url: &str) -> Option<String> {
        match self.fetch(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to fetch page");
                None
            }
        }
    }

    /// Follow redirects from `url` and report where they end
    ///
    /// The response body is dropped unread.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on an unparseable URL or a transport failure.
    /// Error statuses are not errors here; they are reported in the outcome.
    pub async fn probe(&self, url: &str) -> Result<ProbeOutcome, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        tracing::debug!(url = %url, "Probing URL");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        Ok(ProbeOutcome {
            status: response.status().as_u16(),
            final_url: response.url().to_string(),
        })
    }

    async fn decode_response(&self, response: Response) -> Result<String, FetchError> {
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response.bytes().await.map_err(FetchError::from_transport)?;

        decode_bytes(&bytes, &content_type)
    }
}

/// Decode a response body to a string
///
/// Tries, in order:
/// 1. The charset named in the Content-Type header
/// 2. A `<meta charset>` declaration in the first kilobyte
/// 3. UTF-8
/// 4. Windows-1252, which accepts any byte sequence
///
/// # Errors
///
/// Returns `FetchError::Decode` if a declared charset is unknown and no
/// fallback decodes cleanly
pub fn decode_bytes(bytes: &[u8], content_type: &str) -> Result<String, FetchError> {
    let declared = charset_from_content_type(content_type).or_else(|| charset_from_meta(bytes));

    if let Some(encoding) = declared {
        let (cow, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return Ok(cow.into_owned());
        }
        tracing::debug!(encoding = encoding.name(), "Declared charset did not decode cleanly");
    }

    let (cow, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return Ok(cow.into_owned());
    }

    let (cow, _, had_errors) = WINDOWS_1252.decode(bytes);
    if !had_errors {
        return Ok(cow.into_owned());
    }

    Err(FetchError::Decode(
        "Failed to decode content with declared charset, UTF-8 or windows-1252".to_string(),
    ))
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    let lower = content_type.to_ascii_lowercase();
    let label = lower.split("charset=").nth(1)?;
    let label = label.split(';').next()?.trim().trim_matches('"');
    Encoding::for_label(label.as_bytes())
}

fn charset_from_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    let caps = META_CHARSET.captures(&head)?;
    Encoding::for_label(caps.get(1)?.as_str().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = ArchiveFetcher::new("ndli-toi-scraper/1.0", Duration::from_secs(15));
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_decode_utf8() {
        let text = "Times of India — 1938";
        let decoded = decode_bytes(text.as_bytes(), "text/html; charset=utf-8");
        assert_eq!(decoded.unwrap(), text);
    }

    #[test]
    fn test_decode_declared_latin1() {
        // "café" in windows-1252
        let bytes: &[u8] = &[0x63, 0x61, 0x66, 0xe9];
        let decoded = decode_bytes(bytes, "text/html; charset=ISO-8859-1");
        assert_eq!(decoded.unwrap(), "café");
    }

    #[test]
    fn test_decode_meta_charset() {
        let mut bytes = br#"<html><head><meta charset="windows-1252"></head><body>"#.to_vec();
        bytes.extend_from_slice(&[0x63, 0x61, 0x66, 0xe9]);
        let decoded = decode_bytes(&bytes, "text/html").unwrap();
        assert!(decoded.ends_with("café"));
    }

    #[test]
    fn test_decode_undeclared_invalid_utf8_falls_back() {
        let bytes: &[u8] = &[0x63, 0x61, 0x66, 0xe9];
        let decoded = decode_bytes(bytes, "");
        assert_eq!(decoded.unwrap(), "café");
    }

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(
            charset_from_content_type("text/html; charset=\"UTF-8\""),
            Some(UTF_8)
        );
        assert_eq!(charset_from_content_type("text/html"), None);
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_url() {
        let fetcher = ArchiveFetcher::new("ndli-toi-scraper/1.0", Duration::from_secs(1)).unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));

        let absorbed = fetcher.try_fetch("not a url").await;
        assert!(absorbed.is_none());
    }
}

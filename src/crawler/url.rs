//! URL resolution and classification for archive pages
//!
//! This module resolves hrefs against the page they were found on and
//! answers the membership questions the crawl modes ask about a link:
//! whether it stays on the archive, and whether it points off-site.
//!
//! The flat crawl and the hierarchical walk use deliberately different
//! same-domain predicates ([`same_suffix_domain`] and [`netloc_contains`]).

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static TRAILING_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)/?$").unwrap());

/// Resolve `href` against `base` using standard URL-resolution rules
///
/// Handles relative paths, root-relative paths, protocol-relative hrefs,
/// fragments and query strings.
///
/// # Returns
///
/// The absolute URL, or `None` if `base` is not absolute or the join fails
///
/// # Examples
///
/// ```
/// use toiscrape::crawler::url::normalize;
///
/// assert_eq!(
///     normalize("http://a.com/x/", "y.html").as_deref(),
///     Some("http://a.com/x/y.html")
/// );
/// assert_eq!(
///     normalize("http://a.com/x/", "/y.html").as_deref(),
///     Some("http://a.com/y.html")
/// );
/// ```
pub fn normalize(base: &str, href: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(href.trim()).ok().map(String::from)
}

/// Host plus `:port` when the URL carries an explicit port
pub fn netloc(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;

    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Flat-crawl membership: the link's netloc ends with `base_host`
///
/// This is a suffix test, so subdomains of the start host qualify.
///
/// # Examples
///
/// ```
/// use toiscrape::crawler::url::same_suffix_domain;
///
/// assert!(same_suffix_domain("ndl.gov.in", "http://www.ndl.gov.in/a"));
/// assert!(!same_suffix_domain("ndl.gov.in", "http://ndl.gov.in.evil.com/a"));
/// ```
pub fn same_suffix_domain(base_host: &str, url: &str) -> bool {
    netloc(url).is_some_and(|n| n.ends_with(base_host))
}

/// Hierarchical membership: `base_netloc` occurs anywhere in the link's netloc
///
/// # Examples
///
/// ```
/// use toiscrape::crawler::url::netloc_contains;
///
/// assert!(netloc_contains("ndl.gov.in", "http://www.ndl.gov.in/a"));
/// assert!(netloc_contains("ndl.gov.in", "http://ndl.gov.in.mirror.net/a"));
/// assert!(!netloc_contains("www.ndl.gov.in", "http://ndl.gov.in/a"));
/// ```
pub fn netloc_contains(base_netloc: &str, url: &str) -> bool {
    netloc(url).is_some_and(|n| n.contains(base_netloc))
}

/// Numeric record id trailing the URL path
///
/// # Examples
///
/// ```
/// use toiscrape::crawler::url::record_id;
///
/// assert_eq!(
///     record_id("http://www.ndl.gov.in/nw_document/toi/timesofindia/thetoi_1938/123456").as_deref(),
///     Some("123456")
/// );
/// assert_eq!(record_id("http://www.ndl.gov.in/about"), None);
/// ```
pub fn record_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    TRAILING_DIGITS
        .captures(parsed.path())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether the URL points somewhere other than the archive
///
/// A URL without a host (or one that fails to parse) is never external.
pub fn is_external(url: &str, archive_domain: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    match parsed.host_str() {
        Some(host) => !belongs_to(host, archive_domain),
        None => false,
    }
}

fn belongs_to(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Whether an href is worth resolving and following
///
/// Skips empty hrefs, in-page fragments, `javascript:` and `mailto:` links.
pub fn is_followable_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lower = href.to_ascii_lowercase();
    !(lower.starts_with("javascript:") || lower.starts_with("mailto:"))
}

/// Path component of a URL, or an empty string when it does not parse
pub fn path_of(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_default()
}

/// Last non-empty path segment of a URL
pub fn last_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

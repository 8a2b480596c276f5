use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

/// Build the identifying request headers sent to the archive
///
/// The crawler announces itself rather than posing as a browser. An invalid
/// user agent string falls back to the crate name and version.
///
/// # Examples
///
/// ```
/// use toiscrape::crawler::headers::build_archive_headers;
///
/// let headers = build_archive_headers("ndli-toi-scraper/1.0 (+https://github.com/)");
/// assert!(headers.contains_key(reqwest::header::USER_AGENT));
/// ```
pub fn build_archive_headers(user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let agent = HeaderValue::from_str(user_agent).unwrap_or_else(|_| {
        HeaderValue::from_static(concat!("toiscrape/", env!("CARGO_PKG_VERSION")))
    });
    headers.insert(USER_AGENT, agent);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-IN,en;q=0.9"));

    headers
}

//! Hierarchy classifiers for the archive's year/month/date/headline pages
//!
//! Each level has an async `list_*` method on [`ArchiveNavigator`] that
//! fetches the page, and a pure `scan_*` function that does the HTML work.
//! Start, year and month pages are fetched with the propagating convention;
//! generic linked pages and date pages degrade to an empty result.
//!
//! All scans keep DOM order and drop repeated URLs, first appearance wins.
//! "Same domain" on this side of the crate is [`netloc_contains`].

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::config::ArchiveConfig;
use crate::crawler::fetcher::ArchiveFetcher;
use crate::crawler::url::{
    is_followable_href, last_segment, netloc, netloc_contains, normalize, path_of,
};
use crate::models::LinkCandidate;
use crate::parser::labels::{date_label, DateAnchor};
use crate::parser::sanitize::is_title_like;
use crate::parser::selectors::{element_text, listing_root, ANCHOR, WITH_ID};
use crate::utils::error::CrawlerError;

/// First year-like number in a year page URL
static YEAR_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)(1[6-9]\d{2}|20\d{2})(?:\D|$)").unwrap());

/// Fetches hierarchy pages and classifies their links
pub struct ArchiveNavigator<'a> {
    fetcher: &'a ArchiveFetcher,
    archive: &'a ArchiveConfig,
}

impl<'a> ArchiveNavigator<'a> {
    /// Create a navigator over a shared fetcher and archive settings
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use toiscrape::config::ArchiveConfig;
    /// use toiscrape::crawler::fetcher::ArchiveFetcher;
    /// use toiscrape::crawler::list::ArchiveNavigator;
    ///
    /// let fetcher = ArchiveFetcher::new("toiscrape/1.0", Duration::from_secs(15)).unwrap();
    /// let archive = ArchiveConfig::default();
    /// let navigator = ArchiveNavigator::new(&fetcher, &archive);
    /// ```
    #[must_use]
    pub fn new(fetcher: &'a ArchiveFetcher, archive: &'a ArchiveConfig) -> Self {
        Self { fetcher, archive }
    }

    /// Year page URLs linked from the collection's start page
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::Fetch` if the start page cannot be fetched
    pub async fn list_years(&self, start_url: &str) -> Result<Vec<String>, CrawlerError> {
        let html = self.fetch_required(start_url).await?;
        let years = scan_years(&html, start_url, self.archive);

        tracing::debug!(url = %start_url, count = years.len(), "Listed year pages");
        Ok(years)
    }

    /// Every same-domain page linked from `url`
    ///
    /// A failed fetch is logged and yields an empty list.
    pub async fn list_linked_pages(&self, url: &str) -> Vec<String> {
        match self.fetcher.try_fetch(url).await {
            Some(html) => scan_linked_pages(&html, url),
            None => Vec::new(),
        }
    }

    /// Month page URLs linked from a year page
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::Fetch` if the year page cannot be fetched
    pub async fn list_months(&self, year_url: &str) -> Result<Vec<String>, CrawlerError> {
        let html = self.fetch_required(year_url).await?;
        let months = scan_months(&html, year_url);

        tracing::debug!(url = %year_url, count = months.len(), "Listed month pages");
        Ok(months)
    }

    /// Labelled date page links from a month page
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::Fetch` if the month page cannot be fetched
    pub async fn list_dates(&self, month_url: &str) -> Result<Vec<LinkCandidate>, CrawlerError> {
        let html = self.fetch_required(month_url).await?;
        let dates = scan_dates(&html, month_url, self.archive);

        tracing::debug!(url = %month_url, count = dates.len(), "Listed date pages");
        Ok(dates)
    }

    /// Headline (title, article URL) pairs from a date page
    ///
    /// A failed fetch is logged and yields an empty list.
    pub async fn list_headlines(&self, date_url: &str) -> Vec<LinkCandidate> {
        match self.fetcher.try_fetch(date_url).await {
            Some(html) => scan_headlines(&html, date_url, self.archive),
            None => Vec::new(),
        }
    }

    async fn fetch_required(&self, url: &str) -> Result<String, CrawlerError> {
        self.fetcher
            .fetch(url)
            .await
            .map_err(|e| CrawlerError::fetch(url, e))
    }
}

/// Keep links whose path carries the collection path and the year marker
pub fn scan_years(html: &str, page_url: &str, archive: &ArchiveConfig) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = UniqueLinks::default();

    for (_, url) in resolved_anchors(document.root_element(), page_url) {
        let path = path_of(&url);
        if path.contains(&archive.collection_path) && path.contains(&archive.year_marker) {
            links.push(url);
        }
    }

    links.into_urls()
}

/// Every followable link on the page, resolved against `page_url`
pub fn scan_all_links(html: &str, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = UniqueLinks::default();

    for (_, url) in resolved_anchors(document.root_element(), page_url) {
        links.push(url);
    }

    links.into_urls()
}

/// Every followable same-domain link on the page
pub fn scan_linked_pages(html: &str, page_url: &str) -> Vec<String> {
    let Some(base) = netloc(page_url) else {
        return Vec::new();
    };

    scan_all_links(html, page_url)
        .into_iter()
        .filter(|url| netloc_contains(&base, url))
        .collect()
}

/// Same-domain links other than the year page itself
///
/// When a year can be read from `year_url`, only links containing that
/// year survive.
pub fn scan_months(html: &str, year_url: &str) -> Vec<String> {
    let year = YEAR_IN_URL
        .captures(year_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    scan_linked_pages(html, year_url)
        .into_iter()
        .filter(|url| url != year_url)
        .filter(|url| year.map_or(true, |y| url.contains(y)))
        .collect()
}

/// Labelled links from the month page's date container
///
/// The container is the element whose id is the configured template with
/// the month URL's last segment filled in; without it the listing root is
/// scanned instead.
pub fn scan_dates(html: &str, month_url: &str, archive: &ArchiveConfig) -> Vec<LinkCandidate> {
    let document = Html::parse_document(html);
    let root = date_container(&document, month_url, archive)
        .unwrap_or_else(|| listing_root(&document));

    let mut seen = HashSet::new();
    resolved_anchors(root, month_url)
        .filter(|(_, url)| seen.insert(url.clone()))
        .map(|(anchor, url)| {
            let date = DateAnchor {
                text: element_text(&anchor),
                url,
            };
            LinkCandidate::new(date_label(&date), date.url)
        })
        .collect()
}

fn date_container<'d>(
    document: &'d Html,
    month_url: &str,
    archive: &ArchiveConfig,
) -> Option<ElementRef<'d>> {
    let segment = last_segment(month_url)?;
    let wanted = archive.date_container_id.replace("{segment}", &segment);

    document
        .select(&WITH_ID)
        .find(|el| el.value().id() == Some(wanted.as_str()))
}

/// Headline links on a date page
///
/// A headline points at `<collection_path>/.../<digits>` and has at least
/// four characters of visible text.
pub fn scan_headlines(html: &str, date_url: &str, archive: &ArchiveConfig) -> Vec<LinkCandidate> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();

    resolved_anchors(listing_root(&document), date_url)
        .filter(|(_, url)| is_headline_path(&path_of(url), &archive.collection_path))
        .filter_map(|(anchor, url)| {
            let title = element_text(&anchor);
            is_title_like(&title).then_some((title, url))
        })
        .filter(|(_, url)| seen.insert(url.clone()))
        .map(|(title, url)| LinkCandidate::new(title, url))
        .collect()
}

/// Whether a path has the collection path followed by a numeric last segment
pub fn is_headline_path(path: &str, collection_path: &str) -> bool {
    let Some(start) = path.find(collection_path) else {
        return false;
    };

    let rest = &path[start + collection_path.len()..];
    let rest = rest.strip_suffix('/').unwrap_or(rest);

    match rest.rsplit_once('/') {
        Some((_, last)) => !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Followable anchors under `root` with their absolute URLs
fn resolved_anchors<'d>(
    root: ElementRef<'d>,
    page_url: &'d str,
) -> impl Iterator<Item = (ElementRef<'d>, String)> + 'd {
    root.select(&ANCHOR).filter_map(move |anchor| {
        let href = anchor.value().attr("href")?;
        if !is_followable_href(href) {
            return None;
        }
        normalize(page_url, href).map(|url| (anchor, url))
    })
}

/// URLs in first-seen order without repeats
#[derive(Default)]
struct UniqueLinks {
    seen: HashSet<String>,
    urls: Vec<String>,
}

impl UniqueLinks {
    fn push(&mut self, url: String) {
        if self.seen.insert(url.clone()) {
            self.urls.push(url);
        }
    }

    fn into_urls(self) -> Vec<String> {
        self.urls
    }
}

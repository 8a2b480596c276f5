//! External URL resolution for archived articles
//!
//! An archived article page rarely links its original publisher URL in one
//! consistent place. [`ExternalResolver::resolve`] walks a fixed list of
//! tiers ([`ResolveTier::ORDER`]) and returns the first hit:
//!
//! 1. Embedded document viewers, scanned with their own sub-rules
//!    ([`ViewerRule::ORDER`])
//! 2. Call-to-action buttons
//! 3. `og:url` / `twitter:url` meta tags
//! 4. The canonical link
//! 5. A bare external iframe
//! 6. Every external anchor on the page
//! 7. A publisher URL built from the record id, verified by following
//!    its redirects
//!
//! Link-list tiers only return a link that carries the record id or a known
//! publisher domain; an arbitrary off-site link is never returned. Every
//! fetch is absorbing, so resolution yields `None` rather than failing.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::config::ArchiveConfig;
use crate::crawler::fetcher::ArchiveFetcher;
use crate::crawler::url::{is_external, is_followable_href, normalize, path_of, record_id};
use crate::parser::selectors::{
    element_text, ANCHOR, CANONICAL, DATA_LINKS, IFRAME, ONCLICK, URL_META,
};

static WINDOW_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"window\.open\(\s*['"]([^'"]+)['"]"#).unwrap());

static LOCATION_NAV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"location\.(?:href\s*=|assign\(|replace\()\s*['"]([^'"]+)['"]"#).unwrap()
});

/// Resolution tiers in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveTier {
    Viewer,
    Button,
    Meta,
    Canonical,
    Iframe,
    AnchorScan,
    Guess,
}

impl ResolveTier {
    pub const ORDER: [ResolveTier; 7] = [
        ResolveTier::Viewer,
        ResolveTier::Button,
        ResolveTier::Meta,
        ResolveTier::Canonical,
        ResolveTier::Iframe,
        ResolveTier::AnchorScan,
        ResolveTier::Guess,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Button => "button",
            Self::Meta => "meta",
            Self::Canonical => "canonical",
            Self::Iframe => "iframe",
            Self::AnchorScan => "anchor-scan",
            Self::Guess => "guess",
        }
    }
}

/// Rules applied inside a fetched viewer document, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerRule {
    Anchors,
    DataAttributes,
    ClickHandlers,
    MetaTags,
    NestedIframe,
}

impl ViewerRule {
    pub const ORDER: [ViewerRule; 5] = [
        ViewerRule::Anchors,
        ViewerRule::DataAttributes,
        ViewerRule::ClickHandlers,
        ViewerRule::MetaTags,
        ViewerRule::NestedIframe,
    ];
}

/// What every tier needs to know about the article being resolved
#[derive(Debug, Clone)]
pub struct ResolveContext<'a> {
    /// Trailing numeric id of the archived article URL
    pub record_id: Option<String>,

    pub archive: &'a ArchiveConfig,
}

impl<'a> ResolveContext<'a> {
    pub fn new(article_url: &str, archive: &'a ArchiveConfig) -> Self {
        Self {
            record_id: record_id(article_url),
            archive,
        }
    }

    fn is_external(&self, url: &str) -> bool {
        is_external(url, &self.archive.archive_domain)
    }

    /// First candidate carrying the record id, else the first on a known
    /// publisher domain
    fn prefer(&self, candidates: &[String]) -> Option<String> {
        prefer_candidate(
            candidates,
            self.record_id.as_deref(),
            &self.archive.publisher_domains,
        )
    }
}

/// Pick a candidate by record id, then by publisher domain
///
/// The id pass covers every candidate before the domain pass begins.
///
/// # Examples
///
/// ```
/// use toiscrape::crawler::resolve::prefer_candidate;
///
/// let candidates = vec![
///     "https://timesofindia.indiatimes.com/city".to_string(),
///     "https://example.com/story/42".to_string(),
/// ];
/// let domains = vec!["indiatimes.com".to_string()];
///
/// assert_eq!(
///     prefer_candidate(&candidates, Some("42"), &domains).as_deref(),
///     Some("https://example.com/story/42")
/// );
/// assert_eq!(
///     prefer_candidate(&candidates, None, &domains).as_deref(),
///     Some("https://timesofindia.indiatimes.com/city")
/// );
/// ```
pub fn prefer_candidate(
    candidates: &[String],
    id: Option<&str>,
    publisher_domains: &[String],
) -> Option<String> {
    if let Some(id) = id {
        if let Some(hit) = candidates.iter().find(|c| c.contains(id)) {
            return Some(hit.clone());
        }
    }

    candidates
        .iter()
        .find(|c| publisher_domains.iter().any(|d| c.contains(d.as_str())))
        .cloned()
}

/// Recovers the original publisher URL of archived articles
pub struct ExternalResolver<'a> {
    fetcher: &'a ArchiveFetcher,
    archive: &'a ArchiveConfig,
}

impl<'a> ExternalResolver<'a> {
    #[must_use]
    pub fn new(fetcher: &'a ArchiveFetcher, archive: &'a ArchiveConfig) -> Self {
        Self { fetcher, archive }
    }

    /// Resolve an archived article URL to its external original
    ///
    /// Returns `None` when no tier finds a trustworthy candidate. If the
    /// article page itself cannot be fetched only the guess tier runs.
    pub async fn resolve(&self, article_url: &str) -> Option<String> {
        let ctx = ResolveContext::new(article_url, self.archive);
        let page = self.fetcher.try_fetch(article_url).await;

        for tier in ResolveTier::ORDER {
            let found = match (tier, page.as_deref()) {
                (ResolveTier::Guess, _) => self.guess(&ctx).await,
                (ResolveTier::Viewer, Some(html)) => self.viewers(html, article_url, &ctx).await,
                (_, Some(html)) => scan_page_tier(tier, html, article_url, &ctx),
                (_, None) => None,
            };

            if let Some(url) = found {
                tracing::debug!(
                    article = %article_url,
                    external = %url,
                    tier = tier.name(),
                    "Resolved external URL"
                );
                return Some(url);
            }
        }

        tracing::debug!(article = %article_url, "No external URL found");
        None
    }

    async fn viewers(&self, html: &str, page_url: &str, ctx: &ResolveContext<'_>) -> Option<String> {
        for viewer_url in viewer_iframes(html, page_url, &self.archive.viewer_marker) {
            let Some(viewer_html) = self.fetcher.try_fetch(&viewer_url).await else {
                continue;
            };

            if let Some(url) = scan_viewer(&viewer_html, &viewer_url, ctx) {
                return Some(url);
            }
        }

        None
    }

    async fn guess(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let id = ctx.record_id.as_deref()?;
        let candidate = self.archive.publisher_template.replace("{id}", id);

        match self.fetcher.probe(&candidate).await {
            Ok(outcome) if outcome.status < 400 && ctx.is_external(&outcome.final_url) => {
                Some(outcome.final_url)
            }
            Ok(outcome) => {
                tracing::debug!(
                    url = %candidate,
                    status = outcome.status,
                    final_url = %outcome.final_url,
                    "Guessed URL rejected"
                );
                None
            }
            Err(e) => {
                tracing::warn!(url = %candidate, error = %e, "Failed to probe guessed URL");
                None
            }
        }
    }
}

/// Run one of the page-level tiers that need no further fetching
///
/// `Viewer` and `Guess` need the network and always yield `None` here.
pub fn scan_page_tier(
    tier: ResolveTier,
    html: &str,
    page_url: &str,
    ctx: &ResolveContext<'_>,
) -> Option<String> {
    let document = Html::parse_document(html);

    match tier {
        ResolveTier::Button => ctx.prefer(&button_links(&document, page_url, ctx)),
        ResolveTier::Meta => meta_url(&document, page_url, ctx),
        ResolveTier::Canonical => canonical_url(&document, page_url, ctx),
        ResolveTier::Iframe => first_external_iframe(&document, page_url, ctx),
        ResolveTier::AnchorScan => ctx.prefer(&external_anchors(&document, page_url, ctx)),
        ResolveTier::Viewer | ResolveTier::Guess => None,
    }
}

/// Viewer iframe URLs on an article page, in document order
pub fn viewer_iframes(html: &str, page_url: &str, viewer_marker: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();

    document
        .select(&IFRAME)
        .filter_map(|frame| frame.value().attr("src"))
        .filter_map(|src| normalize(page_url, src))
        .filter(|url| path_of(url).contains(viewer_marker))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Apply the viewer sub-rules to a fetched viewer document
pub fn scan_viewer(html: &str, viewer_url: &str, ctx: &ResolveContext<'_>) -> Option<String> {
    let document = Html::parse_document(html);

    ViewerRule::ORDER.iter().find_map(|rule| match rule {
        ViewerRule::Anchors => ctx.prefer(&external_anchors(&document, viewer_url, ctx)),
        ViewerRule::DataAttributes => ctx.prefer(&data_links(&document, viewer_url, ctx)),
        ViewerRule::ClickHandlers => ctx.prefer(&click_targets(&document, viewer_url, ctx)),
        ViewerRule::MetaTags => meta_url(&document, viewer_url, ctx)
            .or_else(|| canonical_url(&document, viewer_url, ctx)),
        ViewerRule::NestedIframe => first_external_iframe(&document, viewer_url, ctx),
    })
}

fn external_anchors(document: &Html, base: &str, ctx: &ResolveContext<'_>) -> Vec<String> {
    document
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| is_followable_href(href))
        .filter_map(|href| normalize(base, href))
        .filter(|url| ctx.is_external(url))
        .collect()
}

fn button_links(document: &Html, base: &str, ctx: &ResolveContext<'_>) -> Vec<String> {
    let classes = &ctx.archive.button_classes;
    let phrase = ctx.archive.call_to_action.to_lowercase();

    document
        .select(&ANCHOR)
        .filter(|a| {
            let has_classes = !classes.is_empty()
                && classes
                    .iter()
                    .all(|wanted| a.value().classes().any(|c| c == wanted.as_str()));
            let has_phrase =
                !phrase.is_empty() && element_text(a).to_lowercase().contains(&phrase);
            has_classes || has_phrase
        })
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| is_followable_href(href))
        .filter_map(|href| normalize(base, href))
        .filter(|url| ctx.is_external(url))
        .collect()
}

fn data_links(document: &Html, base: &str, ctx: &ResolveContext<'_>) -> Vec<String> {
    DATA_LINKS
        .iter()
        .flat_map(|(selector, attr)| {
            document
                .select(selector)
                .filter_map(move |el| el.value().attr(attr))
        })
        .filter_map(|value| normalize(base, value))
        .filter(|url| ctx.is_external(url))
        .collect()
}

fn click_targets(document: &Html, base: &str, ctx: &ResolveContext<'_>) -> Vec<String> {
    let mut targets = Vec::new();

    for script in document
        .select(&ONCLICK)
        .filter_map(|el| el.value().attr("onclick"))
    {
        for pattern in [&*WINDOW_OPEN, &*LOCATION_NAV] {
            targets.extend(
                pattern
                    .captures_iter(script)
                    .filter_map(|caps| caps.get(1))
                    .filter_map(|m| normalize(base, m.as_str())),
            );
        }
    }

    targets.retain(|url| ctx.is_external(url));
    targets
}

fn meta_url(document: &Html, base: &str, ctx: &ResolveContext<'_>) -> Option<String> {
    URL_META
        .iter()
        .flat_map(|selector| document.select(selector))
        .filter_map(|meta| meta.value().attr("content"))
        .filter_map(|content| normalize(base, content))
        .find(|url| ctx.is_external(url))
}

fn canonical_url(document: &Html, base: &str, ctx: &ResolveContext<'_>) -> Option<String> {
    document
        .select(&CANONICAL)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| normalize(base, href))
        .find(|url| ctx.is_external(url))
}

fn first_external_iframe(document: &Html, base: &str, ctx: &ResolveContext<'_>) -> Option<String> {
    document
        .select(&IFRAME)
        .filter_map(|frame| frame.value().attr("src"))
        .filter_map(|src| normalize(base, src))
        .find(|url| ctx.is_external(url))
}

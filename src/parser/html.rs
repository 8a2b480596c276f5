//! Article and listing-page extraction
//!
//! This module turns a fetched page into the two things the crawl records:
//! an article's title and body text, or the candidate titles on a listing
//! page. Both work on static HTML only.

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::parser::sanitize::{is_title_like, is_year_text};
use crate::parser::selectors::{
    element_text, listing_root, ANCHOR, ARTICLE, LIST_ITEM, MAIN_CONTAINER, PARAGRAPH, TITLE,
};

/// Paragraph count above which a page without `<article>` is treated as an article
pub const ARTICLE_PARAGRAPH_THRESHOLD: usize = 5;

/// Best-effort title and body text of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedArticle {
    /// Trimmed `<title>` text
    pub title: Option<String>,

    /// Non-empty paragraphs joined by a blank line
    pub text: Option<String>,
}

/// Extract the title and paragraph text of an article page
///
/// Paragraphs come from the first `<article>` element if there is one,
/// otherwise from a `#main`/`<main>` container, otherwise from the whole
/// document.
///
/// # Examples
///
/// ```
/// use toiscrape::parser::extract_article;
///
/// let html = "<html><head><title> Sample </title></head>\
///             <body><article><p>One.</p><p>Two.</p></article></body></html>";
/// let article = extract_article(html);
/// assert_eq!(article.title.as_deref(), Some("Sample"));
/// assert_eq!(article.text.as_deref(), Some("One.\n\nTwo."));
/// ```
pub fn extract_article(html: &str) -> ExtractedArticle {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let paragraphs: Vec<String> = match text_root(&document) {
        Some(root) => root.select(&PARAGRAPH).map(|p| element_text(&p)).collect(),
        None => document.select(&PARAGRAPH).map(|p| element_text(&p)).collect(),
    };

    let texts: Vec<String> = paragraphs.into_iter().filter(|t| !t.is_empty()).collect();
    let text = if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n\n"))
    };

    ExtractedArticle { title, text }
}

fn text_root(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&ARTICLE)
        .next()
        .or_else(|| document.select(&MAIN_CONTAINER).next())
}

/// Collect candidate titles from a listing page
///
/// Anchor texts are gathered before list-item texts, both from the listing
/// root. Texts under four characters are dropped, as are anchors whose text
/// is a bare four-digit year. Duplicates keep their first position.
///
/// # Examples
///
/// ```
/// use toiscrape::parser::extract_title_list;
///
/// let html = "<ul><li><a href='/1'>Title One</a></li><li><a href='/2'>Title Two</a></li></ul>";
/// assert_eq!(extract_title_list(html), vec!["Title One", "Title Two"]);
/// ```
pub fn extract_title_list(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let root = listing_root(&document);

    let anchors = root
        .select(&ANCHOR)
        .map(|a| element_text(&a))
        .filter(|t| is_title_like(t) && !is_year_text(t));

    let items = root
        .select(&LIST_ITEM)
        .map(|li| element_text(&li))
        .filter(|t| is_title_like(t));

    let mut seen = std::collections::HashSet::new();
    anchors
        .chain(items)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Whether a page looks like an article worth recording
///
/// True if the page has an `<article>` element or at least
/// [`ARTICLE_PARAGRAPH_THRESHOLD`] paragraphs.
pub fn looks_like_article(html: &str) -> bool {
    let document = Html::parse_document(html);

    if document.select(&ARTICLE).next().is_some() {
        return true;
    }

    document.select(&PARAGRAPH).count() >= ARTICLE_PARAGRAPH_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_and_title_basic() {
        let html = r#"
            <html>
              <head><title>Sample Article</title></head>
              <body>
                <article>
                  <p>First paragraph.</p>
                  <p>Second paragraph with <strong>bold</strong> text.</p>
                </article>
              </body>
            </html>
        "#;

        let res = extract_article(html);
        assert_eq!(res.title.as_deref(), Some("Sample Article"));
        assert_eq!(
            res.text.as_deref(),
            Some("First paragraph.\n\nSecond paragraph with bold text.")
        );
    }

    #[test]
    fn test_title_is_trimmed() {
        let html = "<html><head><title>\n   Spaced Title \t</title></head><body></body></html>";
        assert_eq!(extract_article(html).title.as_deref(), Some("Spaced Title"));
    }

    #[test]
    fn test_missing_or_blank_title() {
        assert_eq!(extract_article("<p>Body</p>").title, None);
        assert_eq!(
            extract_article("<html><head><title>  </title></head></html>").title,
            None
        );
    }

    #[test]
    fn test_no_paragraphs_means_no_text() {
        let html = "<html><head><title>T</title></head><body><div>Loose text</div></body></html>";
        assert_eq!(extract_article(html).text, None);
    }

    #[test]
    fn test_article_paragraphs_win_over_loose_ones() {
        let html = r#"<html><body>
            <p>Outside before.</p>
            <article><p>Inside.</p></article>
            <p>Outside after.</p>
        </body></html>"#;
        assert_eq!(extract_article(html).text.as_deref(), Some("Inside."));
    }

    #[test]
    fn test_main_container_fallback() {
        let html = r#"<html><body>
            <p>Sidebar.</p>
            <div id="main"><p>Main body.</p><p>   </p></div>
        </body></html>"#;
        assert_eq!(extract_article(html).text.as_deref(), Some("Main body."));
    }

    #[test]
    fn test_all_paragraphs_fallback() {
        let html = "<html><body><p>A.</p><div><p>B.</p></div></body></html>";
        assert_eq!(extract_article(html).text.as_deref(), Some("A.\n\nB."));
    }

    #[test]
    fn test_title_list_two_items_in_order() {
        let html = r#"<html><body><ul>
            <li><a href="/a/1">Title One</a></li>
            <li><a href="/a/2">Title Two</a></li>
        </ul></body></html>"#;
        assert_eq!(extract_title_list(html), vec!["Title One", "Title Two"]);
    }

    #[test]
    fn test_title_list_year_anchor_dropped_but_year_item_kept() {
        let html = r#"<html><body>
            <a href="/y/2024">2024</a>
            <a href="/a/1">Flood in Bombay</a>
            <ul><li>1938</li></ul>
        </body></html>"#;
        assert_eq!(extract_title_list(html), vec!["Flood in Bombay", "1938"]);
    }

    #[test]
    fn test_title_list_short_texts_dropped() {
        let html = r#"<article><a href="/p/2">Nxt</a><a href="/a">Real headline</a><ul><li>ok</li></ul></article>"#;
        assert_eq!(extract_title_list(html), vec!["Real headline"]);
    }

    #[test]
    fn test_title_list_scoped_to_article() {
        let html = r#"<html><body>
            <nav><a href="/home">Home page link</a></nav>
            <article><a href="/a/1">Story inside</a></article>
        </body></html>"#;
        assert_eq!(extract_title_list(html), vec!["Story inside"]);
    }

    #[test]
    fn test_looks_like_article() {
        assert!(looks_like_article("<article>x</article>"));
        assert!(looks_like_article(&"<p>x</p>".repeat(5)));
        assert!(!looks_like_article(&"<p>x</p>".repeat(4)));
        assert!(!looks_like_article("<div>nothing</div>"));
    }
}

//! CSS selectors shared by the extractor, the classifiers and the resolver
//!
//! Content roots are searched in a fixed priority order: an `<article>`
//! element, then a main-content container, then the whole document.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    pub static ref TITLE: Selector = parse_selector!("title");
    pub static ref ARTICLE: Selector = parse_selector!("article");
    pub static ref PARAGRAPH: Selector = parse_selector!("p");
    pub static ref ANCHOR: Selector = parse_selector!("a[href]");
    pub static ref LIST_ITEM: Selector = parse_selector!("li");
    pub static ref IFRAME: Selector = parse_selector!("iframe[src]");
    pub static ref WITH_ID: Selector = parse_selector!("[id]");
    pub static ref ONCLICK: Selector = parse_selector!("[onclick]");
    pub static ref CANONICAL: Selector = parse_selector!("link[rel~='canonical'][href]");

    /// Main-content containers used by the article text extractor
    pub static ref MAIN_CONTAINER: Selector = parse_selector!("#main, main");

    /// Main-content containers used when scanning listing pages
    pub static ref MAIN_ROLE: Selector = parse_selector!("[role='main'], main, #main");

    /// Attributes viewers use to carry a link target outside `href`
    pub static ref DATA_LINKS: Vec<(Selector, &'static str)> = vec![
        (parse_selector!("[data-href]"), "data-href"),
        (parse_selector!("[data-url]"), "data-url"),
        (parse_selector!("[data-link]"), "data-link"),
    ];

    /// Social meta tags carrying the page's canonical address
    pub static ref URL_META: Vec<Selector> = vec![
        parse_selector!("meta[property='og:url'][content]"),
        parse_selector!("meta[name='og:url'][content]"),
        parse_selector!("meta[name='twitter:url'][content]"),
        parse_selector!("meta[property='twitter:url'][content]"),
    ];
}

/// Root element for listing-page scans
///
/// Priority: first `<article>`, then the first main-role container, then
/// the document root.
pub fn listing_root(document: &Html) -> ElementRef<'_> {
    document
        .select(&ARTICLE)
        .next()
        .or_else(|| document.select(&MAIN_ROLE).next())
        .unwrap_or_else(|| document.root_element())
}

/// Collapsed text of an element, text nodes joined by single spaces
pub fn element_text(element: &ElementRef<'_>) -> String {
    crate::utils::normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_root_priority() {
        let html = r#"<html><body>
            <div role="main"><a href="/m">main</a></div>
            <article><a href="/a">article</a></article>
        </body></html>"#;
        let doc = Html::parse_document(html);
        assert_eq!(listing_root(&doc).value().name(), "article");

        let html = r#"<html><body><nav>n</nav><div role="main">m</div></body></html>"#;
        let doc = Html::parse_document(html);
        assert_eq!(listing_root(&doc).value().attr("role"), Some("main"));

        let doc = Html::parse_document("<html><body><p>x</p></body></html>");
        assert_eq!(listing_root(&doc).value().name(), "html");
    }

    #[test]
    fn test_element_text_collapses_whitespace() {
        let doc = Html::parse_fragment("<p>Second <strong>bold</strong>\n   text.</p>");
        let p = doc.select(&PARAGRAPH).next().unwrap();
        assert_eq!(element_text(&p), "Second bold text.");
    }
}

//! Tests for article and listing extraction on archive-shaped pages

use proptest::prelude::*;
use toiscrape::parser::{extract_article, extract_title_list, looks_like_article};

const ARTICLE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>
    Bombay Floods Cause Havoc | The Times of India
</title></head>
<body>
  <nav><p>Home</p><p>Archive</p></nav>
  <article>
    <h1>Bombay Floods Cause Havoc</h1>
    <p>Heavy rain lashed the city on
       Tuesday night.</p>
    <p></p>
    <p>Train services were <em>suspended</em> for hours.</p>
  </article>
  <footer><p>Copyright notice</p></footer>
</body>
</html>"#;

const DATE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <header><a href="/nw_document/toi/timesofindia">Back to collection</a></header>
  <div role="main">
    <a href="/nw_document/toi/timesofindia/thetoi_1938">1938</a>
    <ul>
      <li><a href="/nw_document/toi/timesofindia/thetoi_1938/jan/01/101">War Clouds Over Europe</a></li>
      <li><a href="/nw_document/toi/timesofindia/thetoi_1938/jan/01/102">Cricket At Brabourne</a></li>
      <li><a href="/nw_document/toi/timesofindia/thetoi_1938/jan/01/101">War Clouds Over Europe</a></li>
      <li>Page</li>
      <li>1939</li>
    </ul>
  </div>
</body>
</html>"#;

#[test]
fn test_article_page() {
    let article = extract_article(ARTICLE_PAGE);

    assert_eq!(
        article.title.as_deref(),
        Some("Bombay Floods Cause Havoc | The Times of India")
    );
    assert_eq!(
        article.text.as_deref(),
        Some("Heavy rain lashed the city on Tuesday night.\n\nTrain services were suspended for hours.")
    );
    assert!(looks_like_article(ARTICLE_PAGE));
}

#[test]
fn test_date_page_titles() {
    assert_eq!(
        extract_title_list(DATE_PAGE),
        vec!["War Clouds Over Europe", "Cricket At Brabourne", "Page", "1939"]
    );
    assert!(!looks_like_article(DATE_PAGE));
}

#[test]
fn test_empty_document() {
    let article = extract_article("");
    assert_eq!(article.title, None);
    assert_eq!(article.text, None);
    assert!(extract_title_list("").is_empty());
}

proptest! {
    #[test]
    fn prop_title_is_trimmed(
        title in "[A-Za-z0-9][A-Za-z0-9 ]{0,30}[A-Za-z0-9]",
        lead in "[ \t\n]{0,4}",
        trail in "[ \t\n]{0,4}",
    ) {
        let html = format!("<html><head><title>{lead}{title}{trail}</title></head><body></body></html>");
        prop_assert_eq!(extract_article(&html).title, Some(title));
    }

    #[test]
    fn prop_no_paragraphs_no_text(body in "[A-Za-z ]{0,40}") {
        let html = format!("<html><body><div>{body}</div><span>{body}</span></body></html>");
        prop_assert_eq!(extract_article(&html).text, None);
    }

    #[test]
    fn prop_year_anchor_dropped(year in 1000u32..10000) {
        let html = format!(r#"<ul><li><a href="/y">{year}</a></li></ul><a href="/z">{year}</a>"#);
        // Anchors lose the year; the list item keeps it
        prop_assert_eq!(extract_title_list(&html), vec![year.to_string()]);
    }
}

//! Date labels for the links on a month page
//!
//! Month pages link their dates in many shapes: a bare day numeral, a
//! written-out date, an icon whose only clue is the URL. The label is picked
//! by the first matching rule in [`DATE_LABEL_RULES`].

use regex::Regex;
use std::sync::LazyLock;

use crate::crawler::url::last_segment;

static DAY_NUMERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,2}$").unwrap());

static DATE_TEXT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // 12 Jan, 3rd March 1938
        Regex::new(
            r"(?i)\b\d{1,2}(?:st|nd|rd|th)?\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\b",
        )
        .unwrap(),
        // 1938-01-12
        Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap(),
        // 12-01-1938, 12/01/1938, 12.01.1938
        Regex::new(r"\b\d{1,2}[-/.]\d{1,2}[-/.]\d{4}\b").unwrap(),
    ]
});

static URL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}|\d{4}_\d{2}_\d{2}|\d{1,2}-\d{1,2}-\d{4}").unwrap()
});

/// An anchor found in a month page's date container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateAnchor {
    /// Collapsed visible text
    pub text: String,

    /// Absolute target URL
    pub url: String,
}

/// A labelling rule: returns a label when it applies
pub type LabelRule = fn(&DateAnchor) -> Option<String>;

/// Labelling rules in priority order
pub const DATE_LABEL_RULES: &[(&str, LabelRule)] = &[
    ("day-numeral", day_numeral),
    ("date-text", date_text),
    ("url-date", url_date),
    ("numeric-segment", numeric_segment),
    ("anchor-text", anchor_text),
    ("url", whole_url),
];

/// Pick the label for a date anchor
///
/// # Examples
///
/// ```
/// use toiscrape::parser::labels::{date_label, DateAnchor};
///
/// let anchor = DateAnchor {
///     text: String::new(),
///     url: "http://www.ndl.gov.in/toi/1938-01-12/page".into(),
/// };
/// assert_eq!(date_label(&anchor), "1938-01-12");
/// ```
pub fn date_label(anchor: &DateAnchor) -> String {
    DATE_LABEL_RULES
        .iter()
        .find_map(|(_, rule)| rule(anchor))
        .unwrap_or_else(|| anchor.url.clone())
}

/// Name of the rule that labels an anchor, for diagnostics
pub fn matching_rule(anchor: &DateAnchor) -> Option<&'static str> {
    DATE_LABEL_RULES
        .iter()
        .find(|(_, rule)| rule(anchor).is_some())
        .map(|(name, _)| *name)
}

fn day_numeral(anchor: &DateAnchor) -> Option<String> {
    DAY_NUMERAL
        .is_match(&anchor.text)
        .then(|| anchor.text.clone())
}

fn date_text(anchor: &DateAnchor) -> Option<String> {
    DATE_TEXT
        .iter()
        .any(|re| re.is_match(&anchor.text))
        .then(|| anchor.text.clone())
}

fn url_date(anchor: &DateAnchor) -> Option<String> {
    URL_DATE
        .find(&anchor.url)
        .map(|m| m.as_str().to_string())
}

fn numeric_segment(anchor: &DateAnchor) -> Option<String> {
    last_segment(&anchor.url).filter(|s| DAY_NUMERAL.is_match(s))
}

fn anchor_text(anchor: &DateAnchor) -> Option<String> {
    (!anchor.text.is_empty()).then(|| anchor.text.clone())
}

fn whole_url(anchor: &DateAnchor) -> Option<String> {
    Some(anchor.url.clone())
}

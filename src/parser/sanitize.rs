//! Text filters applied to candidate titles and labels
//!
//! Listing pages mix real headlines with navigation noise (page numbers,
//! year links, "Next" arrows). These predicates keep the two apart.

use regex::Regex;
use std::sync::LazyLock;

static FOUR_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").unwrap());

/// Minimum length, in characters, of a title worth keeping
pub const MIN_TITLE_CHARS: usize = 4;

/// Whether text is long enough to be a headline rather than navigation
///
/// # Examples
///
/// ```
/// use toiscrape::parser::sanitize::is_title_like;
///
/// assert!(is_title_like("Gandhi arrives"));
/// assert!(!is_title_like("Nxt"));
/// ```
pub fn is_title_like(text: &str) -> bool {
    text.chars().count() >= MIN_TITLE_CHARS
}

/// Whether text is a bare four-digit number, which on this archive is a year link
pub fn is_year_text(text: &str) -> bool {
    FOUR_DIGITS.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_title_like_counts_chars() {
        assert!(is_title_like("abcd"));
        assert!(!is_title_like("abc"));
        // multi-byte characters count once
        assert!(is_title_like("नमस्ते"));
        assert!(!is_title_like(""));
    }

    #[test]
    fn test_is_year_text() {
        assert!(is_year_text("2024"));
        assert!(is_year_text("1938"));
        assert!(!is_year_text("12345"));
        assert!(!is_year_text("Year 2024"));
    }
}

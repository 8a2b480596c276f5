//! Tests for URL normalization and the membership predicates

use proptest::prelude::*;
use toiscrape::crawler::url::{
    is_external, netloc_contains, normalize, record_id, same_suffix_domain,
};

#[test]
fn test_normalize_examples() {
    assert_eq!(
        normalize("http://a.com/x/", "y.html").as_deref(),
        Some("http://a.com/x/y.html")
    );
    assert_eq!(
        normalize("http://a.com/x/", "/y.html").as_deref(),
        Some("http://a.com/y.html")
    );
}

#[test]
fn test_normalize_fragment_and_parent() {
    assert_eq!(
        normalize("http://a.com/x/y/", "../z.html#top").as_deref(),
        Some("http://a.com/x/z.html#top")
    );
}

#[test]
fn test_predicates_disagree_on_mirror_hosts() {
    let mirror = "http://www.ndl.gov.in.mirror.net/toi";
    assert!(netloc_contains("www.ndl.gov.in", mirror));
    assert!(!same_suffix_domain("www.ndl.gov.in", mirror));
}

#[test]
fn test_is_external() {
    assert!(!is_external("http://www.ndl.gov.in/toi", "ndl.gov.in"));
    assert!(!is_external("http://NDL.gov.in/toi", "ndl.gov.in"));
    assert!(is_external("https://timesofindia.indiatimes.com/a", "ndl.gov.in"));
    assert!(is_external("http://notndl.gov.in/", "ndl.gov.in"));
    assert!(!is_external("/relative/only", "ndl.gov.in"));
}

#[test]
fn test_record_id_trailing_slash() {
    assert_eq!(record_id("http://a.in/toi/98765/").as_deref(), Some("98765"));
    assert_eq!(record_id("http://a.in/toi/98765?page=2").as_deref(), Some("98765"));
}

proptest! {
    #[test]
    fn prop_relative_segment_stays_on_base_host(segment in "[a-z0-9_-]{1,16}") {
        let base = "http://www.ndl.gov.in/nw_document/toi/";
        let url = normalize(base, &segment).unwrap();
        prop_assert_eq!(url, format!("{base}{segment}"));
    }

    #[test]
    fn prop_root_relative_replaces_path(segment in "[a-z0-9_-]{1,16}") {
        let url = normalize("http://a.com/x/y/z.html", &format!("/{segment}")).unwrap();
        prop_assert_eq!(url, format!("http://a.com/{segment}"));
    }

    #[test]
    fn prop_subdomains_pass_suffix_test(label in "[a-z][a-z0-9]{0,10}") {
        let url = format!("http://{label}.ndl.gov.in/page");
        prop_assert!(same_suffix_domain("ndl.gov.in", &url));
        prop_assert!(netloc_contains("ndl.gov.in", &url));
        prop_assert!(!is_external(&url, "ndl.gov.in"));
    }

    #[test]
    fn prop_record_id_is_trailing_digits(id in "[1-9][0-9]{0,11}") {
        let url = format!("http://www.ndl.gov.in/nw_document/toi/timesofindia/thetoi_1938/{id}");
        prop_assert_eq!(record_id(&url), Some(id));
    }
}

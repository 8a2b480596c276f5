//! Integration tests for external URL resolution
//!
//! The mock server plays the archive (its host is the archive domain), so
//! any other host counts as external.

mod common;

use toiscrape::config::ArchiveConfig;
use toiscrape::crawler::resolve::ExternalResolver;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{local_archive, mount_page, mount_status, test_fetcher};

const ARTICLE_PATH: &str = "/nw_document/toi/timesofindia/thetoi_1938/555";

#[tokio::test]
async fn test_button_beats_meta_tag() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        ARTICLE_PATH,
        r#"<html><head>
            <meta property="og:url" content="https://publisher.example.com/elsewhere">
        </head><body>
            <a class="btn btn-original" href="https://timesofindia.indiatimes.com/articleshow/555.cms">Open</a>
        </body></html>"#,
        1,
    )
    .await;

    let fetcher = test_fetcher();
    let archive = local_archive();
    let resolver = ExternalResolver::new(&fetcher, &archive);

    let resolved = resolver
        .resolve(&format!("{}{ARTICLE_PATH}", server.uri()))
        .await;

    assert_eq!(
        resolved.as_deref(),
        Some("https://timesofindia.indiatimes.com/articleshow/555.cms")
    );
}

#[tokio::test]
async fn test_unrelated_externals_without_record_id() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/nw_document/toi/timesofindia/about",
        r#"<html><body>
            <a href="https://facebook.com/sharer">Share</a>
            <a href="https://www.example.org/partners">Partners</a>
            <a href="/nw_document/toi/timesofindia">Home</a>
        </body></html>"#,
        1,
    )
    .await;

    let fetcher = test_fetcher();
    let archive = local_archive();
    let resolver = ExternalResolver::new(&fetcher, &archive);

    let resolved = resolver
        .resolve(&format!("{}/nw_document/toi/timesofindia/about", server.uri()))
        .await;

    assert_eq!(resolved, None);
}

#[tokio::test]
async fn test_viewer_tier_wins() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        ARTICLE_PATH,
        r#"<html><head>
            <link rel="canonical" href="https://canonical.example.com/555">
        </head><body>
            <iframe src="/pdf/viewer/doc555"></iframe>
        </body></html>"#,
        1,
    )
    .await;
    mount_page(
        &server,
        "/pdf/viewer/doc555",
        r#"<html><body>
            <a href="https://timesofindia.indiatimes.com/">TOI home</a>
            <a href="https://www.toi.in/story/555">Original story</a>
        </body></html>"#,
        1,
    )
    .await;

    let fetcher = test_fetcher();
    let archive = local_archive();
    let resolver = ExternalResolver::new(&fetcher, &archive);

    let resolved = resolver
        .resolve(&format!("{}{ARTICLE_PATH}", server.uri()))
        .await;

    // Record id match wins over the earlier publisher-domain match
    assert_eq!(resolved.as_deref(), Some("https://www.toi.in/story/555"));
}

#[tokio::test]
async fn test_failed_viewer_falls_through() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        ARTICLE_PATH,
        r#"<html><head>
            <link rel="canonical" href="https://canonical.example.com/555">
        </head><body>
            <iframe src="/pdf/viewer/broken"></iframe>
        </body></html>"#,
        1,
    )
    .await;
    mount_status(&server, "/pdf/viewer/broken", 500).await;

    let fetcher = test_fetcher();
    let archive = local_archive();
    let resolver = ExternalResolver::new(&fetcher, &archive);

    let resolved = resolver
        .resolve(&format!("{}{ARTICLE_PATH}", server.uri()))
        .await;

    assert_eq!(resolved.as_deref(), Some("https://canonical.example.com/555"));
}

fn guessing_archive(server: &MockServer) -> ArchiveConfig {
    // "localhost" reaches the mock server but is not the archive host
    let port = server.address().port();
    ArchiveConfig {
        publisher_template: format!("http://localhost:{port}/articleshow/{{id}}.cms"),
        ..local_archive()
    }
}

#[tokio::test]
async fn test_guess_follows_redirect() {
    let server = MockServer::start().await;
    let port = server.address().port();
    let final_url = format!("http://localhost:{port}/city/mumbai/555.cms");

    mount_status(&server, ARTICLE_PATH, 404).await;
    Mock::given(method("GET"))
        .and(path("/articleshow/555.cms"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", final_url.as_str()))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/city/mumbai/555.cms", "<html>story</html>", 1).await;

    let fetcher = test_fetcher();
    let archive = guessing_archive(&server);
    let resolver = ExternalResolver::new(&fetcher, &archive);

    let resolved = resolver
        .resolve(&format!("{}{ARTICLE_PATH}", server.uri()))
        .await;

    assert_eq!(resolved, Some(final_url));
}

#[tokio::test]
async fn test_guess_rejects_error_status() {
    let server = MockServer::start().await;

    mount_status(&server, ARTICLE_PATH, 404).await;
    mount_status(&server, "/articleshow/555.cms", 404).await;

    let fetcher = test_fetcher();
    let archive = guessing_archive(&server);
    let resolver = ExternalResolver::new(&fetcher, &archive);

    let resolved = resolver
        .resolve(&format!("{}{ARTICLE_PATH}", server.uri()))
        .await;

    assert_eq!(resolved, None);
}

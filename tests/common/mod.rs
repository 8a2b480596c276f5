//! Common test utilities

use std::path::Path;
use std::time::Duration;

use toiscrape::config::ArchiveConfig;
use toiscrape::crawler::fetcher::ArchiveFetcher;
use toiscrape::crawler::pipeline::PipelineConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fetcher with a short timeout for mock servers
#[allow(dead_code)]
pub fn test_fetcher() -> ArchiveFetcher {
    ArchiveFetcher::new("toiscrape-test/1.0", Duration::from_secs(5)).unwrap()
}

/// Archive settings under which the mock server is the archive itself
#[allow(dead_code)]
pub fn local_archive() -> ArchiveConfig {
    ArchiveConfig {
        archive_domain: "127.0.0.1".to_string(),
        ..Default::default()
    }
}

/// Pipeline settings with no delay and no progress bar
#[allow(dead_code)]
pub fn quiet_pipeline() -> PipelineConfig {
    PipelineConfig {
        delay: Duration::ZERO,
        show_progress: false,
        ..Default::default()
    }
}

/// Serve `body` at `route`, expecting exactly `times` requests
#[allow(dead_code)]
pub async fn mount_page(server: &MockServer, route: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Answer `route` with an error status
#[allow(dead_code)]
pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Parse every line of a JSON-lines file
#[allow(dead_code)]
pub fn read_jsonl(file: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(file)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

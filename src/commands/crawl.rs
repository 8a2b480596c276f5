use anyhow::{Context, Result};
use std::path::PathBuf;

use toiscrape::config::Config;
use toiscrape::crawler::{Crawler, PipelineConfig};
use toiscrape::error::ScraperErrorTrait;

/// Parameters for the flat crawl command
pub struct CrawlParams {
    pub start_url: String,
    pub output: PathBuf,
    pub max_pages: Option<usize>,
    pub delay: Option<f64>,
}

pub async fn crawl(mut config: Config, params: CrawlParams) -> Result<()> {
    if let Some(delay) = params.delay {
        config.crawler.delay_secs = delay;
    }

    let crawler = Crawler::new(config).context("Failed to initialize crawler")?;

    println!("Starting flat crawl");
    println!("===================");
    println!("  Start URL: {}", params.start_url);
    println!("  Output: {}", params.output.display());
    match params.max_pages {
        Some(max) => println!("  Max pages: {max}"),
        None => println!("  Max pages: unlimited"),
    }
    println!("  Delay: {:.1}s", crawler.config().crawler.delay_secs);

    let pipeline = PipelineConfig {
        max_pages: params.max_pages,
        delay: crawler.config().delay(),
        ..Default::default()
    };

    let stats = match crawler
        .crawl_flat(&params.start_url, &params.output, &pipeline)
        .await
    {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!(category = %e.category(), error = %e, "Crawl aborted");
            return Err(e).with_context(|| format!("Crawl from {} failed", params.start_url));
        }
    };

    println!("\nCrawl Summary");
    println!("=============");
    println!("Pages fetched: {}", stats.pages_fetched);
    println!("Failed fetches: {}", stats.fetch_failures);
    println!("Failure rate: {:.1}%", stats.failure_rate());
    println!("Records written: {}", stats.records_written);
    println!("Duration: {}s", stats.duration_secs());
    println!("Output file: {}", params.output.display());

    Ok(())
}

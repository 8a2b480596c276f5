use anyhow::{Context, Result};
use std::path::PathBuf;

use toiscrape::config::Config;
use toiscrape::crawler::{Crawler, PipelineConfig};
use toiscrape::error::ScraperErrorTrait;

/// Which hierarchy level to print instead of walking the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Years,
    Months,
    Dates,
    Headlines,
    Links,
}

impl ListMode {
    /// The selected listing, if any; clap keeps the flags exclusive
    pub fn from_flags(
        years: bool,
        months: bool,
        dates: bool,
        headlines: bool,
        links: bool,
    ) -> Option<Self> {
        [
            (years, Self::Years),
            (months, Self::Months),
            (dates, Self::Dates),
            (headlines, Self::Headlines),
            (links, Self::Links),
        ]
        .into_iter()
        .find_map(|(set, mode)| set.then_some(mode))
    }
}

/// Parameters for the archive command
pub struct ArchiveParams {
    pub start_url: String,
    pub output: PathBuf,
    pub max_years: Option<usize>,
    pub max_months: Option<usize>,
    pub max_dates: Option<usize>,
    pub max_titles: Option<usize>,
    pub delay: Option<f64>,
    pub resolve_externals: bool,
    pub list: Option<ListMode>,
}

pub async fn archive(mut config: Config, params: ArchiveParams) -> Result<()> {
    if let Some(delay) = params.delay {
        config.crawler.delay_secs = delay;
    }

    let crawler = Crawler::new(config).context("Failed to initialize crawler")?;

    if let Some(mode) = params.list {
        return list(&crawler, mode, &params).await;
    }

    println!("Starting archive walk");
    println!("=====================");
    println!("  Start URL: {}", params.start_url);
    println!("  Output: {}", params.output.display());
    println!("  Resolve externals: {}", params.resolve_externals);
    println!("  Delay: {:.1}s", crawler.config().crawler.delay_secs);

    let pipeline = PipelineConfig {
        max_years: params.max_years,
        max_months: params.max_months,
        max_dates: params.max_dates,
        max_titles: params.max_titles,
        delay: crawler.config().delay(),
        resolve_externals: params.resolve_externals,
        ..Default::default()
    };

    let stats = match crawler
        .walk_archive(&params.start_url, &params.output, &pipeline)
        .await
    {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!(category = %e.category(), error = %e, "Archive walk aborted");
            return Err(e).with_context(|| format!("Archive walk from {} failed", params.start_url));
        }
    };

    println!("\nArchive Summary");
    println!("===============");
    println!("Date pages: {}", stats.pages_fetched);
    println!("Failed date pages: {}", stats.fetch_failures);
    println!("Records written: {}", stats.records_written);
    println!("Duration: {}s", stats.duration_secs());
    println!("Output file: {}", params.output.display());

    Ok(())
}

async fn list(crawler: &Crawler, mode: ListMode, params: &ArchiveParams) -> Result<()> {
    let navigator = crawler.navigator();
    let url = params.start_url.as_str();

    match mode {
        ListMode::Years => {
            let years = navigator
                .list_years(url)
                .await
                .context("Failed to list year pages")?;
            years.iter().for_each(|y| println!("{y}"));
        }
        ListMode::Months => {
            let months = navigator
                .list_months(url)
                .await
                .context("Failed to list month pages")?;
            months.iter().for_each(|m| println!("{m}"));
        }
        ListMode::Dates => {
            let dates = navigator
                .list_dates(url)
                .await
                .context("Failed to list date pages")?;
            for date in dates {
                println!("{}\t{}", date.display_label(), date.url);
            }
        }
        ListMode::Headlines => {
            let resolver = crawler.resolver();
            for headline in navigator.list_headlines(url).await {
                if params.resolve_externals {
                    let external = resolver.resolve(&headline.url).await;
                    println!(
                        "{}\t{}\t{}",
                        headline.display_label(),
                        headline.url,
                        external.as_deref().unwrap_or("-")
                    );
                } else {
                    println!("{}\t{}", headline.display_label(), headline.url);
                }
            }
        }
        ListMode::Links => {
            for link in navigator.list_linked_pages(url).await {
                println!("{link}");
            }
        }
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toiscrape::config::Config;

mod commands;

use commands::{ArchiveParams, CrawlParams, ListMode};

#[derive(Parser)]
#[command(
    name = "toiscrape",
    version,
    about = "Crawler for the NDL Times of India archive",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML configuration file (defaults plus TOISCRAPE_* variables otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Breadth-first crawl recording every article-like page
    Crawl {
        /// Page to start from
        #[arg(long)]
        start_url: String,

        /// Output JSON-lines file
        #[arg(short, long, default_value = "output.jsonl")]
        output: PathBuf,

        /// Maximum pages to fetch (unlimited if omitted)
        #[arg(long)]
        max_pages: Option<usize>,

        /// Seconds to wait between requests
        #[arg(long)]
        delay: Option<f64>,
    },

    /// Walk the year/month/date hierarchy recording every title
    Archive {
        /// Collection start page, or the page of the level being listed
        #[arg(long)]
        start_url: String,

        /// Output JSON-lines file
        #[arg(short, long, default_value = "archive.jsonl")]
        output: PathBuf,

        #[arg(long)]
        max_years: Option<usize>,

        #[arg(long)]
        max_months: Option<usize>,

        #[arg(long)]
        max_dates: Option<usize>,

        /// Maximum titles per date page
        #[arg(long)]
        max_titles: Option<usize>,

        /// Seconds to wait between requests
        #[arg(long)]
        delay: Option<f64>,

        /// Resolve each headline's original publisher URL
        #[arg(long, default_value = "false")]
        resolve_externals: bool,

        /// Print the year pages linked from --start-url and exit
        #[arg(long, group = "listing")]
        list_years: bool,

        /// Print the month pages linked from the year page --start-url and exit
        #[arg(long, group = "listing")]
        list_months: bool,

        /// Print the dates linked from the month page --start-url and exit
        #[arg(long, group = "listing")]
        list_dates: bool,

        /// Print the headlines on the date page --start-url and exit
        #[arg(long, group = "listing")]
        list_headlines: bool,

        /// Print every same-domain page linked from --start-url and exit
        #[arg(long, group = "listing")]
        list_links: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env().context("Failed to load configuration")?,
    };

    // Initialize tracing/logging
    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    match cli.command {
        Commands::Crawl {
            start_url,
            output,
            max_pages,
            delay,
        } => {
            tracing::info!(
                start_url = %start_url,
                output = %output.display(),
                max_pages = ?max_pages,
                "Starting crawl command"
            );
            commands::crawl(
                config,
                CrawlParams {
                    start_url,
                    output,
                    max_pages,
                    delay,
                },
            )
            .await?;
        }

        Commands::Archive {
            start_url,
            output,
            max_years,
            max_months,
            max_dates,
            max_titles,
            delay,
            resolve_externals,
            list_years,
            list_months,
            list_dates,
            list_headlines,
            list_links,
        } => {
            let list = ListMode::from_flags(
                list_years,
                list_months,
                list_dates,
                list_headlines,
                list_links,
            );

            tracing::info!(
                start_url = %start_url,
                list = ?list,
                resolve_externals = %resolve_externals,
                "Starting archive command"
            );
            commands::archive(
                config,
                ArchiveParams {
                    start_url,
                    output,
                    max_years,
                    max_months,
                    max_dates,
                    max_titles,
                    delay,
                    resolve_externals,
                    list,
                },
            )
            .await?;
        }
    }

    tracing::info!("toiscrape completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("toiscrape=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new(format!("toiscrape={level},warn"))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

//! coinafrique-crawler - CoinAfrique classified-ads scraper CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use coinafrique_crawler::coinafrique::Category;
use coinafrique_crawler::commands::{ScrapeCommand, StatsCommand};
use coinafrique_crawler::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "coinafrique-crawler",
    version,
    about = "Scrape animal classified ads from CoinAfrique Senegal",
    long_about = "Crawls CoinAfrique category listings, extracts each ad's detail page and cleans the results into a nom/prix/adresse/image_lien table."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "COINAFRIQUE_PROXY")]
    proxy: Option<String>,

    /// Site origin (e.g., https://sn.coinafrique.com)
    #[arg(long, global = true, env = "COINAFRIQUE_BASE_URL")]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a category
    #[command(alias = "s")]
    Scrape {
        /// Category slug (see `categories`)
        category: String,

        /// Number of listing pages to crawl
        #[arg(short, long)]
        pages: Option<u32>,

        /// Save the cleaned table as <output_dir>/<STEM>.csv
        #[arg(long, value_name = "STEM")]
        save: Option<String>,

        /// Seed for User-Agent and delay choices
        #[arg(long, env = "COINAFRIQUE_SEED")]
        seed: Option<u64>,

        /// Skip the pauses between requests
        #[arg(long)]
        no_delay: bool,
    },

    /// Price statistics for a saved CSV file
    Stats {
        /// CSV file path, or a file name in the output directory
        file: PathBuf,
    },

    /// List supported categories
    Categories,

    /// List saved CSV files
    Files,
}

/// DEBUG with `--verbose`, otherwise `RUST_LOG` with a WARN floor.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        Commands::Scrape { category, pages, save, seed, no_delay } => {
            if let Some(pages) = pages {
                config.pages = pages;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            if no_delay {
                config = config.without_delays();
            }

            let cmd = ScrapeCommand::new(config);
            let output = cmd.execute(&category, save.as_deref()).await?;
            println!("{}", output);
        }

        Commands::Stats { file } => {
            let cmd = StatsCommand::new(config);
            let output = cmd.execute(&file).await?;
            println!("{}", output);
        }

        Commands::Categories => {
            println!("Supported categories:\n");
            println!("{:<26} {:<28} URL", "Slug", "Label");
            println!("{:-<26} {:-<28} {:-<40}", "", "", "");

            for category in Category::all() {
                println!(
                    "{:<26} {:<28} {}",
                    category.slug(),
                    category.label(),
                    category.base_url(&config.base_url)
                );
            }
        }

        Commands::Files => {
            let cmd = StatsCommand::new(config);
            println!("{}", cmd.list_files()?);
        }
    }

    Ok(())
}

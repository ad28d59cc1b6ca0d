//! Scrape command implementation.

use crate::coinafrique::{CoinAfriqueClient, PageFetcher};
use crate::config::{Config, OutputFormat};
use crate::crawler::{CrawlEvent, Crawler};
use crate::format::Formatter;
use crate::sink;
use anyhow::{Context, Result};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

/// Scrapes one category and formats (and optionally saves) the cleaned table.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the scrape and returns formatted output.
    pub async fn execute(&self, category: &str, save_as: Option<&str>) -> Result<String> {
        let client = CoinAfriqueClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_fetcher(client, category, save_as).await
    }

    /// Executes the scrape with a provided fetcher (for testing).
    pub async fn execute_with_fetcher<F: PageFetcher>(
        &self,
        fetcher: F,
        category: &str,
        save_as: Option<&str>,
    ) -> Result<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let reporter = tokio::spawn(report_progress(rx));

        let mut crawler = Crawler::new(fetcher, &self.config)?.with_events(tx);
        let result = crawler.scrape_category(category, self.config.pages).await;

        // Closes the channel so the reporter drains and exits.
        drop(crawler);
        if let Err(e) = reporter.await {
            debug!("Progress reporter stopped: {}", e);
        }

        let table = result.with_context(|| format!("Failed to scrape category '{}'", category))?;
        let mut output = Formatter::new(self.config.format).format_table(&table);

        if let Some(stem) = save_as {
            let path = sink::save_table(&table, &self.config.output_dir, stem)
                .with_context(|| format!("Failed to save results as '{}'", stem))?;

            if matches!(self.config.format, OutputFormat::Table | OutputFormat::Markdown) {
                output.push_str(&format!("\n\nSaved to {}", path.display()));
            }
        }

        Ok(output)
    }
}

/// Logs crawl progress until the crawler drops its sender.
async fn report_progress(mut rx: UnboundedReceiver<CrawlEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            CrawlEvent::CrawlStarted { category, pages } => {
                info!("Scraping '{}' ({} page(s))", category.label(), pages)
            }
            CrawlEvent::PageStarted { page, url } => info!("Page {}: {}", page, url),
            CrawlEvent::ListingParsed { page, containers, links } => {
                info!("Page {}: {} ads found ({} with a link)", page, containers, links)
            }
            CrawlEvent::Waiting { duration } => debug!("Waiting {:.1}s", duration.as_secs_f64()),
            CrawlEvent::ItemFetched { name, .. } => debug!("Fetched: {}", name),
            CrawlEvent::ItemSkipped { url, error } => warn!("Skipped {}: {}", url, error),
            CrawlEvent::PageFinished { page, items } => info!("Page {}: {} items", page, items),
            CrawlEvent::CrawlFinished { raw, kept } => {
                info!("Done: {} raw items, {} after cleaning", raw, kept)
            }
        }
    }
}

//! Category crawler: listing pages, then detail pages, then cleaning.
//!
//! Requests are strictly sequential. A listing page that cannot be fetched
//! aborts the crawl; a detail page that fails only drops that listing.

use crate::cleaning::Cleaner;
use crate::coinafrique::categories::Category;
use crate::coinafrique::client::PageFetcher;
use crate::coinafrique::models::{ItemTable, ListingLink, RawItem};
use crate::coinafrique::parser::Parser;
use crate::coinafrique::selectors::SelectorMap;
use crate::config::{Config, DelayRange};
use crate::error::{Error, ExtractionError, Result};
use rand::rngs::StdRng;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Progress notifications emitted while crawling.
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    CrawlStarted { category: Category, pages: u32 },
    PageStarted { page: u32, url: String },
    ListingParsed { page: u32, containers: usize, links: usize },
    Waiting { duration: Duration },
    ItemFetched { url: String, name: String },
    ItemSkipped { url: String, error: ExtractionError },
    PageFinished { page: u32, items: usize },
    CrawlFinished { raw: usize, kept: usize },
}

/// Crawls CoinAfrique categories through a [`PageFetcher`].
pub struct Crawler<F> {
    fetcher: F,
    parser: Parser,
    cleaner: Cleaner,
    page_delay: DelayRange,
    detail_delay: DelayRange,
    rng: StdRng,
    events: Option<UnboundedSender<CrawlEvent>>,
}

impl<F: PageFetcher> Crawler<F> {
    /// Creates a crawler from configuration. Fails if a configured selector is invalid.
    pub fn new(fetcher: F, config: &Config) -> Result<Self> {
        let selectors = SelectorMap::compile(&config.selectors)?;

        Ok(Self {
            fetcher,
            parser: Parser::with_selectors(config.base_url.clone(), selectors),
            cleaner: Cleaner::new(),
            page_delay: config.page_delay,
            detail_delay: config.detail_delay,
            rng: config.rng(),
            events: None,
        })
    }

    /// Sends progress events to the given channel.
    pub fn with_events(mut self, events: UnboundedSender<CrawlEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Replaces the cleaning pipeline.
    pub fn with_cleaner(mut self, cleaner: Cleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Crawls `pages` listing pages of a category and returns the cleaned table.
    ///
    /// The category is validated before any request is made.
    pub async fn scrape_category(&mut self, category: &str, pages: u32) -> Result<ItemTable> {
        let category: Category =
            category.parse().map_err(|_| Error::InvalidCategory(category.to_string()))?;

        let raw = self.crawl(category, pages).await?;
        let raw_count = raw.len();

        let table = self.cleaner.clean(raw);

        info!("Finished {}: {} raw items, {} after cleaning", category, raw_count, table.len());
        self.emit(CrawlEvent::CrawlFinished { raw: raw_count, kept: table.len() });

        Ok(table)
    }

    /// Crawls listing and detail pages without cleaning, in discovery order.
    pub async fn crawl(&mut self, category: Category, pages: u32) -> Result<Vec<RawItem>> {
        if pages == 0 {
            return Err(Error::InvalidPageCount);
        }

        info!("Crawling {} ({} page(s))", category, pages);
        self.emit(CrawlEvent::CrawlStarted { category, pages });

        let mut items = Vec::new();
        for page in 1..=pages {
            let url = category.page_url(self.parser.origin(), page);
            let page_items = self.scrape_page(page, &url).await?;
            items.extend(page_items);

            if page < pages {
                let delay = self.page_delay;
                self.pause(delay).await;
            }
        }

        Ok(items)
    }

    /// Fetches one listing page and every detail page it links to.
    async fn scrape_page(&mut self, page: u32, url: &str) -> Result<Vec<RawItem>> {
        debug!("Fetching listing page {}: {}", page, url);
        self.emit(CrawlEvent::PageStarted { page, url: url.to_string() });

        let html = self.fetcher.fetch(url).await.map_err(|source| Error::Scrape {
            page,
            url: url.to_string(),
            source,
        })?;

        let (containers, links) = {
            let listing = self.parser.parse_listing(&html);
            (listing.container_count(), listing.links().collect::<Vec<_>>())
        };

        debug!("Page {}: {} containers, {} links", page, containers, links.len());
        self.emit(CrawlEvent::ListingParsed { page, containers, links: links.len() });

        let mut items = Vec::with_capacity(links.len());
        for link in &links {
            let delay = self.detail_delay;
            self.pause(delay).await;

            match self.fetch_item(link).await {
                Ok(item) => {
                    let name = item.name.clone().unwrap_or_default();
                    self.emit(CrawlEvent::ItemFetched { url: link.detail_url.clone(), name });
                    items.push(item);
                }
                Err(error) => {
                    warn!("Skipping {}: {}", link.detail_url, error);
                    self.emit(CrawlEvent::ItemSkipped { url: link.detail_url.clone(), error });
                }
            }
        }

        info!("Page {}: kept {} of {} listings", page, items.len(), links.len());
        self.emit(CrawlEvent::PageFinished { page, items: items.len() });

        Ok(items)
    }

    /// Fetches and extracts one detail page, attaching the listing thumbnail.
    pub async fn fetch_item(&self, link: &ListingLink) -> Result<RawItem, ExtractionError> {
        let html = self.fetcher.fetch(&link.detail_url).await?;
        let item = self.parser.parse_detail(&html);

        if !item.has_name() {
            return Err(ExtractionError::MissingName { url: link.detail_url.clone() });
        }

        Ok(item.with_image(link.image_url.clone()))
    }

    /// Sleeps for a random duration drawn from `range`.
    async fn pause(&mut self, range: DelayRange) {
        let duration = range.sample(&mut self.rng);
        if duration.is_zero() {
            return;
        }

        debug!("Delaying {}ms", duration.as_millis());
        self.emit(CrawlEvent::Waiting { duration });
        tokio::time::sleep(duration).await;
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver must not affect the crawl.
            let _ = tx.send(event);
        }
    }
}

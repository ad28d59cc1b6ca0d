//! coinafrique-crawler - CoinAfrique classified-ads scraper
//!
//! Crawls animal categories on sn.coinafrique.com, extracts each ad's detail
//! page and cleans the result into a four-column table.

pub mod cleaning;
pub mod coinafrique;
pub mod commands;
pub mod config;
pub mod crawler;
pub mod error;
pub mod format;
pub mod sink;
pub mod stats;

pub use coinafrique::{Category, ItemRow, ItemTable, RawItem};
pub use config::Config;
pub use crawler::{CrawlEvent, Crawler};
pub use error::{Error, ExtractionError, FetchError};

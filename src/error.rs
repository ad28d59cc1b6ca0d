//! Error types for fetching, extraction, crawling and persistence.

use thiserror::Error;

/// Failure of a single HTTP GET.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Connection, TLS, timeout or body-read failure.
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },
}

impl FetchError {
    /// Returns the URL that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Network { url, .. } | FetchError::HttpStatus { url, .. } => url,
        }
    }

    /// Returns the HTTP status code, if the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            FetchError::Network { .. } => None,
        }
    }
}

/// Why a single listing was dropped during a crawl.
///
/// These never abort a crawl; they are reported through
/// [`CrawlEvent::ItemSkipped`](crate::crawler::CrawlEvent::ItemSkipped).
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no ad title found at {url}")]
    MissingName { url: String },
}

/// Fatal errors surfaced to callers of the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown category '{0}'. Valid categories: chiens, moutons, poules-lapins-et-pigeons, autres-animaux")]
    InvalidCategory(String),

    #[error("page count must be at least 1")]
    InvalidPageCount,

    #[error("invalid CSS selector for {name}: {reason}")]
    InvalidSelector { name: &'static str, reason: String },

    /// A listing page could not be fetched; the whole crawl is abandoned.
    #[error("failed to scrape listing page {page} ({url})")]
    Scrape {
        page: u32,
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("table is empty, nothing to save")]
    EmptyResult,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! CoinAfrique-specific modules for HTTP client, parsing, and data models.

pub mod categories;
pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;

pub use categories::Category;
pub use client::{CoinAfriqueClient, PageFetcher};
pub use models::{ItemRow, ItemTable, ListingLink, RawItem};
pub use parser::Parser;

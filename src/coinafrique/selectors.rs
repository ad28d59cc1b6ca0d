//! CSS selectors for CoinAfrique HTML parsing.
//!
//! Every structural lookup the parser performs goes through a [`SelectorMap`].
//! Update the defaults here when CoinAfrique changes its markup, or override
//! them from the `[selectors]` table of the config file.
//!
//! **Update process**: When parsing fails, capture HTML sample,
//! update selectors, and add test fixture.

use crate::error::{Error, Result};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Selectors for listing (category) pages.
pub mod listing {
    /// Ad card container (Materialize grid cell).
    pub const CONTAINER: &str = "div.col.s6.m4.l3";

    /// Link to the detail page, first anchor in the card.
    pub const LINK: &str = "a";

    /// Thumbnail image, first image in the card.
    pub const IMAGE: &str = "img";
}

/// Selectors for individual ad pages.
pub mod detail {
    /// Ad title heading.
    pub const TITLE: &str = "h1.title.title-ad.hide-on-large-and-down";

    /// Price paragraph.
    pub const PRICE: &str = "p.price";

    /// Span carrying the address as an attribute.
    pub const ADDRESS: &str = "span[data-address]";

    /// Attribute holding the address text.
    pub const ADDRESS_ATTR: &str = "data-address";
}

/// Raw CSS strings for the selector map, as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub container: String,
    pub link: String,
    pub image: String,
    pub title: String,
    pub price: String,
    pub address: String,
    pub address_attr: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            container: listing::CONTAINER.to_string(),
            link: listing::LINK.to_string(),
            image: listing::IMAGE.to_string(),
            title: detail::TITLE.to_string(),
            price: detail::PRICE.to_string(),
            address: detail::ADDRESS.to_string(),
            address_attr: detail::ADDRESS_ATTR.to_string(),
        }
    }
}

/// Compiled selectors used by [`Parser`](super::Parser).
#[derive(Debug, Clone)]
pub struct SelectorMap {
    pub container: Selector,
    pub link: Selector,
    pub image: Selector,
    pub title: Selector,
    pub price: Selector,
    pub address: Selector,
    pub address_attr: String,
}

static DEFAULT_SELECTORS: LazyLock<SelectorMap> = LazyLock::new(|| {
    SelectorMap::compile(&SelectorConfig::default()).expect("default selectors must compile")
});

impl SelectorMap {
    /// Compiles a selector configuration, naming the first invalid entry.
    pub fn compile(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            container: parse("container", &config.container)?,
            link: parse("link", &config.link)?,
            image: parse("image", &config.image)?,
            title: parse("title", &config.title)?,
            price: parse("price", &config.price)?,
            address: parse("address", &config.address)?,
            address_attr: config.address_attr.clone(),
        })
    }
}

impl Default for SelectorMap {
    fn default() -> Self {
        DEFAULT_SELECTORS.clone()
    }
}

fn parse(name: &'static str, css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::InvalidSelector { name, reason: e.to_string() })
}

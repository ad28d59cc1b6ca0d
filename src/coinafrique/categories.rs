//! CoinAfrique listing categories and their URLs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default site origin; detail hrefs on listing pages are relative to it.
pub const DEFAULT_ORIGIN: &str = "https://sn.coinafrique.com";

/// Animal categories the crawler knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Chiens,
    Moutons,
    PoulesLapinsEtPigeons,
    AutresAnimaux,
}

impl Category {
    /// Returns the URL slug under `/categorie/`.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Chiens => "chiens",
            Category::Moutons => "moutons",
            Category::PoulesLapinsEtPigeons => "poules-lapins-et-pigeons",
            Category::AutresAnimaux => "autres-animaux",
        }
    }

    /// Returns a human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Chiens => "Chiens",
            Category::Moutons => "Moutons",
            Category::PoulesLapinsEtPigeons => "Poules, lapins et pigeons",
            Category::AutresAnimaux => "Autres animaux",
        }
    }

    /// Returns the first listing page URL for this category.
    pub fn base_url(&self, origin: &str) -> String {
        format!("{}/categorie/{}", origin.trim_end_matches('/'), self.slug())
    }

    /// Returns the listing URL for a 1-based page number.
    ///
    /// Page 1 is the bare base URL; later pages add `?page={n}`.
    pub fn page_url(&self, origin: &str, page: u32) -> String {
        let base = self.base_url(origin);
        if page <= 1 {
            base
        } else {
            format!("{}?page={}", base, page)
        }
    }

    /// Returns all supported categories.
    pub fn all() -> &'static [Category] {
        &[Category::Chiens, Category::Moutons, Category::PoulesLapinsEtPigeons, Category::AutresAnimaux]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    /// Slugs are matched exactly; they are case-sensitive on the site.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::all()
            .iter()
            .copied()
            .find(|c| c.slug() == s)
            .ok_or_else(|| CategoryParseError(s.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct CategoryParseError(pub String);

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown category '{}'. Valid categories: chiens, moutons, poules-lapins-et-pigeons, autres-animaux",
            self.0
        )
    }
}

impl std::error::Error for CategoryParseError {}

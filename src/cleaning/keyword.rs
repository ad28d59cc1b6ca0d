//! "Price on request" filtering.

use super::CleaningStep;
use crate::coinafrique::models::RawItem;

/// Keywords that mark a price as negotiable or on request.
pub const PRICE_ON_REQUEST_KEYWORDS: &[&str] = &["demande", "négociable", "contacter", "appeler"];

/// Removes rows whose price text asks the buyer to get in touch.
pub struct PriceOnRequestStep {
    keywords: Vec<String>,
}

impl PriceOnRequestStep {
    /// Creates a step with custom keywords. Matching is case-insensitive.
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect() }
    }

    /// Returns true if the price text contains any keyword.
    pub fn is_on_request(&self, price_text: &str) -> bool {
        let text = price_text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

impl Default for PriceOnRequestStep {
    fn default() -> Self {
        Self::new(PRICE_ON_REQUEST_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }
}

impl CleaningStep for PriceOnRequestStep {
    fn apply(&self, items: Vec<RawItem>) -> Vec<RawItem> {
        // A missing price never matches.
        items
            .into_iter()
            .filter(|item| !item.price_text.as_deref().is_some_and(|p| self.is_on_request(p)))
            .collect()
    }

    fn description(&self) -> String {
        format!("Drop price on request ({})", self.keywords.join(", "))
    }
}

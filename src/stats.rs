//! Price statistics over a cleaned table.

use crate::cleaning::price::compact_price;
use crate::coinafrique::models::ItemTable;
use serde::{Deserialize, Serialize};

/// Summary of the numeric prices in a table.
///
/// Only prices that are entirely numeric once spaces and the currency marker
/// are removed, and strictly positive, are counted. With none of those, every
/// numeric field is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub total: usize,
    pub with_price: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl PriceStats {
    pub fn from_table(table: &ItemTable) -> Self {
        let mut prices: Vec<f64> = table
            .iter()
            .filter_map(|row| row.price.as_deref().and_then(numeric_price))
            .filter(|p| *p > 0.0)
            .collect();

        let mut stats = PriceStats { total: table.len(), with_price: prices.len(), ..Default::default() };
        if prices.is_empty() {
            return stats;
        }

        prices.sort_by(f64::total_cmp);
        let n = prices.len();

        stats.mean = prices.iter().sum::<f64>() / n as f64;
        stats.median = if n % 2 == 1 {
            prices[n / 2]
        } else {
            (prices[n / 2 - 1] + prices[n / 2]) / 2.0
        };
        stats.min = prices[0];
        stats.max = prices[n - 1];
        stats
    }
}

/// Strict numeric coercion: "25 000 CFA" is 25000, "25 000 CFA/jour" is not a number.
///
/// Whitespace is stripped by the same rule as the cleaner's price parsing.
pub fn numeric_price(text: &str) -> Option<f64> {
    compact_price(text).parse::<f64>().ok().filter(|p| p.is_finite())
}

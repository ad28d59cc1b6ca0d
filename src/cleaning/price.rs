//! Price parsing and outlier suppression.

use super::CleaningStep;
use crate::coinafrique::models::RawItem;
use tracing::debug;

/// Currency marker stripped before parsing.
pub const CURRENCY_MARKER: &str = "CFA";

/// Removes all whitespace (NBSP included) and the currency marker.
///
/// Shared by the cleaner and the price statistics so both read
/// "45\u{a0}000 CFA" the same way.
pub fn compact_price(text: &str) -> String {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    compact.replace(CURRENCY_MARKER, "")
}

/// Parses the leading amount of a CoinAfrique price text.
///
/// The text is compacted with [`compact_price`], then the first run of
/// digits is taken: "25 000 CFA" gives 25000.
pub fn parse_price(text: &str) -> Option<f64> {
    let compact = compact_price(text);

    let digits: String = compact
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Drops rows priced strictly below a fraction of the batch mean.
///
/// Rows without a parseable price are kept. The mean is taken over the rows
/// this step receives, so the result depends on the whole batch.
pub struct PriceOutlierStep {
    ratio: f64,
}

impl PriceOutlierStep {
    /// Creates a step with a custom ratio of the mean.
    pub fn new(ratio: f64) -> Self {
        Self { ratio }
    }

    /// Returns the threshold for a batch, or `None` if nothing parses.
    pub fn threshold(&self, items: &[RawItem]) -> Option<f64> {
        let prices: Vec<f64> =
            items.iter().filter_map(|i| i.price_text.as_deref().and_then(parse_price)).collect();

        if prices.is_empty() {
            return None;
        }

        let mean = prices.iter().sum::<f64>() / prices.len() as f64;
        Some(mean * self.ratio)
    }
}

impl Default for PriceOutlierStep {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl CleaningStep for PriceOutlierStep {
    fn apply(&self, items: Vec<RawItem>) -> Vec<RawItem> {
        let Some(threshold) = self.threshold(&items) else {
            return items;
        };
        debug!("Price outlier threshold: {:.0} CFA", threshold);

        items
            .into_iter()
            .filter(|item| match item.price_text.as_deref().and_then(parse_price) {
                Some(price) => price >= threshold,
                None => true,
            })
            .collect()
    }

    fn description(&self) -> String {
        format!("Drop prices below {:.0}% of the batch mean", self.ratio * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning::test_support::{item, named};

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("25 000 CFA"), Some(25000.0));
        assert_eq!(parse_price("150000CFA"), Some(150000.0));
        assert_eq!(parse_price("1 500 000 CFA"), Some(1500000.0));
        assert_eq!(parse_price("CFA 30 000"), Some(30000.0));
        assert_eq!(parse_price("\u{a0}45\u{a0}000\u{a0}CFA"), Some(45000.0));
    }

    #[test]
    fn test_compact_price() {
        assert_eq!(compact_price("25 000 CFA"), "25000");
        assert_eq!(compact_price("45\u{a0}000\u{202f}CFA"), "45000");
        assert_eq!(compact_price("Prix sur demande"), "Prixsurdemande");
    }

    #[test]
    fn test_parse_price_takes_first_digit_run() {
        assert_eq!(parse_price("1.500.000 CFA"), Some(1.0));
        assert_eq!(parse_price("Lot de 3 à 20 000"), Some(3.0));
    }

    #[test]
    fn test_parse_price_unparseable() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("CFA"), None);
        assert_eq!(parse_price("Prix sur demande"), None);
    }

    #[test]
    fn test_threshold() {
        let items = vec![named("A", "100 CFA"), named("B", "300 CFA"), item(Some("C"), None)];
        assert_eq!(PriceOutlierStep::default().threshold(&items), Some(100.0));
    }

    #[test]
    fn test_drops_below_half_mean() {
        let items = vec![
            named("A", "100 000 CFA"),
            named("B", "20 000 CFA"),
            named("C", "90 000 CFA"),
            item(Some("D"), Some("à voir")),
        ];

        // mean 70000, threshold 35000
        let kept = PriceOutlierStep::default().apply(items);
        let names: Vec<_> = kept.iter().map(|i| i.name.as_deref().unwrap()).collect();
        assert_eq!(names, vec!["A", "C", "D"]);
    }

    #[test]
    fn test_price_at_threshold_is_kept() {
        // mean 200, threshold 100
        let items = vec![named("A", "100 CFA"), named("B", "300 CFA")];
        assert_eq!(PriceOutlierStep::default().apply(items).len(), 2);
    }

    #[test]
    fn test_no_parseable_prices_is_noop() {
        let items = vec![item(Some("A"), None), named("B", "sur place")];
        assert_eq!(PriceOutlierStep::default().apply(items.clone()), items);
    }

    #[test]
    fn test_empty_input() {
        assert!(PriceOutlierStep::default().apply(Vec::new()).is_empty());
    }

    #[test]
    fn test_description() {
        assert!(PriceOutlierStep::default().description().contains("50%"));
    }
}

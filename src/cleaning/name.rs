//! Drops rows without a usable name.

use super::CleaningStep;
use crate::coinafrique::models::RawItem;

/// Removes rows whose name is missing or empty.
pub struct MissingNameStep;

impl CleaningStep for MissingNameStep {
    fn apply(&self, items: Vec<RawItem>) -> Vec<RawItem> {
        items.into_iter().filter(RawItem::has_name).collect()
    }

    fn description(&self) -> String {
        "Drop rows without a name".to_string()
    }
}

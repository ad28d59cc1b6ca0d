//! Name disambiguation.

use super::CleaningStep;
use crate::coinafrique::models::RawItem;
use std::collections::HashMap;

/// Suffixes repeated names with their repeat count: "Chien", "Chien 1", "Chien 2".
///
/// The first occurrence keeps its name. Counting is per exact name, in row order.
pub struct DuplicateNameStep;

impl CleaningStep for DuplicateNameStep {
    fn apply(&self, items: Vec<RawItem>) -> Vec<RawItem> {
        let mut seen: HashMap<String, usize> = HashMap::new();

        items
            .into_iter()
            .map(|mut item| {
                if let Some(name) = item.name.take() {
                    let repeats = seen.entry(name.clone()).and_modify(|n| *n += 1).or_insert(0);
                    item.name =
                        Some(if *repeats == 0 { name } else { format!("{} {}", name, repeats) });
                }
                item
            })
            .collect()
    }

    fn description(&self) -> String {
        "Suffix duplicate names".to_string()
    }
}

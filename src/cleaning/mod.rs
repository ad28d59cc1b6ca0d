//! Cleaning pipeline that turns raw scraped items into the final table.
//!
//! Steps run in a fixed order and each sees only the rows that survived the
//! previous ones; the price outlier threshold in particular depends on it.

pub mod dedup;
pub mod keyword;
pub mod name;
pub mod price;

use crate::coinafrique::models::{ItemRow, ItemTable, RawItem};
use tracing::{debug, info};

pub use dedup::DuplicateNameStep;
pub use keyword::PriceOnRequestStep;
pub use name::MissingNameStep;
pub use price::{parse_price, PriceOutlierStep};

/// One stage of the cleaning pipeline.
pub trait CleaningStep: Send + Sync {
    /// Transforms the rows, preserving their relative order.
    fn apply(&self, items: Vec<RawItem>) -> Vec<RawItem>;

    /// Returns a description of this step.
    fn description(&self) -> String;
}

/// An ordered sequence of cleaning steps.
pub struct Cleaner {
    steps: Vec<Box<dyn CleaningStep>>,
}

impl Cleaner {
    /// Creates a cleaner with no steps; it only projects rows.
    pub fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    /// Creates the standard pipeline: missing names, price on request,
    /// price outliers, duplicate names.
    pub fn new() -> Self {
        let mut cleaner = Self::empty();
        cleaner
            .add(MissingNameStep)
            .add(PriceOnRequestStep::default())
            .add(PriceOutlierStep::default())
            .add(DuplicateNameStep);
        cleaner
    }

    /// Appends a step to the pipeline.
    pub fn add(&mut self, step: impl CleaningStep + 'static) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns descriptions of all steps, in order.
    pub fn descriptions(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.description()).collect()
    }

    /// Runs every step in order and projects the survivors onto the table columns.
    pub fn clean(&self, items: Vec<RawItem>) -> ItemTable {
        let initial = items.len();
        debug!("Cleaning {} raw items", initial);

        let mut rows = items;
        for step in &self.steps {
            let before = rows.len();
            rows = step.apply(rows);
            if rows.len() != before {
                debug!("{}: removed {} rows", step.description(), before - rows.len());
            }
        }

        let table = project(rows);
        info!("Cleaning kept {} of {} items", table.len(), initial);
        table
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps exactly the four published columns. Rows without a name cannot
/// be represented and are dropped.
fn project(items: Vec<RawItem>) -> ItemTable {
    let rows = items
        .into_iter()
        .filter_map(|item| {
            Some(ItemRow {
                name: item.name?,
                price: item.price_text,
                address: item.address_text,
                image_url: item.image_url,
            })
        })
        .collect();
    ItemTable::new(rows)
}

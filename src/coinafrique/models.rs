//! Data models for scraped listings and the cleaned table.

use serde::{Deserialize, Serialize};

/// One ad card found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingLink {
    /// Absolute URL of the detail page
    pub detail_url: String,
    /// Thumbnail `src`, if the card had an image
    pub image_url: Option<String>,
}

/// Fields extracted from a single detail page, before cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    /// Ad title
    pub name: Option<String>,
    /// Raw price text, e.g. "25 000 CFA"
    pub price_text: Option<String>,
    /// Value of the `data-address` attribute
    pub address_text: Option<String>,
    /// Thumbnail taken from the listing page
    pub image_url: Option<String>,
}

impl RawItem {
    /// Returns true if the item has a non-empty name.
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// Attaches the listing thumbnail.
    pub fn with_image(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }
}

/// A row of the cleaned table.
///
/// Serialized field names are the published column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "prix")]
    pub price: Option<String>,
    #[serde(rename = "adresse")]
    pub address: Option<String>,
    #[serde(rename = "image_lien")]
    pub image_url: Option<String>,
}

impl From<ItemRow> for RawItem {
    fn from(row: ItemRow) -> Self {
        RawItem {
            name: Some(row.name),
            price_text: row.price,
            address_text: row.address,
            image_url: row.image_url,
        }
    }
}

/// Cleaned, ordered listings; row position is the dense 0-based index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemTable {
    rows: Vec<ItemRow>,
}

impl ItemTable {
    /// Column names, in output order.
    pub const COLUMNS: [&'static str; 4] = ["nom", "prix", "adresse", "image_lien"];

    pub fn new(rows: Vec<ItemRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ItemRow] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&ItemRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemRow> {
        self.rows.iter()
    }

    /// Returns the names column.
    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.name.as_str()).collect()
    }

    /// Converts back into raw items, e.g. to run the cleaner again.
    pub fn into_raw(self) -> Vec<RawItem> {
        self.rows.into_iter().map(RawItem::from).collect()
    }
}

impl IntoIterator for ItemTable {
    type Item = ItemRow;
    type IntoIter = std::vec::IntoIter<ItemRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

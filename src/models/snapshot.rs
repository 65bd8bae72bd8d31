use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ProductSnapshot — One scrape result
// ---------------------------------------------------------------------------

/// Product data extracted from one page fetch.
///
/// Produced by the extractor and consumed by the stores within a single
/// pipeline run; it is never persisted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub sku: String,
    /// Site-internal product id used to name the item's directory and files.
    pub item_id: String,
    pub title: String,
    pub new_price: Decimal,
    /// Pre-discount price; `None` when the page shows no discount.
    pub old_price: Option<Decimal>,
    /// Set by the pipeline at scrape time.
    pub scraped_at: NaiveDateTime,
    pub source_url: String,
    pub domain: String,
}

impl ProductSnapshot {
    /// True when the page advertises a pre-discount price.
    pub fn is_on_sale(&self) -> bool {
        self.old_price.is_some()
    }
}

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SummaryRow — Latest state of one SKU within a domain summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SummaryRow {
    pub sku: String,
    pub item_id: String,
    pub title: String,
    pub new_price: Decimal,
    pub old_price: Option<Decimal>,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub url: String,
    pub last_updated: NaiveDateTime,
}

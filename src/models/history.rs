use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// HistoryRecord — One row of an item's price log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HistoryRecord {
    pub timestamp: NaiveDateTime,
    pub new_price: Decimal,
    pub old_price: Option<Decimal>,
    pub min_price: Decimal,
    pub max_price: Decimal,
}

// ---------------------------------------------------------------------------
// PriceRange — Lowest and highest price observed for an item
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    /// A range covering a single observation.
    pub fn single(price: Decimal) -> Self {
        Self {
            min: price,
            max: price,
        }
    }

    /// Widen the range to include `price`.
    pub fn include(self, price: Decimal) -> Self {
        Self {
            min: self.min.min(price),
            max: self.max.max(price),
        }
    }

    /// Range over a sequence of prices, or `None` if it is empty.
    pub fn from_prices<I: IntoIterator<Item = Decimal>>(prices: I) -> Option<Self> {
        prices.into_iter().fold(None, |acc, price| match acc {
            None => Some(Self::single(price)),
            Some(range) => Some(range.include(price)),
        })
    }
}

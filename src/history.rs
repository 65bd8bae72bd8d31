//! Append-only per-item price history.
//!
//! Each item has a log at `<root>/<domain>/<item>/sku-<item>.csv` with one
//! row per scrape. The running minimum and maximum are recomputed from every
//! stored price on each append, so they stay correct even if the log's own
//! min/max columns were edited by hand.

use tracing::debug;

use crate::error::Result;
use crate::layout::Layout;
use crate::models::{HistoryRecord, PriceRange, ProductSnapshot};
use crate::table::{self, Column, Table};

pub const HISTORY_COLUMNS: &[Column] = &[
    Column { name: "timestamp", header: "Timestamp" },
    Column { name: "new_price", header: "New Price" },
    Column { name: "old_price", header: "Old Price" },
    Column { name: "min_price", header: "Min Price" },
    Column { name: "max_price", header: "Max Price" },
];

const TABLE: &str = "history";

pub struct HistoryStore {
    layout: Layout,
}

impl HistoryStore {
    pub fn new(layout: &Layout) -> Self {
        Self {
            layout: layout.clone(),
        }
    }

    /// Append a record for `snapshot` and return the item's updated price range.
    ///
    /// Earlier rows are carried over unchanged; the file is replaced
    /// atomically, so a failure leaves the previous log intact.
    pub fn append(&self, snapshot: &ProductSnapshot) -> Result<PriceRange> {
        let path = self
            .layout
            .history_file(&snapshot.domain, &snapshot.item_id);
        let table = Table::load(&path, TABLE, HISTORY_COLUMNS)?;

        let mut observed = Vec::new();
        for cell in table.column_values("new_price")? {
            observed.push(table::decimal_cell(&path, "New Price", cell.as_deref())?);
        }

        let range = match PriceRange::from_prices(observed) {
            Some(previous) => previous.include(snapshot.new_price),
            None => PriceRange::single(snapshot.new_price),
        };

        table.insert(&[
            Some(table::format_timestamp(&snapshot.scraped_at)),
            Some(snapshot.new_price.to_string()),
            snapshot.old_price.map(|p| p.to_string()),
            Some(range.min.to_string()),
            Some(range.max.to_string()),
        ])?;
        table.save()?;

        debug!(
            "History for {} now spans {}..{} ({})",
            snapshot.sku,
            range.min,
            range.max,
            path.display()
        );
        Ok(range)
    }

    /// Every record for an item in append order. Empty if the item has no log.
    pub fn records(&self, domain: &str, item_id: &str) -> Result<Vec<HistoryRecord>> {
        let path = self.layout.history_file(domain, item_id);
        let table = Table::load(&path, TABLE, HISTORY_COLUMNS)?;

        table
            .rows("rowid")?
            .into_iter()
            .map(|row| -> Result<HistoryRecord> {
                let cell = |i: usize| row[i].as_deref();
                Ok(HistoryRecord {
                    timestamp: table::timestamp_cell(&path, "Timestamp", cell(0))?,
                    new_price: table::decimal_cell(&path, "New Price", cell(1))?,
                    old_price: table::optional_decimal_cell(&path, "Old Price", cell(2))?,
                    min_price: table::decimal_cell(&path, "Min Price", cell(3))?,
                    max_price: table::decimal_cell(&path, "Max Price", cell(4))?,
                })
            })
            .collect()
    }
}

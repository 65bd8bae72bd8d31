//! Per-domain summary table.
//!
//! `<root>/<domain>/<domain>-summary.csv` holds one row per SKU reflecting
//! the most recent scrape plus the item's lowest and highest observed price.

use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::layout::Layout;
use crate::models::{PriceRange, ProductSnapshot, SummaryRow};
use crate::table::{self, Column, Table};

pub const SUMMARY_COLUMNS: &[Column] = &[
    Column { name: "sku", header: "SKU" },
    Column { name: "item_id", header: "Item ID" },
    Column { name: "title", header: "Title" },
    Column { name: "new_price", header: "New Price" },
    Column { name: "old_price", header: "Old Price" },
    Column { name: "min_price", header: "Min Price" },
    Column { name: "max_price", header: "Max Price" },
    Column { name: "url", header: "URL" },
    Column { name: "last_updated", header: "Last Updated" },
];

const TABLE: &str = "summary";

pub struct SummaryStore {
    layout: Layout,
}

impl SummaryStore {
    pub fn new(layout: &Layout) -> Self {
        Self {
            layout: layout.clone(),
        }
    }

    /// Insert or overwrite the row for `snapshot.sku`.
    ///
    /// Existing rows keep their position; repeated calls with the same data
    /// leave exactly one row for the SKU.
    pub fn upsert(&self, snapshot: &ProductSnapshot, range: PriceRange) -> Result<()> {
        let path = self.layout.summary_file(&snapshot.domain);
        let table = Table::load(&path, TABLE, SUMMARY_COLUMNS)?;
        // Refuse to rewrite a file whose existing rows do not parse.
        decode_rows(&path, &table)?;

        let values = [
            Some(snapshot.sku.clone()),
            Some(snapshot.item_id.clone()),
            Some(snapshot.title.clone()),
            Some(snapshot.new_price.to_string()),
            snapshot.old_price.map(|p| p.to_string()),
            Some(range.min.to_string()),
            Some(range.max.to_string()),
            Some(snapshot.source_url.clone()),
            Some(table::format_timestamp(&snapshot.scraped_at)),
        ];

        let updated = table.update_where("sku", &snapshot.sku, &values)?;
        if updated == 0 {
            table.insert(&values)?;
        }
        table.save()?;

        debug!(
            "{} summary row for {} in {}",
            if updated == 0 { "Inserted" } else { "Updated" },
            snapshot.sku,
            path.display()
        );
        Ok(())
    }

    /// All summary rows for a domain in file order. Empty if none exist yet.
    pub fn rows(&self, domain: &str) -> Result<Vec<SummaryRow>> {
        let path = self.layout.summary_file(domain);
        let table = Table::load(&path, TABLE, SUMMARY_COLUMNS)?;

        decode_rows(&path, &table)
    }

    /// Summary row for one SKU, if present.
    pub fn find(&self, domain: &str, sku: &str) -> Result<Option<SummaryRow>> {
        Ok(self.rows(domain)?.into_iter().find(|row| row.sku == sku))
    }
}

fn decode_rows(path: &Path, table: &Table) -> Result<Vec<SummaryRow>> {
    table
        .rows("rowid")?
        .into_iter()
        .map(|row| -> Result<SummaryRow> {
            let cell = |i: usize| row[i].as_deref();
            let text = |i: usize| cell(i).unwrap_or_default().to_string();
            Ok(SummaryRow {
                sku: text(0),
                item_id: text(1),
                title: text(2),
                new_price: table::decimal_cell(path, "New Price", cell(3))?,
                old_price: table::optional_decimal_cell(path, "Old Price", cell(4))?,
                min_price: table::decimal_cell(path, "Min Price", cell(5))?,
                max_price: table::decimal_cell(path, "Max Price", cell(6))?,
                url: text(7),
                last_updated: table::timestamp_cell(path, "Last Updated", cell(8))?,
            })
        })
        .collect()
}

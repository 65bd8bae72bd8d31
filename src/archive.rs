//! Raw HTML archive for audit and debugging.
//!
//! Pages are stored next to the item's history as
//! `sku-<item>_<YYYY-MM-DD_HH-MM-SS>.html`. Archives never overwrite each
//! other: when a name is taken a numeric suffix is added.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::error::{Result, ScrapeError};
use crate::layout::Layout;
use crate::models::ProductSnapshot;

/// Upper bound on same-second archives for one item.
const MAX_ATTEMPTS: u32 = 1000;

pub struct Archiver {
    layout: Layout,
}

impl Archiver {
    pub fn new(layout: &Layout) -> Self {
        Self {
            layout: layout.clone(),
        }
    }

    /// Store `html` for the scrape described by `snapshot`; returns the file written.
    pub fn archive(&self, snapshot: &ProductSnapshot, html: &str) -> Result<PathBuf> {
        let dir = self.layout.item_dir(&snapshot.domain, &snapshot.item_id);
        fs::create_dir_all(&dir).map_err(|e| ScrapeError::storage(&dir, e))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".pricescrape-")
            .suffix(".html.tmp")
            .tempfile_in(&dir)
            .map_err(|e| ScrapeError::storage(&dir, e))?;
        tmp.write_all(html.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| ScrapeError::storage(tmp.path(), e))?;

        for attempt in 0..MAX_ATTEMPTS {
            let dest = self.layout.archive_file(
                &snapshot.domain,
                &snapshot.item_id,
                &snapshot.scraped_at,
                attempt,
            );
            match tmp.persist_noclobber(&dest) {
                Ok(_) => {
                    debug!("Archived HTML to {}", dest.display());
                    return Ok(dest);
                }
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => tmp = e.file,
                Err(e) => return Err(ScrapeError::storage(&dest, e.error)),
            }
        }

        Err(ScrapeError::storage(
            &dir,
            "too many archives with the same timestamp",
        ))
    }
}

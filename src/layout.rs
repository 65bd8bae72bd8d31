//! On-disk layout of scraped data.
//!
//! All output lives under an explicit root directory:
//!
//! ```text
//! <root>/<domain>/<domain>-summary.csv
//! <root>/<domain>/<item>/sku-<item>.csv
//! <root>/<domain>/<item>/sku-<item>_<timestamp>.html
//! ```

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::config;

#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn domain_dir(&self, domain: &str) -> PathBuf {
        self.root.join(sanitize_component(domain))
    }

    pub fn summary_file(&self, domain: &str) -> PathBuf {
        let domain = sanitize_component(domain);
        self.root
            .join(&domain)
            .join(format!("{}-summary.csv", domain))
    }

    pub fn item_dir(&self, domain: &str, item_id: &str) -> PathBuf {
        self.domain_dir(domain).join(sanitize_component(item_id))
    }

    pub fn history_file(&self, domain: &str, item_id: &str) -> PathBuf {
        self.item_dir(domain, item_id)
            .join(format!("sku-{}.csv", sanitize_component(item_id)))
    }

    /// Archive path for a scrape. `attempt` > 0 adds a numeric suffix, used
    /// when an archive with the plain name already exists.
    pub fn archive_file(
        &self,
        domain: &str,
        item_id: &str,
        scraped_at: &NaiveDateTime,
        attempt: u32,
    ) -> PathBuf {
        let stamp = scraped_at.format(config::FILE_TIMESTAMP_FORMAT);
        let item = sanitize_component(item_id);
        let name = if attempt == 0 {
            format!("sku-{}_{}.html", item, stamp)
        } else {
            format!("sku-{}_{}_{}.html", item, stamp, attempt)
        };
        self.item_dir(domain, item_id).join(name)
    }
}

/// Make page-derived text safe to use as a single path component.
pub fn sanitize_component(name: &str) -> String {
    let out: String = name
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() || out.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        out
    }
}

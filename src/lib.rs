//! Multi-domain e-commerce price scraper.
//!
//! Fetches product pages, extracts SKU, title and prices with a
//! domain-specific [`Extractor`](extract::Extractor), and records each scrape
//! in three places under an output root:
//!
//! * an append-only per-item price history (`<domain>/<item>/sku-<item>.csv`),
//! * a per-domain summary with one row per SKU (`<domain>/<domain>-summary.csv`),
//! * a raw HTML archive (`<domain>/<item>/sku-<item>_<timestamp>.html`).
//!
//! # Quick start
//!
//! ```no_run
//! use pricescrape::PriceScraper;
//!
//! let scraper = PriceScraper::builder().root_dir("data").build().unwrap();
//!
//! // Single URL: errors propagate
//! let outcome = scraper.process_url("https://nova.ge/product/123").unwrap();
//! println!("{} costs {}", outcome.snapshot.title, outcome.snapshot.new_price);
//!
//! // Batch: failures are isolated per URL
//! let report = scraper.run_batch(&["https://nova.ge/a".to_string()]);
//! println!("{}/{} succeeded", report.succeeded, report.total);
//! ```

pub mod archive;
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod history;
pub mod layout;
pub mod models;
pub mod price;
pub mod summary;
pub mod table;

pub use archive::Archiver;
pub use config::{BatchFile, Target};
pub use error::{ErrorKind, Result, ScrapeError};
pub use extract::{Extractor, ExtractorRegistry};
pub use fetch::{HttpFetcher, PageSource};
pub use history::HistoryStore;
pub use layout::Layout;
pub use models::{HistoryRecord, PriceRange, ProductSnapshot, SummaryRow};
pub use summary::SummaryStore;

use chrono::{Local, NaiveDateTime, Timelike};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

// ---------------------------------------------------------------------------
// PriceScraperBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`PriceScraper`].
///
/// Use [`PriceScraper::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](PriceScraperBuilder::build).
pub struct PriceScraperBuilder {
    root_dir: Option<PathBuf>,
    timeout: Duration,
    user_agent: String,
    archive: bool,
    source: Option<Box<dyn PageSource>>,
    registry: ExtractorRegistry,
}

impl Default for PriceScraperBuilder {
    fn default() -> Self {
        Self {
            root_dir: None,
            timeout: config::DEFAULT_TIMEOUT,
            user_agent: config::DEFAULT_USER_AGENT.to_string(),
            archive: true,
            source: None,
            registry: ExtractorRegistry::default(),
        }
    }
}

impl PriceScraperBuilder {
    /// Set the output root. Defaults to the current directory (`.`).
    pub fn root_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.root_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    ///
    /// Ignored when a custom [`source`](Self::source) is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable HTML archiving. Defaults to `true`.
    pub fn archive(mut self, archive: bool) -> Self {
        self.archive = archive;
        self
    }

    /// Replace the HTTP fetcher with another page source.
    pub fn source(mut self, source: Box<dyn PageSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Register an additional extractor (or replace a built-in one).
    pub fn register(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.registry.register(extractor);
        self
    }

    /// Build the scraper, creating the output root if needed.
    pub fn build(self) -> Result<PriceScraper> {
        let root = self.root_dir.unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&root).map_err(|e| ScrapeError::storage(&root, e))?;

        let layout = Layout::new(&root);
        let source = self
            .source
            .unwrap_or_else(|| Box::new(HttpFetcher::new(self.timeout, self.user_agent)));

        Ok(PriceScraper {
            history: HistoryStore::new(&layout),
            summary: SummaryStore::new(&layout),
            archiver: self.archive.then(|| Archiver::new(&layout)),
            layout,
            source,
            registry: self.registry,
        })
    }
}

// ---------------------------------------------------------------------------
// PriceScraper
// ---------------------------------------------------------------------------

/// Runs the fetch -> extract -> history -> summary -> archive pipeline.
///
/// Created via [`PriceScraper::builder()`]. URLs are processed strictly one
/// at a time.
pub struct PriceScraper {
    layout: Layout,
    source: Box<dyn PageSource>,
    registry: ExtractorRegistry,
    history: HistoryStore,
    summary: SummaryStore,
    archiver: Option<Archiver>,
}

/// Result of successfully processing one URL.
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub snapshot: ProductSnapshot,
    pub range: PriceRange,
    /// `None` when archiving is disabled or failed.
    pub archive_path: Option<PathBuf>,
}

impl PriceScraper {
    pub fn builder() -> PriceScraperBuilder {
        PriceScraperBuilder::default()
    }

    /// Scrape a single URL.
    ///
    /// Fetch, extraction, history and summary failures abort this URL and are
    /// returned. Archive failures are logged and swallowed.
    pub fn process_url(&self, url: &str) -> Result<ScrapeOutcome> {
        info!("Processing: {}", url);

        let host = domain::domain_name(url)?;
        let extractor = self
            .registry
            .resolve(&host)
            .ok_or_else(|| ScrapeError::UnsupportedDomain(host.clone()))?;

        let html = self.source.fetch(url)?;
        let snapshot = extract::extract_snapshot(extractor, &html, url, scrape_time())?;

        info!("  > Found SKU: {}", snapshot.sku);
        info!("  > Found Item ID: {}", snapshot.item_id);
        info!("  > Found Title: {}", snapshot.title);
        match snapshot.old_price {
            Some(old) => info!("  > Found Price: {} (Old: {})", snapshot.new_price, old),
            None => info!("  > Found Price: {}", snapshot.new_price),
        }

        let range = self.history.append(&snapshot)?;
        self.summary.upsert(&snapshot, range)?;

        let archive_path = match &self.archiver {
            Some(archiver) => match archiver.archive(&snapshot, &html) {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Could not archive HTML for {}: {}", url, e);
                    None
                }
            },
            None => None,
        };

        info!(
            "SUCCESS: logged {} at {} (min {}, max {})",
            snapshot.item_id, snapshot.new_price, range.min, range.max
        );
        Ok(ScrapeOutcome {
            snapshot,
            range,
            archive_path,
        })
    }

    /// Scrape every URL once, in order, isolating failures.
    pub fn run_batch(&self, urls: &[String]) -> BatchReport {
        let total = urls.len();
        info!("Batch mode: {} URLs", total);

        let mut report = BatchReport {
            total,
            succeeded: 0,
            failures: Vec::new(),
        };

        for (i, url) in urls.iter().enumerate() {
            info!("[{}/{}]", i + 1, total);
            match self.process_url(url) {
                Ok(_) => report.succeeded += 1,
                Err(e) => {
                    error!("FAILED [{}] {}: {}", e.kind(), url, e);
                    report.failures.push(BatchFailure {
                        url: url.clone(),
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Batch run complete. Successfully processed: {} / {}",
            report.succeeded, report.total
        );
        report
    }

    /// Load a batch file and run every URL in it.
    ///
    /// Only a missing or malformed batch file is an error; per-URL failures
    /// are collected in the report.
    pub fn run_batch_file<P: AsRef<Path>>(&self, path: P) -> Result<BatchReport> {
        let path = path.as_ref();
        info!("Batch mode activated. Reading from '{}'", path.display());
        let batch = BatchFile::load(path)?;
        Ok(self.run_batch(&batch.urls))
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn summary(&self) -> &SummaryStore {
        &self.summary
    }
}

/// Wall-clock scrape time at second precision, matching the stored format.
fn scrape_time() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

// ---------------------------------------------------------------------------
// BatchReport
// ---------------------------------------------------------------------------

/// One URL that failed during a batch run.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub url: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome counts of a batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for PriceScraper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PriceScraper(root={}, domains=[{}], archive={})",
            self.layout.root().display(),
            self.registry.domains().join(", "),
            self.archiver.is_some()
        )
    }
}

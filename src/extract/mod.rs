//! Site-specific product extraction.
//!
//! Every supported shop implements [`Extractor`]; an [`ExtractorRegistry`]
//! maps domains to extractors so the pipeline never branches on site names.
//! Adding a shop means adding an extractor and registering it.

pub mod domino;
pub mod nova;

pub use domino::DominoExtractor;
pub use nova::NovaExtractor;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::warn;

use crate::domain::host_matches;
use crate::error::{Result, ScrapeError};
use crate::models::ProductSnapshot;
use crate::price::parse_price;

/// Raw product fields located on a page, before pipeline metadata is added.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub sku: String,
    /// Site-internal id; empty when the site exposes none.
    pub item_id: String,
    pub title: String,
    pub new_price: Decimal,
    pub old_price: Option<Decimal>,
}

/// Parsing strategy for one shop.
pub trait Extractor {
    /// Domain this extractor handles (e.g. `"nova.ge"`). Sub-domains match too.
    fn domain(&self) -> &'static str;

    /// Locate the product fields in a parsed page.
    ///
    /// Fails with [`ScrapeError::Parse`] when the SKU, title or current price
    /// cannot be found or normalised. A missing old price is not an error.
    fn extract(&self, page: &Html) -> Result<ExtractedFields>;
}

// ---------------------------------------------------------------------------
// ExtractorRegistry
// ---------------------------------------------------------------------------

/// Maps shop domains to their extractors.
pub struct ExtractorRegistry {
    extractors: HashMap<&'static str, Box<dyn Extractor>>,
}

impl Default for ExtractorRegistry {
    /// Registry with every built-in shop.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(NovaExtractor));
        registry.register(Box::new(DominoExtractor));
        registry
    }
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Register an extractor, replacing any previous one for the same domain.
    pub fn register(&mut self, extractor: Box<dyn Extractor>) -> Option<Box<dyn Extractor>> {
        self.extractors.insert(extractor.domain(), extractor)
    }

    /// Find the extractor for a host. The most specific registered domain wins.
    pub fn resolve(&self, host: &str) -> Option<&dyn Extractor> {
        self.extractors
            .iter()
            .filter(|(domain, _)| host_matches(host, domain))
            .max_by_key(|(domain, _)| domain.len())
            .map(|(_, extractor)| extractor.as_ref())
    }

    /// Registered domains, sorted.
    pub fn domains(&self) -> Vec<&'static str> {
        let mut domains: Vec<&'static str> = self.extractors.keys().copied().collect();
        domains.sort_unstable();
        domains
    }
}

/// Parse `html` with `extractor` and stamp the result with pipeline metadata.
pub fn extract_snapshot(
    extractor: &dyn Extractor,
    html: &str,
    source_url: &str,
    scraped_at: NaiveDateTime,
) -> Result<ProductSnapshot> {
    let page = Html::parse_document(html);
    let fields = extractor.extract(&page)?;

    if fields.sku.is_empty() {
        return Err(ScrapeError::parse("SKU element is empty"));
    }
    if fields.title.is_empty() {
        return Err(ScrapeError::parse("product title is empty"));
    }

    let item_id = if fields.item_id.is_empty() {
        fields.sku.clone()
    } else {
        fields.item_id
    };

    Ok(ProductSnapshot {
        sku: fields.sku,
        item_id,
        title: fields.title,
        new_price: fields.new_price,
        old_price: fields.old_price,
        scraped_at,
        source_url: source_url.to_string(),
        domain: extractor.domain().to_string(),
    })
}

// ---------------------------------------------------------------------------
// Selector helpers shared by the site extractors
// ---------------------------------------------------------------------------

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::parse(format!("invalid selector '{}': {:?}", css, e)))
}

/// First element matching `css`, in document order.
pub(crate) fn first<'a>(page: &'a Html, css: &str) -> Result<Option<ElementRef<'a>>> {
    let sel = selector(css)?;
    let found = page.select(&sel).next();
    Ok(found)
}

/// Text content of an element with runs of whitespace collapsed.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Current price: required, must normalise.
pub(crate) fn required_price(text: Option<String>, what: &str) -> Result<Decimal> {
    let text = text.ok_or_else(|| ScrapeError::parse(format!("could not find {}", what)))?;
    parse_price(&text)
        .ok_or_else(|| ScrapeError::parse(format!("could not parse {} from '{}'", what, text)))
}

/// Old price: optional; unparseable text counts as absent.
pub(crate) fn optional_price(text: Option<String>, what: &str) -> Option<Decimal> {
    let text = text?;
    let price = parse_price(&text);
    if price.is_none() {
        warn!("Ignoring unparseable {} '{}'", what, text);
    }
    price
}

//! Shared fixtures for the pricescrape integration tests.
//!
//! Provides fixture product pages for the built-in shops, a map-backed
//! [`PageSource`] so pipeline tests never touch the network, and helpers for
//! building snapshots and scrapers over temporary roots.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use pricescrape::{PageSource, PriceScraper, ProductSnapshot, Result, ScrapeError};
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Fixture pages
// ---------------------------------------------------------------------------

/// A nova.ge product page. With `old` set, the page shows a discount.
pub fn nova_page(id: &str, sku: &str, title: &str, new: &str, old: Option<&str>) -> String {
    let old_tag = old
        .map(|o| format!(r#"<span class="product__oldprice old-price-value-{id}">{o}</span>"#))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title} | Nova</title></head>
<body>
  <div class="product__details--title">
    <h1>
      {title}
    </h1>
  </div>
  <div class="product__meta">
    <div class="sku">SKU: <span id="sku-{id}">{sku}</span></div>
  </div>
  <div class="product__prices">
    {old_tag}
    <span class="product__newprice price-value-{id}">{new}</span>
  </div>
</body>
</html>"#
    )
}

/// A nova.ge page for an item that is not on sale: one plain price element.
pub fn nova_regular_page(id: &str, sku: &str, title: &str, price: &str) -> String {
    format!(
        r#"<html><body>
  <div class="product__details--title"><h1>{title}</h1></div>
  <div class="sku"><span id="sku-{id}">{sku}</span></div>
  <span class="product__price price-value-{id}">{price}</span>
</body></html>"#
    )
}

/// A domino.com.ge product page.
///
/// `discounted` renders the sale price element; `list` the list price element.
pub fn domino_page(
    id: &str,
    sku: &str,
    title: &str,
    discounted: Option<&str>,
    list: Option<&str>,
) -> String {
    let discounted_tag = discounted
        .map(|p| format!(r#"<span id="sec_discounted_price_{id}">{p}</span>"#))
        .unwrap_or_default();
    let list_tag = list
        .map(|p| format!(r#"<span id="sec_list_price_{id}">{p}</span>"#))
        .unwrap_or_default();
    format!(
        r#"<html><body>
  <div class="ut2-pb__title"><h1><bdi>{title}</bdi></h1></div>
  <div class="ty-product-block__sku">
    <span id="product_code_{id}"><!--code-->  {sku}  <small>copy</small></span>
  </div>
  <div class="prices">{list_tag}{discounted_tag}</div>
</body></html>"#
    )
}

/// A nova.ge page with the price block missing.
pub fn nova_page_without_price(id: &str, sku: &str, title: &str) -> String {
    format!(
        r#"<html><body>
  <div class="product__details--title"><h1>{title}</h1></div>
  <div class="sku"><span id="sku-{id}">{sku}</span></div>
</body></html>"#
    )
}

// ---------------------------------------------------------------------------
// FakeSource
// ---------------------------------------------------------------------------

enum Response {
    Page(String),
    Status(u16),
}

/// In-memory page source.
///
/// Each URL serves its queued responses in order; the last one repeats.
/// Unknown URLs fail with a network error.
#[derive(Default)]
pub struct FakeSource {
    responses: RefCell<HashMap<String, VecDeque<Response>>>,
    fetched: RefCell<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn page(&self, url: &str, html: impl Into<String>) {
        self.push(url, Response::Page(html.into()));
    }

    pub fn status(&self, url: &str, status: u16) {
        self.push(url, Response::Status(status));
    }

    /// URLs fetched so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    fn push(&self, url: &str, response: Response) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }
}

/// Shares a [`FakeSource`] with the scraper so tests can inspect it afterwards.
pub struct SharedSource(pub Rc<FakeSource>);

impl PageSource for SharedSource {
    fn fetch(&self, url: &str) -> Result<String> {
        let fake = &self.0;
        fake.fetched.borrow_mut().push(url.to_string());

        let mut responses = fake.responses.borrow_mut();
        let queue = responses.get_mut(url).ok_or_else(|| ScrapeError::Network {
            url: url.to_string(),
            message: "connection refused".to_string(),
        })?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().map(|r| match r {
                Response::Page(html) => Response::Page(html.clone()),
                Response::Status(s) => Response::Status(*s),
            })
        };

        match response {
            Some(Response::Page(html)) => Ok(html),
            Some(Response::Status(status)) => Err(ScrapeError::Http {
                url: url.to_string(),
                status,
            }),
            None => Err(ScrapeError::Network {
                url: url.to_string(),
                message: "no response queued".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// A scraper writing into a fresh temp root and reading pages from `source`.
///
/// The caller must keep the returned `TempDir` alive for the whole test.
pub fn scraper_with(source: &Rc<FakeSource>) -> (PriceScraper, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let scraper = PriceScraper::builder()
        .root_dir(tmp_dir.path())
        .source(Box::new(SharedSource(Rc::clone(source))))
        .build()
        .unwrap();
    (scraper, tmp_dir)
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// 2025-03-01 at the given time of day.
pub fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

pub fn snapshot(sku: &str, new_price: &str, old_price: Option<&str>, scraped_at: NaiveDateTime) -> ProductSnapshot {
    ProductSnapshot {
        sku: sku.to_string(),
        item_id: format!("{}00", sku),
        title: format!("Product {}", sku),
        new_price: dec(new_price),
        old_price: old_price.map(dec),
        scraped_at,
        source_url: format!("https://nova.ge/product/{}", sku),
        domain: "nova.ge".to_string(),
    }
}

//! Extractor tests: built-in shops, registry dispatch and domain derivation.

mod common;

use common::{at, domino_page, nova_page, nova_page_without_price, nova_regular_page};
use pricescrape::domain::{domain_name, host_matches};
use pricescrape::extract::{
    extract_snapshot, DominoExtractor, ExtractedFields, Extractor, ExtractorRegistry, NovaExtractor,
};
use pricescrape::{ErrorKind, ScrapeError};
use rust_decimal_macros::dec;
use scraper::Html;

fn nova(html: &str) -> pricescrape::Result<ExtractedFields> {
    NovaExtractor.extract(&Html::parse_document(html))
}

fn domino(html: &str) -> pricescrape::Result<ExtractedFields> {
    DominoExtractor.extract(&Html::parse_document(html))
}

// ---------------------------------------------------------------------------
// nova.ge
// ---------------------------------------------------------------------------

#[test]
fn nova_sale_page_yields_both_prices() {
    let html = nova_page("4521", "NV-4521", "Samsung Galaxy A55", "1 099,00 ₾", Some("1 299,00 ₾"));
    let fields = nova(&html).unwrap();

    assert_eq!(fields.sku, "NV-4521");
    assert_eq!(fields.item_id, "4521");
    assert_eq!(fields.title, "Samsung Galaxy A55");
    assert_eq!(fields.new_price, dec!(1099.00));
    assert_eq!(fields.old_price, Some(dec!(1299.00)));
}

#[test]
fn nova_without_old_price_is_not_on_sale() {
    let html = nova_page("77", "NV-77", "Kettle", "164,00 ₾", None);
    let fields = nova(&html).unwrap();
    assert_eq!(fields.new_price, dec!(164.00));
    assert_eq!(fields.old_price, None);
}

#[test]
fn nova_falls_back_to_single_price_element() {
    let html = nova_regular_page("310", "NV-310", "Toaster", "89,90 ₾");
    let fields = nova(&html).unwrap();
    assert_eq!(fields.new_price, dec!(89.90));
    assert_eq!(fields.old_price, None);
}

#[test]
fn nova_missing_price_is_parse_error() {
    let html = nova_page_without_price("12", "NV-12", "Blender");
    let err = nova(&html).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.to_string().contains("current price"));
}

#[test]
fn nova_unparseable_price_is_parse_error() {
    let html = nova_page("12", "NV-12", "Blender", "call for price", None);
    assert!(matches!(nova(&html), Err(ScrapeError::Parse { .. })));
}

#[test]
fn nova_unparseable_old_price_is_dropped() {
    let html = nova_page("12", "NV-12", "Blender", "50,00", Some("n/a"));
    let fields = nova(&html).unwrap();
    assert_eq!(fields.new_price, dec!(50.00));
    assert_eq!(fields.old_price, None);
}

#[test]
fn nova_missing_sku_is_parse_error() {
    let html = r#"<html><body><div class="product__details--title"><h1>X</h1></div>
        <span class="product__newprice price-value-1">10</span></body></html>"#;
    let err = nova(html).unwrap_err();
    assert!(err.to_string().contains("sku-"));
}

#[test]
fn nova_missing_title_is_parse_error() {
    let html = r#"<html><body><div class="sku"><span id="sku-1">A1</span></div>
        <span class="product__newprice price-value-1">10</span></body></html>"#;
    let err = nova(html).unwrap_err();
    assert!(err.to_string().contains("title"));
}

// ---------------------------------------------------------------------------
// domino.com.ge
// ---------------------------------------------------------------------------

#[test]
fn domino_discounted_page_uses_list_price_as_old_price() {
    let html = domino_page("9981", "DM-55", "Office Chair", Some("249.00 ₾"), Some("319.00 ₾"));
    let fields = domino(&html).unwrap();

    assert_eq!(fields.sku, "DM-55");
    assert_eq!(fields.item_id, "9981");
    assert_eq!(fields.title, "Office Chair");
    assert_eq!(fields.new_price, dec!(249.00));
    assert_eq!(fields.old_price, Some(dec!(319.00)));
}

#[test]
fn domino_list_price_only_is_current_price() {
    let html = domino_page("42", "DM-42", "Desk Lamp", None, Some("59.99 ₾"));
    let fields = domino(&html).unwrap();
    assert_eq!(fields.new_price, dec!(59.99));
    assert_eq!(fields.old_price, None);
}

#[test]
fn domino_falls_back_to_any_price_span() {
    let html = r#"<html><body>
        <div class="ut2-pb__title"><h1>Shelf</h1></div>
        <span id="product_code_5">DM-5</span>
        <span id="sec_price_5">75 ₾</span>
    </body></html>"#;
    let fields = domino(html).unwrap();
    assert_eq!(fields.title, "Shelf");
    assert_eq!(fields.new_price, dec!(75));
}

#[test]
fn domino_without_any_price_is_parse_error() {
    let html = domino_page("42", "DM-42", "Desk Lamp", None, None);
    assert!(matches!(domino(&html), Err(ScrapeError::Parse { .. })));
}

// ---------------------------------------------------------------------------
// Snapshot assembly and registry
// ---------------------------------------------------------------------------

#[test]
fn extract_snapshot_stamps_pipeline_metadata() {
    let html = nova_page("4521", "NV-4521", "Galaxy", "100", None);
    let url = "https://shop.nova.ge/product/4521";
    let snapshot = extract_snapshot(&NovaExtractor, &html, url, at(9, 30, 0)).unwrap();

    assert_eq!(snapshot.domain, "nova.ge");
    assert_eq!(snapshot.source_url, url);
    assert_eq!(snapshot.scraped_at, at(9, 30, 0));
    assert!(!snapshot.is_on_sale());
}

#[test]
fn extract_snapshot_rejects_blank_sku() {
    let html = nova_page("4521", "   ", "Galaxy", "100", None);
    let err = extract_snapshot(&NovaExtractor, &html, "https://nova.ge/p", at(9, 0, 0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn extract_snapshot_uses_sku_when_item_id_is_missing() {
    let html = r#"<html><body><div class="product__details--title"><h1>Bare</h1></div>
        <div class="sku"><span id="sku-">B-1</span></div>
        <span class="product__price price-value-">10</span></body></html>"#;
    let snapshot = extract_snapshot(&NovaExtractor, html, "https://nova.ge/p", at(9, 0, 0)).unwrap();
    assert_eq!(snapshot.item_id, "B-1");
}

#[test]
fn default_registry_resolves_built_in_shops() {
    let registry = ExtractorRegistry::default();
    assert_eq!(registry.domains(), vec!["domino.com.ge", "nova.ge"]);
    assert_eq!(registry.resolve("nova.ge").unwrap().domain(), "nova.ge");
    assert_eq!(registry.resolve("m.nova.ge").unwrap().domain(), "nova.ge");
    assert_eq!(
        registry.resolve("domino.com.ge").unwrap().domain(),
        "domino.com.ge"
    );
    assert!(registry.resolve("supernova.ge").is_none());
    assert!(registry.resolve("example.com").is_none());
}

struct StaticExtractor;

impl Extractor for StaticExtractor {
    fn domain(&self) -> &'static str {
        "shop.example"
    }

    fn extract(&self, _page: &Html) -> pricescrape::Result<ExtractedFields> {
        Ok(ExtractedFields {
            sku: "EX-1".to_string(),
            item_id: "1".to_string(),
            title: "Example".to_string(),
            new_price: dec!(1),
            old_price: None,
        })
    }
}

#[test]
fn registry_accepts_new_shops() {
    let mut registry = ExtractorRegistry::empty();
    assert!(registry.resolve("shop.example").is_none());
    assert!(registry.register(Box::new(StaticExtractor)).is_none());
    assert_eq!(registry.resolve("www2.shop.example").unwrap().domain(), "shop.example");
}

// ---------------------------------------------------------------------------
// Domain derivation
// ---------------------------------------------------------------------------

#[test]
fn domain_name_strips_www() {
    assert_eq!(domain_name("https://www.domino.com.ge/chair").unwrap(), "domino.com.ge");
    assert_eq!(domain_name("https://nova.ge/p/1").unwrap(), "nova.ge");
    assert_eq!(domain_name("HTTPS://WWW.Nova.GE/p/1").unwrap(), "nova.ge");
}

#[test]
fn domain_name_rejects_invalid_urls() {
    assert_eq!(domain_name("not a url").unwrap_err().kind(), ErrorKind::Config);
    assert!(matches!(
        domain_name("file:///tmp/page.html"),
        Err(ScrapeError::InvalidUrl(_))
    ));
}

#[test]
fn host_matching_requires_label_boundary() {
    assert!(host_matches("nova.ge", "nova.ge"));
    assert!(host_matches("shop.nova.ge", "nova.ge"));
    assert!(!host_matches("supernova.ge", "nova.ge"));
}

//! nova.ge product pages.
//!
//! The SKU sits in `<span id="sku-{id}">` inside an element with class `sku`.
//! Prices carry the item id in their class names: `price-value-{id}` for the
//! current price and `old-price-value-{id}` for the pre-discount one.

use scraper::Html;

use super::{element_text, first, optional_price, required_price, ExtractedFields, Extractor};
use crate::error::{Result, ScrapeError};

pub struct NovaExtractor;

impl Extractor for NovaExtractor {
    fn domain(&self) -> &'static str {
        "nova.ge"
    }

    fn extract(&self, page: &Html) -> Result<ExtractedFields> {
        let sku_span = first(page, r#".sku span[id^="sku-"]"#)?.ok_or_else(|| {
            ScrapeError::parse("could not find SKU span with id starting with 'sku-' inside class='sku'")
        })?;
        let sku = element_text(sku_span);
        let item_id = sku_span
            .value()
            .attr("id")
            .and_then(|id| id.strip_prefix("sku-"))
            .unwrap_or_default()
            .to_string();

        let new_tag = first(
            page,
            &format!(r#".product__newprice[class~="price-value-{}"]"#, item_id),
        )?;

        let (new_text, old_price) = match new_tag {
            Some(tag) => {
                let old_text = first(
                    page,
                    &format!(r#".product__oldprice[class~="old-price-value-{}"]"#, item_id),
                )?
                .map(element_text);
                (Some(element_text(tag)), optional_price(old_text, "old price"))
            }
            // Not on sale: the only price element is the current price.
            None => (first(page, r#"[class*="price-value-"]"#)?.map(element_text), None),
        };
        let new_price = required_price(new_text, "current price")?;

        let title = first(page, ".product__details--title h1")?
            .map(element_text)
            .ok_or_else(|| ScrapeError::parse("could not find product title"))?;

        Ok(ExtractedFields {
            sku,
            item_id,
            title,
            new_price,
            old_price,
        })
    }
}

//! domino.com.ge product pages.
//!
//! The SKU is the first text node of `<span id="product_code_{id}">`; prices
//! live in `sec_discounted_price_{id}` (sale price) and `sec_list_price_{id}`
//! (list price).

use scraper::Html;

use super::{element_text, first, optional_price, required_price, ExtractedFields, Extractor};
use crate::error::{Result, ScrapeError};

pub struct DominoExtractor;

impl Extractor for DominoExtractor {
    fn domain(&self) -> &'static str {
        "domino.com.ge"
    }

    fn extract(&self, page: &Html) -> Result<ExtractedFields> {
        let sku_span = first(page, r#"span[id^="product_code_"]"#)?.ok_or_else(|| {
            ScrapeError::parse("could not find SKU span with id starting with 'product_code_'")
        })?;
        // Own text only; the span may also hold comments and nested markup.
        let sku = sku_span
            .children()
            .filter_map(|node| node.value().as_text())
            .map(|text| text.trim())
            .find(|text| !text.is_empty())
            .unwrap_or_default()
            .to_string();
        let item_id = sku_span
            .value()
            .attr("id")
            .and_then(|id| id.strip_prefix("product_code_"))
            .unwrap_or_default()
            .to_string();

        let discounted = first(
            page,
            &format!(r#"span[id="sec_discounted_price_{}"]"#, item_id),
        )?
        .map(element_text);
        let list = first(page, &format!(r#"span[id="sec_list_price_{}"]"#, item_id))?
            .map(element_text);

        let (new_text, old_price) = match (discounted, list) {
            (Some(sale), list) => (Some(sale), optional_price(list, "list price")),
            (None, Some(list)) => (Some(list), None),
            (None, None) => (first(page, r#"span[id*="price_"]"#)?.map(element_text), None),
        };
        let new_price = required_price(new_text, "current price")?;

        let title = match first(page, ".ut2-pb__title h1 bdi")? {
            Some(bdi) => Some(element_text(bdi)),
            None => first(page, ".ut2-pb__title h1")?.map(element_text),
        }
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

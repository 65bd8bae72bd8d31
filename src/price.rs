//! Price string normalisation.
//!
//! Shop pages render prices with currency symbols, non-breaking spaces and
//! locale-specific separators (`164,00 ₾`, `1 299.99`, `1.299,99 GEL`).
//! [`parse_price`] reduces such text to an exact [`Decimal`].

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a displayed price into a decimal.
///
/// Everything except digits, `,` and `.` is discarded. Separator rules:
///
/// * a separator that occurs more than once is a grouping separator;
/// * when both occur, the right-most one is the decimal separator;
/// * a single lone separator is the decimal separator.
///
/// Returns `None` when no digits remain or the separators are inconsistent.
/// The scale shown on the page is kept, so `"164,00"` parses to `164.00`.
pub fn parse_price(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    let cleaned = cleaned.trim_matches(|c: char| c == ',' || c == '.');

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    let decimal_sep = match (commas, dots) {
        (0, 0) => None,
        (1, 0) => Some(','),
        (0, 1) => Some('.'),
        (_, 0) | (0, _) => None,
        _ => {
            let last_comma = cleaned.rfind(',');
            let last_dot = cleaned.rfind('.');
            let sep = if last_comma > last_dot { ',' } else { '.' };
            if cleaned.matches(sep).count() > 1 {
                return None;
            }
            Some(sep)
        }
    };

    let normalized: String = cleaned
        .chars()
        .filter_map(|c| {
            if c.is_ascii_digit() {
                Some(c)
            } else if Some(c) == decimal_sep {
                Some('.')
            } else {
                None
            }
        })
        .collect();

    Decimal::from_str(&normalized).ok()
}

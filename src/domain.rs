//! Domain derivation from product URLs.

use url::Url;

use crate::error::{Result, ScrapeError};

/// Return the shop domain for a URL: the lower-cased host with a leading
/// `www.` removed (`https://www.domino.com.ge/x` -> `domino.com.ge`).
pub fn domain_name(url: &str) -> Result<String> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| ScrapeError::InvalidUrl(format!("{}: {}", url, e)))?;
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ScrapeError::InvalidUrl(format!("{}: URL has no host", url)))?
        .to_ascii_lowercase();

    Ok(match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    })
}

/// True if `host` is `domain` itself or one of its sub-domains.
pub fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

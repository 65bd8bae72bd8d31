//! Page fetching over HTTP.
//!
//! [`HttpFetcher`] issues a single blocking GET per URL with a bounded
//! timeout. There are no retries: failures surface immediately so the batch
//! runner can record them and move on.

use reqwest::blocking::Client;
use std::cell::OnceCell;
use std::time::Duration;
use tracing::debug;

use crate::config;
use crate::error::{Result, ScrapeError};

/// Source of raw page HTML.
///
/// The pipeline only depends on this trait, so pages can come from the
/// network ([`HttpFetcher`]) or from any other store.
pub trait PageSource {
    /// Return the HTML body served at `url`.
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages with a blocking `reqwest` client.
pub struct HttpFetcher {
    timeout: Duration,
    user_agent: String,
    client: OnceCell<Client>,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            timeout,
            user_agent: user_agent.into(),
            client: OnceCell::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Lazy HTTP client, created on first use.
    fn client(&self, url: &str) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ScrapeError::Network {
                url: url.to_string(),
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(config::DEFAULT_TIMEOUT, config::DEFAULT_USER_AGENT)
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let network = |e: reqwest::Error| ScrapeError::Network {
            url: url.to_string(),
            message: describe(&e),
        };

        let resp = self.client(url)?.get(url).send().map_err(network)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text().map_err(network)
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}

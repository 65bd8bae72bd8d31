use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::error::{Result, ScrapeError};

/// Batch file read from the working directory when no target is given.
pub const DEFAULT_BATCH_FILE: &str = "targetURL.json";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Timestamp format used inside history and summary tables.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format embedded in archive file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Ordered list of URLs to process in batch mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFile {
    pub urls: Vec<String>,
}

/// Accepted on-disk shapes:
/// `{"urls": [...]}`, `[{"url": ...}, ...]` and `["...", ...]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBatch {
    Object { urls: Vec<String> },
    Entries(Vec<serde_json::Value>),
}

impl BatchFile {
    /// Read and parse a batch file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ScrapeError::Config(format!("cannot read batch file {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
            .map_err(|e| ScrapeError::Config(format!("{} in {}", e, path.display())))
    }

    /// Parse batch file contents.
    pub fn from_json(contents: &str) -> Result<Self> {
        let raw: RawBatch = serde_json::from_str(contents).map_err(|_| {
            ScrapeError::Config(
                "batch file must be {\"urls\": [...]} or a list of URLs / {\"url\": ...} objects"
                    .to_string(),
            )
        })?;

        let urls = match raw {
            RawBatch::Object { urls } => urls,
            RawBatch::Entries(entries) => entries
                .into_iter()
                .filter_map(|entry| match entry {
                    serde_json::Value::String(url) => Some(url),
                    serde_json::Value::Object(ref map) => match map.get("url") {
                        Some(serde_json::Value::String(url)) => Some(url.clone()),
                        _ => {
                            warn!("Skipping invalid item in batch file: {}", entry);
                            None
                        }
                    },
                    other => {
                        warn!("Skipping invalid item in batch file: {}", other);
                        None
                    }
                })
                .collect(),
        };

        Ok(BatchFile { urls })
    }
}

/// What a CLI invocation should process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// One product URL; failures are fatal.
    Single(String),
    /// A batch file of URLs; failures are isolated per URL.
    Batch(PathBuf),
}

impl Target {
    /// Interpret the optional positional argument.
    ///
    /// No argument means the default batch file. An `http(s)` URL is a single
    /// target; any other argument ending in `.json` names a batch file.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg.map(str::trim) {
            None | Some("") => Target::Batch(PathBuf::from(DEFAULT_BATCH_FILE)),
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                Target::Single(url.to_string())
            }
            Some(path) if path.to_ascii_lowercase().ends_with(".json") => {
                Target::Batch(PathBuf::from(path))
            }
            Some(url) => Target::Single(url.to_string()),
        }
    }
}

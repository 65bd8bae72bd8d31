use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP error: {status} for URL: {url}")]
    Http { url: String, status: u16 },

    #[error("Parse error: {reason}")]
    Parse { reason: String },

    #[error("Storage error at {}: {message}", .path.display())]
    Storage { path: PathBuf, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No extractor available for domain: {0}")]
    UnsupportedDomain(String),
}

impl ScrapeError {
    pub fn parse(reason: impl Into<String>) -> Self {
        ScrapeError::Parse {
            reason: reason.into(),
        }
    }

    pub fn storage(path: &Path, cause: impl fmt::Display) -> Self {
        ScrapeError::Storage {
            path: path.to_path_buf(),
            message: cause.to_string(),
        }
    }

    /// Taxonomy tag reported for a failed URL.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::Network { .. } => ErrorKind::Network,
            ScrapeError::Http { .. } => ErrorKind::Http,
            ScrapeError::Parse { .. } => ErrorKind::Parse,
            ScrapeError::Storage { .. } => ErrorKind::Storage,
            ScrapeError::Config(_) | ScrapeError::InvalidUrl(_) => ErrorKind::Config,
            ScrapeError::UnsupportedDomain(_) => ErrorKind::Unsupported,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Http,
    Parse,
    Storage,
    Config,
    Unsupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Network => "network",
            ErrorKind::Http => "http",
            ErrorKind::Parse => "parse",
            ErrorKind::Storage => "storage",
            ErrorKind::Config => "config",
            ErrorKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

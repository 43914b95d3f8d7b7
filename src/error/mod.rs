// Error types for gemdoc
// Author: kelexine (https://github.com/kelexine)

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GemdocError {
    #[error("Failed to parse document: {0}")]
    DocumentParse(String),

    #[error("Document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The remote service refused to cache this content (too small, too large,
    /// or the model cannot be cached). Recovered by falling back to an uncached model.
    #[error("Content is not eligible for caching: {0}")]
    CacheIneligible(String),

    #[error("Gemini API error: {0}")]
    RemoteService(String),

    #[error("Response stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),
}

impl GemdocError {
    /// Whether this is the one failure class a turn recovers from locally.
    pub fn is_cache_ineligible(&self) -> bool {
        matches!(self, GemdocError::CacheIneligible(_))
    }
}

pub type Result<T> = std::result::Result<T, GemdocError>;

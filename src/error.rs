use thiserror::Error;

/// Main error type for the discovery engine
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Local snapshot store errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data Service errors
    #[error("Data service '{service}' error: {message}")]
    Service { service: String, message: String },

    /// Referenced row does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// No results found
    #[error("No results for query: {0}")]
    NoResults(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for DiscoveryError {
    fn from(s: String) -> Self {
        DiscoveryError::Other(s)
    }
}

impl From<&str> for DiscoveryError {
    fn from(s: &str) -> Self {
        DiscoveryError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DiscoveryError>;

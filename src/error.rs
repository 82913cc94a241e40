//! Error types shared across the crate

use thiserror::Error;

/// Rejected configuration, raised at construction time
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Missing environment variable: {0}")]
    MissingVariable(String),

    #[error("Could not parse {var}={value:?}")]
    Parse { var: String, value: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure at the data-fetch boundary (algod / indexer / fixtures)
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid Algorand address: {0:?}")]
    InvalidAddress(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status} from {url}")]
    Status { status: u16, url: String },

    #[error("No data for address {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Data unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// Rate limits, server errors and transport failures are worth retrying
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Failure while rendering or persisting a report
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Unsupported format: {0}. Use 'json' or 'csv'.")]
    UnsupportedFormat(String),
}

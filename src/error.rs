use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API returned HTTP {status}")]
    Api { status: StatusCode, body: String },

    #[error("failed to parse API response: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("seen-slots file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("seen-slots file I/O failed: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("telegram delivery failed: {0}")]
    Notify(String),
}

impl ScannerError {
    /// Raw response body attached to the error, when one was captured.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            ScannerError::Api { body, .. } | ScannerError::Parse { body, .. } => Some(body),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScannerError>;

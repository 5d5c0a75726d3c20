use thiserror::Error;

/// Why an item detail could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Unreachable server, timeout, or a non-success status.
    #[error("network error: {0}")]
    Network(String),

    /// The body was not a JSON object.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

//! Store error types.

/// Errors from the points store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check STORE_API_KEY")]
    Unauthorized,

    /// Rate limited by the store
    #[error("rate limited by the store")]
    RateLimited,

    /// Store returned an error status
    #[error("store error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopifyError {
    /// Terminal HTTP failure: a non-retryable status, with the response body
    /// as the message.
    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Network-level failure with no HTTP status (DNS, connect, timeout).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Every attempt hit a retryable status and the budget ran out.
    #[error("Failed after {attempts} retries: {url}")]
    RetriesExhausted { url: String, attempts: u32 },
}

use thiserror::Error;

/// Startup validation failures. All of these abort before any row is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SHOPIFY_STORE is required")]
    MissingStore,

    #[error("SHOPIFY_ADMIN_TOKEN is required")]
    MissingToken,

    #[error("Invalid SHOPIFY_STORE format. Expected: your-store.myshopify.com")]
    BadStoreFormat,
}

/// Failures while reading the input CSV, before the run starts.
#[derive(Debug, Error)]
pub enum CsvInputError {
    #[error("CSV file is empty or has no valid rows")]
    Empty,

    #[error("CSV missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
}

/// Failures while building a collection payload from a row.
///
/// These happen before any network call and are contained to the row.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Smart collection \"{title}\" missing rules_json")]
    MissingRules { title: String },

    #[error("Smart collection \"{title}\" has invalid rules_json: {message}")]
    InvalidRules { title: String, message: String },
}

/// Anything that can make a single row fail after it passed the title check.
///
/// Caught at the orchestration boundary and logged; never aborts the run.
#[derive(Debug, Error)]
pub enum RowError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Shopify(#[from] crate::shopify::ShopifyError),
}

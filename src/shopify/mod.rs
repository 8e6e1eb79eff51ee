pub mod client;
pub mod error;
pub mod types;

pub use client::{RetryPolicy, ShopifyClient, Sleeper, TokioSleeper};
pub use error::ShopifyError;
pub use types::{CollectionEnvelope, CreatedCollection};

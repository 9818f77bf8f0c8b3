use thiserror::Error;

/// Failure taxonomy for the tracking pipeline.
///
/// One variant per collaborator: the price provider, the store, the mail
/// transport, plus configuration problems caught at startup.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("price fetch failed: {0}")]
    PriceFetch(String),

    #[error("store error: {0}")]
    Store(#[from] mongodb::error::Error),

    #[error("notification error: {0}")]
    Notify(String),

    #[error("configuration error: {0}")]
    Config(String),
}

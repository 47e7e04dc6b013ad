use thiserror::Error;

/// Errors that can occur while driving a page or resolving the conversion rate
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Failed to launch the browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to connect to an existing browser
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Tab creation or lookup failed
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// Navigation failed or timed out
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// JavaScript evaluation in the page failed
    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    /// The page snapshot could not be taken or decoded
    #[error("Failed to snapshot page: {0}")]
    SnapshotFailed(String),

    /// Changes could not be written back to the page
    #[error("Failed to apply changes to page: {0}")]
    ApplyFailed(String),

    /// The exchange-rate service could not be reached or answered garbage
    #[error("Failed to fetch conversion rate: {0}")]
    RateFetchFailed(String),

    /// A rate that is not a positive finite number
    #[error("Invalid conversion rate: {0}")]
    InvalidRate(f64),

    /// The rate cache store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConverterError>;

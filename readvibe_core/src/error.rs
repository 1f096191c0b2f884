//! Error types for the readvibe_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for readvibe_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// PDF parsing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Book registration or lookup error
    #[error("Book error: {0}")]
    Book(String),

    /// Session ledger error
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// State management error
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

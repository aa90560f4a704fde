// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Timeouts, DNS, connection refused

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("Invalid page URL '{0}'")]
    InvalidUrl(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Review block has no <{0}> element")]
    MissingElement(&'static str),

    #[error("<time> element has no datetime attribute")]
    MissingDateAttribute,

    #[error("Unparseable review date '{0}'")]
    InvalidDate(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid date '{input}', expected YYYY-MM-DD: {source}")]
    DateFormat {
        input: String,
        source: chrono::ParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

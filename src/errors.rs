/*!
 * Error types for the spreadshred application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a synonym lookup service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The lookup did not answer in time
    #[error("Lookup timed out after {0} ms")]
    Timeout(u64),
}

/// Errors raised by the synonym cache persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or appending the log file failed
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A log line could not be encoded or decoded
    #[error("Cache encoding error at line {line}: {message}")]
    Encoding {
        /// 1-based line number in the log (0 when writing)
        line: usize,
        /// Underlying serde message
        message: String,
    },

    /// SQLite backend failure
    #[error("Cache database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Fatal errors of a single reconciliation run
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The tagger could not process a sentence
    #[error("Tagger failed: {0}")]
    Tagger(String),

    /// The summarizer could not rank a paragraph
    #[error("Summarizer failed: {0}")]
    Summarizer(String),

    /// The synonym cache could not be loaded
    #[error("Synonym cache error: {0}")]
    Store(#[from] StoreError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the reconciliation engine
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        Self::Reconcile(ReconcileError::Store(error))
    }
}

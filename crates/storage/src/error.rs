//! Error types for the book storage system.

use thiserror::Error;

/// Errors that can occur during book storage operations.
///
/// A missing record is never an error: reads return `Ok(None)` and deletes
/// succeed whether or not the record existed.
#[derive(Debug, Error)]
pub enum BookStoreError {
    #[error("Invalid entity key: {message}")]
    InvalidKey { message: String },

    #[error("Data conversion failed: {message}")]
    DataConversionError {
        message: String,
        #[source]
        source: Option<eyre::Report>,
    },

    #[error("Store rejected request with status {status}: {body}")]
    RequestRejected { status: u16, body: String },

    #[error("Storage backend error")]
    BackendError {
        #[source]
        source: Option<eyre::Report>,
    },
}

/// Result type alias for book storage operations.
pub type Result<T> = std::result::Result<T, BookStoreError>;

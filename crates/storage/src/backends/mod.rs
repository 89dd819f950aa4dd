//! Backend implementations for the book storage system.
//!
//! This module contains the document-store, relational, and in-memory
//! variants of the [`BookStore`](crate::traits::BookStore) interface.

pub mod datastore;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use datastore::DatastoreStore;
pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::{BookStoreError, Result};

/// Normalize a caller-supplied page token: blank means "start over".
pub(crate) fn effective_token(token: Option<&str>) -> Option<&str> {
    token.map(str::trim).filter(|t| !t.is_empty())
}

/// Encode the last id of a page as an opaque continuation token.
///
/// Used by the id-ordered backends; the datastore variant passes the query
/// cursor through untouched.
pub(crate) fn encode_page_token(last_id: i64) -> String {
    URL_SAFE_NO_PAD.encode(last_id.to_string())
}

/// Decode a continuation token back to the id it was issued for.
pub(crate) fn decode_page_token(token: &str) -> Result<i64> {
    let decoded = URL_SAFE_NO_PAD
        .decode(token)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .and_then(|text| text.parse().ok());
    decoded.ok_or_else(|| BookStoreError::DataConversionError {
        message: format!("unusable page token {token:?}"),
        source: None,
    })
}

//! Book storage interface and implementations for the Bookshelf project.
//!
//! This crate provides a trait-based storage system for managing catalog
//! records, with backends for Cloud Datastore, Postgres, and an in-memory
//! store.

pub mod backends;
pub mod datastore;
pub mod error;
pub mod traits;

// Re-export the main interface and types for easy access
pub use backends::MemoryStore;
pub use backends::datastore::DatastoreStore;
#[cfg(feature = "postgres")]
pub use backends::postgres::PostgresStore;
pub use bookshelf_types::{Book, BookPage};
pub use error::{BookStoreError, Result};
pub use traits::BookStore;

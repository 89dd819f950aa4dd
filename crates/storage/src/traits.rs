//! Trait definitions for the book storage system.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::Result;
use bookshelf_types::{Book, BookPage};

/// Main trait for book storage operations.
///
/// This trait defines the interface for storing and retrieving catalog
/// records. Implementations can use different backends such as document
/// stores, relational databases, or in-memory maps.
#[async_trait]
pub trait BookStore: Send + Sync + Debug {
    /// Persist a new book.
    ///
    /// When `book.id` is 0 the backend assigns an id and writes it back
    /// into the caller's record.
    ///
    /// # Returns
    /// The id under which the book was stored.
    async fn create(&self, book: &mut Book) -> Result<i64>;

    /// Get a book by its id.
    ///
    /// # Returns
    /// `Some(book)` if found, `None` if not found.
    async fn read(&self, id: i64) -> Result<Option<Book>>;

    /// Overwrite the record at `book.id`.
    ///
    /// The record is assumed to exist; what happens for a missing id is
    /// backend-defined (no upsert is implied).
    async fn update(&self, book: &Book) -> Result<()>;

    /// Remove the record at `id`. Deleting an absent record is not an
    /// error.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Fetch up to `page_size` books in the backend's stable order.
    ///
    /// A `None` or blank `page_token` starts from the beginning. The
    /// returned page carries the cursor for the next page only when the
    /// page is full and the backend reports more results; a short final
    /// page always ends the listing.
    async fn list(&self, page_size: i32, page_token: Option<&str>) -> Result<BookPage>;
}

//! In-memory storage backend.
//!
//! Backs the trait-level test suite and local runs that need no external
//! store. Listing order and token semantics match the relational backend:
//! ascending id, with the token naming the last id of the page.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backends::{decode_page_token, effective_token, encode_page_token};
use crate::error::Result;
use crate::traits::BookStore;
use bookshelf_types::{Book, BookPage};

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    books: BTreeMap<i64, Book>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn create(&self, book: &mut Book) -> Result<i64> {
        let mut inner = self.inner.write().await;
        if book.id == 0 {
            inner.next_id += 1;
            book.id = inner.next_id;
        } else {
            // Keep generated ids clear of caller-supplied ones.
            inner.next_id = inner.next_id.max(book.id);
        }
        let id = book.id;
        inner.books.insert(id, book.clone());
        Ok(id)
    }

    async fn read(&self, id: i64) -> Result<Option<Book>> {
        Ok(self.inner.read().await.books.get(&id).cloned())
    }

    async fn update(&self, book: &Book) -> Result<()> {
        // Backend-defined for a missing id: this variant writes through.
        self.inner.write().await.books.insert(book.id, book.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.inner.write().await.books.remove(&id);
        Ok(())
    }

    async fn list(&self, page_size: i32, page_token: Option<&str>) -> Result<BookPage> {
        let after = match effective_token(page_token) {
            Some(token) => decode_page_token(token)?,
            None => 0,
        };
        let page_size = page_size.max(0) as usize;

        let inner = self.inner.read().await;
        let mut books: Vec<Book> = inner
            .books
            .range((Bound::Excluded(after), Bound::Unbounded))
            .take(page_size + 1)
            .map(|(_, book)| book.clone())
            .collect();

        // The extra record only tells us whether more pages exist.
        let next_page_token = if books.len() > page_size {
            books.truncate(page_size);
            books.last().map(|book| encode_page_token(book.id))
        } else {
            None
        };

        Ok(BookPage {
            books,
            next_page_token,
        })
    }
}

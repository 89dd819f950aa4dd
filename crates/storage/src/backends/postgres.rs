//! Postgres relational backend.

use async_trait::async_trait;
use bb8::Pool;
use bb8_postgres::PostgresConnectionManager;
use tokio_postgres::{NoTls, Row};

use crate::backends::{decode_page_token, effective_token, encode_page_token};
use crate::error::{BookStoreError, Result};
use crate::traits::BookStore;
use bookshelf_types::{Book, BookPage};

const BOOK_COLUMNS: &str =
    "id, title, author, published_date, image_url, description, created_by, created_by_id";

/// Relational backend storing books in a single `books` table.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresStore {
    /// Connect a pooled client to the given connection string.
    pub async fn connect(url: &str) -> Result<Self> {
        let manager =
            PostgresConnectionManager::new_from_stringlike(url, NoTls).map_err(backend_error)?;
        let pool = Pool::builder().build(manager).await.map_err(backend_error)?;
        Ok(Self { pool })
    }

    /// Create the books table if it is not there yet.
    pub async fn migrate(&self) -> Result<()> {
        let conn = self.conn().await?;
        conn.batch_execute(
            "CREATE TABLE IF NOT EXISTS books (
                id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                title TEXT,
                author TEXT,
                published_date TIMESTAMPTZ,
                image_url TEXT,
                description TEXT,
                created_by TEXT,
                created_by_id TEXT
            )",
        )
        .await
        .map_err(backend_error)?;
        tracing::debug!("ensured books table exists");
        Ok(())
    }

    async fn conn(
        &self,
    ) -> Result<bb8::PooledConnection<'_, PostgresConnectionManager<NoTls>>> {
        self.pool.get().await.map_err(backend_error)
    }
}

fn backend_error<E: std::fmt::Display>(error: E) -> BookStoreError {
    BookStoreError::BackendError {
        source: Some(eyre::eyre!("{error}")),
    }
}

fn row_to_book(row: &Row) -> Book {
    Book {
        id: row.get("id"),
        title: row.get("title"),
        author: row.get("author"),
        published_date: row.get("published_date"),
        image_url: row.get("image_url"),
        description: row.get("description"),
        created_by: row.get("created_by"),
        created_by_id: row.get("created_by_id"),
    }
}

#[async_trait]
impl BookStore for PostgresStore {
    async fn create(&self, book: &mut Book) -> Result<i64> {
        let conn = self.conn().await?;
        if book.id == 0 {
            let row = conn
                .query_one(
                    "INSERT INTO books (title, author, published_date, image_url, \
                     description, created_by, created_by_id) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
                    &[
                        &book.title,
                        &book.author,
                        &book.published_date,
                        &book.image_url,
                        &book.description,
                        &book.created_by,
                        &book.created_by_id,
                    ],
                )
                .await
                .map_err(backend_error)?;
            book.id = row.get(0);
        } else {
            conn.execute(
                "INSERT INTO books (id, title, author, published_date, image_url, \
                 description, created_by, created_by_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                &[
                    &book.id,
                    &book.title,
                    &book.author,
                    &book.published_date,
                    &book.image_url,
                    &book.description,
                    &book.created_by,
                    &book.created_by_id,
                ],
            )
            .await
            .map_err(backend_error)?;
        }
        Ok(book.id)
    }

    async fn read(&self, id: i64) -> Result<Option<Book>> {
        let conn = self.conn().await?;
        let statement = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1");
        let row = conn
            .query_opt(statement.as_str(), &[&id])
            .await
            .map_err(backend_error)?;
        Ok(row.as_ref().map(row_to_book))
    }

    async fn update(&self, book: &Book) -> Result<()> {
        let conn = self.conn().await?;
        // Zero rows touched for a missing id; backend-defined, not an error.
        conn.execute(
            "UPDATE books SET title = $2, author = $3, published_date = $4, \
             image_url = $5, description = $6, created_by = $7, created_by_id = $8 \
             WHERE id = $1",
            &[
                &book.id,
                &book.title,
                &book.author,
                &book.published_date,
                &book.image_url,
                &book.description,
                &book.created_by,
                &book.created_by_id,
            ],
        )
        .await
        .map_err(backend_error)?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let conn = self.conn().await?;
        conn.execute("DELETE FROM books WHERE id = $1", &[&id])
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn list(&self, page_size: i32, page_token: Option<&str>) -> Result<BookPage> {
        let after = match effective_token(page_token) {
            Some(token) => decode_page_token(token)?,
            None => 0,
        };
        let page_size = i64::from(page_size.max(0));

        let conn = self.conn().await?;
        // Fetch one extra row to learn whether another page exists.
        let statement =
            format!("SELECT {BOOK_COLUMNS} FROM books WHERE id > $1 ORDER BY id LIMIT $2");
        let rows = conn
            .query(statement.as_str(), &[&after, &(page_size + 1)])
            .await
            .map_err(backend_error)?;

        let mut books: Vec<Book> = rows.iter().map(row_to_book).collect();
        let next_page_token = if books.len() as i64 > page_size {
            books.truncate(page_size as usize);
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

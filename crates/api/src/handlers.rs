//! HTTP request handlers.
//!
//! Each public async function corresponds to a route registered in
//! [`router`](crate::router). Handlers extract path/query/body parameters
//! via axum extractors and delegate to the active
//! [`BookStore`](bookshelf_storage::BookStore) backend.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use bookshelf_types::{Book, BookPage};

use crate::AppState;
use crate::error::ApiError;

const DEFAULT_PAGE_SIZE: i32 = 10;
const MAX_PAGE_SIZE: i32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page_size: Option<i32>,
    pub page_token: Option<String>,
}

impl ListParams {
    fn effective_page_size(&self) -> Result<i32, ApiError> {
        match self.page_size {
            None => Ok(DEFAULT_PAGE_SIZE),
            Some(size) if size > 0 => Ok(size.min(MAX_PAGE_SIZE)),
            Some(size) => Err(ApiError::BadRequest(format!(
                "page_size must be positive, got {size}"
            ))),
        }
    }
}

/// `GET /books` — one page of the catalog.
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<BookPage>, ApiError> {
    let page_size = params.effective_page_size()?;
    let page = state
        .store
        .list(page_size, params.page_token.as_deref())
        .await?;
    Ok(Json(page))
}

/// `POST /books` — store a new book and return it with its assigned id.
pub async fn create_book(
    State(state): State<AppState>,
    Json(mut book): Json<Book>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    state.store.create(&mut book).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// `GET /books/{id}` — 404 when the store has no such record.
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, ApiError> {
    match state.store.read(id).await? {
        Some(book) => Ok(Json(book)),
        None => Err(ApiError::NotFound),
    }
}

/// `PUT /books/{id}` — overwrite the record at the path id.
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut book): Json<Book>,
) -> Result<Json<Book>, ApiError> {
    // The path id is authoritative over whatever the body carries.
    book.id = id;
    state.store.update(&book).await?;
    Ok(Json(book))
}

/// `DELETE /books/{id}` — 204 whether or not the record existed.
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /_ah/health`
pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_defaults_when_absent() {
        assert_eq!(
            ListParams::default().effective_page_size().unwrap(),
            DEFAULT_PAGE_SIZE
        );
    }

    #[test]
    fn page_size_is_clamped_to_the_maximum() {
        let params = ListParams {
            page_size: Some(5000),
            page_token: None,
        };
        assert_eq!(params.effective_page_size().unwrap(), MAX_PAGE_SIZE);
    }

    #[test]
    fn non_positive_page_size_is_rejected() {
        for size in [0, -3] {
            let params = ListParams {
                page_size: Some(size),
                page_token: None,
            };
            assert!(params.effective_page_size().is_err());
        }
    }
}

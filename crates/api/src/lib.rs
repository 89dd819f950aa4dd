//! HTTP surface for the bookshelf catalog.

pub mod config;
pub mod error;
pub mod handlers;
pub mod store;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use bookshelf_storage::BookStore;

/// Shared application state passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookStore>,
}

/// Build the application router: the book resource plus the fixed
/// health-check route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/books",
            get(handlers::list_books).post(handlers::create_book),
        )
        .route(
            "/books/{id}",
            get(handlers::get_book)
                .put(handlers::update_book)
                .delete(handlers::delete_book),
        )
        .route("/_ah/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

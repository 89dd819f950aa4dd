//! Domain records shared by the storage and API layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry.
///
/// An id of 0 means "unassigned": the active store generates a real id on
/// create and writes it back. Every other field is optional; absence is
/// `None`, never an empty string or a sentinel value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub id: i64,
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub created_by_id: Option<String>,
}

/// One page of a paginated listing.
///
/// `next_page_token` is `None` once the listing is exhausted; otherwise it
/// is an opaque backend cursor that must be passed back verbatim to fetch
/// the next page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub next_page_token: Option<String>,
}

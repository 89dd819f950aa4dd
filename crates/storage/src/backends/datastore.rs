//! Document-store backend speaking the Datastore v1 REST protocol.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::backends::effective_token;
use crate::datastore::DatastoreClient;
use crate::datastore::wire::{
    CommitRequest, CommitResponse, Entity, Key, KindExpression, LookupRequest, Mutation,
    PathElement, Query, RunQueryRequest, Value,
};
use crate::error::{BookStoreError, Result};
use crate::traits::BookStore;
use bookshelf_types::{Book, BookPage};

/// Kind under which every book entity is stored.
pub const BOOK_KIND: &str = "Book";

const MORE_RESULTS_AFTER_LIMIT: &str = "MORE_RESULTS_AFTER_LIMIT";

/// Make a datastore key for a book id.
///
/// An id of 0 produces a key without an id, which asks the store to
/// allocate one on commit.
pub fn encode_key(id: i64) -> Key {
    Key {
        path: vec![PathElement {
            kind: BOOK_KIND.to_string(),
            id: (id != 0).then(|| id.to_string()),
        }],
    }
}

/// Extract the book id from a datastore key.
pub fn decode_key(key: &Key) -> Result<i64> {
    let element = key.path.first().ok_or_else(|| BookStoreError::InvalidKey {
        message: "key has no path elements".to_string(),
    })?;
    let id = element
        .id
        .as_deref()
        .ok_or_else(|| BookStoreError::InvalidKey {
            message: "key path element has no id".to_string(),
        })?;
    id.parse().map_err(|_| BookStoreError::InvalidKey {
        message: format!("key id {id:?} is not an integer"),
    })
}

fn put_string(properties: &mut BTreeMap<String, Value>, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        properties.insert(name.to_string(), Value::string(value.clone()));
    }
}

/// Build a datastore entity with the same values as `book`.
///
/// Fields that are `None` are left out of the property map entirely; they
/// are never written as null values.
pub fn encode_entity(book: &Book) -> Entity {
    let mut properties = BTreeMap::new();
    put_string(&mut properties, "Title", &book.title);
    put_string(&mut properties, "Author", &book.author);
    if let Some(published) = book.published_date {
        properties.insert("PublishedDate".to_string(), Value::timestamp(published));
    }
    put_string(&mut properties, "ImageUrl", &book.image_url);
    put_string(&mut properties, "Description", &book.description);
    put_string(&mut properties, "CreatedBy", &book.created_by);
    // Stored under the legacy property name, without the second "d".
    put_string(&mut properties, "CreateById", &book.created_by_id);

    Entity {
        key: encode_key(book.id),
        properties,
    }
}

/// Unpack a book from a datastore entity.
///
/// Properties missing from the map decode to `None`.
pub fn decode_entity(entity: &Entity) -> Result<Book> {
    let get_string = |name: &str| -> Option<String> {
        entity
            .properties
            .get(name)
            .and_then(|value| value.string_value.clone())
    };

    Ok(Book {
        id: decode_key(&entity.key)?,
        title: get_string("Title"),
        author: get_string("Author"),
        published_date: entity
            .properties
            .get("PublishedDate")
            .and_then(|value| value.timestamp_value),
        image_url: get_string("ImageUrl"),
        description: get_string("Description"),
        created_by: get_string("CreatedBy"),
        created_by_id: get_string("CreateById"),
    })
}

/// Datastore-backed book store.
#[derive(Debug, Clone)]
pub struct DatastoreStore {
    client: DatastoreClient,
}

impl DatastoreStore {
    pub fn new(client: DatastoreClient) -> Self {
        Self { client }
    }

    /// Commit a single mutation in non-transactional mode.
    async fn commit_mutation(&self, mutation: Mutation) -> Result<CommitResponse> {
        self.client
            .commit(&CommitRequest::non_transactional(mutation))
            .await
    }
}

#[async_trait]
impl BookStore for DatastoreStore {
    async fn create(&self, book: &mut Book) -> Result<i64> {
        let response = self
            .commit_mutation(Mutation::Insert(encode_entity(book)))
            .await?;

        // The store reports a key only when it allocated the id; with a
        // caller-supplied id there is nothing to write back.
        match response
            .mutation_results
            .first()
            .and_then(|result| result.key.as_ref())
        {
            Some(key) => book.id = decode_key(key)?,
            None if book.id != 0 => {}
            None => {
                return Err(BookStoreError::DataConversionError {
                    message: "commit result carries no allocated key".to_string(),
                    source: None,
                });
            }
        }
        Ok(book.id)
    }

    async fn read(&self, id: i64) -> Result<Option<Book>> {
        let response = self
            .client
            .lookup(&LookupRequest {
                keys: vec![encode_key(id)],
            })
            .await?;

        match response.found.first() {
            Some(result) => Ok(Some(decode_entity(&result.entity)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, book: &Book) -> Result<()> {
        self.commit_mutation(Mutation::Update(encode_entity(book)))
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.commit_mutation(Mutation::Delete(encode_key(id)))
            .await?;
        Ok(())
    }

    async fn list(&self, page_size: i32, page_token: Option<&str>) -> Result<BookPage> {
        let query = Query {
            kind: vec![KindExpression {
                name: BOOK_KIND.to_string(),
            }],
            limit: Some(page_size),
            start_cursor: effective_token(page_token).map(str::to_string),
        };
        let response = self.client.run_query(&RunQueryRequest { query }).await?;

        let batch = response.batch;
        let books: Vec<Book> = batch
            .entity_results
            .iter()
            .map(|result| decode_entity(&result.entity))
            .collect::<Result<_>>()?;

        // A full page alone is not enough to keep going; the store also
        // has to report that the limit cut the result set short.
        let next_page_token = if books.len() == page_size.max(0) as usize
            && batch.more_results.as_deref() == Some(MORE_RESULTS_AFTER_LIMIT)
        {
            batch.end_cursor
        } else {
            None
        };

        Ok(BookPage {
            books,
            next_page_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn full_book() -> Book {
        Book {
            id: 99,
            title: Some("The Left Hand of Darkness".to_string()),
            author: Some("Ursula K. Le Guin".to_string()),
            published_date: Some(Utc.with_ymd_and_hms(1969, 3, 1, 12, 30, 45).unwrap()),
            image_url: Some("https://covers.example/lhod.jpg".to_string()),
            description: Some("A stranger on Gethen.".to_string()),
            created_by: Some("reader".to_string()),
            created_by_id: Some("user-7".to_string()),
        }
    }

    #[test]
    fn key_for_unassigned_id_has_no_id_element() {
        let key = encode_key(0);
        assert_eq!(key.path.len(), 1);
        assert_eq!(key.path[0].kind, BOOK_KIND);
        assert!(key.path[0].id.is_none());
    }

    #[test]
    fn key_round_trips_assigned_id() {
        assert_eq!(decode_key(&encode_key(12345)).unwrap(), 12345);
    }

    #[test]
    fn decoding_rejects_empty_and_non_integer_keys() {
        assert!(decode_key(&Key::default()).is_err());
        assert!(decode_key(&encode_key(0)).is_err());

        let key = Key {
            path: vec![PathElement {
                kind: BOOK_KIND.to_string(),
                id: Some("twelve".to_string()),
            }],
        };
        assert!(decode_key(&key).is_err());
    }

    #[test]
    fn entity_round_trips_every_field() {
        let book = full_book();
        let decoded = decode_entity(&encode_entity(&book)).unwrap();
        assert_eq!(decoded, book);
    }

    #[test]
    fn entity_round_trips_with_fields_absent() {
        let book = Book {
            id: 7,
            author: Some("Anonymous".to_string()),
            ..Default::default()
        };
        let entity = encode_entity(&book);

        // Absent fields are omitted from the property map, not nulled.
        assert_eq!(entity.properties.len(), 1);
        assert!(entity.properties.contains_key("Author"));

        let decoded = decode_entity(&entity).unwrap();
        assert_eq!(decoded, book);
        assert!(decoded.title.is_none());
        assert!(decoded.published_date.is_none());
    }

    #[test]
    fn timestamp_precision_survives_the_round_trip() {
        let published = Utc
            .timestamp_opt(123_456_789, 987_654_321)
            .single()
            .unwrap();
        let book = Book {
            id: 1,
            published_date: Some(published),
            ..Default::default()
        };
        let decoded = decode_entity(&encode_entity(&book)).unwrap();
        assert_eq!(decoded.published_date, Some(published));
    }

    #[test]
    fn creator_id_uses_the_legacy_property_name() {
        let entity = encode_entity(&full_book());
        assert!(entity.properties.contains_key("CreateById"));
        assert!(!entity.properties.contains_key("CreatedById"));
    }
}

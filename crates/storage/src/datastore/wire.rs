//! Serde models of the Cloud Datastore v1 REST shapes used by this crate.
//!
//! Only the fields the book backend reads or writes are modeled. Int64 ids
//! travel as decimal strings on this wire, and absent fields are omitted
//! from the JSON instead of being written as nulls.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A path identifying one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathElement>,
}

/// One element of a key path. An element without an id asks the store to
/// allocate one on commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathElement {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A single property value, restricted to the two kinds book records use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_value: Option<DateTime<Utc>>,
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn timestamp(value: DateTime<Utc>) -> Self {
        Self {
            timestamp_value: Some(value),
            ..Default::default()
        }
    }
}

/// A key plus a property map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub key: Key,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
}

/// A single change submitted to the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutation {
    Insert(Entity),
    Update(Entity),
    Delete(Key),
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitMode {
    NonTransactional,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub mode: CommitMode,
    pub mutations: Vec<Mutation>,
}

impl CommitRequest {
    /// Wrap one mutation in a non-transactional commit.
    pub fn non_transactional(mutation: Mutation) -> Self {
        Self {
            mode: CommitMode::NonTransactional,
            mutations: vec![mutation],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    #[serde(default)]
    pub mutation_results: Vec<MutationResult>,
}

/// Outcome of one mutation. The key is only reported when the store
/// allocated an id for the entity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    #[serde(default)]
    pub key: Option<Key>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub keys: Vec<Key>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    #[serde(default)]
    pub found: Vec<EntityResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityResult {
    pub entity: Entity,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub query: Query,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kind: Vec<KindExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KindExpression {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryResponse {
    #[serde(default)]
    pub batch: QueryResultBatch,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResultBatch {
    #[serde(default)]
    pub entity_results: Vec<EntityResult>,
    #[serde(default)]
    pub end_cursor: Option<String>,
    #[serde(default)]
    pub more_results: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn commit_request_matches_protocol_json() {
        let entity = Entity {
            key: Key {
                path: vec![PathElement {
                    kind: "Book".to_string(),
                    id: Some("7".to_string()),
                }],
            },
            properties: BTreeMap::from([(
                "Title".to_string(),
                Value::string("Dune"),
            )]),
        };
        let request = CommitRequest::non_transactional(Mutation::Update(entity));

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "mode": "NON_TRANSACTIONAL",
                "mutations": [{
                    "update": {
                        "key": { "path": [{ "kind": "Book", "id": "7" }] },
                        "properties": { "Title": { "stringValue": "Dune" } }
                    }
                }]
            })
        );
    }

    #[test]
    fn delete_mutation_carries_only_a_key() {
        let key = Key {
            path: vec![PathElement {
                kind: "Book".to_string(),
                id: Some("12".to_string()),
            }],
        };
        assert_eq!(
            serde_json::to_value(Mutation::Delete(key)).unwrap(),
            json!({ "delete": { "path": [{ "kind": "Book", "id": "12" }] } })
        );
    }

    #[test]
    fn absent_value_fields_are_omitted_not_null() {
        let value = Value::timestamp(Utc.with_ymd_and_hms(1965, 8, 1, 0, 0, 0).unwrap());
        let encoded = serde_json::to_value(&value).unwrap();
        assert_eq!(
            encoded,
            json!({ "timestampValue": "1965-08-01T00:00:00Z" })
        );
        assert!(encoded.get("stringValue").is_none());
    }

    #[test]
    fn query_serializes_cursor_and_limit() {
        let query = Query {
            kind: vec![KindExpression {
                name: "Book".to_string(),
            }],
            limit: Some(10),
            start_cursor: Some("CkEabc".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "kind": [{ "name": "Book" }],
                "limit": 10,
                "startCursor": "CkEabc"
            })
        );
    }

    #[test]
    fn query_response_tolerates_missing_fields() {
        let response: RunQueryResponse = serde_json::from_value(json!({
            "batch": { "endCursor": "Ck8x" }
        }))
        .unwrap();
        assert!(response.batch.entity_results.is_empty());
        assert_eq!(response.batch.end_cursor.as_deref(), Some("Ck8x"));
        assert!(response.batch.more_results.is_none());
    }
}

//! Backend selection.

use std::sync::Arc;

use eyre::bail;

use bookshelf_storage::datastore::DatastoreClient;
use bookshelf_storage::{BookStore, DatastoreStore, MemoryStore, PostgresStore};

use crate::config::Settings;

const KNOWN_BACKENDS: &str = "datastore, postgres, memory";

/// Construct the configured backend.
///
/// A missing or unrecognized selection, or a selected backend missing its
/// settings section, is fatal: the process refuses to start rather than
/// run without a working store.
pub async fn build_store(settings: &Settings) -> eyre::Result<Arc<dyn BookStore>> {
    match settings.book_store.as_deref() {
        Some("datastore") => {
            let Some(datastore) = &settings.datastore else {
                bail!("book_store is \"datastore\" but the [datastore] section is missing");
            };
            let mut client = match &datastore.endpoint {
                Some(endpoint) => DatastoreClient::with_endpoint(&datastore.project_id, endpoint),
                None => DatastoreClient::new(&datastore.project_id),
            };
            if let Some(token) = &datastore.auth_token {
                client = client.with_auth_token(token);
            }
            tracing::info!(project_id = %datastore.project_id, "storing book data in Datastore");
            Ok(Arc::new(DatastoreStore::new(client)))
        }
        Some("postgres") => {
            let Some(postgres) = &settings.postgres else {
                bail!("book_store is \"postgres\" but the [postgres] section is missing");
            };
            let store = PostgresStore::connect(&postgres.url).await?;
            store.migrate().await?;
            tracing::info!("storing book data in Postgres");
            Ok(Arc::new(store))
        }
        Some("memory") => {
            tracing::info!("storing book data in memory; records are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        Some(other) => bail!(
            "unknown book_store backend {other:?}; set book_store to one of: {KNOWN_BACKENDS}"
        ),
        None => bail!("no book store backend selected; set book_store to one of: {KNOWN_BACKENDS}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatastoreSettings;

    #[tokio::test]
    async fn missing_backend_is_fatal() {
        let error = build_store(&Settings::default()).await.unwrap_err();
        assert!(error.to_string().contains(KNOWN_BACKENDS));
    }

    #[tokio::test]
    async fn unknown_backend_is_fatal() {
        let settings = Settings {
            book_store: Some("sqlserver".to_string()),
            ..Default::default()
        };
        let error = build_store(&settings).await.unwrap_err();
        assert!(error.to_string().contains("sqlserver"));
        assert!(error.to_string().contains(KNOWN_BACKENDS));
    }

    #[tokio::test]
    async fn datastore_without_its_section_is_fatal() {
        let settings = Settings {
            book_store: Some("datastore".to_string()),
            ..Default::default()
        };
        assert!(build_store(&settings).await.is_err());
    }

    #[tokio::test]
    async fn datastore_backend_builds_from_settings() {
        let settings = Settings {
            book_store: Some("datastore".to_string()),
            datastore: Some(DatastoreSettings {
                project_id: "demo-project".to_string(),
                endpoint: Some("http://localhost:8081".to_string()),
                auth_token: None,
            }),
            ..Default::default()
        };
        assert!(build_store(&settings).await.is_ok());
    }

    #[tokio::test]
    async fn memory_backend_builds() {
        let settings = Settings {
            book_store: Some("memory".to_string()),
            ..Default::default()
        };
        assert!(build_store(&settings).await.is_ok());
    }
}

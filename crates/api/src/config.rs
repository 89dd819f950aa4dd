//! Runtime settings, layered from an optional `bookshelf.toml` and
//! `BOOKSHELF`-prefixed environment variables.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Which backend stores the books: "datastore", "postgres" or "memory".
    pub book_store: Option<String>,
    #[serde(default)]
    pub server: ServerSettings,
    pub datastore: Option<DatastoreSettings>,
    pub postgres: Option<PostgresSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatastoreSettings {
    pub project_id: String,
    /// Override for the emulator; the production endpoint is the default.
    pub endpoint: Option<String>,
    /// Static bearer token attached to every request.
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: String,
}

impl Settings {
    pub fn load() -> eyre::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("bookshelf").required(false))
            .add_source(config::Environment::with_prefix("BOOKSHELF").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

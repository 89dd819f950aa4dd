//! HTTP client for the Datastore v1 REST endpoints used by this crate.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::datastore::wire::{
    CommitRequest, CommitResponse, LookupRequest, LookupResponse, RunQueryRequest,
    RunQueryResponse,
};
use crate::error::{BookStoreError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://datastore.googleapis.com";

/// Connection handle for one Datastore project.
///
/// Holds a single long-lived `reqwest::Client`; the handle is read-only
/// after construction and cheap to clone.
#[derive(Debug, Clone)]
pub struct DatastoreClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    auth_token: Option<String>,
}

impl DatastoreClient {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::with_endpoint(project_id, DEFAULT_ENDPOINT)
    }

    /// Point the client at a non-default endpoint, e.g. a local emulator.
    pub fn with_endpoint(project_id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            auth_token: None,
        }
    }

    /// Attach a static bearer token to every request.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub async fn commit(&self, request: &CommitRequest) -> Result<CommitResponse> {
        self.call("commit", request).await
    }

    pub async fn lookup(&self, request: &LookupRequest) -> Result<LookupResponse> {
        self.call("lookup", request).await
    }

    pub async fn run_query(&self, request: &RunQueryRequest) -> Result<RunQueryResponse> {
        self.call("runQuery", request).await
    }

    async fn call<Req, Resp>(&self, verb: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/v1/projects/{}:{}", self.endpoint, self.project_id, verb);
        tracing::debug!(%url, "datastore call");

        let mut builder = self.http.post(&url).json(request);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BookStoreError::BackendError {
                source: Some(eyre::eyre!("request to {url} failed: {e}")),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BookStoreError::RequestRejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| BookStoreError::DataConversionError {
                message: format!("malformed {verb} response"),
                source: Some(eyre::eyre!("{e}")),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trailing_slash_is_stripped() {
        let client = DatastoreClient::with_endpoint("demo", "http://localhost:8081/");
        assert_eq!(client.endpoint, "http://localhost:8081");
    }
}

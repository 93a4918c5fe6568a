//! Blocking HTTP client for Elasticsearch-compatible engines

use indexer_core::BulkOperation;
use reqwest::blocking::{Client, Response};
use serde_json::{json, Value};
use std::time::Duration;

use crate::client::{BulkResponse, SearchClient, SearchError, SearchResponse};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`SearchClient`] speaking the Elasticsearch REST API over HTTP
pub struct HttpSearchClient {
    base_url: String,
    http: Client,
}

impl HttpSearchClient {
    /// Creates a client for the engine at `base_url` (e.g. `http://localhost:9200`)
    pub fn new(base_url: impl Into<String>) -> Result<Self, SearchError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Turns non-2xx responses into [`SearchError::Status`]
    fn check(response: Response) -> Result<Response, SearchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(SearchError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Encodes operations as the newline-delimited body of a `_bulk` request
///
/// Each index operation is an action line followed by the document source;
/// each delete is a single action line. The body ends with a newline.
pub fn encode_bulk_body(index: &str, operations: &[BulkOperation]) -> String {
    let mut body = String::new();
    for op in operations {
        match op {
            BulkOperation::Index {
                id,
                document,
                indexed_at,
            } => {
                let action = json!({ "index": { "_index": index, "_id": id } });
                body.push_str(&action.to_string());
                body.push('\n');
                body.push_str(&document.to_source(indexed_at).to_string());
                body.push('\n');
            }
            BulkOperation::Delete { id } => {
                let action = json!({ "delete": { "_index": index, "_id": id } });
                body.push_str(&action.to_string());
                body.push('\n');
            }
        }
    }
    body
}

impl SearchClient for HttpSearchClient {
    fn bulk(&self, index: &str, operations: &[BulkOperation]) -> Result<BulkResponse, SearchError> {
        let body = encode_bulk_body(index, operations);
        log::debug!("POST _bulk with {} operations ({} bytes)", operations.len(), body.len());

        let response = self
            .http
            .post(self.url("_bulk"))
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()?;

        Self::check(response)?
            .json::<BulkResponse>()
            .map_err(|e| SearchError::Parse(e.to_string()))
    }

    fn search(&self, index: &str, payload: &Value) -> Result<SearchResponse, SearchError> {
        log::debug!("POST {}/_search: {}", index, payload);

        let response = self
            .http
            .post(self.url(&format!("{}/_search", index)))
            .json(payload)
            .send()?;

        Self::check(response)?
            .json::<SearchResponse>()
            .map_err(|e| SearchError::Parse(e.to_string()))
    }

    fn create_index(&self, index: &str, definition: &Value) -> Result<(), SearchError> {
        let response = self.http.put(self.url(index)).json(definition).send()?;
        Self::check(response)?;
        log::info!("Created index {}", index);
        Ok(())
    }
}

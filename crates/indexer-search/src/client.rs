//! Search engine client abstraction and its wire types

use indexer_core::{BulkOperation, CoreError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Errors returned by a [`SearchClient`]
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Search engine responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse search engine response: {0}")]
    Parse(String),

    #[error("{rejected} of {total} bulk operations rejected: {reason}")]
    Rejected {
        rejected: usize,
        total: usize,
        reason: String,
    },

    #[error(transparent)]
    Query(#[from] CoreError),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Transport(err.to_string())
    }
}

/// Operations the indexers and the query layer need from a search engine
///
/// Implementations must be shareable between threads; the indexers hold one
/// behind an `Arc` for the lifetime of the process.
pub trait SearchClient: Send + Sync {
    /// Sends all `operations` against `index` in a single bulk request
    fn bulk(&self, index: &str, operations: &[BulkOperation]) -> Result<BulkResponse, SearchError>;

    /// Runs a query payload against `index`
    fn search(&self, index: &str, payload: &Value) -> Result<SearchResponse, SearchError>;

    /// Creates `index` with the given settings and mappings
    fn create_index(&self, index: &str, definition: &Value) -> Result<(), SearchError>;
}

/// Response body of a bulk request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: u64,
    /// Set when at least one item failed
    #[serde(default)]
    pub errors: bool,
    /// One single-key map per operation, keyed by action (`index`, `delete`)
    #[serde(default)]
    pub items: Vec<HashMap<String, BulkItem>>,
}

/// Result of one operation inside a bulk request
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItem {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub error: Option<Value>,
}

impl BulkItem {
    /// A delete of a missing document answers 404 and is not a failure
    pub fn is_rejected(&self, action: &str) -> bool {
        if action == "delete" && self.status == 404 {
            return false;
        }
        self.error.is_some() || self.status >= 300
    }
}

impl BulkResponse {
    /// `(document id, reason)` for every rejected item
    pub fn rejected(&self) -> Vec<(String, String)> {
        self.items
            .iter()
            .flat_map(|item| item.iter())
            .filter(|(action, result)| result.is_rejected(action))
            .map(|(_, result)| {
                let reason = match &result.error {
                    Some(Value::Object(err)) => err
                        .get("reason")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| Value::Object(err.clone()).to_string()),
                    Some(other) => other.to_string(),
                    None => format!("status {}", result.status),
                };
                (result.id.clone(), reason)
            })
            .collect()
    }
}

/// Response body of a search request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub hits: Hits,
    #[serde(default)]
    pub aggregations: HashMap<String, Aggregation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub total: TotalHits,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Engines before 7.0 answer a bare number, later ones an object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl Default for TotalHits {
    fn default() -> Self {
        TotalHits::Count(0)
    }
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) | TotalHits::Object { value: n } => *n,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Value,
    #[serde(default)]
    pub highlight: HashMap<String, Vec<String>>,
}

/// A terms aggregation result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Aggregation {
    #[serde(default)]
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bucket {
    pub key: Value,
    pub doc_count: u64,
}

impl SearchResponse {
    pub fn total(&self) -> u64 {
        self.hits.total.value()
    }
}

//! In-memory search client for tests and dry runs

use indexer_core::BulkOperation;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use crate::client::{BulkItem, BulkResponse, SearchClient, SearchError, SearchResponse};

#[derive(Default)]
struct State {
    documents: BTreeMap<String, Value>,
    bulk_calls: Vec<Vec<BulkOperation>>,
    queries: Vec<Value>,
    responses: Vec<SearchResponse>,
    failing_calls: HashSet<usize>,
    indices: HashMap<String, Value>,
}

/// [`SearchClient`] keeping documents in a map keyed by document id
///
/// Every bulk call is recorded. Calls can be made to fail by position, and
/// search responses are served from a queue.
#[derive(Default)]
pub struct MemorySearchClient {
    state: Mutex<State>,
}

impl MemorySearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the `n`-th bulk call (0-based) fail with a transport error
    pub fn fail_bulk_call(&self, n: usize) {
        self.lock().failing_calls.insert(n);
    }

    /// Queues a response for the next search call
    pub fn push_response(&self, response: SearchResponse) {
        self.lock().responses.push(response);
    }

    /// Operations of every bulk call, in call order
    pub fn bulk_calls(&self) -> Vec<Vec<BulkOperation>> {
        self.lock().bulk_calls.clone()
    }

    /// Payloads of every search call, in call order
    pub fn queries(&self) -> Vec<Value> {
        self.lock().queries.clone()
    }

    /// Stored document sources keyed by id
    pub fn documents(&self) -> BTreeMap<String, Value> {
        self.lock().documents.clone()
    }

    pub fn document(&self, id: &str) -> Option<Value> {
        self.lock().documents.get(id).cloned()
    }

    pub fn index_definition(&self, index: &str) -> Option<Value> {
        self.lock().indices.get(index).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // a poisoned lock only means another test thread panicked
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SearchClient for MemorySearchClient {
    fn bulk(&self, _index: &str, operations: &[BulkOperation]) -> Result<BulkResponse, SearchError> {
        let mut state = self.lock();
        let call = state.bulk_calls.len();
        state.bulk_calls.push(operations.to_vec());

        if state.failing_calls.contains(&call) {
            return Err(SearchError::Transport(format!("bulk call {} refused", call)));
        }

        let mut items = Vec::with_capacity(operations.len());
        for op in operations {
            let (action, status) = match op {
                BulkOperation::Index {
                    id,
                    document,
                    indexed_at,
                } => {
                    let created = state
                        .documents
                        .insert(id.clone(), document.to_source(indexed_at))
                        .is_none();
                    ("index", if created { 201 } else { 200 })
                }
                BulkOperation::Delete { id } => {
                    let found = state.documents.remove(id).is_some();
                    ("delete", if found { 200 } else { 404 })
                }
            };
            let item = BulkItem {
                id: op.id().to_string(),
                status,
                error: None,
            };
            items.push(HashMap::from([(action.to_string(), item)]));
        }

        Ok(BulkResponse {
            took: 0,
            errors: false,
            items,
        })
    }

    fn search(&self, _index: &str, payload: &Value) -> Result<SearchResponse, SearchError> {
        let mut state = self.lock();
        state.queries.push(payload.clone());
        if state.responses.is_empty() {
            Ok(SearchResponse::default())
        } else {
            Ok(state.responses.remove(0))
        }
    }

    fn create_index(&self, index: &str, definition: &Value) -> Result<(), SearchError> {
        self.lock().indices.insert(index.to_string(), definition.clone());
        Ok(())
    }
}

//! Query execution and typed results

use indexer_core::{BlobDocument, CommitDocument, DocumentKind, IndexSettings, QuerySpec};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::client::{Hit, SearchClient, SearchError, SearchResponse};
use crate::query::{
    SearchQueryBuilder, BLOB_REPOSITORY_FACET, COMMIT_REPOSITORY_FACET, LANGUAGE_FACET,
};

/// One term of a facet and the number of matching documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetTerm {
    pub term: String,
    pub count: u64,
}

/// A matched document with its score and highlighted fragments
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<T> {
    pub id: String,
    pub score: Option<f64>,
    pub document: T,
    /// Field path → fragments wrapped in the highlight markers
    pub highlight: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlobResults {
    pub results: Vec<SearchHit<BlobDocument>>,
    pub total_count: u64,
    pub languages: Vec<FacetTerm>,
    pub repositories: Vec<FacetTerm>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitResults {
    pub results: Vec<SearchHit<CommitDocument>>,
    pub total_count: u64,
    pub repositories: Vec<FacetTerm>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileNameHit {
    pub id: String,
    pub score: Option<f64>,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileNameResults {
    pub results: Vec<FileNameHit>,
    pub total_count: u64,
}

/// Results of a combined search; a kind not searched stays `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub blobs: Option<BlobResults>,
    pub commits: Option<CommitResults>,
}

/// Runs queries built by [`SearchQueryBuilder`] through a [`SearchClient`]
pub struct Searcher {
    client: Arc<dyn SearchClient>,
    index_name: String,
    builder: SearchQueryBuilder,
}

impl Searcher {
    pub fn new(client: Arc<dyn SearchClient>, settings: &IndexSettings) -> Self {
        Self {
            client,
            index_name: settings.index_name.clone(),
            builder: SearchQueryBuilder::new(settings),
        }
    }

    /// Searches the kinds selected by `spec.kind`
    pub fn search(&self, spec: &QuerySpec) -> Result<SearchResults, SearchError> {
        let mut results = SearchResults::default();
        if spec.kind.includes_blobs() {
            results.blobs = Some(self.search_blobs(spec)?);
        }
        if spec.kind.includes_commits() {
            results.commits = Some(self.search_commits(spec)?);
        }
        Ok(results)
    }

    pub fn search_blobs(&self, spec: &QuerySpec) -> Result<BlobResults, SearchError> {
        let payload = self.builder.blob_query(spec)?;
        let response = self.client.search(&self.index_name, &payload)?;

        Ok(BlobResults {
            total_count: response.total(),
            languages: facet_terms(&response, LANGUAGE_FACET),
            repositories: facet_terms(&response, BLOB_REPOSITORY_FACET),
            results: typed_hits(response.hits.hits, DocumentKind::Blob),
        })
    }

    pub fn search_commits(&self, spec: &QuerySpec) -> Result<CommitResults, SearchError> {
        let payload = self.builder.commit_query(spec)?;
        let response = self.client.search(&self.index_name, &payload)?;

        Ok(CommitResults {
            total_count: response.total(),
            repositories: facet_terms(&response, COMMIT_REPOSITORY_FACET),
            results: typed_hits(response.hits.hits, DocumentKind::Commit),
        })
    }

    pub fn search_file_names(&self, spec: &QuerySpec) -> Result<FileNameResults, SearchError> {
        let payload = self.builder.filename_query(spec)?;
        let response = self.client.search(&self.index_name, &payload)?;
        let total_count = response.total();

        let results = response
            .hits
            .hits
            .into_iter()
            .filter_map(|hit| {
                let path = hit.source.pointer("/blob/path")?.as_str()?.to_string();
                Some(FileNameHit {
                    id: hit.id,
                    score: hit.score,
                    path,
                })
            })
            .collect();

        Ok(FileNameResults {
            results,
            total_count,
        })
    }
}

fn facet_terms(response: &SearchResponse, name: &str) -> Vec<FacetTerm> {
    response
        .aggregations
        .get(name)
        .map(|agg| {
            agg.buckets
                .iter()
                .map(|bucket| FacetTerm {
                    term: match &bucket.key {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    },
                    count: bucket.doc_count,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Deserializes the nested `<kind>` object of each hit
///
/// Hits whose source does not match the document shape are skipped.
fn typed_hits<T: DeserializeOwned>(hits: Vec<Hit>, kind: DocumentKind) -> Vec<SearchHit<T>> {
    hits.into_iter()
        .filter_map(|hit| {
            let fields = hit.source.get(kind.as_str())?.clone();
            match serde_json::from_value::<T>(fields) {
                Ok(document) => Some(SearchHit {
                    id: hit.id,
                    score: hit.score,
                    document,
                    highlight: hit.highlight,
                }),
                Err(e) => {
                    log::warn!("Skipping {} hit {}: {}", kind, hit.id, e);
                    None
                }
            }
        })
        .collect()
}

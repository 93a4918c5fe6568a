//! Indexer Search - Search engine side of repository indexing
//!
//! This crate owns everything that talks to the search engine:
//! - the [`SearchClient`] abstraction and its blocking HTTP implementation
//! - best-effort batch submission of index mutations ([`BulkSubmitter`])
//! - query payloads for blob, commit and filename search ([`SearchQueryBuilder`])
//! - query execution with typed results ([`Searcher`])
//! - settings and mappings of the shared index

mod bulk;
mod client;
mod http;
mod mapping;
mod memory;
mod query;
mod search;

pub use bulk::{BatchOutcome, BulkSubmitter, SubmitReport};
pub use client::{
    Aggregation, Bucket, BulkItem, BulkResponse, Hit, Hits, SearchClient, SearchError,
    SearchResponse, TotalHits,
};
pub use http::{encode_bulk_body, HttpSearchClient, DEFAULT_TIMEOUT};
pub use mapping::{index_definition, COMMIT_TIME_FORMAT};
pub use memory::MemorySearchClient;
pub use query::{
    SearchQueryBuilder, BLOB_REPOSITORY_FACET, COMMIT_REPOSITORY_FACET, HIGHLIGHT_POST_TAG,
    HIGHLIGHT_PRE_TAG, LANGUAGE_FACET,
};
pub use search::{
    BlobResults, CommitResults, FacetTerm, FileNameHit, FileNameResults, SearchHit, SearchResults,
    Searcher,
};

//! Error types for indexer-core

/// Errors specific to indexer-core
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unknown search kind: {0} (expected all, blob or commit)")]
    UnknownKind(String),

    #[error("Unknown sort order: {0} (expected default, recently_indexed or last_indexed)")]
    UnknownOrder(String),
}

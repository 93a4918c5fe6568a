//! Indexer Core - Shared data models for repository search indexing
//!
//! This crate defines the value types passed between the git side and the
//! search side of the project: repository ids and revisions, the blob and
//! commit documents written to the index, bulk mutations, query parameters
//! and the settings every component is constructed with.

mod error;
mod models;
mod query;
mod settings;

pub use error::CoreError;
pub use models::{
    blob_document_id, BlobDocument, BulkOperation, CommitDocument, Document, DocumentKind,
    RepositoryId, Revision, Signature,
};
pub use query::{QuerySpec, SearchKind, SortOrder, DEFAULT_PER_PAGE};
pub use settings::{IndexSettings, BASE_INDEX_NAME, BATCH_SIZE, MAX_BLOB_SIZE};

#[cfg(test)]
mod tests {
    use super::*;

    fn blob() -> BlobDocument {
        BlobDocument {
            rid: "42".to_string(),
            oid: "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".to_string(),
            commit_sha: "abc1234567890abcdef01234567890abcdef0123".to_string(),
            path: "app/models/user.rb".to_string(),
            content: "class User\nend\n".to_string(),
            language: "Ruby".to_string(),
        }
    }

    #[test]
    fn test_blob_document_id() {
        assert_eq!(blob().document_id(), "42_app/models/user.rb");
    }

    #[test]
    fn test_index_operation_uses_document_id() {
        let op = BulkOperation::index(blob());
        assert_eq!(op.id(), "42_app/models/user.rb");
        assert!(!op.is_delete());
    }
}

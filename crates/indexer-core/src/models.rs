//! Core data models for the indexer

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Repository identifier stored in the `rid` field of every document
///
/// Many repositories share one index; this value is what tells their
/// documents apart. It is assigned by the caller and must stay stable for the
/// lifetime of the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryId(String);

impl RepositoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A commit identifier, or the all-zero sentinel of a never-indexed branch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    /// Sentinel pushed by git hooks when a branch is created
    pub const NEW_BRANCH: &'static str = "0000000000000000000000000000000000000000";

    pub fn new(rev: impl Into<String>) -> Self {
        Self(rev.into())
    }

    pub fn new_branch() -> Self {
        Self(Self::NEW_BRANCH.to_string())
    }

    /// True for the all-zero sentinel
    pub fn is_new_branch(&self) -> bool {
        self.0 == Self::NEW_BRANCH
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 characters, for log lines
    pub fn short(&self) -> &str {
        let end = self.0.char_indices().nth(8).map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Revision {
    fn from(rev: &str) -> Self {
        Self::new(rev)
    }
}

impl From<String> for Revision {
    fn from(rev: String) -> Self {
        Self(rev)
    }
}

/// The two kinds of document living in the shared index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Blob,
    Commit,
}

impl DocumentKind {
    /// Value of the `type` field, also the key the fields are nested under
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Blob => "blob",
            DocumentKind::Commit => "commit",
        }
    }

    /// Fully qualified field path, e.g. `blob.rid`
    pub fn field(self, name: &str) -> String {
        format!("{}.{}", self.as_str(), name)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single blob at a point in history
///
/// Keyed by repository and path, so a changed file replaces its previous
/// document instead of adding a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobDocument {
    pub rid: String,
    pub oid: String,
    pub commit_sha: String,
    pub path: String,
    pub content: String,
    pub language: String,
}

impl BlobDocument {
    /// Document id: `<rid>_<path>`
    pub fn document_id(&self) -> String {
        blob_document_id(&self.rid, &self.path)
    }
}

/// Document id for the blob at `path`, usable when only the path is known
pub fn blob_document_id(rid: &str, path: &str) -> String {
    format!("{}_{}", rid, path)
}

/// Author or committer of a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
    /// `basic_date_time_no_millis`, e.g. `20240131T154210+0100`
    pub time: String,
}

/// A single commit; immutable once written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDocument {
    pub rid: String,
    pub sha: String,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
}

impl CommitDocument {
    /// Document id: `<rid>_<sha>`
    pub fn document_id(&self) -> String {
        format!("{}_{}", self.rid, self.sha)
    }
}

/// Either kind of document, ready to be written to the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Blob(BlobDocument),
    Commit(CommitDocument),
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Blob(_) => DocumentKind::Blob,
            Document::Commit(_) => DocumentKind::Commit,
        }
    }

    pub fn document_id(&self) -> String {
        match self {
            Document::Blob(blob) => blob.document_id(),
            Document::Commit(commit) => commit.document_id(),
        }
    }

    /// Body sent to the search engine
    ///
    /// Fields are nested under the kind name and tagged with `type`:
    /// `{"type": "blob", "blob": {...}, "indexed_at": "..."}`.
    pub fn to_source(&self, indexed_at: &str) -> Value {
        let fields = match self {
            Document::Blob(blob) => json!(blob),
            Document::Commit(commit) => json!(commit),
        };
        let kind = self.kind().as_str();
        let mut source = Map::new();
        source.insert("type".to_string(), Value::from(kind));
        source.insert(kind.to_string(), fields);
        source.insert("indexed_at".to_string(), Value::from(indexed_at));
        Value::Object(source)
    }
}

impl From<BlobDocument> for Document {
    fn from(blob: BlobDocument) -> Self {
        Document::Blob(blob)
    }
}

impl From<CommitDocument> for Document {
    fn from(commit: CommitDocument) -> Self {
        Document::Commit(commit)
    }
}

/// One mutation inside a bulk request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOperation {
    /// Create or wholesale replace a document
    Index {
        id: String,
        document: Document,
        indexed_at: String,
    },
    /// Remove a document; a missing document is not an error
    Delete { id: String },
}

impl BulkOperation {
    /// Index mutation stamped with the current time
    pub fn index(document: impl Into<Document>) -> Self {
        let document = document.into();
        Self::Index {
            id: document.document_id(),
            document,
            indexed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Self::Delete { id: id.into() }
    }

    pub fn id(&self) -> &str {
        match self {
            BulkOperation::Index { id, .. } | BulkOperation::Delete { id } => id,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, BulkOperation::Delete { .. })
    }
}

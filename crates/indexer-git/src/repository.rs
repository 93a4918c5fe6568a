//! Capabilities the indexers need from a git repository

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use indexer_core::Revision;

/// File mode of a submodule link (gitlink)
pub const GITLINK_MODE: u32 = 0o160000;

/// Change status of a path between two revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    TypeChange,
    Other,
}

/// One side of a change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSide {
    pub path: String,
    pub mode: u32,
    pub oid: String,
}

impl FileSide {
    pub fn is_gitlink(&self) -> bool {
        self.mode == GITLINK_MODE
    }
}

/// A single path's change between two revisions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub status: ChangeStatus,
    pub old_file: Option<FileSide>,
    pub new_file: Option<FileSide>,
}

/// Blob metadata and content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobInfo {
    pub oid: String,
    pub path: String,
    pub size: u64,
    pub is_text: bool,
    /// Best-effort language name, `None` when unknown
    pub language: Option<String>,
    /// Raw bytes; left empty for binary blobs and blobs over the lookup's
    /// content limit
    pub content: Vec<u8>,
}

/// Author or committer as stored in the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInfo {
    pub name: String,
    pub email: String,
    pub time: DateTime<FixedOffset>,
}

/// A commit with its raw message bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub author: SignatureInfo,
    pub committer: SignatureInfo,
    pub message: Vec<u8>,
    /// Value of the commit's `encoding` header, if any
    pub message_encoding: Option<String>,
}

/// Read-only access to a repository's history
///
/// `from = None` always means "from the beginning of history".
pub trait GitRepository {
    /// Changed paths between `from` (or the empty tree) and `to`
    fn diff(&self, from: Option<&Revision>, to: &Revision) -> Result<Vec<ChangeRecord>>;

    /// Commits reachable from `to` and not from `from`
    fn commit_range<'a>(
        &'a self,
        from: Option<&Revision>,
        to: &Revision,
    ) -> Result<Box<dyn Iterator<Item = Result<CommitInfo>> + 'a>>;

    /// Nearest common ancestor of `a` and `b`
    fn merge_base(&self, a: &Revision, b: &Revision) -> Result<Revision>;

    /// Commit the repository's HEAD points to
    fn current_tip(&self) -> Result<Revision>;

    /// Blob referenced by one side of a change
    ///
    /// Content is only loaded for text blobs smaller than `content_limit`
    /// bytes; metadata is always filled in.
    fn blob(&self, side: &FileSide, content_limit: u64) -> Result<BlobInfo>;
}

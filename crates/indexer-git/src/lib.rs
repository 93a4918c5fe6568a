//! Indexer Git - turns repository history into search documents
//!
//! This crate is responsible for:
//! - Resolving the revision range a run should cover
//! - Diffing trees and mapping changed blobs to index and delete mutations
//! - Walking commit ranges and mapping commits to documents
//! - Handing everything to the bulk submitter in fixed-size batches

mod blobs;
mod commits;
mod encoding;
mod git;
mod indexer;
mod language;
mod range;
mod repository;
mod stats;

pub use blobs::{BlobDiffIndexer, FALLBACK_LANGUAGE};
pub use commits::{commit_document, CommitLogIndexer, COMMIT_TIME_PATTERN};
pub use encoding::force_utf8;
pub use git::Git2Repository;
pub use indexer::{IndexScope, RepositoryIndexer, RunReport};
pub use language::detect_language;
pub use range::{resolve_range, RevisionRange};
pub use repository::{
    BlobInfo, ChangeRecord, ChangeStatus, CommitInfo, FileSide, GitRepository, SignatureInfo,
    GITLINK_MODE,
};
pub use stats::IndexStats;

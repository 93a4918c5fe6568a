//! Blob indexing from the diff between two revisions

use anyhow::Result;
use indexer_core::{
    blob_document_id, BlobDocument, BulkOperation, IndexSettings, RepositoryId, Revision,
};
use indexer_search::{BulkSubmitter, SearchClient};
use std::sync::Arc;
use std::time::Instant;

use crate::repository::{BlobInfo, ChangeRecord, ChangeStatus, FileSide, GitRepository};
use crate::stats::IndexStats;

/// Language recorded when detection finds nothing
pub const FALLBACK_LANGUAGE: &str = "Text";

/// Turns the diff between two revisions into blob mutations
///
/// Added and modified text blobs below the size limit are (re)indexed under
/// their path; deleted text blobs are removed. Submodule links and binary or
/// oversized blobs never produce a mutation.
pub struct BlobDiffIndexer {
    submitter: BulkSubmitter,
    max_blob_size: u64,
}

/// What a single change record turns into
enum Classified {
    Index(BulkOperation),
    Delete(BulkOperation),
    Skip,
}

impl BlobDiffIndexer {
    pub fn new(client: Arc<dyn SearchClient>, settings: &IndexSettings) -> Self {
        Self {
            submitter: BulkSubmitter::new(client, settings),
            max_blob_size: settings.max_blob_size,
        }
    }

    /// Indexes every blob change in `from..to` (`from = None`: the whole tree)
    ///
    /// Git errors while computing the diff are returned; failing bulk batches
    /// are logged and recorded in the returned statistics.
    pub fn index_blobs<R>(
        &self,
        rid: &RepositoryId,
        repo: &R,
        from: Option<&Revision>,
        to: &Revision,
    ) -> Result<IndexStats>
    where
        R: GitRepository + ?Sized,
    {
        let start_time = Instant::now();
        let changes = repo.diff(from, to)?;
        log::info!(
            "Indexing blobs of repository {}: {} changes in {}..{}",
            rid,
            changes.len(),
            from.map_or("(root)", Revision::short),
            to.short()
        );

        let mut stats = IndexStats::default();
        let operations = changes.iter().map(|change| {
            stats.scanned += 1;
            match self.classify(rid, repo, change, to) {
                Classified::Index(op) => {
                    stats.indexed += 1;
                    Some(op)
                }
                Classified::Delete(op) => {
                    stats.deleted += 1;
                    Some(op)
                }
                Classified::Skip => {
                    stats.skipped += 1;
                    None
                }
            }
        });
        let report = self.submitter.submit_all(rid, operations);

        stats.submit = report;
        stats.elapsed_time = start_time.elapsed();
        log::info!("Blobs of repository {}: {}", rid, stats);
        Ok(stats)
    }

    fn classify<R>(&self, rid: &RepositoryId, repo: &R, change: &ChangeRecord, to: &Revision) -> Classified
    where
        R: GitRepository + ?Sized,
    {
        if change.status == ChangeStatus::Deleted {
            let Some(old) = change.old_file.as_ref().filter(|side| !side.is_gitlink()) else {
                return Classified::Skip;
            };
            // binary blobs were never indexed, so there is nothing to delete
            match lookup(repo, old, 0) {
                Some(blob) if blob.is_text => {
                    log::debug!("Deleting {}", old.path);
                    Classified::Delete(BulkOperation::delete(blob_document_id(rid.as_str(), &old.path)))
                }
                _ => Classified::Skip,
            }
        } else {
            let Some(new) = change.new_file.as_ref().filter(|side| !side.is_gitlink()) else {
                return Classified::Skip;
            };
            match lookup(repo, new, self.max_blob_size) {
                Some(blob) if self.can_index(&blob) => {
                    log::debug!("Indexing {} ({} bytes)", new.path, blob.size);
                    Classified::Index(BulkOperation::index(blob_document(rid, blob, to)))
                }
                _ => Classified::Skip,
            }
        }
    }

    /// Text blobs strictly below the size limit
    pub fn can_index(&self, blob: &BlobInfo) -> bool {
        blob.is_text && blob.size < self.max_blob_size
    }
}

fn lookup<R>(repo: &R, side: &FileSide, content_limit: u64) -> Option<BlobInfo>
where
    R: GitRepository + ?Sized,
{
    match repo.blob(side, content_limit) {
        Ok(blob) => Some(blob),
        Err(e) => {
            log::warn!("Skipping blob {}: {:#}", side.path, e);
            None
        }
    }
}

fn blob_document(rid: &RepositoryId, blob: BlobInfo, to: &Revision) -> BlobDocument {
    BlobDocument {
        rid: rid.to_string(),
        oid: blob.oid,
        commit_sha: to.to_string(),
        path: blob.path,
        content: String::from_utf8_lossy(&blob.content).into_owned(),
        language: blob.language.unwrap_or_else(|| FALLBACK_LANGUAGE.to_string()),
    }
}

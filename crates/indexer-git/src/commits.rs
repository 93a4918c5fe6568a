//! Commit indexing over a revision range

use anyhow::Result;
use indexer_core::{BulkOperation, CommitDocument, IndexSettings, RepositoryId, Revision, Signature};
use indexer_search::{BulkSubmitter, SearchClient};
use std::sync::Arc;
use std::time::Instant;

use crate::encoding::force_utf8;
use crate::repository::{CommitInfo, GitRepository, SignatureInfo};
use crate::stats::IndexStats;

/// `strftime` pattern matching the index's `basic_date_time_no_millis` format
pub const COMMIT_TIME_PATTERN: &str = "%Y%m%dT%H%M%S%z";

/// Indexes every commit in a range as a commit document
pub struct CommitLogIndexer {
    submitter: BulkSubmitter,
}

impl CommitLogIndexer {
    pub fn new(client: Arc<dyn SearchClient>, settings: &IndexSettings) -> Self {
        Self {
            submitter: BulkSubmitter::new(client, settings),
        }
    }

    /// Indexes the commits reachable from `to` and not from `from`
    ///
    /// Commits are walked newest first. A commit that cannot be read is
    /// logged and skipped; errors setting up the walk are returned.
    pub fn index_commits<R>(
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
        let commits = repo.commit_range(from, to)?;
        log::info!(
            "Indexing commits of repository {} in {}..{}",
            rid,
            from.map_or("(root)", Revision::short),
            to.short()
        );

        let mut stats = IndexStats::default();
        let operations = commits.map(|commit| {
            stats.scanned += 1;
            match commit {
                Ok(commit) => {
                    stats.indexed += 1;
                    Some(BulkOperation::index(commit_document(rid, commit)))
                }
                Err(e) => {
                    log::warn!("Skipping unreadable commit in repository {}: {:#}", rid, e);
                    stats.skipped += 1;
                    None
                }
            }
        });
        let report = self.submitter.submit_all(rid, operations);

        stats.submit = report;
        stats.elapsed_time = start_time.elapsed();
        log::info!("Commits of repository {}: {}", rid, stats);
        Ok(stats)
    }
}

/// Builds the document for one commit
pub fn commit_document(rid: &RepositoryId, commit: CommitInfo) -> CommitDocument {
    CommitDocument {
        rid: rid.to_string(),
        sha: commit.sha,
        author: signature(commit.author),
        committer: signature(commit.committer),
        message: force_utf8(&commit.message, commit.message_encoding.as_deref()),
    }
}

fn signature(info: SignatureInfo) -> Signature {
    Signature {
        name: info.name,
        email: info.email,
        time: info.time.format(COMMIT_TIME_PATTERN).to_string(),
    }
}

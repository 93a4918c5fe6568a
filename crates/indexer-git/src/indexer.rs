//! Main indexer structure

use anyhow::Result;
use indexer_core::{IndexSettings, RepositoryId, Revision};
use indexer_search::SearchClient;
use std::sync::Arc;

use crate::blobs::BlobDiffIndexer;
use crate::commits::CommitLogIndexer;
use crate::range::{resolve_range, RevisionRange};
use crate::repository::GitRepository;
use crate::stats::IndexStats;

/// Which document kinds a run indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexScope {
    #[default]
    All,
    BlobsOnly,
    CommitsOnly,
}

impl IndexScope {
    fn blobs(self) -> bool {
        self != IndexScope::CommitsOnly
    }

    fn commits(self) -> bool {
        self != IndexScope::BlobsOnly
    }
}

/// Result of one repository run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub range: RevisionRange,
    pub blobs: Option<IndexStats>,
    pub commits: Option<IndexStats>,
}

impl RunReport {
    /// True when every submitted batch was accepted
    pub fn is_complete(&self) -> bool {
        self.blobs.iter().chain(self.commits.iter()).all(IndexStats::is_complete)
    }
}

/// Resolves the range to index and runs both indexers over it
pub struct RepositoryIndexer {
    blobs: BlobDiffIndexer,
    commits: CommitLogIndexer,
}

impl RepositoryIndexer {
    pub fn new(client: Arc<dyn SearchClient>, settings: &IndexSettings) -> Self {
        Self {
            blobs: BlobDiffIndexer::new(Arc::clone(&client), settings),
            commits: CommitLogIndexer::new(client, settings),
        }
    }

    /// Indexes `repo` up to `target`, given the last indexed revision
    ///
    /// `prior` may be the new-branch sentinel; `None` indexes all history.
    pub fn index_repository<R>(
        &self,
        rid: &RepositoryId,
        repo: &R,
        prior: Option<&Revision>,
        target: &Revision,
        scope: IndexScope,
    ) -> Result<RunReport>
    where
        R: GitRepository + ?Sized,
    {
        let range = resolve_range(repo, prior, target)?;

        let blobs = if scope.blobs() {
            Some(self.blobs.index_blobs(rid, repo, range.from.as_ref(), &range.to)?)
        } else {
            None
        };
        let commits = if scope.commits() {
            Some(self.commits.index_commits(rid, repo, range.from.as_ref(), &range.to)?)
        } else {
            None
        };

        Ok(RunReport {
            range,
            blobs,
            commits,
        })
    }
}

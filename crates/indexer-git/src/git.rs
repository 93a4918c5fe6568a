//! `GitRepository` implementation backed by libgit2

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{Commit, Delta, DiffFile, DiffOptions, Oid, Repository, Sort};
use indexer_core::Revision;
use std::path::Path;

use crate::language::detect_language;
use crate::repository::{
    BlobInfo, ChangeRecord, ChangeStatus, CommitInfo, FileSide, GitRepository, SignatureInfo,
};

/// A repository opened with `git2`
pub struct Git2Repository {
    repo: Repository,
}

impl Git2Repository {
    /// Opens the repository at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path.as_ref())
            .with_context(|| format!("Failed to open repository at {:?}", path.as_ref()))?;
        Ok(Self { repo })
    }

    /// Resolves any revspec (`HEAD`, a branch, a short sha) to a full commit id
    pub fn resolve(&self, spec: &str) -> Result<Revision> {
        let commit = self
            .repo
            .revparse_single(spec)
            .and_then(|obj| obj.peel_to_commit())
            .with_context(|| format!("Failed to resolve revision {}", spec))?;
        Ok(Revision::new(commit.id().to_string()))
    }

    fn find_commit(&self, rev: &Revision) -> Result<Commit<'_>> {
        let oid = Oid::from_str(rev.as_str())
            .with_context(|| format!("Invalid commit SHA {}", rev))?;
        self.repo
            .find_commit(oid)
            .with_context(|| format!("Failed to find commit {}", rev))
    }
}

fn change_status(delta: Delta) -> ChangeStatus {
    match delta {
        Delta::Added => ChangeStatus::Added,
        Delta::Modified => ChangeStatus::Modified,
        Delta::Deleted => ChangeStatus::Deleted,
        Delta::Renamed => ChangeStatus::Renamed,
        Delta::Copied => ChangeStatus::Copied,
        Delta::Typechange => ChangeStatus::TypeChange,
        _ => ChangeStatus::Other,
    }
}

fn file_side(file: &DiffFile<'_>) -> Option<FileSide> {
    if !file.exists() {
        return None;
    }
    let path = file.path()?.to_string_lossy().into_owned();
    Some(FileSide {
        path,
        mode: u32::from(file.mode()),
        oid: file.id().to_string(),
    })
}

fn signature_info(sig: &git2::Signature<'_>) -> SignatureInfo {
    let when = sig.when();
    let offset = FixedOffset::east_opt(when.offset_minutes() * 60)
        .unwrap_or_else(|| Utc.fix());
    let time = DateTime::<Utc>::from_timestamp(when.seconds(), 0)
        .unwrap_or_default()
        .with_timezone(&offset);

    SignatureInfo {
        name: String::from_utf8_lossy(sig.name_bytes()).into_owned(),
        email: String::from_utf8_lossy(sig.email_bytes()).into_owned(),
        time,
    }
}

fn commit_info(commit: &Commit<'_>) -> CommitInfo {
    CommitInfo {
        sha: commit.id().to_string(),
        author: signature_info(&commit.author()),
        committer: signature_info(&commit.committer()),
        message: commit.message_raw_bytes().to_vec(),
        message_encoding: commit.message_encoding().map(str::to_string),
    }
}

impl GitRepository for Git2Repository {
    fn diff(&self, from: Option<&Revision>, to: &Revision) -> Result<Vec<ChangeRecord>> {
        let to_tree = self
            .find_commit(to)?
            .tree()
            .context("Failed to get commit tree")?;
        let from_tree = match from {
            Some(rev) => Some(self.find_commit(rev)?.tree().context("Failed to get commit tree")?),
            None => None,
        };

        let mut opts = DiffOptions::new();
        opts.include_typechange(true);
        let diff = self
            .repo
            .diff_tree_to_tree(from_tree.as_ref(), Some(&to_tree), Some(&mut opts))
            .context("Failed to diff trees")?;

        Ok(diff
            .deltas()
            .map(|delta| ChangeRecord {
                status: change_status(delta.status()),
                old_file: file_side(&delta.old_file()),
                new_file: file_side(&delta.new_file()),
            })
            .collect())
    }

    fn commit_range<'a>(
        &'a self,
        from: Option<&Revision>,
        to: &Revision,
    ) -> Result<Box<dyn Iterator<Item = Result<CommitInfo>> + 'a>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(self.find_commit(to)?.id())?;
        if let Some(from) = from {
            revwalk.hide(self.find_commit(from)?.id())?;
        }
        revwalk.set_sorting(Sort::TIME)?;

        let repo = &self.repo;
        Ok(Box::new(revwalk.map(move |oid_result| {
            let oid = oid_result.context("Failed to get commit OID")?;
            let commit = repo.find_commit(oid).context("Failed to find commit")?;
            Ok(commit_info(&commit))
        })))
    }

    fn merge_base(&self, a: &Revision, b: &Revision) -> Result<Revision> {
        let a = self.find_commit(a)?.id();
        let b = self.find_commit(b)?.id();
        let base = self
            .repo
            .merge_base(a, b)
            .with_context(|| format!("No merge base between {} and {}", a, b))?;
        Ok(Revision::new(base.to_string()))
    }

    fn current_tip(&self) -> Result<Revision> {
        let head = self.repo.head().context("Failed to read HEAD")?;
        let commit = head.peel_to_commit().context("HEAD does not point to a commit")?;
        Ok(Revision::new(commit.id().to_string()))
    }

    fn blob(&self, side: &FileSide, content_limit: u64) -> Result<BlobInfo> {
        let oid = Oid::from_str(&side.oid)?;
        let blob = self
            .repo
            .find_blob(oid)
            .with_context(|| format!("Failed to find blob {} ({})", side.oid, side.path))?;

        let size = blob.size() as u64;
        let is_text = !blob.is_binary();
        let content = if is_text && size < content_limit {
            blob.content().to_vec()
        } else {
            Vec::new()
        };

        Ok(BlobInfo {
            oid: side.oid.clone(),
            path: side.path.clone(),
            size,
            is_text,
            language: detect_language(&side.path).map(str::to_string),
            content,
        })
    }
}

//! Throwaway git repositories for integration tests

#![allow(dead_code)]

use git2::{Oid, Repository, Signature, Time};
use indexer_core::{IndexSettings, Revision};
use indexer_git::Git2Repository;
use indexer_search::MemorySearchClient;
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;

const FILE_MODE: i32 = 0o100644;
const TREE_MODE: i32 = 0o040000;
const GITLINK_MODE: i32 = 0o160000;

/// Repository in a temporary directory whose commits are built from an
/// in-memory file list, so no working tree is involved
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
    files: BTreeMap<String, (Oid, i32)>,
    clock: i64,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        Self {
            dir,
            repo,
            files: BTreeMap::new(),
            clock: 1_700_000_000,
        }
    }

    pub fn write(&mut self, path: &str, content: &[u8]) -> &mut Self {
        let oid = self.repo.blob(content).unwrap();
        self.files.insert(path.to_string(), (oid, FILE_MODE));
        self
    }

    pub fn remove(&mut self, path: &str) -> &mut Self {
        self.files.remove(path);
        self
    }

    /// Adds a submodule entry pointing at `target`
    pub fn gitlink(&mut self, path: &str, target: &Revision) -> &mut Self {
        let oid = Oid::from_str(target.as_str()).unwrap();
        self.files.insert(path.to_string(), (oid, GITLINK_MODE));
        self
    }

    /// Commits the current file list on top of HEAD and moves HEAD
    pub fn commit(&mut self, message: &str) -> Revision {
        let parents: Vec<Revision> = self.head().into_iter().collect();
        self.commit_to(Some("HEAD"), &parents, message)
    }

    /// Commits the current file list on `branch` with the given parents,
    /// leaving HEAD alone
    pub fn commit_on(&mut self, branch: &str, parents: &[Revision], message: &str) -> Revision {
        let refname = format!("refs/heads/{}", branch);
        self.commit_to(Some(&refname), parents, message)
    }

    /// Writes a commit whose message is ISO-8859-1 encoded and declared so
    /// in its `encoding` header, then moves HEAD to it
    pub fn commit_latin1(&mut self, message: &[u8]) -> Revision {
        let tree = self.write_tree();
        let parent = self.head().unwrap();
        self.clock += 60;
        let mut raw = Vec::new();
        raw.extend_from_slice(format!("tree {}\nparent {}\n", tree, parent).as_bytes());
        for role in ["author", "committer"] {
            raw.extend_from_slice(
                format!("{} Tester <tester@example.com> {} +0000\n", role, self.clock).as_bytes(),
            );
        }
        raw.extend_from_slice(b"encoding ISO-8859-1\n\n");
        raw.extend_from_slice(message);

        let oid = self.repo.odb().unwrap().write(git2::ObjectType::Commit, &raw).unwrap();
        let head = self.repo.head().unwrap();
        let refname = head.name().unwrap().to_string();
        self.repo.reference(&refname, oid, true, "latin1 commit").unwrap();
        Revision::new(oid.to_string())
    }

    pub fn head(&self) -> Option<Revision> {
        let head = self.repo.head().ok()?;
        Some(Revision::new(head.peel_to_commit().ok()?.id().to_string()))
    }

    pub fn open(&self) -> Git2Repository {
        Git2Repository::open(self.dir.path()).unwrap()
    }

    fn commit_to(&mut self, refname: Option<&str>, parents: &[Revision], message: &str) -> Revision {
        let tree_oid = self.write_tree();
        let tree = self.repo.find_tree(tree_oid).unwrap();
        let parents: Vec<git2::Commit<'_>> = parents
            .iter()
            .map(|rev| self.repo.find_commit(Oid::from_str(rev.as_str()).unwrap()).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

        self.clock += 60;
        let sig = Signature::new("Tester", "tester@example.com", &Time::new(self.clock, 60)).unwrap();
        let oid = self
            .repo
            .commit(refname, &sig, &sig, message, &tree, &parent_refs)
            .unwrap();
        Revision::new(oid.to_string())
    }

    fn write_tree(&self) -> Oid {
        build_tree(&self.repo, &self.files)
    }
}

fn build_tree(repo: &Repository, entries: &BTreeMap<String, (Oid, i32)>) -> Oid {
    let mut builder = repo.treebuilder(None).unwrap();
    let mut dirs: BTreeMap<String, BTreeMap<String, (Oid, i32)>> = BTreeMap::new();

    for (path, &(oid, mode)) in entries {
        match path.split_once('/') {
            Some((dir, rest)) => {
                dirs.entry(dir.to_string())
                    .or_default()
                    .insert(rest.to_string(), (oid, mode));
            }
            None => {
                builder.insert(path, oid, mode).unwrap();
            }
        }
    }
    for (dir, children) in &dirs {
        let oid = build_tree(repo, children);
        builder.insert(dir, oid, TREE_MODE).unwrap();
    }

    builder.write().unwrap()
}

pub fn memory_client() -> Arc<MemorySearchClient> {
    Arc::new(MemorySearchClient::new())
}

pub fn settings() -> IndexSettings {
    IndexSettings::default()
}

//! Tests for commit range indexing against real repositories

mod common;

use common::{memory_client, settings, TestRepo};
use indexer_core::RepositoryId;
use indexer_git::{CommitLogIndexer, GitRepository};

fn rid() -> RepositoryId {
    RepositoryId::new("42")
}

#[test]
fn test_whole_history_and_partial_range() {
    let mut repo = TestRepo::new();
    repo.write("a.txt", b"1\n");
    let first = repo.commit("First");
    repo.write("a.txt", b"2\n");
    let second = repo.commit("Second");
    repo.write("a.txt", b"3\n");
    let third = repo.commit("Third");

    let client = memory_client();
    let indexer = CommitLogIndexer::new(client.clone(), &settings());
    let git = repo.open();

    let all = indexer.index_commits(&rid(), &git, None, &third).unwrap();
    assert_eq!(all.indexed, 3);

    let partial = indexer.index_commits(&rid(), &git, Some(&first), &third).unwrap();
    assert_eq!(partial.indexed, 2);

    let ids: Vec<String> = client.bulk_calls()[1].iter().map(|op| op.id().to_string()).collect();
    assert_eq!(
        ids,
        vec![format!("42_{}", third), format!("42_{}", second)],
        "newest commit first"
    );
    assert_eq!(client.documents().len(), 3, "rerun overwrote the same ids");
}

#[test]
fn test_commit_document_layout() {
    let mut repo = TestRepo::new();
    repo.write("a.txt", b"1\n");
    let tip = repo.commit("Fix bug in parser\n\nLonger description");

    let client = memory_client();
    let indexer = CommitLogIndexer::new(client.clone(), &settings());
    indexer.index_commits(&rid(), &repo.open(), None, &tip).unwrap();

    let doc = client.document(&format!("42_{}", tip)).unwrap();
    assert_eq!(doc["type"], "commit");
    assert_eq!(doc["commit"]["rid"], "42");
    assert_eq!(doc["commit"]["sha"], tip.as_str());
    assert_eq!(doc["commit"]["message"], "Fix bug in parser\n\nLonger description");
    assert_eq!(doc["commit"]["author"]["name"], "Tester");
    assert_eq!(doc["commit"]["author"]["email"], "tester@example.com");
    // 1_700_000_060 seconds at +01:00
    assert_eq!(doc["commit"]["author"]["time"], "20231114T231420+0100");
    assert_eq!(doc["commit"]["committer"]["time"], "20231114T231420+0100");
    assert!(doc["indexed_at"].is_string());
}

#[test]
fn test_declared_encoding_is_transcoded() {
    let mut repo = TestRepo::new();
    repo.write("a.txt", b"1\n");
    let first = repo.commit("First");
    let latin1 = repo.commit_latin1(b"Caf\xe9 au lait\n");

    let client = memory_client();
    let indexer = CommitLogIndexer::new(client.clone(), &settings());
    indexer.index_commits(&rid(), &repo.open(), Some(&first), &latin1).unwrap();

    let doc = client.document(&format!("42_{}", latin1)).unwrap();
    assert_eq!(doc["commit"]["message"], "Café au lait\n");
}

#[test]
fn test_commit_batches() {
    let mut repo = TestRepo::new();
    let mut tip = None;
    for i in 0..5 {
        repo.write("counter.txt", format!("{}\n", i).as_bytes());
        tip = Some(repo.commit(&format!("Commit {}", i)));
    }
    let tip = tip.unwrap();

    let client = memory_client();
    let indexer = CommitLogIndexer::new(client.clone(), &settings().with_batch_size(2));
    let stats = indexer.index_commits(&rid(), &repo.open(), None, &tip).unwrap();

    let sizes: Vec<usize> = client.bulk_calls().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![2, 2, 1]);
    assert_eq!(stats.submit.submitted, 5);
    assert!(stats.is_complete());
}

#[test]
fn test_merge_base_and_tip() {
    let mut repo = TestRepo::new();
    repo.write("a.txt", b"base\n");
    let base = repo.commit("Base");
    repo.write("feature.txt", b"feature\n");
    let feature = repo.commit_on("feature", &[base.clone()], "Feature work");
    repo.remove("feature.txt").write("a.txt", b"main\n");
    let main = repo.commit("Main work");

    let git = repo.open();
    assert_eq!(git.current_tip().unwrap(), main);
    assert_eq!(git.merge_base(&feature, &main).unwrap(), base);
    assert_eq!(git.resolve("feature").unwrap(), feature);
}

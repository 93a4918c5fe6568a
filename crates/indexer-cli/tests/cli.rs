//! CLI integration tests
//!
//! These tests run the compiled `repo-indexer` binary directly. No search
//! engine is running, so requests go to a closed local port.

use git2::{Repository, Signature};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const UNREACHABLE: &str = "http://127.0.0.1:9";

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_repo-indexer"))
}

/// Repository with a single commit containing `hello.rb`
fn sample_repo(dir: &Path) -> String {
    let repo = Repository::init(dir).unwrap();
    let blob = repo.blob(b"puts 'hello'\n").unwrap();
    let mut builder = repo.treebuilder(None).unwrap();
    builder.insert("hello.rb", blob, 0o100644).unwrap();
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();
    let sig = Signature::now("Tester", "tester@example.com").unwrap();
    let oid = repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[]).unwrap();
    oid.to_string()
}

// ── help / version ────────────────────────────────────────────────────────────

#[test]
fn test_help_exits_zero() {
    let status = bin().arg("--help").status().expect("failed to run binary");
    assert!(status.success(), "--help should exit 0");
}

#[test]
fn test_version_flag() {
    let output = bin().arg("--version").output().expect("failed to run binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("repo-indexer"),
        "version output should contain binary name, got: {}",
        stdout
    );
}

// ── index ─────────────────────────────────────────────────────────────────────

#[test]
fn test_index_survives_unreachable_engine() {
    let tmp = TempDir::new().unwrap();
    let sha = sample_repo(tmp.path());

    let output = bin()
        .args(["--url", UNREACHABLE, "--timeout-secs", "2"])
        .arg("index")
        .arg("--repo").arg(tmp.path())
        .args(["--rid", "1"])
        .output()
        .expect("failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "failed batches are not fatal, got: {}", stdout);
    assert!(stdout.contains(&sha[..8]), "range should be printed, got: {}", stdout);
    assert!(stdout.contains("rerun"), "incomplete run should be reported, got: {}", stdout);
}

#[test]
fn test_index_rid_defaults_to_canonical_repo_path() {
    let tmp = TempDir::new().unwrap();
    sample_repo(tmp.path());
    let canonical = tmp.path().canonicalize().unwrap();

    let output = bin()
        .args(["--url", UNREACHABLE, "--timeout-secs", "2"])
        .arg("index")
        .arg("--repo").arg(tmp.path().join("."))
        .output()
        .expect("failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "--rid is optional, got: {}", stdout);
    assert!(
        stdout.contains(&*canonical.to_string_lossy()),
        "canonical path should be used as rid, got: {}",
        stdout
    );
}

#[test]
fn test_index_rejects_unknown_revision() {
    let tmp = TempDir::new().unwrap();
    sample_repo(tmp.path());

    let status = bin()
        .args(["--url", UNREACHABLE])
        .arg("index")
        .arg("--repo").arg(tmp.path())
        .args(["--rid", "1", "--to", "no-such-branch"])
        .status()
        .expect("failed to run binary");

    assert!(!status.success());
}

#[test]
fn test_index_rejects_missing_repository() {
    let tmp = TempDir::new().unwrap();

    let status = bin()
        .args(["--url", UNREACHABLE])
        .arg("index")
        .arg("--repo").arg(tmp.path().join("missing"))
        .args(["--rid", "1"])
        .status()
        .expect("failed to run binary");

    assert!(!status.success());
}

#[test]
fn test_index_scope_flags_conflict() {
    let tmp = TempDir::new().unwrap();
    sample_repo(tmp.path());

    let status = bin()
        .arg("index")
        .arg("--repo").arg(tmp.path())
        .args(["--rid", "1", "--blobs-only", "--commits-only"])
        .status()
        .expect("failed to run binary");

    assert!(!status.success());
}

// ── search ────────────────────────────────────────────────────────────────────

#[test]
fn test_search_against_unreachable_engine_fails() {
    let output = bin()
        .args(["--url", UNREACHABLE, "--timeout-secs", "2"])
        .args(["search", "fix bug", "--language", "Ruby"])
        .output()
        .expect("failed to run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Search failed"), "got: {}", stderr);
}

#[test]
fn test_search_rejects_unknown_kind() {
    let status = bin()
        .args(["search", "x", "--kind", "tags"])
        .status()
        .expect("failed to run binary");

    assert!(!status.success());
}

#[test]
fn test_files_requires_rid() {
    let status = bin()
        .args(["files", "main.rs"])
        .status()
        .expect("failed to run binary");

    assert!(!status.success());
}

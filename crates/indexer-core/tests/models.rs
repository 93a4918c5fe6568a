//! Tests for core data models

use indexer_core::{
    BlobDocument, BulkOperation, CommitDocument, Document, IndexSettings, QuerySpec, Revision,
    SearchKind, Signature, SortOrder,
};

// ── fixtures ─────────────────────────────────────────────────────────────────

const SHA: &str = "abc1234567890abcdef01234567890abcdef0123";

fn commit() -> CommitDocument {
    let sig = Signature {
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        time: "20240131T154210+0100".to_string(),
    };
    CommitDocument {
        rid: "7".to_string(),
        sha: SHA.to_string(),
        author: sig.clone(),
        committer: sig,
        message: "Fix bug in parser\n".to_string(),
    }
}

// ── revisions ────────────────────────────────────────────────────────────────

#[test]
fn test_new_branch_sentinel() {
    assert!(Revision::new_branch().is_new_branch());
    assert!(Revision::new("0000000000000000000000000000000000000000").is_new_branch());
    assert!(!Revision::new(SHA).is_new_branch());
}

#[test]
fn test_revision_short() {
    assert_eq!(Revision::new(SHA).short(), "abc12345");
    assert_eq!(Revision::new("HEAD").short(), "HEAD");
}

// ── documents ────────────────────────────────────────────────────────────────

#[test]
fn test_commit_document_id() {
    assert_eq!(commit().document_id(), format!("7_{}", SHA));
}

#[test]
fn test_commit_source_is_nested_under_kind() {
    let source = Document::from(commit()).to_source("2024-01-31T15:42:10.000Z");
    assert_eq!(source["type"], "commit");
    assert_eq!(source["commit"]["sha"], SHA);
    assert_eq!(source["commit"]["author"]["email"], "jane@example.com");
    assert_eq!(source["indexed_at"], "2024-01-31T15:42:10.000Z");
}

#[test]
fn test_blob_source_fields() {
    let blob = BlobDocument {
        rid: "7".to_string(),
        oid: "deadbeef".to_string(),
        commit_sha: SHA.to_string(),
        path: "README.md".to_string(),
        content: "hello".to_string(),
        language: "Markdown".to_string(),
    };
    let source = Document::from(blob).to_source("now");
    assert_eq!(source["type"], "blob");
    assert_eq!(source["blob"]["path"], "README.md");
    assert_eq!(source["blob"]["language"], "Markdown");
}

#[test]
fn test_reindexing_same_commit_yields_same_id() {
    let first = BulkOperation::index(commit());
    let second = BulkOperation::index(commit());
    assert_eq!(first.id(), second.id());
}

#[test]
fn test_delete_operation() {
    let op = BulkOperation::delete("7_old.txt");
    assert!(op.is_delete());
    assert_eq!(op.id(), "7_old.txt");
}

// ── query spec ───────────────────────────────────────────────────────────────

#[test]
fn test_query_spec_defaults() {
    let spec = QuerySpec::new("fix bug");
    assert_eq!(spec.page, 1);
    assert_eq!(spec.per, 20);
    assert_eq!(spec.offset(), 0);
    assert!(spec.validate().is_ok());
}

#[test]
fn test_query_spec_offset() {
    let spec = QuerySpec::new("x").with_page(3, 25);
    assert_eq!(spec.offset(), 50);
}

#[test]
fn test_query_spec_rejects_zero_page_and_size() {
    assert!(QuerySpec::new("x").with_page(0, 20).validate().is_err());
    assert!(QuerySpec::new("x").with_page(1, 0).validate().is_err());
}

#[test]
fn test_query_spec_rejects_overflowing_offset() {
    let spec = QuerySpec::new("x").with_page(usize::MAX, 2);
    assert!(spec.validate().is_err());
    assert_eq!(spec.offset(), usize::MAX);
}

#[test]
fn test_blank_query() {
    assert!(QuerySpec::new("   ").is_blank());
    assert!(!QuerySpec::new("x").is_blank());
}

#[test]
fn test_parse_kind_and_order() {
    assert_eq!("blob".parse::<SearchKind>().unwrap(), SearchKind::Blob);
    assert_eq!("Commits".parse::<SearchKind>().unwrap(), SearchKind::Commit);
    assert!("tree".parse::<SearchKind>().is_err());

    assert_eq!("recently-indexed".parse::<SortOrder>().unwrap(), SortOrder::RecentlyIndexed);
    assert_eq!("last_indexed".parse::<SortOrder>().unwrap(), SortOrder::LastIndexed);
    assert_eq!("".parse::<SortOrder>().unwrap(), SortOrder::Default);
    assert!("newest".parse::<SortOrder>().is_err());
}

// ── settings ─────────────────────────────────────────────────────────────────

#[test]
fn test_index_name_suffix() {
    assert_eq!(IndexSettings::index_name("repository", None), "repository");
    assert_eq!(IndexSettings::index_name("repository", Some("test")), "repository_test");
    assert_eq!(IndexSettings::index_name("repository", Some("  ")), "repository");
}

#[test]
fn test_batch_size_never_zero() {
    let settings = IndexSettings::default().with_batch_size(0);
    assert_eq!(settings.batch_size, 1);
    assert_eq!(IndexSettings::default().batch_size, 300);
}

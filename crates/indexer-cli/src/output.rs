//! Output formatting structures for CLI display

use tabled::Tabled;

/// Table row for a code search hit
#[derive(Tabled)]
pub struct BlobRow {
    #[tabled(rename = "Repository")]
    pub rid: String,
    #[tabled(rename = "Path")]
    pub path: String,
    #[tabled(rename = "Language")]
    pub language: String,
    #[tabled(rename = "Commit")]
    pub commit: String,
    #[tabled(rename = "Match")]
    pub fragment: String,
}

/// Table row for a commit search hit
#[derive(Tabled)]
pub struct CommitRow {
    #[tabled(rename = "Repository")]
    pub rid: String,
    #[tabled(rename = "Commit")]
    pub sha: String,
    #[tabled(rename = "Author")]
    pub author: String,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

/// Table row for a filename search hit
#[derive(Tabled)]
pub struct FileRow {
    #[tabled(rename = "Path")]
    pub path: String,
    #[tabled(rename = "Score")]
    pub score: String,
}

/// Table row for a facet term
#[derive(Tabled)]
pub struct FacetRow {
    #[tabled(rename = "Term")]
    pub term: String,
    #[tabled(rename = "Count")]
    pub count: u64,
}

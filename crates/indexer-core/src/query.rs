//! Caller-supplied search parameters

use crate::error::CoreError;
use std::fmt;
use std::str::FromStr;

/// Default page size
pub const DEFAULT_PER_PAGE: usize = 20;

/// Which document kinds a search targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    All,
    Blob,
    Commit,
}

impl SearchKind {
    pub fn includes_blobs(self) -> bool {
        matches!(self, SearchKind::All | SearchKind::Blob)
    }

    pub fn includes_commits(self) -> bool {
        matches!(self, SearchKind::All | SearchKind::Commit)
    }
}

impl FromStr for SearchKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SearchKind::All),
            "blob" | "blobs" => Ok(SearchKind::Blob),
            "commit" | "commits" => Ok(SearchKind::Commit),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchKind::All => "all",
            SearchKind::Blob => "blob",
            SearchKind::Commit => "commit",
        };
        f.write_str(s)
    }
}

/// Result ordering
///
/// `Default` ranks by relevance only. The two index-time orderings sort on the
/// `indexed_at` stamp and fall back to relevance for ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Default,
    /// Newest documents first
    RecentlyIndexed,
    /// Oldest documents first
    LastIndexed,
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "" | "default" => Ok(SortOrder::Default),
            "recently_indexed" => Ok(SortOrder::RecentlyIndexed),
            "last_indexed" => Ok(SortOrder::LastIndexed),
            other => Err(CoreError::UnknownOrder(other.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortOrder::Default => "default",
            SortOrder::RecentlyIndexed => "recently_indexed",
            SortOrder::LastIndexed => "last_indexed",
        };
        f.write_str(s)
    }
}

/// Search parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    /// Free text; blank means "match everything"
    pub query: String,
    pub kind: SearchKind,
    /// `rid` values to restrict to; empty means all repositories
    pub repository_ids: Vec<String>,
    /// Language names to restrict blob results to
    pub languages: Vec<String>,
    /// 1-based page number
    pub page: usize,
    pub per: usize,
    pub order: SortOrder,
    pub highlight: bool,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            query: String::new(),
            kind: SearchKind::All,
            repository_ids: Vec::new(),
            languages: Vec::new(),
            page: 1,
            per: DEFAULT_PER_PAGE,
            order: SortOrder::Default,
            highlight: false,
        }
    }
}

impl QuerySpec {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: SearchKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_repository(mut self, rid: impl Into<String>) -> Self {
        self.repository_ids.push(rid.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.languages.push(language.into());
        self
    }

    pub fn with_page(mut self, page: usize, per: usize) -> Self {
        self.page = page;
        self.per = per;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Offset of the first hit on the requested page
    ///
    /// Saturates at `usize::MAX` for pages [`validate`](Self::validate)
    /// rejects as out of range.
    pub fn offset(&self) -> usize {
        self.checked_offset().unwrap_or(usize::MAX)
    }

    fn checked_offset(&self) -> Option<usize> {
        self.per.checked_mul(self.page.saturating_sub(1))
    }

    /// Checks paging invariants: `page >= 1`, `per > 0` and an offset that
    /// fits in `usize`
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.page == 0 {
            return Err(CoreError::InvalidQuery("page must be at least 1".to_string()));
        }
        if self.per == 0 {
            return Err(CoreError::InvalidQuery("page size must be greater than 0".to_string()));
        }
        if self.checked_offset().is_none() {
            return Err(CoreError::InvalidQuery("page out of range".to_string()));
        }
        Ok(())
    }
}

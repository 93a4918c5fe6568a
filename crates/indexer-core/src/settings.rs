//! Indexing and query settings shared by every component

/// Mutations per bulk request
pub const BATCH_SIZE: usize = 300;

/// Blobs of this many bytes or more are never indexed (1 MiB)
pub const MAX_BLOB_SIZE: u64 = 1_048_576;

/// Index name before the optional environment suffix
pub const BASE_INDEX_NAME: &str = "repository";

/// Settings handed to the indexers and the query builder at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    /// Target index for every read and write
    pub index_name: String,

    /// Maximum number of mutations per bulk call
    pub batch_size: usize,

    /// Exclusive upper bound on indexed blob size in bytes
    pub max_blob_size: u64,

    /// Number of repository terms requested in facets
    pub repositories_count: usize,

    /// Number of language terms requested in facets
    pub languages_count: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            index_name: BASE_INDEX_NAME.to_string(),
            batch_size: BATCH_SIZE,
            max_blob_size: MAX_BLOB_SIZE,
            repositories_count: 10,
            languages_count: 20,
        }
    }
}

impl IndexSettings {
    /// Joins the base name and an optional suffix with `_`
    ///
    /// `index_name("repository", Some("production"))` gives
    /// `repository_production`; an empty suffix is ignored.
    pub fn index_name(base: &str, suffix: Option<&str>) -> String {
        match suffix.map(str::trim).filter(|s| !s.is_empty()) {
            Some(suffix) => format!("{}_{}", base, suffix),
            None => base.to_string(),
        }
    }

    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = index_name.into();
        self
    }

    /// A batch size of zero is raised to one
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_repositories_count(mut self, count: usize) -> Self {
        self.repositories_count = count;
        self
    }
}

//! Statistics for indexing runs

use indexer_search::SubmitReport;
use std::fmt;
use std::time::Duration;

/// Statistics of one blob or commit indexing pass
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Change records or commits walked
    pub scanned: usize,
    /// Index mutations produced
    pub indexed: usize,
    /// Delete mutations produced
    pub deleted: usize,
    /// Records that produced no mutation
    pub skipped: usize,
    /// Outcome of the bulk submissions
    pub submit: SubmitReport,
    pub elapsed_time: Duration,
}

impl IndexStats {
    /// True when every batch was accepted
    pub fn is_complete(&self) -> bool {
        self.submit.is_success()
    }
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scanned, {} indexed, {} deleted, {} skipped | {} | Time: {:.1}s",
            self.scanned,
            self.indexed,
            self.deleted,
            self.skipped,
            self.submit,
            self.elapsed_time.as_secs_f64()
        )
    }
}

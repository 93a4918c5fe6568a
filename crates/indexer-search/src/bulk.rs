//! Batching and best-effort submission of index mutations

use indexer_core::{BulkOperation, IndexSettings, RepositoryId};
use std::fmt;
use std::sync::Arc;

use crate::client::{SearchClient, SearchError};

/// Result of submitting a single batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Operations the engine accepted
    pub submitted: usize,
    /// Operations lost to a failed or partially rejected request
    pub failed: usize,
    /// Error message when the batch did not fully succeed
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Nothing was sent
    pub fn is_empty(&self) -> bool {
        self.submitted == 0 && self.failed == 0 && self.error.is_none()
    }
}

/// Aggregated outcome of all batches of one indexing pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitReport {
    /// Bulk calls issued
    pub batches: usize,
    pub failed_batches: usize,
    pub submitted: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl SubmitReport {
    pub fn record(&mut self, outcome: BatchOutcome) {
        if outcome.is_empty() {
            return;
        }
        self.batches += 1;
        self.submitted += outcome.submitted;
        self.failed += outcome.failed;
        if let Some(err) = outcome.error {
            self.failed_batches += 1;
            self.errors.push(err);
        }
    }

    pub fn merge(&mut self, other: SubmitReport) {
        self.batches += other.batches;
        self.failed_batches += other.failed_batches;
        self.submitted += other.submitted;
        self.failed += other.failed;
        self.errors.extend(other.errors);
    }

    pub fn is_success(&self) -> bool {
        self.failed_batches == 0
    }
}

impl fmt::Display for SubmitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} batches ({} failed) | {} operations submitted, {} lost",
            self.batches, self.failed_batches, self.submitted, self.failed
        )
    }
}

/// Groups mutations into fixed-size batches and sends one bulk request each
///
/// A failing batch never aborts the run: the error is logged, recorded in the
/// outcome and the next batch is submitted as usual. Document ids are
/// deterministic, so a later run restores whatever a failed batch dropped.
pub struct BulkSubmitter {
    client: Arc<dyn SearchClient>,
    index_name: String,
    batch_size: usize,
}

impl BulkSubmitter {
    pub fn new(client: Arc<dyn SearchClient>, settings: &IndexSettings) -> Self {
        Self {
            client,
            index_name: settings.index_name.clone(),
            batch_size: settings.batch_size.max(1),
        }
    }

    /// Submits one batch, skipping `None` entries
    ///
    /// An empty batch returns immediately without a request.
    pub fn submit<I>(&self, rid: &RepositoryId, batch: I) -> BatchOutcome
    where
        I: IntoIterator<Item = Option<BulkOperation>>,
    {
        let operations: Vec<BulkOperation> = batch.into_iter().flatten().collect();
        self.send(rid, &operations)
    }

    /// Splits `operations` into batches of at most `batch_size` and submits
    /// them in order
    pub fn submit_all<I>(&self, rid: &RepositoryId, operations: I) -> SubmitReport
    where
        I: IntoIterator<Item = Option<BulkOperation>>,
    {
        let mut report = SubmitReport::default();
        let mut batch = Vec::with_capacity(self.batch_size);

        for op in operations.into_iter().flatten() {
            batch.push(op);
            if batch.len() >= self.batch_size {
                report.record(self.send(rid, &batch));
                batch.clear();
            }
        }

        if !batch.is_empty() {
            report.record(self.send(rid, &batch));
        }

        report
    }

    fn send(&self, rid: &RepositoryId, operations: &[BulkOperation]) -> BatchOutcome {
        if operations.is_empty() {
            return BatchOutcome::default();
        }

        let total = operations.len();
        let result = self
            .client
            .bulk(&self.index_name, operations)
            .and_then(|response| {
                let rejected = response.rejected();
                match rejected.first() {
                    None => Ok(total),
                    Some((id, reason)) => Err(SearchError::Rejected {
                        rejected: rejected.len(),
                        total,
                        reason: format!("{}: {}", id, reason),
                    }),
                }
            });

        match result {
            Ok(submitted) => {
                log::info!(
                    "Bulk operations are performed for repository {} ({} operations)",
                    rid,
                    submitted
                );
                BatchOutcome {
                    submitted,
                    failed: 0,
                    error: None,
                }
            }
            Err(e) => {
                log::warn!(
                    "Error with bulk repository indexing for repository {}. Reason: {}",
                    rid,
                    e
                );
                let failed = match &e {
                    SearchError::Rejected { rejected, .. } => (*rejected).min(total),
                    _ => total,
                };
                BatchOutcome {
                    submitted: total.saturating_sub(failed),
                    failed,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

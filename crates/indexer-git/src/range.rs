//! Resolution of the revision range to index

use anyhow::Result;
use indexer_core::Revision;

use crate::repository::GitRepository;

/// `from..to` range handed to the indexers; `from = None` is all history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRange {
    pub from: Option<Revision>,
    pub to: Revision,
}

/// Computes the range to index given the last indexed revision
///
/// - no prior revision: everything reachable from `target`
/// - the new-branch sentinel and `target` is the current tip: everything
///   reachable from `target`
/// - the new-branch sentinel and any other `target`: from the merge base of
///   `target` and the current tip, so history shared with the tip is not
///   indexed again
/// - any other prior revision: `prior..target` unchanged
///
/// The merge base is taken against the tip at call time, even when `target`
/// has since diverged further from it.
pub fn resolve_range<R>(repo: &R, prior: Option<&Revision>, target: &Revision) -> Result<RevisionRange>
where
    R: GitRepository + ?Sized,
{
    let from = match prior {
        None => None,
        Some(prior) if prior.is_new_branch() => {
            let tip = repo.current_tip()?;
            if *target == tip {
                None
            } else {
                let base = repo.merge_base(target, &tip)?;
                log::debug!("New branch {}: indexing from merge base {}", target.short(), base.short());
                Some(base)
            }
        }
        Some(prior) => Some(prior.clone()),
    };

    Ok(RevisionRange {
        from,
        to: target.clone(),
    })
}

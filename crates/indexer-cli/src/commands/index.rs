//! Index command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use indexer_core::{RepositoryId, Revision};
use indexer_git::{Git2Repository, IndexScope, IndexStats, RepositoryIndexer};
use std::path::PathBuf;

use crate::helpers::Connection;

/// Indexes a repository between the last indexed revision and `to`
pub fn cmd_index(
    repo_path: PathBuf,
    rid: Option<String>,
    from: Option<String>,
    to: Option<String>,
    blobs_only: bool,
    commits_only: bool,
    conn: &Connection,
) -> Result<()> {
    log::info!("Starting indexing of repository at {:?}", repo_path);
    log::info!("Batch size: {} operations", conn.settings.batch_size);

    let repo = Git2Repository::open(&repo_path)?;
    let rid = match rid {
        Some(rid) => RepositoryId::new(rid),
        None => {
            let canonical = std::fs::canonicalize(&repo_path)
                .with_context(|| format!("Failed to canonicalize {:?}", repo_path))?;
            RepositoryId::new(canonical.to_string_lossy().into_owned())
        }
    };

    // The sentinel is not a real object and must not be resolved
    let prior = match from.as_deref() {
        None => None,
        Some(Revision::NEW_BRANCH) => Some(Revision::new_branch()),
        Some(spec) => Some(repo.resolve(spec)?),
    };
    let target = repo
        .resolve(to.as_deref().unwrap_or("HEAD"))
        .context("Failed to resolve target revision")?;

    let scope = if blobs_only {
        IndexScope::BlobsOnly
    } else if commits_only {
        IndexScope::CommitsOnly
    } else {
        IndexScope::All
    };

    let indexer = RepositoryIndexer::new(conn.client.clone(), &conn.settings);
    let report = indexer
        .index_repository(&rid, &repo, prior.as_ref(), &target, scope)
        .context("Failed to index repository")?;

    println!("{} {}", "Repository".bright_cyan(), rid.to_string().bold());
    println!("{}", "━".repeat(60).bright_black());
    println!(
        "  {}  {}..{}",
        "Range:".bright_yellow(),
        report.range.from.as_ref().map_or("(root)", Revision::short),
        report.range.to.short()
    );
    if let Some(stats) = &report.blobs {
        print_stats("Blobs:", stats);
    }
    if let Some(stats) = &report.commits {
        print_stats("Commits:", stats);
    }

    if !report.is_complete() {
        println!(
            "\n{} Some batches were not accepted; rerun the same range to fill the gaps",
            "⚠".yellow()
        );
    }

    Ok(())
}

fn print_stats(label: &str, stats: &IndexStats) {
    println!("  {} {}", label.bright_yellow(), stats);
    for error in &stats.submit.errors {
        println!("    {} {}", "✗".red(), error);
    }
}

//! Search command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use indexer_core::{QuerySpec, SearchKind, SortOrder};
use indexer_search::{BlobResults, CommitResults, FacetTerm, Searcher};
use tabled::{Table, settings::{Style, Color, Modify, object::Rows}};

use crate::helpers::{format_commit_time, render_highlight, short_sha, subject, truncate, Connection};
use crate::output::{BlobRow, CommitRow, FacetRow};

const FRAGMENT_WIDTH: usize = 80;
const MESSAGE_WIDTH: usize = 60;

/// Searches blobs and/or commits and prints the results
#[allow(clippy::too_many_arguments)]
pub fn cmd_search(
    query: String,
    kind: SearchKind,
    rids: Vec<String>,
    languages: Vec<String>,
    page: usize,
    per: usize,
    order: SortOrder,
    highlight: bool,
    conn: &Connection,
) -> Result<()> {
    let mut spec = QuerySpec::new(query)
        .with_kind(kind)
        .with_page(page, per)
        .with_order(order)
        .with_highlight(highlight);
    spec.repository_ids = rids;
    spec.languages = languages;

    let searcher = Searcher::new(conn.client.clone(), &conn.settings);
    let results = searcher
        .search(&spec)
        .with_context(|| format!("Search failed against {}", conn.url))?;

    if let Some(blobs) = &results.blobs {
        print_blobs(blobs, &spec);
    }
    if let Some(commits) = &results.commits {
        print_commits(commits, &spec);
    }

    Ok(())
}

fn print_blobs(blobs: &BlobResults, spec: &QuerySpec) {
    println!(
        "\n{} {} {}",
        "📄".bright_cyan(),
        "Code".bold().bright_white(),
        format!("({} matches, page {})", blobs.total_count, spec.page).dimmed()
    );
    println!("{}", "━".repeat(60).bright_black());

    if blobs.results.is_empty() {
        println!("  {} No code matches", "❌".red());
    } else {
        let rows: Vec<BlobRow> = blobs
            .results
            .iter()
            .map(|hit| {
                let fragment = hit
                    .highlight
                    .get("blob.content")
                    .and_then(|fragments| fragments.first())
                    .map(|fragment| render_highlight(fragment))
                    .unwrap_or_else(|| {
                        hit.document.content.lines().next().unwrap_or("").trim().to_string()
                    });
                BlobRow {
                    rid: hit.document.rid.clone(),
                    path: hit.document.path.clone(),
                    language: hit.document.language.clone(),
                    commit: short_sha(&hit.document.commit_sha).to_string(),
                    fragment: truncate(&fragment, FRAGMENT_WIDTH),
                }
            })
            .collect();
        print_table(rows);
    }

    print_facet("Languages", &blobs.languages);
    print_facet("Repositories", &blobs.repositories);
}

fn print_commits(commits: &CommitResults, spec: &QuerySpec) {
    println!(
        "\n{} {} {}",
        "📝".bright_cyan(),
        "Commits".bold().bright_white(),
        format!("({} matches, page {})", commits.total_count, spec.page).dimmed()
    );
    println!("{}", "━".repeat(60).bright_black());

    if commits.results.is_empty() {
        println!("  {} No commit matches", "❌".red());
    } else {
        let rows: Vec<CommitRow> = commits
            .results
            .iter()
            .map(|hit| {
                let commit = &hit.document;
                let message = hit
                    .highlight
                    .get("commit.message")
                    .and_then(|fragments| fragments.first())
                    .map(|fragment| render_highlight(fragment))
                    .unwrap_or_else(|| subject(&commit.message).to_string());
                CommitRow {
                    rid: commit.rid.clone(),
                    sha: short_sha(&commit.sha).to_string(),
                    author: commit.author.name.clone(),
                    date: format_commit_time(&commit.committer.time),
                    message: truncate(&message, MESSAGE_WIDTH),
                }
            })
            .collect();
        print_table(rows);
    }

    print_facet("Repositories", &commits.repositories);
}

fn print_facet(title: &str, terms: &[FacetTerm]) {
    let rows: Vec<FacetRow> = terms
        .iter()
        .filter(|term| term.count > 0)
        .map(|term| FacetRow {
            term: term.term.clone(),
            count: term.count,
        })
        .collect();
    if rows.is_empty() {
        return;
    }

    println!("\n  {}", title.bright_yellow());
    print_table(rows);
}

fn print_table<T: tabled::Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Color::FG_BRIGHT_CYAN));
    println!("{}", table);
}

//! Files command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use indexer_core::QuerySpec;
use indexer_search::Searcher;
use tabled::{Table, settings::{Style, Color, Modify, object::Rows}};

use crate::helpers::Connection;
use crate::output::FileRow;

/// Finds files by approximate name within one repository
pub fn cmd_files(query: String, rid: String, page: usize, per: usize, conn: &Connection) -> Result<()> {
    let spec = QuerySpec::new(query)
        .with_repository(rid.clone())
        .with_page(page, per);

    let searcher = Searcher::new(conn.client.clone(), &conn.settings);
    let results = searcher
        .search_file_names(&spec)
        .with_context(|| format!("Filename search failed against {}", conn.url))?;

    if results.results.is_empty() {
        println!("{} No files match '{}' in repository {}", "❌".red(), spec.query.bold(), rid.bold());
        return Ok(());
    }

    println!(
        "\n{} {} {}",
        "📁".bright_cyan(),
        rid.bold().bright_white(),
        format!("({} files, page {})", results.total_count, spec.page).dimmed()
    );

    let rows: Vec<FileRow> = results
        .results
        .into_iter()
        .map(|hit| FileRow {
            path: hit.path,
            score: hit.score.map_or_else(|| "-".to_string(), |score| format!("{:.2}", score)),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Color::FG_BRIGHT_CYAN));
    println!("{}", table);

    Ok(())
}

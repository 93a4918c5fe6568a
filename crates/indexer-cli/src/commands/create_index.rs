//! Create-index command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use indexer_search::index_definition;

use crate::helpers::Connection;

/// Creates the shared index with its settings and mappings
pub fn cmd_create_index(conn: &Connection) -> Result<()> {
    let index = &conn.settings.index_name;
    conn.client
        .create_index(index, &index_definition())
        .with_context(|| format!("Failed to create index {} at {}", index, conn.url))?;

    println!("{} Created index {}", "✓".green(), index.bold());
    Ok(())
}

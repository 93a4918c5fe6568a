//! Repo-Indexer CLI - Indexes git repositories into a search engine and
//! queries them
//!
//! Provides:
//! - Incremental indexing of blobs and commits between two revisions
//! - Code and commit search with facets and highlighting
//! - Filename search within one repository
//! - Provisioning of the shared index

mod commands;
mod helpers;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indexer_core::{SearchKind, SortOrder, BASE_INDEX_NAME, BATCH_SIZE, DEFAULT_PER_PAGE};
use std::path::PathBuf;

use commands::{cmd_create_index, cmd_files, cmd_index, cmd_search};
use helpers::Connection;

#[derive(Parser)]
#[command(name = "repo-indexer")]
#[command(about = "Indexes git repository contents and history for code search", long_about = None)]
#[command(version)]
struct Cli {
    /// Search engine base URL
    #[arg(short, long, default_value = "http://localhost:9200")]
    url: String,

    /// Base index name
    #[arg(long, default_value = BASE_INDEX_NAME)]
    index: String,

    /// Environment suffix appended to the index name (e.g. "production")
    #[arg(long)]
    index_suffix: Option<String>,

    /// Mutations per bulk request
    #[arg(short = 'b', long, default_value_t = BATCH_SIZE)]
    batch_size: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Indexes blobs and commits of a repository
    Index {
        /// Path to the local git repository
        #[arg(short, long)]
        repo: PathBuf,

        /// Repository identifier stored with every document (default: the
        /// canonical repository path)
        #[arg(long)]
        rid: Option<String>,

        /// Last indexed revision; the all-zero sha marks a new branch
        /// (default: index all history)
        #[arg(short, long)]
        from: Option<String>,

        /// Revision to index up to (default: HEAD)
        #[arg(short, long)]
        to: Option<String>,

        /// Index blobs only
        #[arg(long, conflicts_with = "commits_only")]
        blobs_only: bool,

        /// Index commits only
        #[arg(long, conflicts_with = "blobs_only")]
        commits_only: bool,
    },

    /// Searches code and commit messages
    Search {
        /// Query text; leave empty to match everything
        #[arg(default_value = "")]
        query: String,

        /// Document kind to search: all, blob or commit
        #[arg(short, long, default_value = "all")]
        kind: SearchKind,

        /// Restrict to these repository identifiers
        #[arg(long = "rid")]
        rids: Vec<String>,

        /// Restrict blob results to these languages
        #[arg(short, long = "language")]
        languages: Vec<String>,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Results per page
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per: usize,

        /// Ordering: default, recently_indexed or last_indexed
        #[arg(short, long, default_value = "default")]
        order: SortOrder,

        /// Show highlighted fragments
        #[arg(long)]
        highlight: bool,
    },

    /// Searches file names within a repository
    Files {
        /// Approximate file name or path
        query: String,

        /// Repository identifier
        #[arg(long)]
        rid: String,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Results per page
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per: usize,
    },

    /// Creates the index with its analyzers and mappings
    CreateIndex,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logger
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&cli.log_level)
    ).init();

    let conn = Connection::new(
        &cli.url,
        &cli.index,
        cli.index_suffix.as_deref(),
        cli.batch_size,
        cli.timeout_secs,
    )?;

    match cli.command {
        Commands::Index { repo, rid, from, to, blobs_only, commits_only } => {
            cmd_index(repo, rid, from, to, blobs_only, commits_only, &conn)?;
        }
        Commands::Search { query, kind, rids, languages, page, per, order, highlight } => {
            cmd_search(query, kind, rids, languages, page, per, order, highlight, &conn)?;
        }
        Commands::Files { query, rid, page, per } => {
            cmd_files(query, rid, page, per, &conn)?;
        }
        Commands::CreateIndex => {
            cmd_create_index(&conn)?;
        }
    }

    Ok(())
}

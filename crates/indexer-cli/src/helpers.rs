//! Helper functions for CLI operations

use anyhow::{Context, Result};
use chrono::DateTime;
use colored::Colorize;
use indexer_core::IndexSettings;
use indexer_git::COMMIT_TIME_PATTERN;
use indexer_search::{HttpSearchClient, SearchClient, HIGHLIGHT_POST_TAG, HIGHLIGHT_PRE_TAG};
use std::sync::Arc;
use std::time::Duration;

/// Search engine client and the settings every command shares
pub struct Connection {
    pub client: Arc<dyn SearchClient>,
    pub settings: IndexSettings,
    pub url: String,
}

impl Connection {
    pub fn new(
        url: &str,
        index: &str,
        index_suffix: Option<&str>,
        batch_size: usize,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = HttpSearchClient::with_timeout(url, Duration::from_secs(timeout_secs))
            .with_context(|| format!("Failed to create search client for {}", url))?;
        let settings = IndexSettings::default()
            .with_index_name(IndexSettings::index_name(index, index_suffix))
            .with_batch_size(batch_size);

        log::debug!("Using index {} at {}", settings.index_name, client.base_url());
        Ok(Self {
            client: Arc::new(client),
            settings,
            url: url.to_string(),
        })
    }
}

/// Replaces the highlight markers with terminal emphasis and joins lines
pub fn render_highlight(fragment: &str) -> String {
    let mut rendered = String::new();
    let mut rest = fragment;

    while let Some(start) = rest.find(HIGHLIGHT_PRE_TAG) {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + HIGHLIGHT_PRE_TAG.len()..];
        match after.find(HIGHLIGHT_POST_TAG) {
            Some(end) => {
                rendered.push_str(&after[..end].bright_yellow().bold().to_string());
                rest = &after[end + HIGHLIGHT_POST_TAG.len()..];
            }
            None => {
                rest = after;
                break;
            }
        }
    }
    rendered.push_str(rest);

    rendered.replace('\n', " ").trim().to_string()
}

/// Shortens `text` to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

/// First line of a commit message
pub fn subject(message: &str) -> &str {
    message.lines().next().unwrap_or("").trim()
}

/// Formats a stored commit time (`20240131T154210+0100`) for display
pub fn format_commit_time(time: &str) -> String {
    match DateTime::parse_from_str(time, COMMIT_TIME_PATTERN) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => time.to_string(),
    }
}

/// Abbreviated commit sha
pub fn short_sha(sha: &str) -> &str {
    sha.get(..8).unwrap_or(sha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_highlight_strips_markers() {
        colored::control::set_override(false);
        let fragment = format!("def {}parse{}(input)\n  end", HIGHLIGHT_PRE_TAG, HIGHLIGHT_POST_TAG);
        assert_eq!(render_highlight(&fragment), "def parse(input)   end");
    }

    #[test]
    fn test_render_highlight_unterminated_marker() {
        colored::control::set_override(false);
        let fragment = format!("a {}b", HIGHLIGHT_PRE_TAG);
        assert_eq!(render_highlight(&fragment), "a b");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("zażółć gęślą", 5), "zażó…");
    }

    #[test]
    fn test_format_commit_time() {
        assert_eq!(format_commit_time("20240131T154210+0100"), "2024-01-31 15:42");
        assert_eq!(format_commit_time("garbage"), "garbage");
    }

    #[test]
    fn test_subject_and_short_sha() {
        assert_eq!(subject("Fix parser\n\nDetails"), "Fix parser");
        assert_eq!(subject(""), "");
        assert_eq!(short_sha("0123456789abcdef"), "01234567");
        assert_eq!(short_sha("abc"), "abc");
    }
}

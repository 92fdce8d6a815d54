//! Search command implementation.

use super::run_tool;
use crate::config::Settings;
use anyhow::Result;
use serde_json::json;

/// Options for the search command.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub call_ids: Vec<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: i64,
    pub case_sensitive: bool,
}

/// Run the search command.
pub async fn run_search(query: &str, options: SearchOptions, settings: &Settings) -> Result<()> {
    let mut args = json!({
        "query": query,
        "from_date": options.from,
        "to_date": options.to,
        "limit": options.limit,
        "case_sensitive": options.case_sensitive,
    });
    if !options.call_ids.is_empty() {
        args["call_ids"] = json!(options.call_ids);
    }

    run_tool(settings, "search_transcripts", args, "Searching transcripts...").await
}

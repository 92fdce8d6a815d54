//! Ask command implementation.

use super::run_tool;
use crate::config::Settings;
use anyhow::Result;
use serde_json::json;

/// Run the ask command.
pub async fn run_ask(question: &str, limit: i64, settings: &Settings) -> Result<()> {
    run_tool(
        settings,
        "ask",
        json!({"question": question, "limit": limit}),
        "Searching calls...",
    )
    .await
}

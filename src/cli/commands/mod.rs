//! CLI command implementations.

mod ask;
mod calls;
mod config;
mod doctor;
mod mcp;
mod search;

pub use ask::run_ask;
pub use calls::{run_call, run_calls, run_insights, run_summary, run_transcript, ListOptions};
pub use config::run_config;
pub use doctor::run_doctor;
pub use mcp::run_mcp;
pub use search::{run_search, SearchOptions};

use crate::cli::Output;
use crate::client::AircallClient;
use crate::config::Settings;
use crate::error::AircallError;
use crate::tools::ToolRegistry;
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;

/// Build a client from settings, pointing at `doctor` when credentials are missing.
pub(crate) fn connect(settings: &Settings) -> Result<Arc<AircallClient>> {
    match AircallClient::from_settings(&settings.aircall) {
        Ok(client) => Ok(Arc::new(client)),
        Err(e) => {
            Output::error(&e.to_string());
            if matches!(e, AircallError::CredentialsMissing) {
                Output::info("Run 'aircall-mcp doctor' for detailed diagnostics.");
            }
            Err(e.into())
        }
    }
}

/// Run one tool and print its output. Tool errors exit non-zero.
pub(crate) async fn run_tool(settings: &Settings, name: &str, args: Value, busy: &str) -> Result<()> {
    let client = connect(settings)?;
    let registry = ToolRegistry::from_client(client.clone());

    let spinner = Output::spinner(busy);
    let output = registry.call(name, args).await;
    spinner.finish_and_clear();
    client.close();

    match output {
        Some(text) if text.starts_with("Error") => {
            Output::error(&text);
            anyhow::bail!("{} failed", name)
        }
        Some(text) => {
            println!("{}", text);
            Ok(())
        }
        None => anyhow::bail!("Unknown tool: {}", name),
    }
}

fn response_format(json: bool) -> &'static str {
    if json {
        "json"
    } else {
        "markdown"
    }
}

//! MCP command implementation.

use super::connect;
use crate::config::Settings;
use crate::mcp::McpServer;
use crate::tools::ToolRegistry;
use anyhow::Result;

/// Run the MCP server.
pub async fn run_mcp(settings: &Settings) -> Result<()> {
    let client = connect(settings)?;
    let server = McpServer::new(ToolRegistry::from_client(client.clone()));
    let result = server.run().await;
    client.close();
    result
}

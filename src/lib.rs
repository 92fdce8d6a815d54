//! aircall-mcp - read-only Aircall tools for AI assistants
//!
//! Exposes an Aircall account's calls, transcripts, and AI summaries as
//! tools that an AI agent can invoke over the Model Context Protocol.
//!
//! # Overview
//!
//! - List and filter calls, fetch single calls
//! - Read transcripts with speaker labels and timestamps
//! - Substring search across many transcripts concurrently
//! - Answer free-text questions like "any calls about refunds yesterday?"
//!
//! # Architecture
//!
//! - `config` - Configuration file and environment overrides
//! - `client` - Rate-limited, authenticated Aircall API client
//! - `format` - Markdown rendering of calls and transcripts
//! - `query` - Date phrase parsing, term extraction, concurrent search
//! - `tools` - The tool registry: validation, dispatch, output
//! - `mcp` - JSON-RPC 2.0 server over stdio
//!
//! # Example
//!
//! ```rust,no_run
//! use aircall_mcp::client::AircallClient;
//! use aircall_mcp::config::Settings;
//! use aircall_mcp::tools::ToolRegistry;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?.with_env_overrides()?;
//!     let client = Arc::new(AircallClient::from_settings(&settings.aircall)?);
//!     let tools = ToolRegistry::from_client(client);
//!
//!     let answer = tools.engine().ask("any calls about refunds yesterday?", 20).await;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod mcp;
pub mod query;
pub mod tools;

pub use error::{AircallError, Result};

//! MCP (Model Context Protocol) server for the Aircall tools.
//!
//! Implements JSON-RPC 2.0 over stdio, one message per line.

mod protocol;
mod server;
mod tools;

pub use protocol::{JsonRpcRequest, JsonRpcResponse, Tool, ToolCallResult};
pub use server::McpServer;
pub use tools::get_tools;

//! MCP server implementation.

use super::protocol::*;
use super::tools::get_tools;
use crate::tools::ToolRegistry;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "aircall-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server exposing the Aircall tools.
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        // Logs go to stderr so they don't interfere with JSON-RPC
        info!("Aircall MCP server starting");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        info!("Aircall MCP server stopped");
        Ok(())
    }

    /// Serve newline-delimited JSON-RPC until the reader reaches EOF.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(line).await {
                let mut payload = to_value_or_null(&response).to_string();
                payload.push('\n');
                writer.write_all(payload.as_bytes()).await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    /// Handle one raw message. Notifications produce no response.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"));
            }
        };

        // A present but null id is still a request.
        let is_notification = value.get("id").is_none();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                warn!("Invalid request: {}", e);
                return Some(JsonRpcResponse::error(None, INVALID_REQUEST, "Invalid Request"));
            }
        };

        if is_notification {
            debug!(method = %request.method, "Notification");
            return None;
        }

        Some(self.handle_request(request).await)
    }

    /// Handle a single JSON-RPC request.
    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "Request");
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        }
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::success(id, to_value_or_null(&result))
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult { tools: get_tools() };
        JsonRpcResponse::success(id, to_value_or_null(&result))
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        &format!("Invalid params: {}", e),
                    )
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let arguments = params.arguments.unwrap_or(Value::Null);
        let result = match self.registry.call(&params.name, arguments).await {
            Some(text) => ToolCallResult::text(text),
            None => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        JsonRpcResponse::success(id, to_value_or_null(&result))
    }
}

fn to_value_or_null(value: &impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!("Failed to serialize response: {}", e);
        Value::Null
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AircallClient, ClientConfig};
    use std::sync::Arc;
    use std::time::Duration;

    fn server() -> McpServer {
        let client = AircallClient::new(ClientConfig {
            api_id: Some("id".to_string()),
            api_token: Some("token".to_string()),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
            requests_per_minute: 60,
        })
        .unwrap();
        McpServer::new(ToolRegistry::from_client(Arc::new(client)))
    }

    async fn roundtrip(line: &str) -> Value {
        let response = server().handle_line(line).await.unwrap();
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let value = roundtrip(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#).await;
        assert_eq!(value["id"], 1);
        assert_eq!(value["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(value["result"]["serverInfo"]["name"], "aircall-mcp");
        assert_eq!(value["result"]["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_null_id_gets_response() {
        let value = roundtrip(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).await;
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["result"], json!({}));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let value = roundtrip(r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#).await;
        let tools = value["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 7);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[tokio::test]
    async fn test_errors() {
        let value = roundtrip("{not json").await;
        assert_eq!(value["error"]["code"], -32700);
        assert_eq!(value["id"], Value::Null);

        let value = roundtrip(r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#).await;
        assert_eq!(value["error"]["code"], -32601);

        let value = roundtrip(r#"{"jsonrpc":"2.0","id":3,"method":"tools/call"}"#).await;
        assert_eq!(value["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_result() {
        let value = roundtrip(
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"nope","arguments":{}}}"#,
        )
        .await;
        assert_eq!(value["result"]["isError"], true);
        assert_eq!(value["result"]["content"][0]["text"], "Unknown tool: nope");
    }

    #[tokio::test]
    async fn test_validation_error_is_text() {
        let value = roundtrip(
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"list_calls","arguments":{"limit":0}}}"#,
        )
        .await;
        let text = value["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Error: Invalid parameters"));
        assert!(value["result"].get("isError").is_none());
    }

    #[tokio::test]
    async fn test_serve_skips_notifications() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            "\n"
        );
        let mut output = Vec::new();
        server()
            .serve(BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["id"], 2);
        assert_eq!(lines[1]["result"], json!({}));
    }
}

//! MCP server end to end over in-memory stdio.

mod common;

use aircall_mcp::mcp::McpServer;
use common::*;
use serde_json::{json, Value};
use tokio::io::BufReader;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_session(server: &MockServer, messages: &[Value]) -> Vec<Value> {
    let input: String = messages.iter().map(|m| format!("{}\n", m)).collect();
    let mut output = Vec::new();

    McpServer::new(registry_for(server))
        .serve(BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_session_lists_and_calls_tools() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calls/12/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_json(12, "Customer asked about pricing.")))
        .mount(&server)
        .await;

    let responses = run_session(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test", "version": "0"}
            }}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {
                "name": "get_summary",
                "arguments": {"call_id": 12}
            }}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert!(responses[0]["result"]["serverInfo"]["version"].is_string());

    let names: Vec<&str> = responses[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "list_calls",
            "get_call",
            "get_transcript",
            "search_transcripts",
            "get_summary",
            "get_call_insights",
            "ask"
        ]
    );

    assert_eq!(responses[2]["id"], 3);
    assert_eq!(
        responses[2]["result"]["content"][0]["text"],
        "# Summary for Call 12\n\nCustomer asked about pricing."
    );
}

#[tokio::test]
async fn test_upstream_error_is_tool_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calls/3"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let responses = run_session(
        &server,
        &[json!({"jsonrpc": "2.0", "id": "x", "method": "tools/call", "params": {
            "name": "get_call",
            "arguments": {"call_id": 3}
        }})],
    )
    .await;

    assert_eq!(responses[0]["id"], "x");
    assert_eq!(
        responses[0]["result"]["content"][0]["text"],
        "Error: Permission denied for this resource"
    );
}

//! Shared helpers for integration tests against a mock Aircall API.

#![allow(dead_code)]

use aircall_mcp::client::{AircallClient, ClientConfig};
use aircall_mcp::query::QueryEngine;
use aircall_mcp::tools::ToolRegistry;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

/// `Basic` credentials for `test-id:test-token`.
pub const AUTH_HEADER: &str = "Basic dGVzdC1pZDp0ZXN0LXRva2Vu";

pub fn client_for(server: &MockServer) -> Arc<AircallClient> {
    let client = AircallClient::new(ClientConfig {
        api_id: Some("test-id".to_string()),
        api_token: Some("test-token".to_string()),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        requests_per_minute: 1000,
    })
    .expect("client");
    Arc::new(client)
}

pub fn registry_for(server: &MockServer) -> ToolRegistry {
    ToolRegistry::from_client(client_for(server))
}

pub fn registry_with_timeout(server: &MockServer, timeout: Duration) -> ToolRegistry {
    ToolRegistry::new(QueryEngine::new(client_for(server)).with_search_timeout(timeout))
}

pub fn call_json(id: u64, direction: &str, duration: u64, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "direction": direction,
        "duration": duration,
        "started_at": 1_700_000_000u64 + id,
        "user": {"name": "Alice"},
        "number": {"name": "Support Line"},
        "tags": tags.iter().map(|t| json!({"name": t})).collect::<Vec<_>>(),
    })
}

pub fn calls_page(calls: Vec<Value>, total: u64) -> Value {
    let count = calls.len();
    json!({
        "calls": calls,
        "meta": {"total": total, "count": count, "current_page": 1, "per_page": 20}
    })
}

/// A transcription envelope; utterances are `(participant_type, text, start_time)`.
pub fn transcript_json(call_id: u64, utterances: &[(&str, &str, f64)]) -> Value {
    json!({
        "transcription": {
            "call_id": call_id,
            "content": {
                "language": "en",
                "utterances": utterances
                    .iter()
                    .map(|(participant, text, start)| json!({
                        "participant_type": participant,
                        "text": text,
                        "start_time": start,
                        "end_time": start + 2.0,
                    }))
                    .collect::<Vec<_>>(),
            }
        }
    })
}

pub fn summary_json(call_id: u64, content: &str) -> Value {
    json!({"summary": {"call_id": call_id, "content": content}})
}

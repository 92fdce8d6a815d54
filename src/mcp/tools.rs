//! MCP tool definitions for the Aircall tools.

use super::protocol::Tool;
use serde_json::{json, Value};

fn response_format_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["markdown", "json"],
        "description": "Output format: 'markdown' for human-readable or 'json' for machine-readable",
        "default": "markdown"
    })
}

fn call_id_schema() -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "description": "The Aircall call ID"
    })
}

fn date_schema(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "list_calls".to_string(),
            description: "List Aircall calls with optional filtering by direction, date range, \
                duration, and tags. Returns call metadata including direction, duration, agent, \
                and date. Results are paginated newest first."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 100,
                        "description": "Maximum number of calls to return",
                        "default": 20
                    },
                    "offset": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Number of calls to skip for pagination",
                        "default": 0
                    },
                    "direction": {
                        "type": "string",
                        "enum": ["inbound", "outbound"],
                        "description": "Filter by call direction"
                    },
                    "from_date": date_schema("Start date (ISO format like 2024-01-15, or Unix timestamp)"),
                    "to_date": date_schema("End date (ISO format like 2024-01-15, or Unix timestamp)"),
                    "min_duration": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Minimum call duration in seconds"
                    },
                    "tags": {
                        "type": "array",
                        "items": {"type": "string"},
                        "maxItems": 10,
                        "description": "Only include calls carrying any of these tags (case-insensitive)"
                    },
                    "response_format": response_format_schema()
                },
                "required": []
            }),
        },
        Tool {
            name: "get_call".to_string(),
            description: "Get details for a specific call, optionally including its transcript \
                and AI summary."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "call_id": call_id_schema(),
                    "include_transcript": {
                        "type": "boolean",
                        "description": "Include the call transcript",
                        "default": false
                    },
                    "include_summary": {
                        "type": "boolean",
                        "description": "Include the AI-generated summary",
                        "default": false
                    },
                    "response_format": response_format_schema()
                },
                "required": ["call_id"]
            }),
        },
        Tool {
            name: "get_transcript".to_string(),
            description: "Get the transcript of a call with speaker identification. \
                Use 'structured' for timestamps or 'raw' for the full API response."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "call_id": call_id_schema(),
                    "format": {
                        "type": "string",
                        "enum": ["text", "structured", "raw"],
                        "description": "Transcript output format",
                        "default": "text"
                    },
                    "speaker_labels": {
                        "type": "string",
                        "enum": ["role", "type", "detailed"],
                        "description": "How to label speakers: role (Agent/Customer), type (internal/external), or detailed",
                        "default": "role"
                    }
                },
                "required": ["call_id"]
            }),
        },
        Tool {
            name: "search_transcripts".to_string(),
            description: "Search call transcripts for a word or phrase. Searches specific calls \
                when call_ids is given, otherwise the most recent calls in the date range."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "minLength": 2,
                        "maxLength": 200,
                        "description": "Text to search for in transcripts"
                    },
                    "call_ids": {
                        "type": "array",
                        "items": {"type": "integer", "minimum": 1},
                        "maxItems": 20,
                        "description": "Specific call IDs to search"
                    },
                    "from_date": date_schema("Start date (ISO format or Unix timestamp)"),
                    "to_date": date_schema("End date (ISO format or Unix timestamp)"),
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 50,
                        "description": "Maximum number of calls to search",
                        "default": 10
                    },
                    "case_sensitive": {
                        "type": "boolean",
                        "description": "Match case exactly",
                        "default": false
                    }
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: "get_summary".to_string(),
            description: "Get the AI-generated summary of a call.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "call_id": call_id_schema(),
                    "response_format": response_format_schema()
                },
                "required": ["call_id"]
            }),
        },
        Tool {
            name: "get_call_insights".to_string(),
            description: "Get everything about a call in one request: details, AI summary, \
                and transcript."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "call_id": call_id_schema(),
                    "response_format": response_format_schema()
                },
                "required": ["call_id"]
            }),
        },
        Tool {
            name: "ask".to_string(),
            description: "Ask a natural-language question about calls, such as \
                'any calls about refunds yesterday?' or 'calls mentioning pricing last week'. \
                Understands date phrases and searches transcripts for the topic."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "The question to ask"
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 50,
                        "description": "Maximum number of calls to search",
                        "default": 20
                    }
                },
                "required": ["question"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::TOOL_NAMES;

    #[test]
    fn test_definitions_match_registry() {
        let names: Vec<String> = get_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, TOOL_NAMES);
    }

    #[test]
    fn test_schemas_are_objects() {
        for tool in get_tools() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert!(tool.input_schema["required"].is_array());
        }
    }
}

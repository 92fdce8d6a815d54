//! The seven read-only Aircall tools.
//!
//! Every tool takes loose JSON arguments and returns display text. Invalid
//! arguments never reach the network; upstream failures are reported as
//! `Error: ...` text rather than propagated.

pub mod params;

pub use params::{
    parse_args, AskParams, CallIdParams, DirectionFilter, GetCallParams, GetTranscriptParams,
    ListCallsParams, ResponseFormat, SearchTranscriptsParams, TranscriptFormat,
};

use crate::client::{AircallClient, Call, ListCallsQuery};
use crate::error::{AircallError, Result};
use crate::format::{
    call_detail_lines, format_datetime, format_transcript_text, CallRecord, SpeakerLabels,
};
use crate::query::{CallInsights, QueryEngine, SearchNeedle};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Excerpts shown per call in `search_transcripts` results.
const SEARCH_EXCERPTS: usize = 5;

/// Names of all registered tools, in listing order.
pub const TOOL_NAMES: &[&str] = &[
    "list_calls",
    "get_call",
    "get_transcript",
    "search_transcripts",
    "get_summary",
    "get_call_insights",
    "ask",
];

/// Dispatches tool invocations against a shared client.
#[derive(Clone)]
pub struct ToolRegistry {
    engine: QueryEngine,
}

impl ToolRegistry {
    pub fn new(engine: QueryEngine) -> Self {
        Self { engine }
    }

    /// Registry over a fresh engine with the default search deadline.
    pub fn from_client(client: Arc<AircallClient>) -> Self {
        Self::new(QueryEngine::new(client))
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    fn client(&self) -> &AircallClient {
        self.engine.client()
    }

    /// Invoke a tool by name. Returns `None` for an unknown tool.
    pub async fn call(&self, name: &str, args: Value) -> Option<String> {
        info!(tool = name, "Tool call");
        let output = match name {
            "list_calls" => decode_then(args, |p: ListCallsParams| self.list_calls(p)).await,
            "get_call" => decode_then(args, |p: GetCallParams| self.get_call(p)).await,
            "get_transcript" => {
                decode_then(args, |p: GetTranscriptParams| self.get_transcript(p)).await
            }
            "search_transcripts" => {
                decode_then(args, |p: SearchTranscriptsParams| self.search_transcripts(p)).await
            }
            "get_summary" => decode_then(args, |p: CallIdParams| self.get_summary(p)).await,
            "get_call_insights" => {
                decode_then(args, |p: CallIdParams| self.get_call_insights(p)).await
            }
            "ask" => decode_then(args, |p: AskParams| self.ask(p)).await,
            _ => return None,
        };
        Some(output)
    }

    /// List calls with pagination and filters.
    pub async fn list_calls(&self, params: ListCallsParams) -> String {
        match params.validate() {
            Ok(()) => respond(self.run_list_calls(params).await),
            Err(e) => error_text(&e),
        }
    }

    /// Details of one call, optionally with transcript and summary.
    pub async fn get_call(&self, params: GetCallParams) -> String {
        match params.validate() {
            Ok(()) => respond(self.run_get_call(params).await),
            Err(e) => error_text(&e),
        }
    }

    /// A call's transcript as text, timestamped text, or raw JSON.
    pub async fn get_transcript(&self, params: GetTranscriptParams) -> String {
        match params.validate() {
            Ok(()) => respond(self.run_get_transcript(params).await),
            Err(e) => error_text(&e),
        }
    }

    /// Substring search across transcripts.
    pub async fn search_transcripts(&self, params: SearchTranscriptsParams) -> String {
        match params.validate() {
            Ok(()) => respond(self.run_search_transcripts(params).await),
            Err(e) => error_text(&e),
        }
    }

    /// A call's AI summary.
    pub async fn get_summary(&self, params: CallIdParams) -> String {
        match params.validate() {
            Ok(()) => respond(self.run_get_summary(params).await),
            Err(e) => error_text(&e),
        }
    }

    /// Call details, summary, and transcript in one response.
    pub async fn get_call_insights(&self, params: CallIdParams) -> String {
        match params.validate() {
            Ok(()) => respond(self.run_get_call_insights(params).await),
            Err(e) => error_text(&e),
        }
    }

    /// Natural-language question over recent calls.
    pub async fn ask(&self, params: AskParams) -> String {
        self.engine.ask(&params.question, params.limit).await
    }

    async fn run_list_calls(&self, params: ListCallsParams) -> Result<String> {
        let (from, to) = params.date_bounds()?;
        let limit = params.limit as u64;
        let offset = params.offset as u64;
        let page = u32::try_from(offset / limit + 1).unwrap_or(u32::MAX);

        let query = ListCallsQuery {
            page,
            per_page: limit as u32,
            direction: params.direction.map(Into::into),
            from,
            to,
            ..Default::default()
        };
        let result = self.client().list_calls(&query).await?;
        let total_hint = result.meta.as_ref().and_then(|m| m.total);
        let mut calls = result.calls;

        // Post-filters apply to the fetched page only.
        if let Some(min) = params.min_duration.filter(|&m| m > 0) {
            calls.retain(|c| c.duration >= min as u64);
        }
        if let Some(tags) = params.tags.as_ref().filter(|t| !t.is_empty()) {
            let wanted: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
            calls.retain(|c| c.has_any_tag(&wanted));
        }
        debug!(page, kept = calls.len(), "Listed calls");

        if calls.is_empty() {
            return Ok("No calls found matching the specified criteria.".to_string());
        }

        let total = total_hint.unwrap_or(calls.len() as u64);
        let has_more = offset + (calls.len() as u64) < total;

        match params.response_format {
            ResponseFormat::Markdown => {
                let mut lines = vec![
                    "# Aircall Calls".to_string(),
                    String::new(),
                    format!("Showing {} calls (offset: {})", calls.len(), offset),
                ];
                if has_more {
                    lines.push(format!("*Use offset={} for next page*", offset + limit));
                }
                lines.push(String::new());
                for call in &calls {
                    lines.push(format!("## Call {}", call.id));
                    lines.extend(call_detail_lines(call));
                    lines.push(String::new());
                }
                Ok(lines.join("\n"))
            }
            ResponseFormat::Json => to_json(&json!({
                "total": total,
                "count": calls.len(),
                "offset": offset,
                "has_more": has_more,
                "calls": calls.iter().map(CallRecord::from).collect::<Vec<_>>(),
            })),
        }
    }

    async fn run_get_call(&self, params: GetCallParams) -> Result<String> {
        let call_id = params.call_id as u64;
        let call = self.client().get_call(call_id).await?;
        let transcript = if params.include_transcript {
            self.client().get_transcript(call_id).await?
        } else {
            None
        };
        let summary = if params.include_summary {
            self.client().get_summary(call_id).await?
        } else {
            None
        };
        let transcript_text =
            transcript.map(|t| format_transcript_text(&t, SpeakerLabels::Role, false));

        match params.response_format {
            ResponseFormat::Markdown => {
                let mut lines = vec![format!("# Call {}", call.id), String::new()];
                lines.extend(call_detail_lines(&call));
                if let Some(summary) = &summary {
                    lines.push(String::new());
                    lines.push("## Summary".to_string());
                    lines.push(summary_text(&summary.content));
                }
                if let Some(text) = transcript_text {
                    lines.push(String::new());
                    lines.push("## Transcript".to_string());
                    lines.push(text);
                }
                Ok(lines.join("\n"))
            }
            ResponseFormat::Json => {
                let mut response = serde_json::to_value(CallRecord::from(&call))?;
                if let Value::Object(map) = &mut response {
                    if let Some(summary) = summary {
                        map.insert("summary".to_string(), Value::String(summary.content));
                    }
                    if let Some(text) = transcript_text {
                        map.insert("transcript".to_string(), Value::String(text));
                    }
                }
                to_json(&response)
            }
        }
    }

    async fn run_get_transcript(&self, params: GetTranscriptParams) -> Result<String> {
        let call_id = params.call_id as u64;
        let Some(transcript) = self.client().get_transcript(call_id).await? else {
            return Ok(format!(
                "No transcript available for call {}. The call may not have been recorded or transcribed.",
                call_id
            ));
        };

        Ok(match params.format {
            TranscriptFormat::Raw => to_json(&transcript.raw)?,
            TranscriptFormat::Structured => {
                format_transcript_text(&transcript, params.speaker_labels, true)
            }
            TranscriptFormat::Text => {
                format_transcript_text(&transcript, params.speaker_labels, false)
            }
        })
    }

    async fn run_search_transcripts(&self, params: SearchTranscriptsParams) -> Result<String> {
        let limit = params.limit as usize;
        let calls = self.calls_to_search(&params, limit).await?;
        if calls.is_empty() {
            return Ok("No calls found to search.".to_string());
        }

        let needle = SearchNeedle::exact(&params.query, params.case_sensitive);
        let matches = match self.engine.search(calls, &needle, SEARCH_EXCERPTS).await {
            Ok(matches) => matches,
            Err(timeout) => {
                return Ok(format!(
                    "Search timed out after {} seconds. Try narrowing your date range or searching fewer calls.",
                    timeout.0.as_secs()
                ))
            }
        };

        if matches.is_empty() {
            return Ok(format!("No transcripts found containing '{}'.", params.query));
        }

        let mut lines = vec![
            format!("# Search Results for '{}'", params.query),
            String::new(),
            format!("Found {} calls with matching content", matches.len()),
            String::new(),
        ];
        for m in &matches {
            lines.push(format!("## Call {}", m.call.id));
            lines.push(format!("- **Date**: {}", format_datetime(m.call.started_at)));
            lines.push(format!("- **Direction**: {}", m.call.direction));
            lines.push(String::new());
            lines.push("**Matching excerpts:**".to_string());
            lines.extend(m.excerpts.iter().map(|e| format!("> {}", e)));
            lines.push(String::new());
        }
        Ok(lines.join("\n"))
    }

    async fn calls_to_search(
        &self,
        params: &SearchTranscriptsParams,
        limit: usize,
    ) -> Result<Vec<Call>> {
        match params.call_ids.as_ref().filter(|ids| !ids.is_empty()) {
            Some(ids) => {
                let ids: Vec<u64> = ids.iter().take(limit).map(|&id| id as u64).collect();
                Ok(self.client().get_calls(&ids).await)
            }
            None => {
                let (from, to) = params.date_bounds()?;
                let query = ListCallsQuery {
                    per_page: limit as u32,
                    from,
                    to,
                    ..Default::default()
                };
                Ok(self.client().list_calls(&query).await?.calls)
            }
        }
    }

    async fn run_get_summary(&self, params: CallIdParams) -> Result<String> {
        let call_id = params.call_id as u64;
        let Some(summary) = self.client().get_summary(call_id).await? else {
            return Ok(format!(
                "No summary available for call {}. The summary may still be processing or unavailable.",
                call_id
            ));
        };

        match params.response_format {
            ResponseFormat::Markdown => Ok(format!(
                "# Summary for Call {}\n\n{}",
                call_id,
                summary_text(&summary.content)
            )),
            ResponseFormat::Json => to_json(&json!({
                "call_id": call_id,
                "summary": summary.content,
            })),
        }
    }

    async fn run_get_call_insights(&self, params: CallIdParams) -> Result<String> {
        let call_id = params.call_id as u64;
        let CallInsights {
            call,
            transcript,
            summary,
        } = self.engine.insights(call_id).await?;
        let transcript_text =
            transcript.map(|t| format_transcript_text(&t, SpeakerLabels::Role, false));

        match params.response_format {
            ResponseFormat::Markdown => {
                let mut lines = vec![
                    format!("# Call Insights: {}", call_id),
                    String::new(),
                    "## Call Details".to_string(),
                ];
                lines.extend(call_detail_lines(&call));
                lines.push(String::new());
                lines.push("## Summary".to_string());
                lines.push(match &summary {
                    Some(s) => summary_text(&s.content),
                    None => "*No summary available*".to_string(),
                });
                lines.push(String::new());
                lines.push("## Transcript".to_string());
                lines.push(
                    transcript_text.unwrap_or_else(|| "*No transcript available*".to_string()),
                );
                Ok(lines.join("\n"))
            }
            ResponseFormat::Json => {
                let record = CallRecord::from(&call);
                to_json(&json!({
                    "call_id": call_id,
                    "direction": record.direction,
                    "duration_seconds": record.duration_seconds,
                    "started_at": record.started_at,
                    "date": record.date,
                    "agent_name": record.agent_name,
                    "number_name": record.number_name,
                    "tags": record.tags,
                    "summary": summary.map(|s| s.content),
                    "transcript": transcript_text,
                }))
            }
        }
    }
}

async fn decode_then<P, F, Fut>(args: Value, run: F) -> String
where
    P: DeserializeOwned,
    F: FnOnce(P) -> Fut,
    Fut: Future<Output = String>,
{
    match parse_args::<P>(args) {
        Ok(params) => run(params).await,
        Err(e) => error_text(&e),
    }
}

fn respond(result: Result<String>) -> String {
    result.unwrap_or_else(|e| error_text(&e))
}

fn error_text(error: &AircallError) -> String {
    format!("Error: {}", error)
}

fn summary_text(content: &str) -> String {
    if content.is_empty() {
        "No summary content.".to_string()
    } else {
        content.to_string()
    }
}

fn to_json(value: &impl serde::Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use std::time::Duration;

    fn registry() -> ToolRegistry {
        // Nothing listens here; tests below must fail before any request.
        let client = AircallClient::new(ClientConfig {
            api_id: Some("id".to_string()),
            api_token: Some("token".to_string()),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
            requests_per_minute: 60,
        })
        .unwrap();
        ToolRegistry::from_client(Arc::new(client))
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        assert!(registry().call("delete_call", json!({})).await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_reported() {
        let registry = registry();

        let output = registry.call("list_calls", json!({"limit": 0})).await.unwrap();
        assert!(output.starts_with("Error: Invalid parameters - limit"));

        let output = registry.call("get_call", json!({})).await.unwrap();
        assert!(output.starts_with("Error: Invalid parameters - missing field `call_id`"));

        let output = registry
            .call("get_transcript", json!({"call_id": 1, "format": "xml"}))
            .await
            .unwrap();
        assert!(output.starts_with("Error: Invalid parameters"));

        let output = registry
            .call("search_transcripts", json!({"query": "x"}))
            .await
            .unwrap();
        assert!(output.starts_with("Error: Invalid parameters - query"));
    }

    #[tokio::test]
    async fn test_short_question() {
        let output = registry().call("ask", json!({"question": " a b "})).await.unwrap();
        assert_eq!(output, "Please provide a question with at least 3 characters.");
    }

    #[test]
    fn test_tool_names() {
        assert_eq!(TOOL_NAMES.len(), 7);
        assert!(TOOL_NAMES.contains(&"get_call_insights"));
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(summary_text(""), "No summary content.");
        assert_eq!(summary_text("Billing issue"), "Billing issue");
    }
}

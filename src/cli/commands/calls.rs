//! Single-call and call-listing commands.

use super::{response_format, run_tool};
use crate::config::Settings;
use crate::format::SpeakerLabels;
use crate::tools::TranscriptFormat;
use anyhow::Result;
use serde_json::json;

/// Options for the calls command.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub limit: i64,
    pub offset: i64,
    pub direction: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub min_duration: Option<i64>,
    pub tags: Vec<String>,
    pub json: bool,
}

/// List calls.
pub async fn run_calls(options: ListOptions, settings: &Settings) -> Result<()> {
    let mut args = json!({
        "limit": options.limit,
        "offset": options.offset,
        "direction": options.direction,
        "from_date": options.from,
        "to_date": options.to,
        "min_duration": options.min_duration,
        "response_format": response_format(options.json),
    });
    if !options.tags.is_empty() {
        args["tags"] = json!(options.tags);
    }

    run_tool(settings, "list_calls", args, "Fetching calls...").await
}

/// Show one call.
pub async fn run_call(
    call_id: i64,
    transcript: bool,
    summary: bool,
    json: bool,
    settings: &Settings,
) -> Result<()> {
    let args = json!({
        "call_id": call_id,
        "include_transcript": transcript,
        "include_summary": summary,
        "response_format": response_format(json),
    });
    run_tool(settings, "get_call", args, "Fetching call...").await
}

/// Show a call transcript.
pub async fn run_transcript(
    call_id: i64,
    format: TranscriptFormat,
    speakers: SpeakerLabels,
    settings: &Settings,
) -> Result<()> {
    let args = json!({
        "call_id": call_id,
        "format": format,
        "speaker_labels": speakers,
    });
    run_tool(settings, "get_transcript", args, "Fetching transcript...").await
}

/// Show a call summary.
pub async fn run_summary(call_id: i64, json: bool, settings: &Settings) -> Result<()> {
    let args = json!({"call_id": call_id, "response_format": response_format(json)});
    run_tool(settings, "get_summary", args, "Fetching summary...").await
}

/// Show call details, summary, and transcript.
pub async fn run_insights(call_id: i64, json: bool, settings: &Settings) -> Result<()> {
    let args = json!({"call_id": call_id, "response_format": response_format(json)});
    run_tool(settings, "get_call_insights", args, "Fetching call insights...").await
}

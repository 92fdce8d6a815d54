//! Rendering of calls, transcripts, and summaries.
//!
//! All functions here are pure: the same input always yields the same text.

use crate::client::{Call, Transcript, Utterance};
use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

/// How speakers are labelled in transcript output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerLabels {
    /// Agent / Customer / AI Assistant.
    #[default]
    Role,
    /// Raw participant type (internal / external / ai_voice_agent).
    Type,
    /// Participant type plus agent ID or phone number.
    Detailed,
}

impl std::str::FromStr for SpeakerLabels {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "role" => Ok(SpeakerLabels::Role),
            "type" => Ok(SpeakerLabels::Type),
            "detailed" => Ok(SpeakerLabels::Detailed),
            _ => Err(format!(
                "Unknown speaker labels: {}. Use role, type, or detailed.",
                s
            )),
        }
    }
}

/// Format a Unix timestamp as local `YYYY-MM-DD HH:MM:SS`.
pub fn format_datetime(timestamp: Option<i64>) -> String {
    match timestamp.filter(|&t| t != 0) {
        Some(ts) => Local
            .timestamp_opt(ts, 0)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "Unknown".to_string()),
        None => "Unknown".to_string(),
    }
}

/// Format a duration in seconds as `Xm Ys` or `Ys`.
pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Label for the speaker of an utterance.
pub fn speaker_label(utterance: &Utterance, labels: SpeakerLabels) -> String {
    let participant = utterance.participant_type;
    match labels {
        SpeakerLabels::Role => participant.role_label().to_string(),
        SpeakerLabels::Type => participant.as_str().to_string(),
        SpeakerLabels::Detailed => {
            let base = participant.as_str();
            if let Some(agent_id) = utterance.ai_voice_agent_id.as_deref().filter(|s| !s.is_empty()) {
                let short: String = agent_id.chars().take(8).collect();
                format!("{} ({}...)", base, short)
            } else if let Some(phone) = utterance.phone_number.as_deref().filter(|s| !s.is_empty()) {
                format!("{} ({})", base, phone)
            } else {
                base.to_string()
            }
        }
    }
}

/// Render transcript utterances as readable lines. Empty utterances are skipped.
pub fn format_transcript_text(
    transcript: &Transcript,
    labels: SpeakerLabels,
    include_timestamps: bool,
) -> String {
    if transcript.utterances.is_empty() {
        return "No transcript content available.".to_string();
    }

    transcript
        .utterances
        .iter()
        .filter_map(|u| {
            let text = u.text.trim();
            if text.is_empty() {
                return None;
            }
            let speaker = speaker_label(u, labels);
            Some(if include_timestamps {
                format!("[{:.1}s] {}: {}", u.start_time, speaker, text)
            } else {
                format!("{}: {}", speaker, text)
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Markdown bullet lines describing a call.
pub fn call_detail_lines(call: &Call) -> Vec<String> {
    let mut lines = vec![
        format!("- **Direction**: {}", call.direction),
        format!("- **Duration**: {}", format_duration(call.duration)),
        format!("- **Date**: {}", format_datetime(call.started_at)),
    ];
    if let Some(agent) = call.agent_name() {
        lines.push(format!("- **Agent**: {}", agent));
    }
    if let Some(number) = call.number_name() {
        lines.push(format!("- **Number**: {}", number));
    }
    let tags = call.tag_names();
    if !tags.is_empty() {
        lines.push(format!("- **Tags**: {}", tags.join(", ")));
    }
    lines
}

/// Short markdown section used in search and ask results.
pub fn call_brief_lines(call: &Call) -> Vec<String> {
    let mut lines = vec![
        format!("## Call {}", call.id),
        format!("- **Date**: {}", format_datetime(call.started_at)),
        format!("- **Direction**: {}", call.direction),
        format!("- **Duration**: {}", format_duration(call.duration)),
    ];
    if let Some(agent) = call.agent_name() {
        lines.push(format!("- **Agent**: {}", agent));
    }
    lines
}

/// JSON shape of a call in tool output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CallRecord {
    pub id: u64,
    pub direction: String,
    pub duration_seconds: u64,
    pub started_at: Option<i64>,
    pub date: String,
    pub agent_name: Option<String>,
    pub number_name: Option<String>,
    pub tags: Vec<String>,
}

impl From<&Call> for CallRecord {
    fn from(call: &Call) -> Self {
        Self {
            id: call.id,
            direction: call.direction.to_string(),
            duration_seconds: call.duration,
            started_at: call.started_at,
            date: format_datetime(call.started_at),
            agent_name: call.agent_name().map(str::to_string),
            number_name: call.number_name().map(str::to_string),
            tags: call.tag_names().into_iter().map(str::to_string).collect(),
        }
    }
}

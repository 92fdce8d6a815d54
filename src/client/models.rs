//! Typed records for Aircall API responses.
//!
//! Upstream JSON is decoded once at the client boundary; missing or null
//! fields fall back to defaults instead of failing the whole response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Deserialize `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Call direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Inbound,
    Outbound,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CallDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallDirection::Inbound => "inbound",
            CallDirection::Outbound => "outbound",
            CallDirection::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CallDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inbound" => Ok(CallDirection::Inbound),
            "outbound" => Ok(CallDirection::Outbound),
            _ => Err(format!(
                "Unknown direction: {}. Use 'inbound' or 'outbound'.",
                s
            )),
        }
    }
}

/// A named reference (user, number, tag) embedded in a call.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// A single call as returned by `/calls` and `/calls/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Call {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub direction: CallDirection,
    /// Duration in seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: u64,
    /// Start time as Unix epoch seconds.
    #[serde(default)]
    pub started_at: Option<i64>,
    /// Agent who handled the call.
    #[serde(default)]
    pub user: Option<NamedRef>,
    /// Aircall number the call went through.
    #[serde(default)]
    pub number: Option<NamedRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<NamedRef>,
}

impl Call {
    /// Name of the agent, if known.
    pub fn agent_name(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .filter(|n| !n.is_empty())
    }

    /// Name of the Aircall number, if known.
    pub fn number_name(&self) -> Option<&str> {
        self.number
            .as_ref()
            .and_then(|n| n.name.as_deref())
            .filter(|n| !n.is_empty())
    }

    /// Tag names in upstream order.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().filter_map(|t| t.name.as_deref()).collect()
    }

    /// Whether any tag matches one of `wanted` (already lowercased).
    pub fn has_any_tag(&self, wanted: &[String]) -> bool {
        self.tag_names()
            .iter()
            .any(|name| wanted.iter().any(|w| *w == name.to_lowercase()))
    }
}

/// Pagination metadata from `/calls`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PageMeta {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u64>,
}

/// One page of calls.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CallPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub calls: Vec<Call>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// Who spoke an utterance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantType {
    Internal,
    External,
    AiVoiceAgent,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ParticipantType {
    /// Wire name of the participant type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantType::Internal => "internal",
            ParticipantType::External => "external",
            ParticipantType::AiVoiceAgent => "ai_voice_agent",
            ParticipantType::Unknown => "unknown",
        }
    }

    /// Human role label.
    pub fn role_label(&self) -> &'static str {
        match self {
            ParticipantType::Internal => "Agent",
            ParticipantType::AiVoiceAgent => "AI Assistant",
            ParticipantType::External => "Customer",
            ParticipantType::Unknown => "Unknown",
        }
    }
}

/// A single transcribed utterance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Utterance {
    #[serde(default, deserialize_with = "null_as_default")]
    pub participant_type: ParticipantType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Offset from call start, in seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: f64,
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub ai_voice_agent_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct TranscriptContent {
    #[serde(default)]
    language: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    utterances: Vec<Utterance>,
}

#[derive(Debug, Clone, Deserialize)]
struct TranscriptWire {
    #[serde(default)]
    call_id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    content: TranscriptContent,
}

/// A call transcript, with utterances in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub call_id: u64,
    pub language: Option<String>,
    pub utterances: Vec<Utterance>,
    /// Upstream object as received.
    pub raw: Value,
}

impl Transcript {
    /// Decode a transcript object belonging to `call_id`.
    pub fn from_value(call_id: u64, raw: Value) -> serde_json::Result<Self> {
        let wire: TranscriptWire = serde_json::from_value(raw.clone())?;
        let mut utterances = wire.content.utterances;
        utterances.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        Ok(Self {
            call_id: wire.call_id.unwrap_or(call_id),
            language: wire.content.language,
            utterances,
            raw,
        })
    }
}

/// AI-generated call summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Summary {
    #[serde(default)]
    pub call_id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

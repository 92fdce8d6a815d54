//! Tool input types and their constraints.
//!
//! Arguments arrive as loose JSON. They are decoded with serde (types,
//! enumerations, defaults) and then checked by `validate` (ranges, lengths,
//! date formats) before any request is made.

use crate::client::CallDirection;
use crate::error::{AircallError, Result};
use crate::format::SpeakerLabels;
use crate::query::dates::{local_timestamp, parse_iso};
use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decode raw tool arguments; `null` is treated as an empty object.
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| AircallError::Validation(e.to_string()))
}

/// Output format for tool responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Markdown,
    Json,
}

/// Direction filter accepted by `list_calls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionFilter {
    Inbound,
    Outbound,
}

impl From<DirectionFilter> for CallDirection {
    fn from(direction: DirectionFilter) -> Self {
        match direction {
            DirectionFilter::Inbound => CallDirection::Inbound,
            DirectionFilter::Outbound => CallDirection::Outbound,
        }
    }
}

/// Transcript output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    /// Readable conversation.
    #[default]
    Text,
    /// Conversation with start offsets.
    Structured,
    /// Upstream JSON as received.
    Raw,
}

impl std::str::FromStr for TranscriptFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(TranscriptFormat::Text),
            "structured" => Ok(TranscriptFormat::Structured),
            "raw" => Ok(TranscriptFormat::Raw),
            _ => Err(format!(
                "Unknown transcript format: {}. Use text, structured, or raw.",
                s
            )),
        }
    }
}

fn check_range(name: &str, value: i64, min: i64, max: i64) -> Result<()> {
    if value < min || value > max {
        return Err(AircallError::Validation(format!(
            "{} must be between {} and {} (got {})",
            name, min, max, value
        )));
    }
    Ok(())
}

fn check_call_id(call_id: i64) -> Result<()> {
    if call_id <= 0 {
        return Err(AircallError::Validation(format!(
            "call_id must be greater than 0 (got {})",
            call_id
        )));
    }
    Ok(())
}

/// Parse a date argument: Unix epoch digits or an ISO date/date-time.
pub fn parse_date_param(value: &str) -> Result<i64> {
    let trimmed = value.trim();
    let invalid = || {
        AircallError::Validation(format!(
            "Invalid date format: {}. Use ISO format (2024-01-15) or Unix timestamp.",
            value
        ))
    };

    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.parse().map_err(|_| invalid());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.timestamp());
    }
    parse_iso(trimmed).map(local_timestamp).ok_or_else(invalid)
}

fn date_bounds(from: Option<&str>, to: Option<&str>) -> Result<(Option<i64>, Option<i64>)> {
    Ok((
        from.map(parse_date_param).transpose()?,
        to.map(parse_date_param).transpose()?,
    ))
}

fn default_list_limit() -> i64 {
    20
}

fn default_search_limit() -> i64 {
    10
}

/// Input for `list_calls`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListCallsParams {
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub direction: Option<DirectionFilter>,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub min_duration: Option<i64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl Default for ListCallsParams {
    fn default() -> Self {
        Self {
            limit: default_list_limit(),
            offset: 0,
            direction: None,
            from_date: None,
            to_date: None,
            min_duration: None,
            tags: None,
            response_format: ResponseFormat::Markdown,
        }
    }
}

impl ListCallsParams {
    pub fn validate(&self) -> Result<()> {
        check_range("limit", self.limit, 1, 100)?;
        if self.offset < 0 {
            return Err(AircallError::Validation(format!(
                "offset must be 0 or greater (got {})",
                self.offset
            )));
        }
        if let Some(min) = self.min_duration.filter(|&m| m < 0) {
            return Err(AircallError::Validation(format!(
                "min_duration must be 0 or greater (got {})",
                min
            )));
        }
        if let Some(tags) = self.tags.as_ref().filter(|t| t.len() > 10) {
            return Err(AircallError::Validation(format!(
                "tags accepts at most 10 items (got {})",
                tags.len()
            )));
        }
        self.date_bounds().map(|_| ())
    }

    /// Date filters as epoch seconds.
    pub fn date_bounds(&self) -> Result<(Option<i64>, Option<i64>)> {
        date_bounds(self.from_date.as_deref(), self.to_date.as_deref())
    }
}

/// Input for `get_call`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetCallParams {
    pub call_id: i64,
    #[serde(default)]
    pub include_transcript: bool,
    #[serde(default)]
    pub include_summary: bool,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl GetCallParams {
    pub fn validate(&self) -> Result<()> {
        check_call_id(self.call_id)
    }
}

/// Input for `get_transcript`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetTranscriptParams {
    pub call_id: i64,
    #[serde(default)]
    pub format: TranscriptFormat,
    #[serde(default)]
    pub speaker_labels: SpeakerLabels,
}

impl GetTranscriptParams {
    pub fn validate(&self) -> Result<()> {
        check_call_id(self.call_id)
    }
}

/// Input for `search_transcripts`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchTranscriptsParams {
    pub query: String,
    #[serde(default)]
    pub call_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl SearchTranscriptsParams {
    pub fn validate(&self) -> Result<()> {
        let len = self.query.chars().count();
        if !(2..=200).contains(&len) {
            return Err(AircallError::Validation(format!(
                "query must be between 2 and 200 characters (got {})",
                len
            )));
        }
        if let Some(ids) = &self.call_ids {
            if ids.len() > 20 {
                return Err(AircallError::Validation(format!(
                    "call_ids accepts at most 20 items (got {})",
                    ids.len()
                )));
            }
            ids.iter().try_for_each(|&id| check_call_id(id))?;
        }
        check_range("limit", self.limit, 1, 50)?;
        self.date_bounds().map(|_| ())
    }

    /// Date filters as epoch seconds.
    pub fn date_bounds(&self) -> Result<(Option<i64>, Option<i64>)> {
        date_bounds(self.from_date.as_deref(), self.to_date.as_deref())
    }
}

/// Input for `get_summary` and `get_call_insights`.
#[derive(Debug, Clone, Deserialize)]
pub struct CallIdParams {
    pub call_id: i64,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl CallIdParams {
    pub fn validate(&self) -> Result<()> {
        check_call_id(self.call_id)
    }
}

/// Input for `ask`. The limit is clamped rather than rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct AskParams {
    pub question: String,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_defaults() {
        let params: ListCallsParams = parse_args(Value::Null).unwrap();
        assert_eq!(params.limit, 20);
        assert_eq!(params.offset, 0);
        assert_eq!(params.response_format, ResponseFormat::Markdown);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_list_limit_range() {
        let params: ListCallsParams = parse_args(json!({"limit": 0})).unwrap();
        let err = params.validate().unwrap_err();
        assert!(err.to_string().starts_with("Invalid parameters - limit"));

        let params: ListCallsParams = parse_args(json!({"limit": 101})).unwrap();
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_unknown_enum_rejected() {
        let result = parse_args::<ListCallsParams>(json!({"direction": "sideways"}));
        assert!(matches!(result, Err(AircallError::Validation(_))));

        let result = parse_args::<ListCallsParams>(json!({"response_format": "xml"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_too_many_tags() {
        let tags: Vec<String> = (0..11).map(|i| format!("t{}", i)).collect();
        let params: ListCallsParams = parse_args(json!({"tags": tags})).unwrap();
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_date_params() {
        assert_eq!(parse_date_param("1700000000").unwrap(), 1_700_000_000);
        assert_eq!(
            parse_date_param("2024-01-15T10:00:00Z").unwrap(),
            1_705_312_800
        );
        assert!(parse_date_param("2024-01-15").is_ok());
        assert!(parse_date_param("last tuesday").is_err());
        assert!(parse_date_param("").is_err());

        let params: ListCallsParams = parse_args(json!({"from_date": "01/15/2024"})).unwrap();
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid date format: 01/15/2024"));
    }

    #[test]
    fn test_call_id_must_be_positive() {
        let params: GetCallParams = parse_args(json!({"call_id": 0})).unwrap();
        assert!(params.validate().is_err());

        let result = parse_args::<GetCallParams>(json!({}));
        assert!(result.unwrap_err().to_string().contains("call_id"));
    }

    #[test]
    fn test_search_constraints() {
        let params: SearchTranscriptsParams = parse_args(json!({"query": "a"})).unwrap();
        assert!(params.validate().is_err());

        let params: SearchTranscriptsParams =
            parse_args(json!({"query": "refund", "call_ids": (1..=21).collect::<Vec<i64>>()}))
                .unwrap();
        assert!(params.validate().is_err());

        let params: SearchTranscriptsParams =
            parse_args(json!({"query": "refund", "limit": 51})).unwrap();
        assert!(params.validate().is_err());

        let params: SearchTranscriptsParams = parse_args(json!({"query": "refund"})).unwrap();
        assert_eq!(params.limit, 10);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_transcript_enums() {
        let params: GetTranscriptParams = parse_args(json!({
            "call_id": 5,
            "format": "structured",
            "speaker_labels": "detailed"
        }))
        .unwrap();
        assert_eq!(params.format, TranscriptFormat::Structured);
        assert_eq!(params.speaker_labels, SpeakerLabels::Detailed);
    }
}

//! Aircall REST API client.
//!
//! Every request passes through a shared [`RateLimiter`] before it is sent.
//! HTTP and transport failures are mapped onto [`AircallError`] variants;
//! a 404 on transcript and summary endpoints means "not available" and is
//! returned as `None`.

mod models;
mod rate_limiter;

pub use models::{
    Call, CallDirection, CallPage, NamedRef, PageMeta, ParticipantType, Summary, Transcript,
    Utterance,
};
pub use rate_limiter::RateLimiter;

use crate::config::AircallSettings;
use crate::error::{AircallError, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Query for `GET /calls`, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ListCallsQuery {
    pub page: u32,
    pub per_page: u32,
    pub direction: Option<CallDirection>,
    /// Lower bound, Unix epoch seconds.
    pub from: Option<i64>,
    /// Upper bound, Unix epoch seconds.
    pub to: Option<i64>,
}

impl Default for ListCallsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            direction: None,
            from: None,
            to: None,
        }
    }
}

impl ListCallsQuery {
    /// Query string pairs; absent filters are omitted entirely.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("order", "desc".to_string()),
        ];
        if let Some(direction) = self.direction {
            pairs.push(("direction", direction.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.to_string()));
        }
        pairs
    }
}

/// Construction options for [`AircallClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_id: Option<String>,
    pub api_token: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub requests_per_minute: u32,
}

impl From<&AircallSettings> for ClientConfig {
    fn from(settings: &AircallSettings) -> Self {
        Self {
            api_id: settings.api_id.clone(),
            api_token: settings.api_token.clone(),
            base_url: settings.base_url.clone(),
            timeout: Duration::from_secs(settings.timeout_seconds),
            requests_per_minute: settings.rate_limit,
        }
    }
}

/// Authenticated, rate-limited client for the Aircall API.
pub struct AircallClient {
    api_id: String,
    api_token: String,
    base_url: String,
    timeout: Duration,
    rate_limiter: RateLimiter,
    http: Mutex<Option<reqwest::Client>>,
}

impl AircallClient {
    /// Create a client. Fails with `CredentialsMissing` if either credential is absent.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let (api_id, api_token) = match (non_empty(config.api_id), non_empty(config.api_token)) {
            (Some(id), Some(token)) => (id, token),
            _ => return Err(AircallError::CredentialsMissing),
        };

        let base_url = url::Url::parse(&config.base_url)
            .map_err(|e| AircallError::Config(format!("Invalid base URL '{}': {}", config.base_url, e)))?;

        Ok(Self {
            api_id,
            api_token,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            timeout: config.timeout,
            rate_limiter: RateLimiter::new(config.requests_per_minute),
            http: Mutex::new(None),
        })
    }

    /// Create a client from loaded settings.
    pub fn from_settings(settings: &AircallSettings) -> Result<Self> {
        Self::new(ClientConfig::from(settings))
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The limiter shared by every request from this client.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Get the HTTP client, creating it on first use.
    fn http(&self) -> Result<reqwest::Client> {
        let mut slot = self.http.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AircallError::request_failed(format!("Request failed: {}", e)))?;
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Release the pooled connection. Safe to call more than once; a later
    /// request opens a fresh one.
    pub fn close(&self) {
        let mut slot = self.http.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            debug!("Closed Aircall HTTP client");
        }
    }

    /// Issue a rate-limited GET and decode the JSON body.
    #[instrument(skip(self, query))]
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.rate_limiter.acquire().await;

        let http = self.http()?;
        let url = format!("{}{}", self.base_url, path);

        let response = http
            .get(&url)
            .basic_auth(&self.api_id, Some(&self.api_token))
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Aircall request failed");
            return Err(error_for_status(status, body, self.rate_limiter.limit()));
        }

        let body = response.text().await.map_err(map_transport_error)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// List calls with pagination and filtering.
    pub async fn list_calls(&self, query: &ListCallsQuery) -> Result<CallPage> {
        let data = self.get_json("/calls", &query.to_pairs()).await?;
        let page: CallPage = serde_json::from_value(data)?;
        debug!("Fetched {} calls", page.calls.len());
        Ok(page)
    }

    /// Get details for a specific call.
    pub async fn get_call(&self, call_id: u64) -> Result<Call> {
        let data = self.get_json(&format!("/calls/{}", call_id), &[]).await?;
        Ok(serde_json::from_value(unwrap_envelope(data, "call"))?)
    }

    /// Get the transcript for a call, or `None` if it has none.
    pub async fn get_transcript(&self, call_id: u64) -> Result<Option<Transcript>> {
        match self
            .get_json(&format!("/calls/{}/transcription", call_id), &[])
            .await
        {
            Ok(data) => Ok(Some(Transcript::from_value(
                call_id,
                unwrap_envelope(data, "transcription"),
            )?)),
            Err(AircallError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get the AI summary for a call, or `None` if it has none.
    pub async fn get_summary(&self, call_id: u64) -> Result<Option<Summary>> {
        match self.get_json(&format!("/calls/{}/summary", call_id), &[]).await {
            Ok(data) => Ok(Some(serde_json::from_value(unwrap_envelope(data, "summary"))?)),
            Err(AircallError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch several calls by ID; calls that fail to load are skipped.
    pub async fn get_calls(&self, call_ids: &[u64]) -> Vec<Call> {
        let fetches = call_ids.iter().map(|&id| async move {
            match self.get_call(id).await {
                Ok(call) => Some(call),
                Err(e) => {
                    debug!(call_id = id, "Skipping call: {}", e);
                    None
                }
            }
        });
        futures::future::join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Take `data[key]` when the response is wrapped, or the whole body otherwise.
fn unwrap_envelope(mut data: Value, key: &str) -> Value {
    match data.get_mut(key) {
        Some(inner) if inner.is_object() => inner.take(),
        _ => data,
    }
}

/// Map a non-success HTTP status onto a domain error.
///
/// `rate_limit` is the configured requests per minute, reported on 429.
pub fn error_for_status(status: StatusCode, body: String, rate_limit: usize) -> AircallError {
    match status.as_u16() {
        401 => AircallError::InvalidCredentials,
        403 => AircallError::PermissionDenied,
        404 => AircallError::NotFound,
        429 => AircallError::RateLimitExceeded { limit: rate_limit },
        code if code >= 500 => AircallError::UpstreamUnavailable { status: code },
        code => AircallError::RequestFailed {
            message: format!("API request failed: {}", body),
            status: Some(code),
        },
    }
}

fn map_transport_error(e: reqwest::Error) -> AircallError {
    if e.is_timeout() {
        AircallError::Timeout
    } else {
        AircallError::request_failed(format!("Request failed: {}", e))
    }
}

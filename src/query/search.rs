//! Concurrent transcript search across a batch of calls.

use super::terms::SearchNeedle;
use crate::client::{AircallClient, Call};
use futures::future::join_all;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// A call whose transcript matched, with role-labelled excerpts.
#[derive(Debug, Clone, PartialEq)]
pub struct CallMatch {
    pub call: Call,
    pub excerpts: Vec<String>,
}

/// The batch did not finish before its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("transcript search exceeded {0:?}")]
pub struct SearchTimedOut(pub Duration);

/// Fetch every call's transcript concurrently and collect matching excerpts.
///
/// A call whose transcript is missing or fails to load contributes nothing.
/// If the whole batch is not done within `deadline`, nothing is returned and
/// the outstanding fetches are dropped.
pub async fn search_transcripts(
    client: &AircallClient,
    calls: Vec<Call>,
    needle: &SearchNeedle,
    max_excerpts: usize,
    deadline: Duration,
) -> Result<Vec<CallMatch>, SearchTimedOut> {
    let searches = calls
        .into_iter()
        .map(|call| search_one(client, call, needle, max_excerpts));

    match tokio::time::timeout(deadline, join_all(searches)).await {
        Ok(results) => Ok(results.into_iter().flatten().collect()),
        Err(_) => {
            warn!("Transcript search timed out after {:?}", deadline);
            Err(SearchTimedOut(deadline))
        }
    }
}

async fn search_one(
    client: &AircallClient,
    call: Call,
    needle: &SearchNeedle,
    max_excerpts: usize,
) -> Option<CallMatch> {
    let transcript = match client.get_transcript(call.id).await {
        Ok(Some(transcript)) => transcript,
        Ok(None) => return None,
        Err(e) => {
            debug!(call_id = call.id, "Skipping transcript: {}", e);
            return None;
        }
    };

    let excerpts: Vec<String> = transcript
        .utterances
        .iter()
        .filter(|u| needle.matches(&u.text))
        .take(max_excerpts)
        .map(|u| format!("{}: {}", u.participant_type.role_label(), u.text))
        .collect();

    if excerpts.is_empty() {
        None
    } else {
        Some(CallMatch { call, excerpts })
    }
}

//! Multi-call workflows on top of the Aircall client.
//!
//! The centrepiece is [`QueryEngine::ask`], which answers a free-text
//! question in one pass:
//!
//! 1. pull a date phrase out of the question ("yesterday", "last week"),
//! 2. strip question phrasing to find the search term,
//! 3. list calls in the date range,
//! 4. search their transcripts concurrently under one deadline,
//! 5. render the matches as markdown.

pub mod dates;
mod search;
pub mod terms;

pub use dates::{
    extract_date_from_query, extract_date_from_query_at, parse_natural_date,
    parse_natural_date_at, DateExtraction, DateRange,
};
pub use search::{search_transcripts, CallMatch, SearchTimedOut};
pub use terms::{extract_search_terms, SearchNeedle};

use crate::client::{AircallClient, Call, ListCallsQuery, Summary, Transcript};
use crate::error::Result;
use crate::format::call_brief_lines;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Wall-clock ceiling for one batch of transcript searches.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Excerpts shown per call in `ask` answers.
const ASK_EXCERPTS: usize = 3;

/// Calls shown when `ask` has no search term.
const ASK_LIST_LIMIT: usize = 10;

/// Everything known about a single call.
#[derive(Debug, Clone)]
pub struct CallInsights {
    pub call: Call,
    pub transcript: Option<Transcript>,
    pub summary: Option<Summary>,
}

/// Orchestrates list/fetch/search workflows.
#[derive(Clone)]
pub struct QueryEngine {
    client: Arc<AircallClient>,
    search_timeout: Duration,
}

impl QueryEngine {
    /// Create an engine over a shared client.
    pub fn new(client: Arc<AircallClient>) -> Self {
        Self {
            client,
            search_timeout: SEARCH_TIMEOUT,
        }
    }

    /// Override the transcript search deadline.
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    /// The underlying API client.
    pub fn client(&self) -> &AircallClient {
        &self.client
    }

    /// The transcript search deadline.
    pub fn search_timeout(&self) -> Duration {
        self.search_timeout
    }

    /// Search the transcripts of `calls` under the engine's deadline.
    pub async fn search(
        &self,
        calls: Vec<Call>,
        needle: &SearchNeedle,
        max_excerpts: usize,
    ) -> std::result::Result<Vec<CallMatch>, SearchTimedOut> {
        search_transcripts(&self.client, calls, needle, max_excerpts, self.search_timeout).await
    }

    /// Fetch a call together with its transcript and summary.
    pub async fn insights(&self, call_id: u64) -> Result<CallInsights> {
        let (call, transcript, summary) = tokio::try_join!(
            self.client.get_call(call_id),
            self.client.get_transcript(call_id),
            self.client.get_summary(call_id),
        )?;
        Ok(CallInsights {
            call,
            transcript,
            summary,
        })
    }

    /// Answer a natural-language question about calls.
    ///
    /// Always returns a displayable string; failures become messages.
    pub async fn ask(&self, question: &str, limit: i64) -> String {
        if question.chars().filter(|c| !c.is_whitespace()).count() < 3 {
            return "Please provide a question with at least 3 characters.".to_string();
        }
        let limit = limit.clamp(1, 50) as u32;

        match self.run_ask(question, limit).await {
            Ok(answer) => answer,
            Err(e) => format!("Error accessing Aircall: {}", e),
        }
    }

    async fn run_ask(&self, question: &str, limit: u32) -> Result<String> {
        let extraction = extract_date_from_query(question);
        let search_terms = extract_search_terms(&extraction.cleaned);
        let date_desc = extraction.range.map(|r| r.describe());
        debug!(?date_desc, terms = %search_terms, "Parsed question");

        let query = ListCallsQuery {
            per_page: limit,
            from: extraction.range.map(|r| r.start_timestamp()),
            to: extraction.range.map(|r| r.end_timestamp()),
            ..Default::default()
        };
        let calls = self.client.list_calls(&query).await?.calls;

        if calls.is_empty() {
            return Ok(match &date_desc {
                Some(desc) => format!("No calls found {}.", desc),
                None => "No calls found.".to_string(),
            });
        }

        if search_terms.chars().count() < 2 {
            return Ok(format_call_listing(&calls, date_desc.as_deref()));
        }

        let searched = calls.len();
        let needle = SearchNeedle::loose(&search_terms);
        let matches = match self.search(calls, &needle, ASK_EXCERPTS).await {
            Ok(matches) => matches,
            Err(timeout) => {
                return Ok(format!(
                    "Search timed out after {} seconds. Try narrowing your date range or being more specific.",
                    timeout.0.as_secs()
                ))
            }
        };
        info!(searched, matched = matches.len(), "Transcript search complete");

        if matches.is_empty() {
            let searched_msg = match &date_desc {
                Some(desc) => format!("Searched {} calls {}", searched, desc),
                None => format!("Searched {} calls", searched),
            };
            return Ok(format!(
                "No calls found mentioning '{}'. {}, but none contained matching content in their transcripts.",
                search_terms, searched_msg
            ));
        }

        Ok(format_matches(&matches, &search_terms, date_desc.as_deref()))
    }
}

fn format_matches(matches: &[CallMatch], terms: &str, date_desc: Option<&str>) -> String {
    let mut lines = vec![format!(
        "# Found {} call(s) mentioning '{}'",
        matches.len(),
        terms
    )];
    if let Some(desc) = date_desc {
        lines.push(format!("*{}*", desc));
    }
    lines.push(String::new());

    for m in matches {
        lines.extend(call_brief_lines(&m.call));
        lines.push(String::new());
        lines.push("**Relevant excerpts:**".to_string());
        lines.extend(m.excerpts.iter().map(|e| format!("> {}", e)));
        lines.push(String::new());
    }

    lines.join("\n")
}

fn format_call_listing(calls: &[Call], date_desc: Option<&str>) -> String {
    let mut lines = vec![format!("# {} call(s) found", calls.len())];
    if let Some(desc) = date_desc {
        lines.push(format!("*{}*", desc));
    }
    lines.push(String::new());

    for call in calls.iter().take(ASK_LIST_LIMIT) {
        lines.extend(call_brief_lines(call));
        lines.push(String::new());
    }

    if calls.len() > ASK_LIST_LIMIT {
        lines.push(format!("*...and {} more calls*", calls.len() - ASK_LIST_LIMIT));
        lines.push(String::new());
        lines.push(
            "Tip: Add a search term to find specific content (e.g., 'calls about pricing today')"
                .to_string(),
        );
    }

    lines.join("\n")
}

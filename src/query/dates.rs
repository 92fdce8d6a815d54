//! Natural-language date parsing.
//!
//! Turns phrases like "yesterday" or "past 3 days" into concrete local
//! date-time ranges, and pulls such phrases out of free-text questions.

use chrono::{
    Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone,
};
use regex::Regex;
use std::sync::LazyLock;

/// An inclusive local date-time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Start as Unix epoch seconds.
    pub fn start_timestamp(&self) -> i64 {
        local_timestamp(self.start)
    }

    /// End as Unix epoch seconds.
    pub fn end_timestamp(&self) -> i64 {
        local_timestamp(self.end)
    }

    /// Human description: "on 2024-01-15" or "from 2024-01-08 to 2024-01-14".
    pub fn describe(&self) -> String {
        let start = self.start.date();
        let end = self.end.date();
        if start == end {
            format!("on {}", start.format("%Y-%m-%d"))
        } else {
            format!(
                "from {} to {}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            )
        }
    }
}

/// Convert a local wall-clock time to epoch seconds.
pub fn local_timestamp(dt: NaiveDateTime) -> i64 {
    Local
        .from_local_datetime(&dt)
        .earliest()
        .map(|d| d.timestamp())
        .unwrap_or_else(|| dt.and_utc().timestamp())
}

static PAST_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:past|last)\s+(\d+)\s+days?\b").expect("valid regex"));
static PAST_HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:past|last)\s+(\d+)\s+hours?\b").expect("valid regex"));

/// Parse a date phrase relative to the current local time.
pub fn parse_natural_date(text: &str) -> Option<DateRange> {
    parse_natural_date_at(text, Local::now().naive_local())
}

/// Parse a date phrase relative to `now`.
///
/// Returns `None` when the phrase is not recognised; that means "no date
/// filter", not an error.
pub fn parse_natural_date_at(text: &str, now: NaiveDateTime) -> Option<DateRange> {
    let text = text.trim().to_lowercase();
    let today = now.date();
    let today_start = today.and_time(NaiveTime::MIN);
    let today_end = end_of_day_micros(today)?;

    match text.as_str() {
        "today" | "today's" => {
            return Some(DateRange {
                start: today_start,
                end: today_end,
            })
        }
        "yesterday" | "yesterday's" => {
            let yesterday = today.checked_sub_days(Days::new(1))?;
            return Some(DateRange {
                start: yesterday.and_time(NaiveTime::MIN),
                end: end_of_day(yesterday)?,
            });
        }
        "this week" | "this week's" => {
            return Some(DateRange {
                start: week_start(today)?.and_time(NaiveTime::MIN),
                end: today_end,
            })
        }
        "last week" | "last week's" => {
            let this_week = week_start(today)?;
            let last_week = this_week.checked_sub_days(Days::new(7))?;
            let last_sunday = this_week.checked_sub_days(Days::new(1))?;
            return Some(DateRange {
                start: last_week.and_time(NaiveTime::MIN),
                end: end_of_day(last_sunday)?,
            });
        }
        "this month" | "this month's" => {
            return Some(DateRange {
                start: today.with_day(1)?.and_time(NaiveTime::MIN),
                end: today_end,
            })
        }
        "last month" | "last month's" => {
            let last_day_prev = today.with_day(1)?.checked_sub_days(Days::new(1))?;
            return Some(DateRange {
                start: last_day_prev.with_day(1)?.and_time(NaiveTime::MIN),
                end: end_of_day(last_day_prev)?,
            });
        }
        _ => {}
    }

    if let Some(caps) = PAST_DAYS.captures(&text) {
        let days: u64 = caps[1].parse().ok()?;
        return Some(DateRange {
            start: today_start.checked_sub_days(Days::new(days))?,
            end: today_end,
        });
    }

    if let Some(caps) = PAST_HOURS.captures(&text) {
        let hours: i64 = caps[1].parse().ok()?;
        return Some(DateRange {
            start: now.checked_sub_signed(TimeDelta::try_hours(hours)?)?,
            end: now,
        });
    }

    parse_iso(&text).and_then(|start| {
        Some(DateRange {
            start,
            end: end_of_day(start.date())?,
        })
    })
}

/// Parse an ISO date (`2024-01-15`) or date-time (`2024-01-15T10:30:00`).
pub fn parse_iso(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim().to_uppercase();
    let text = text.trim_end_matches('Z');

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

fn week_start(day: NaiveDate) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(u64::from(day.weekday().num_days_from_monday())))
}

fn end_of_day(day: NaiveDate) -> Option<NaiveDateTime> {
    day.and_hms_opt(23, 59, 59)
}

fn end_of_day_micros(day: NaiveDate) -> Option<NaiveDateTime> {
    day.and_hms_micro_opt(23, 59, 59, 999_999)
}

/// Date phrases searched for in questions, most specific first.
///
/// A `Some` canonical phrase is parsed instead of the matched text.
static DATE_PATTERNS: LazyLock<Vec<(Regex, Option<&'static str>)>> = LazyLock::new(|| {
    const CONNECTOR: &str = r"(?:\b(?:from|on|in|during)\s+)?(?:\bthe\s+)?";
    [
        (r"\btoday'?s?\b", Some("today")),
        (r"\byesterday'?s?\b", Some("yesterday")),
        (r"\bthis week'?s?\b", Some("this week")),
        (r"\blast week'?s?\b", Some("last week")),
        (r"\bthis month'?s?\b", Some("this month")),
        (r"\blast month'?s?\b", Some("last month")),
        (r"\b(?:past|last)\s+\d+\s+days?\b", None),
        (r"\b(?:past|last)\s+\d+\s+hours?\b", None),
        (r"\b\d{4}-\d{2}-\d{2}\b", None),
    ]
    .into_iter()
    .map(|(pattern, canonical)| {
        let regex = Regex::new(&format!(r"(?i){}(?P<phrase>{})", CONNECTOR, pattern))
            .expect("valid regex");
        (regex, canonical)
    })
    .collect()
});

static EDGE_CONNECTORS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\s+(?:from|on|in|during)\s*$").expect("valid regex"),
        Regex::new(r"(?i)^\s*(?:from|on|in|during)\s+").expect("valid regex"),
    ]
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Result of pulling a date phrase out of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateExtraction {
    /// Question with the date phrase and its connector removed.
    pub cleaned: String,
    pub range: Option<DateRange>,
}

/// Extract the first recognised date phrase from `query`.
pub fn extract_date_from_query(query: &str) -> DateExtraction {
    extract_date_from_query_at(query, Local::now().naive_local())
}

/// Extract the first recognised date phrase from `query`, relative to `now`.
pub fn extract_date_from_query_at(query: &str, now: NaiveDateTime) -> DateExtraction {
    for (regex, canonical) in DATE_PATTERNS.iter() {
        let Some(caps) = regex.captures(query) else {
            continue;
        };
        let phrase = match canonical {
            Some(p) => *p,
            None => caps.name("phrase").map_or("", |m| m.as_str()),
        };
        let Some(range) = parse_natural_date_at(phrase, now) else {
            continue;
        };

        let mut cleaned = regex.replace_all(query, " ").into_owned();
        for edge in EDGE_CONNECTORS.iter() {
            cleaned = edge.replace(&cleaned, "").into_owned();
        }
        let cleaned = WHITESPACE.replace_all(&cleaned, " ").trim().to_string();

        return DateExtraction {
            cleaned,
            range: Some(range),
        };
    }

    DateExtraction {
        cleaned: query.trim().to_string(),
        range: None,
    }
}

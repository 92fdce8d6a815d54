//! Search-term derivation and matching for transcript search.

use regex::Regex;
use std::sync::LazyLock;

/// Question phrasing removed before searching, applied in order.
const STOP_PHRASES: &[&str] = &[
    "were there",
    "was there",
    "are there",
    "is there",
    "any calls",
    "calls",
    "call",
    "about",
    "regarding",
    "mentioning",
    "where",
    "what",
    "which",
    "how many",
    "show me",
    "find",
    "get",
    "list",
    "search for",
];

static STOP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    STOP_PHRASES
        .iter()
        .map(|phrase| {
            Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase))).expect("valid regex")
        })
        .collect()
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip question phrasing from a date-free query, leaving the search term.
///
/// Best effort: the vocabulary is a fixed set of English phrases.
pub fn extract_search_terms(cleaned_query: &str) -> String {
    let mut terms = cleaned_query.to_string();
    for pattern in STOP_PATTERNS.iter() {
        terms = pattern.replace_all(&terms, "").into_owned();
    }
    let terms = WHITESPACE.replace_all(&terms, " ");
    terms
        .trim()
        .trim_matches(|c| matches!(c, '?' | '.' | ',' | '!'))
        .trim()
        .to_string()
}

/// A substring matcher for transcript text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNeedle {
    variants: Vec<String>,
    case_sensitive: bool,
}

impl SearchNeedle {
    /// Match `term` exactly as given.
    pub fn exact(term: &str, case_sensitive: bool) -> Self {
        let term = if case_sensitive {
            term.to_string()
        } else {
            term.to_lowercase()
        };
        Self {
            variants: vec![term],
            case_sensitive,
        }
    }

    /// Case-insensitive match on `term`, also accepting its singular stem
    /// when `term` ends in a plural "s".
    pub fn loose(term: &str) -> Self {
        let mut needle = Self::exact(term, false);
        let term = &needle.variants[0];
        if term.len() > 3 && term.ends_with('s') && !term.ends_with("ss") {
            let singular = term[..term.len() - 1].to_string();
            needle.variants.push(singular);
        }
        needle
    }

    /// Whether `text` contains any variant.
    pub fn matches(&self, text: &str) -> bool {
        if self.case_sensitive {
            self.variants.iter().any(|v| text.contains(v.as_str()))
        } else {
            let lowered = text.to_lowercase();
            self.variants.iter().any(|v| lowered.contains(v.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_question_words() {
        assert_eq!(extract_search_terms("any calls about refunds"), "refunds");
        assert_eq!(
            extract_search_terms("Were there any calls about AI Assist Pro?"),
            "AI Assist Pro"
        );
        assert_eq!(extract_search_terms("Show me calls mentioning pricing"), "pricing");
        assert_eq!(
            extract_search_terms("Find calls where customers complained"),
            "customers complained"
        );
    }

    #[test]
    fn test_whole_words_only() {
        assert_eq!(extract_search_terms("callback requests"), "callback requests");
        assert_eq!(extract_search_terms("budget listings"), "budget listings");
    }

    #[test]
    fn test_nothing_left() {
        assert_eq!(extract_search_terms("any calls?"), "");
        assert_eq!(extract_search_terms("What calls"), "");
    }

    #[test]
    fn test_exact_needle() {
        let needle = SearchNeedle::exact("Refund", false);
        assert!(needle.matches("I want a REFUND now"));

        let needle = SearchNeedle::exact("Refund", true);
        assert!(!needle.matches("I want a refund"));
        assert!(needle.matches("Refund please"));
    }

    #[test]
    fn test_loose_needle_accepts_singular() {
        let needle = SearchNeedle::loose("refunds");
        assert!(needle.matches("Can I get a refund?"));
        assert!(needle.matches("Refunds take five days"));
        assert!(!needle.matches("billing question"));

        let needle = SearchNeedle::loose("address");
        assert!(!needle.matches("addres"));
    }
}

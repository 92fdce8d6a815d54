//! CLI module for aircall-mcp.

pub mod commands;
mod output;

pub use output::Output;

use crate::format::SpeakerLabels;
use crate::tools::TranscriptFormat;
use clap::{Parser, Subcommand};

/// aircall-mcp - read-only Aircall tools for AI assistants
///
/// Serves Aircall calls, transcripts, and AI summaries over MCP (stdio),
/// and exposes the same tools as terminal commands.
#[derive(Parser, Debug)]
#[command(name = "aircall-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "AIRCALL_MCP_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start MCP server for AI assistant integration (Claude, etc.)
    Mcp,

    /// Ask a natural-language question about calls
    Ask {
        /// The question, e.g. "any calls about refunds yesterday?"
        question: String,

        /// Maximum number of calls to search (1-50)
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// List calls
    Calls {
        /// Maximum number of calls (1-100)
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Number of calls to skip
        #[arg(short, long, default_value = "0")]
        offset: i64,

        /// Only inbound or outbound calls
        #[arg(short, long, value_parser = ["inbound", "outbound"])]
        direction: Option<String>,

        /// Start date (ISO date/date-time or Unix timestamp)
        #[arg(long)]
        from: Option<String>,

        /// End date (ISO date/date-time or Unix timestamp)
        #[arg(long)]
        to: Option<String>,

        /// Minimum duration in seconds
        #[arg(long)]
        min_duration: Option<i64>,

        /// Only calls carrying this tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Print JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Show one call
    Call {
        /// Call ID
        call_id: i64,

        /// Include the transcript
        #[arg(long)]
        transcript: bool,

        /// Include the AI summary
        #[arg(long)]
        summary: bool,

        /// Print JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Show a call transcript
    Transcript {
        /// Call ID
        call_id: i64,

        /// Output format (text, structured, raw)
        #[arg(short, long, default_value = "text")]
        format: TranscriptFormat,

        /// Speaker labels (role, type, detailed)
        #[arg(short, long, default_value = "role")]
        speakers: SpeakerLabels,
    },

    /// Show a call's AI summary
    Summary {
        /// Call ID
        call_id: i64,

        /// Print JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Show call details, summary, and transcript together
    Insights {
        /// Call ID
        call_id: i64,

        /// Print JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Search call transcripts for text
    Search {
        /// Text to find
        query: String,

        /// Search only these calls (repeatable)
        #[arg(long = "call-id")]
        call_ids: Vec<i64>,

        /// Start date (ISO date/date-time or Unix timestamp)
        #[arg(long)]
        from: Option<String>,

        /// End date (ISO date/date-time or Unix timestamp)
        #[arg(long)]
        to: Option<String>,

        /// Maximum number of calls to search (1-50)
        #[arg(short, long, default_value = "10")]
        limit: i64,

        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,
    },

    /// Check configuration and Aircall connectivity
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration (token masked)
    Show,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calls() {
        let cli = Cli::try_parse_from([
            "aircall-mcp", "calls", "--limit", "5", "-d", "inbound", "-t", "vip", "-t", "billing",
        ])
        .unwrap();
        match cli.command {
            Commands::Calls {
                limit,
                direction,
                tags,
                json,
                ..
            } => {
                assert_eq!(limit, 5);
                assert_eq!(direction.as_deref(), Some("inbound"));
                assert_eq!(tags, vec!["vip", "billing"]);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_direction() {
        assert!(Cli::try_parse_from(["aircall-mcp", "calls", "-d", "sideways"]).is_err());
    }

    #[test]
    fn test_parse_transcript_options() {
        let cli = Cli::try_parse_from([
            "aircall-mcp", "transcript", "42", "--format", "Structured", "-s", "detailed",
        ])
        .unwrap();
        match cli.command {
            Commands::Transcript {
                call_id,
                format,
                speakers,
            } => {
                assert_eq!(call_id, 42);
                assert_eq!(format, TranscriptFormat::Structured);
                assert_eq!(speakers, SpeakerLabels::Detailed);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["aircall-mcp", "transcript", "42", "-f", "xml"]).is_err());
    }

    #[test]
    fn test_global_verbose() {
        let cli = Cli::try_parse_from(["aircall-mcp", "ask", "calls today", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}

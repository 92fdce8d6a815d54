//! aircall-mcp CLI entry point.

use aircall_mcp::cli::commands::{self, ListOptions, SearchOptions};
use aircall_mcp::cli::{Cli, Commands};
use aircall_mcp::config::Settings;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = match &cli.config {
        Some(path) => Settings::expand_path(path),
        None => Settings::default_config_path(),
    };
    let settings = Settings::load_from(Some(&config_path))?.with_env_overrides()?;

    // Initialize logging. stdout carries MCP traffic, so logs go to stderr.
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("aircall_mcp={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match cli.command {
        Commands::Mcp => {
            commands::run_mcp(&settings).await?;
        }

        Commands::Ask { question, limit } => {
            commands::run_ask(&question, limit, &settings).await?;
        }

        Commands::Calls {
            limit,
            offset,
            direction,
            from,
            to,
            min_duration,
            tags,
            json,
        } => {
            let options = ListOptions {
                limit,
                offset,
                direction,
                from,
                to,
                min_duration,
                tags,
                json,
            };
            commands::run_calls(options, &settings).await?;
        }

        Commands::Call {
            call_id,
            transcript,
            summary,
            json,
        } => {
            commands::run_call(call_id, transcript, summary, json, &settings).await?;
        }

        Commands::Transcript {
            call_id,
            format,
            speakers,
        } => {
            commands::run_transcript(call_id, format, speakers, &settings).await?;
        }

        Commands::Summary { call_id, json } => {
            commands::run_summary(call_id, json, &settings).await?;
        }

        Commands::Insights { call_id, json } => {
            commands::run_insights(call_id, json, &settings).await?;
        }

        Commands::Search {
            query,
            call_ids,
            from,
            to,
            limit,
            case_sensitive,
        } => {
            let options = SearchOptions {
                call_ids,
                from,
                to,
                limit,
                case_sensitive,
            };
            commands::run_search(&query, options, &settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &config_path).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, &settings, &config_path)?;
        }
    }

    Ok(())
}

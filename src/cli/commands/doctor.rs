//! Doctor command - verify configuration and Aircall connectivity.

use crate::cli::Output;
use crate::client::{AircallClient, ListCallsQuery};
use crate::config::Settings;
use crate::error::AircallError;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("aircall-mcp Doctor");
    println!();
    println!("Checking configuration and Aircall connectivity...\n");

    let mut checks = Vec::new();

    println!("{}", style("Configuration").bold());
    let config_checks = vec![
        check_config_file(config_path),
        check_credentials(settings),
        check_base_url(settings),
    ];
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);
    Output::kv("Timeout", &format!("{}s", settings.aircall.timeout_seconds));
    Output::kv(
        "Rate limit",
        &format!("{} requests/minute", settings.aircall.rate_limit),
    );

    println!();

    println!("{}", style("Aircall API").bold());
    let api_check = check_connectivity(settings).await;
    api_check.print();
    checks.push(api_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using aircall-mcp.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! aircall-mcp is ready to use.");
    }

    Ok(())
}

/// Check if the config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "not found, using defaults and environment",
            &format!("Optionally create {}", config_path.display()),
        )
    }
}

/// Check that both credentials are configured.
fn check_credentials(settings: &Settings) -> CheckResult {
    let aircall = &settings.aircall;
    if aircall.has_credentials() {
        let id = aircall.api_id.as_deref().unwrap_or_default();
        CheckResult::ok("Credentials", &format!("configured (API ID {})", id))
    } else {
        CheckResult::error(
            "Credentials",
            "missing",
            "Set AIRCALL_API_ID and AIRCALL_API_TOKEN, or add them under [aircall] in the config file",
        )
    }
}

/// Check that the base URL parses.
fn check_base_url(settings: &Settings) -> CheckResult {
    let base_url = &settings.aircall.base_url;
    match url::Url::parse(base_url) {
        Ok(url) if url.scheme() == "https" => CheckResult::ok("Base URL", base_url),
        Ok(_) => CheckResult::warning(
            "Base URL",
            base_url,
            "Aircall is normally reached over https",
        ),
        Err(e) => CheckResult::error(
            "Base URL",
            &format!("invalid ({})", e),
            "Set AIRCALL_BASE_URL to a full URL such as https://api.aircall.io/v1",
        ),
    }
}

/// Make one minimal authenticated request.
async fn check_connectivity(settings: &Settings) -> CheckResult {
    let client = match AircallClient::from_settings(&settings.aircall) {
        Ok(client) => client,
        Err(e) => {
            return CheckResult::error("Connectivity", "skipped", &e.to_string());
        }
    };

    let spinner = Output::spinner("Contacting Aircall...");
    let query = ListCallsQuery {
        per_page: 1,
        ..Default::default()
    };
    let result = client.list_calls(&query).await;
    spinner.finish_and_clear();
    client.close();

    match result {
        Ok(page) => {
            let total = page
                .meta
                .and_then(|m| m.total)
                .map(|t| format!("{} calls on account", t))
                .unwrap_or_else(|| "reachable".to_string());
            CheckResult::ok("Connectivity", &total)
        }
        Err(e @ AircallError::InvalidCredentials) => CheckResult::error(
            "Connectivity",
            &e.to_string(),
            "Check the API ID and token in your Aircall dashboard",
        ),
        Err(e) => CheckResult::error(
            "Connectivity",
            &e.to_string(),
            "Check network access and the base URL",
        ),
    }
}

//! Project and environment health checks.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::time::timeout;

use forge_core::config::{load_config, ConfigError, StoreForgeConfig};

use super::DoctorArgs;
use crate::context::{Context, CONFIG_FILE};

/// Environment variables the WooCommerce adapter reads.
const ENV_VARS: &[&str] = &["WOO_URL", "WOO_KEY", "WOO_SECRET"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// One health check outcome.
#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    message: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Pass,
            message: message.into(),
        }
    }

    fn warn(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Warn,
            message: message.into(),
        }
    }

    fn fail(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Fail,
            message: message.into(),
        }
    }
}

/// Run the doctor command.
pub async fn run(args: DoctorArgs, ctx: &Context) -> Result<()> {
    ctx.output.header("StoreForge doctor");

    let mut checks = Vec::new();

    let root = ctx.find_project_root();
    let config = check_config(root.as_deref(), &mut checks);
    checks.push(check_credentials(root.as_deref()));
    checks.push(check_toolchain());

    if let Some(config) = &config {
        let spinner = ctx.output.spinner("Checking store connection");
        let check = check_connection(&config.adapter.endpoint, args.timeout).await;
        spinner.finish_and_clear();
        checks.push(check);
    }

    for check in &checks {
        let line = format!("{}: {}", check.name, check.message);
        match check.status {
            CheckStatus::Pass => ctx.output.success(&line),
            CheckStatus::Warn => ctx.output.warn(&line),
            CheckStatus::Fail => ctx.output.error(&line),
        }
    }

    let failed = count(&checks, CheckStatus::Fail);
    let warned = count(&checks, CheckStatus::Warn);
    let passed = count(&checks, CheckStatus::Pass);

    if ctx.output.is_json() {
        ctx.output.json(&checks);
    } else {
        ctx.output.info("");
        ctx.output.kv("passed", &passed.to_string());
        ctx.output.kv("warnings", &warned.to_string());
        ctx.output.kv("failed", &failed.to_string());
    }

    if failed > 0 {
        bail!("{} check(s) failed", failed);
    }
    Ok(())
}

fn count(checks: &[DoctorCheck], status: CheckStatus) -> usize {
    checks.iter().filter(|c| c.status == status).count()
}

/// Load and validate the project config, recording the outcome.
fn check_config(root: Option<&Path>, checks: &mut Vec<DoctorCheck>) -> Option<StoreForgeConfig> {
    let Some(root) = root else {
        checks.push(DoctorCheck::fail(
            "config",
            format!("No {CONFIG_FILE} found in this directory or any parent"),
        ));
        return None;
    };

    match load_config(root.join(CONFIG_FILE)) {
        Ok(config) => {
            checks.push(DoctorCheck::pass(
                "config",
                format!("{CONFIG_FILE} is valid"),
            ));
            Some(config)
        }
        Err(ConfigError::Invalid(errors)) => {
            checks.push(DoctorCheck::fail("config", errors.join("; ")));
            None
        }
        Err(err) => {
            checks.push(DoctorCheck::fail("config", err.to_string()));
            None
        }
    }
}

/// Check adapter credentials in the environment, falling back to the
/// project's `.env.local`. A value still carrying the scaffolded `your-`
/// placeholder has not been filled in.
fn check_credentials(root: Option<&Path>) -> DoctorCheck {
    let file_vars = root
        .map(|r| read_env_file(&r.join(".env.local")))
        .unwrap_or_default();

    let mut missing = Vec::new();
    let mut placeholders = Vec::new();
    for var in ENV_VARS {
        let value = std::env::var(var)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| file_vars.get(*var).cloned());
        match value {
            None => missing.push(*var),
            Some(v) if v.contains("your-") => placeholders.push(*var),
            Some(_) => {}
        }
    }

    if !missing.is_empty() {
        DoctorCheck::fail("credentials", format!("Missing: {}", missing.join(", ")))
    } else if !placeholders.is_empty() {
        DoctorCheck::warn(
            "credentials",
            format!("Placeholder values: {}", placeholders.join(", ")),
        )
    } else {
        DoctorCheck::pass("credentials", "WOO_URL, WOO_KEY and WOO_SECRET are set")
    }
}

fn check_toolchain() -> DoctorCheck {
    match std::process::Command::new("cargo").arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            DoctorCheck::pass("toolchain", version)
        }
        _ => DoctorCheck::warn("toolchain", "cargo not found on PATH"),
    }
}

/// Open a TCP connection to the store endpoint to prove it is reachable.
async fn check_connection(endpoint: &str, timeout_secs: u64) -> DoctorCheck {
    let Some((host, port)) = endpoint_host_port(endpoint) else {
        return DoctorCheck::fail(
            "connection",
            format!("Cannot parse adapter endpoint: {endpoint}"),
        );
    };

    let connect = TcpStream::connect((host.as_str(), port));
    match timeout(Duration::from_secs(timeout_secs), connect).await {
        Ok(Ok(_)) => DoctorCheck::pass("connection", format!("{host}:{port} is reachable")),
        Ok(Err(err)) => {
            DoctorCheck::fail("connection", format!("Cannot connect to {host}:{port}: {err}"))
        }
        Err(_) => DoctorCheck::fail(
            "connection",
            format!("Connection to {host}:{port} timed out after {timeout_secs}s"),
        ),
    }
}

/// Extract host and port from an endpoint URL, defaulting the port from the
/// scheme.
fn endpoint_host_port(endpoint: &str) -> Option<(String, u16)> {
    let (default_port, rest) = if let Some(rest) = endpoint.strip_prefix("https://") {
        (443, rest)
    } else if let Some(rest) = endpoint.strip_prefix("http://") {
        (80, rest)
    } else {
        (443, endpoint)
    };

    let authority = rest.split(['/', '?']).next()?;
    if authority.is_empty() {
        return None;
    }
    match authority.rsplit_once(':') {
        Some((host, port)) => port.parse().ok().map(|p| (host.to_string(), p)),
        None => Some((authority.to_string(), default_port)),
    }
}

fn read_env_file(path: &Path) -> HashMap<String, String> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_env(&text),
        Err(_) => HashMap::new(),
    }
}

/// Parse `KEY=VALUE` lines, skipping comments and blanks.
fn parse_env(text: &str) -> HashMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            (
                key.trim().to_string(),
                value.trim().trim_matches('"').to_string(),
            )
        })
        .collect()
}

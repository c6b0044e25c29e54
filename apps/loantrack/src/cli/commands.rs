//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, AppState, StagesResponse, TrackerResponse};
use crate::config::AppConfig;
use loantrack_core::{Stage, StageProgressTracker, Theme, TrackerError, TrackerView};
use std::path::Path;

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), TrackerError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    println!("loantrack Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.server.host);
    println!("  Port:       {}", config.server.port);
    println!("  Theme:      {}", config.display.theme);
    println!("  Rate limit: {} req/s", config.server.rate_limit);
    println!();
    println!("Endpoints:");
    println!("  GET  /health          - Health check");
    println!("  GET  /stages          - Stage list");
    println!("  GET  /tracker/{{stage}} - Tracker for a stage");
    println!("  POST /tracker         - Tracker for a JSON body");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(AppState::new(config)).await
}

// =============================================================================
// STAGES COMMAND
// =============================================================================

/// List every stage in order.
pub fn cmd_stages(json_mode: bool) -> Result<(), TrackerError> {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&StagesResponse::default()).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Loan Stages");
    println!("===========");
    for stage in Stage::ALL {
        let marker = if stage.is_terminal() { " (outcome)" } else { "" };
        println!(
            "  {}. {:<26} {}{}",
            stage.position().saturating_add(1),
            stage.as_str(),
            stage.label(),
            marker
        );
    }

    Ok(())
}

// =============================================================================
// TRACK COMMAND
// =============================================================================

/// Show the tracker for a loan at `stage`.
pub fn cmd_track(
    config: &AppConfig,
    json_mode: bool,
    stage: &str,
    theme: Option<&str>,
) -> Result<(), TrackerError> {
    let stage: Stage = stage.parse()?;
    let theme = match theme {
        Some(t) => t.parse::<Theme>()?,
        None => config.display.theme,
    };

    let view = StageProgressTracker::new().view(stage);
    tracing::debug!(stage = %stage, shown = view.stages.len(), "Computed tracker view");

    if json_mode {
        let output = TrackerResponse::from_view(&view, theme);
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("{}", render_report(&view, theme));
    Ok(())
}

/// Human-readable tracker report.
pub fn render_report(view: &TrackerView, theme: Theme) -> String {
    let mut out = String::new();
    out.push_str(&format!("Loan Tracker: {}\n", view.current.label()));
    out.push_str("=============\n");
    out.push_str(&theme.render_text(view));
    out.push('\n');
    out.push('\n');
    out.push_str(&format!(
        "Progress: {}% ({} of {} stages completed)",
        view.percent_complete(),
        view.completed_count(),
        view.stages.len()
    ));
    out
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Show the effective configuration.
pub fn cmd_config(path: &Path, config: &AppConfig, json_mode: bool) -> Result<(), TrackerError> {
    let api_key = if config.server.api_key.is_some() {
        "set"
    } else {
        "unset"
    };

    if json_mode {
        let output = serde_json::json!({
            "file": path.to_string_lossy(),
            "file_exists": path.exists(),
            "config": config,
            "api_key": api_key,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    let rendered =
        toml::to_string(config).map_err(|e| TrackerError::ConfigError(e.to_string()))?;

    println!("# file: {} ({})", path.display(), if path.exists() { "found" } else { "defaults" });
    println!("# api_key: {}", api_key);
    println!("{}", rendered);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

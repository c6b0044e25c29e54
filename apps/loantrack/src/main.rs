//! # loantrack - Loan Stage Tracker
//!
//! The main binary for the loan stage tracker.
//!
//! This application provides:
//! - HTTP JSON API server (axum-based) for the admin dashboard
//! - CLI interface for inspecting tracker output
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │             apps/loantrack (THE BINARY)          │
//! │                                                  │
//! │   ┌─────────────┐          ┌─────────────┐       │
//! │   │    CLI      │          │  HTTP API   │       │
//! │   │   (clap)    │          │   (axum)    │       │
//! │   └──────┬──────┘          └──────┬──────┘       │
//! │          └──────────┬─────────────┘              │
//! │                     ▼                            │
//! │            ┌────────────────┐                    │
//! │            │ loantrack-core │                    │
//! │            │ (THE TRACKER)  │                    │
//! │            └────────────────┘                    │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! loantrack server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! loantrack stages
//! loantrack track disbursement-failure
//! loantrack --json-mode track approval --theme dark
//! ```

use clap::Parser;
use loantrack::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // LOANTRACK_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("LOANTRACK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "loantrack=debug,tower_http=debug"
    } else {
        "loantrack=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so `--json-mode` output on stdout stays parseable.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!(error_kind = %e.kind(), "Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  loantrack v{}
  eligibility → approval → mandate → disbursement
"#,
        env!("CARGO_PKG_VERSION")
    );
}

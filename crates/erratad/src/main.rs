//! erratad - Advisory Gateway Daemon
//!
//! Serves read-only Errata Tool query operations to remote callers
//! over one of two transports:
//!
//!   sse    - streaming HTTP binding with many concurrent callers
//!            and a /health liveness probe
//!   stdio  - single-caller JSON Lines pipe on stdin/stdout
//!
//! Usage:
//!   erratad [config.toml]
//!
//! Environment:
//!   ERRATA_TRANSPORT   override [server].transport ("sse" or "stdio")
//!   ERRATA_PORT        override [server].port for the sse binding

mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use errata_api::{create_router, run_stdio, AppState};
use errata_client::{CredentialSession, ErrataClient, FileTicketStore};
use errata_gateway::Dispatcher;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Transport};

/// Parsed command-line arguments
struct Args {
    /// Server config file (TOML)
    config_path: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut result = Args { config_path: None };

    for arg in &args {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                // Positional argument = config file
                result.config_path = Some(arg.to_string());
            }
            _ => {
                tracing::warn!("Unknown argument: {}", arg);
            }
        }
    }

    result
}

fn print_help() {
    eprintln!(
        r#"erratad - Advisory Gateway Daemon

Usage: erratad [config.toml]

Options:
  -h, --help    Print this help message

Environment:
  ERRATA_TRANSPORT   "sse" or "stdio" (overrides config)
  ERRATA_PORT        listen port for the sse binding (overrides config)

Examples:
  # Streaming binding on the default port
  erratad

  # Single-caller pipe binding
  ERRATA_TRANSPORT=stdio erratad gateway.toml
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging goes to stderr unconditionally: under the stdio
    // transport, stdout is the wire.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "erratad=info,errata_api=info,errata_gateway=info,errata_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting erratad (Advisory Gateway Daemon)");

    let args = parse_args();

    let mut config = if let Some(ref path) = args.config_path {
        tracing::info!("Loading config from: {}", path);
        Config::load(path)?
    } else {
        tracing::info!("No config file provided, using defaults");
        Config::default()
    };
    config.apply_overrides(
        std::env::var("ERRATA_TRANSPORT").ok(),
        std::env::var("ERRATA_PORT").ok(),
    )?;

    // Credential material is owned by the execution environment; the
    // gateway only observes it.
    let ticket_store = Arc::new(FileTicketStore::new(&config.auth.ticket_path));
    let session = CredentialSession::new(ticket_store);
    if !session.is_valid() {
        tracing::warn!(
            ticket_path = %config.auth.ticket_path,
            "No valid ticket at startup; authenticated operations will return auth_required until one appears"
        );
    }

    let client = ErrataClient::with_config(
        &config.backend.url,
        session,
        Duration::from_secs(config.backend.timeout_secs),
        Duration::from_secs(config.backend.connect_timeout_secs),
    )?;
    let dispatcher = Dispatcher::new(Arc::new(client));

    match config.server.transport {
        Transport::Sse => {
            let state = AppState::new(dispatcher);
            let app = create_router(state);

            let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
            tracing::info!("Streaming binding listening on http://{}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
        Transport::Stdio => {
            tracing::info!("Pipe binding serving on stdin/stdout");
            run_stdio(dispatcher).await?;
        }
    }

    Ok(())
}

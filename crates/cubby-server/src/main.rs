//! cubbyd entry point.
//!
//! Usage:
//!   cubbyd                     # Serve with the platform config (or defaults)
//!   cubbyd --config <path>     # Serve with an explicit config file

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cubby_auth::AuthService;
use cubby_kernel::Vault;
use cubby_server::{AppState, CubbyConfig, VoiceControl, router};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let config = match args.get(1).map(|s| s.as_str()) {
        None => CubbyConfig::load()?,

        Some("--help" | "-h") => {
            print_help();
            return Ok(ExitCode::SUCCESS);
        }

        Some("--version" | "-V") => {
            println!("cubbyd {}", env!("CARGO_PKG_VERSION"));
            return Ok(ExitCode::SUCCESS);
        }

        Some("--config" | "-c") => {
            let path = args.get(2).context("--config requires a path argument")?;
            CubbyConfig::load_from(&PathBuf::from(path))?
        }

        Some(unknown) => {
            eprintln!("Unknown option: {unknown}");
            eprintln!("Run 'cubbyd --help' for usage.");
            return Ok(ExitCode::FAILURE);
        }
    };

    serve(config).await?;
    Ok(ExitCode::SUCCESS)
}

async fn serve(config: CubbyConfig) -> Result<()> {
    // Per-request failures are recoverable; a storage root we cannot
    // create is the one startup error worth dying for.
    let vault = Vault::open(&config.storage_dir)
        .await
        .context("Failed to create the base storage root")?;

    let auth = AuthService::open(
        &config.users_file,
        Duration::from_secs(config.token_ttl_secs),
    )
    .await
    .context("Failed to open the user store")?;

    let voice = VoiceControl::new(config.voice.command, config.voice.status_file);

    let app = router(AppState::new(vault, auth, voice));

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "cubbyd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "failed to install the shutdown handler");
            std::future::pending::<()>().await;
        }
    }
}

fn print_help() {
    println!(
        r#"cubbyd v{}

Per-user private filesystem server.

Usage:
  cubbyd                       Start the server
  cubbyd --config <path>       Start with an explicit config file

Options:
  -c, --config <path>          Config file path (default: platform config dir)
  -h, --help                   Show this help
  -V, --version                Show version

Without --config, settings are read from cubbyd.toml in the platform
config directory; a missing file falls back to built-in defaults.
"#,
        env!("CARGO_PKG_VERSION")
    );
}

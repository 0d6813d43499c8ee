//! services/client/src/bin/icebreaker.rs

use clap::Parser;
use client_lib::{
    adapters::{FileSessionStorage, HttpApiAdapter},
    cli::{App, Cli},
    config::Config,
    error::ClientError,
};
use icebreaker_core::SessionStore;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    debug!(api = %config.api_base_url, session = %config.session_file.display(), "Configuration loaded.");

    // --- 2. Initialize Adapters ---
    let api = Arc::new(HttpApiAdapter::new(
        config.api_base_url.clone(),
        config.request_timeout,
    )?);
    let session = SessionStore::new(Arc::new(FileSessionStorage::new(&config.session_file)));

    // --- 3. Run the Command ---
    let mut app = App::new(api, session)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app.run(cli.command, &mut out).await?;
    info!("Command finished.");
    Ok(())
}

//! Flight Surety passenger client application
//!
//! Wires configuration, deployment artifacts and the chain provider into a
//! session and serves it over the passenger API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chain_client::{ChainProvider, ChainScript, InMemoryProvider};
use clap::Parser;
use flight_surety::load_manifest;
use surety_api::{start_server, AppState};
use surety_core::{ClientConfig, SuretyError};

/// Command line options
#[derive(Debug, Default, Parser)]
#[command(name = "flight-surety")]
#[command(about = "Flight Surety passenger client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding FlightSuretyApp.json and FlightSuretyData.json
    #[arg(long)]
    pub artifacts_dir: Option<PathBuf>,

    /// Chain script served by the in-memory provider
    #[arg(long)]
    pub dev_chain: Option<PathBuf>,

    /// API port
    #[arg(long)]
    pub port: Option<u16>,
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,surety_api=debug,flight_surety=debug")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Configuration file merged with command line overrides
pub fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ClientConfig::default(),
    };

    if let Some(dir) = &cli.artifacts_dir {
        config.artifacts_dir = Some(dir.clone());
    }
    if let Some(port) = cli.port {
        config.api_port = port;
    }
    Ok(config)
}

/// Provider for the session; `None` when nothing is configured
pub fn load_provider(dev_chain: Option<&Path>) -> anyhow::Result<Option<Arc<dyn ChainProvider>>> {
    let Some(path) = dev_chain else {
        tracing::warn!("No chain provider configured");
        return Ok(None);
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading chain script {}", path.display()))?;
    let script = ChainScript::from_json(&text)
        .with_context(|| format!("parsing chain script {}", path.display()))?;

    tracing::info!(
        network = %script.network_id,
        accounts = script.accounts.len(),
        "Using in-memory chain"
    );
    Ok(Some(Arc::new(InMemoryProvider::from_script(script))))
}

/// Connect the session. Bootstrap failures are final for the session.
pub async fn connect(cli: &Cli) -> anyhow::Result<AppState> {
    let config = load_config(cli)?;
    let dir = config
        .artifacts_dir
        .clone()
        .context("no artifacts directory configured")?;
    let manifest = load_manifest(&dir)
        .with_context(|| format!("loading deployment artifacts from {}", dir.display()))?;
    tracing::info!(networks = ?manifest.deployed_networks(), "Loaded deployment artifacts");

    let provider = load_provider(cli.dev_chain.as_deref())?;

    AppState::connect(provider, config, &manifest)
        .await
        .map_err(|e| {
            report_blocking(&e);
            e.into()
        })
}

/// Connect, publish a first view and serve the API until shutdown
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = connect(&cli).await?;

    if let Err(e) = state.refresh().await {
        tracing::warn!(error = %e, "Initial refresh failed");
    }

    start_server(state).await.context("passenger API stopped")
}

fn report_blocking(err: &SuretyError) {
    tracing::error!(
        code = err.error_code(),
        blocking = err.is_blocking(),
        "Cannot start session: {}",
        err
    );
}

//! Binary entry point: config load, transport construction, signal wiring.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prefix_proxy::http::HttpServer;
use prefix_proxy::lifecycle::{signals, Shutdown};
use prefix_proxy::transport::PooledTransport;

#[derive(Parser)]
#[command(name = "prefix-proxy", about = "Prefix-routed HTTP reverse proxy")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prefix_proxy=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match prefix_proxy::load_config(&cli.config) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(path = %cli.config.display(), %error, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        listen = %config.listen,
        upstreams = config.upstreams.len(),
        max_idle_conns_per_host = config.max_idle_conns_per_host,
        idle_conn_timeout_secs = config.idle_conn_timeout,
        "Configuration loaded"
    );

    let listener = match TcpListener::bind(&config.listen).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(listen = %config.listen, %error, "Failed to bind listen address");
            return ExitCode::FAILURE;
        }
    };

    let transport = Arc::new(PooledTransport::from_config(&config));
    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(&config, transport, shutdown);
    match server.run(listener).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "Server terminated with error");
            ExitCode::FAILURE
        }
    }
}

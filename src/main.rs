use std::path::PathBuf;
use std::sync::Arc;

use activity_backend::{
    AppConfig, AppState, InMemoryActivityRepository, SnapshotActivityRepository, TokenService,
    build_router, storage::ActivityRepository,
};
use anyhow::{Context, Result};
use chrono::Duration;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "activity-server")]
#[command(about = "REST backend for user-owned activities")]
struct Cli {
    /// Address to bind (overrides APP_HOST)
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on (overrides APP_PORT)
    #[arg(long)]
    port: Option<u16>,
    /// Snapshot file for the activity store (overrides DATA_FILE)
    #[arg(long)]
    data_file: Option<PathBuf>,
    /// Env file to read instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = match &cli.env_file {
        Some(path) => AppConfig::from_env_file(path),
        None => AppConfig::from_env(),
    }
    .context("failed to load application configuration")?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.data_file.is_some() {
        config.data_file = cli.data_file;
    }

    let repository: Arc<dyn ActivityRepository> = match &config.data_file {
        Some(path) => {
            info!(path = %path.display(), "activity store: snapshot file");
            Arc::new(
                SnapshotActivityRepository::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?,
            )
        }
        None => {
            info!("activity store: in-memory");
            Arc::new(InMemoryActivityRepository::new())
        }
    };

    let tokens = TokenService::new(&config.jwt_secret, Duration::seconds(config.token_ttl_secs))
        .context("failed to configure token verification")?;

    let app = build_router(AppState::new(repository, tokens));

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, "activity backend started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("activity_backend=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

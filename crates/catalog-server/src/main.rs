//! Product catalog HTTP server
//!
//! Loads configuration, installs the tracing subscriber, wires the catalog
//! dispatcher over an in-memory product store and serves the axum router on
//! every configured address until Ctrl+C.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use clap::Parser;
use futures::future::try_join_all;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use catalog_core::{
    CatalogAppState, CatalogConfig, CatalogExceptionFactory, ConfigError, ConfigurationError,
    Environment, ExceptionTranslator, ProductStore, catalog_dispatcher, catalog_validators,
    config::LoggingConfig, create_catalog_router,
};

#[derive(Debug, Parser)]
#[command(name = "catalog-server")]
#[command(about = "Product catalog HTTP API")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "CATALOG_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured environment (development or production)
    #[arg(short, long)]
    environment: Option<Environment>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Wiring(#[from] ConfigurationError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true).json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .init();
    }
}

async fn run(config: CatalogConfig) -> Result<(), ServerError> {
    let addrs = config.hosting.socket_addrs()?;

    let exceptions = Arc::new(CatalogExceptionFactory);
    let dispatcher = catalog_dispatcher(
        Arc::new(ProductStore::new()),
        exceptions.clone(),
        Arc::new(catalog_validators()),
    )?;
    info!(
        requests = dispatcher.registered_requests().len(),
        stages = ?dispatcher.stage_names(),
        "Catalog dispatcher ready"
    );

    let shutdown = CancellationToken::new();
    let state = CatalogAppState::new(
        Arc::new(dispatcher),
        exceptions,
        ExceptionTranslator::new(config.environment),
        shutdown.clone(),
    );
    let app = create_catalog_router(state, &config.http);

    let mut listeners = Vec::with_capacity(addrs.len());
    for addr in addrs {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        info!(%addr, environment = %config.environment, "Listening");
        listeners.push(listener);
    }

    tokio::spawn(wait_for_ctrl_c(shutdown.clone()));

    try_join_all(listeners.into_iter().map(|listener| {
        let app = app.clone();
        let shutdown = shutdown.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await
        }
    }))
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn wait_for_ctrl_c(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
    }
    shutdown.cancel();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let mut config = CatalogConfig::load(cli.config.as_deref())?;
    if let Some(environment) = cli.environment {
        config.environment = environment;
    }
    if cli.json_logs {
        config.logging.json = true;
    }

    init_tracing(&config.logging);

    if let Err(e) = run(config).await {
        error!(error = %e, "Catalog server failed");
        return Err(e.into());
    }
    Ok(())
}

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quali_core::{
    create_artifact_recorder, load_config, validate_config, ArtifactStore,
    CompilationOrchestrator, SqliteArtifactStore,
};
use quali_server::{create_router, AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Buffer size for the artifact marker channel
const ARTIFACT_BUFFER_SIZE: usize = 1000;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("QUALI_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        "Configuration loaded successfully"
    );
    info!("Database path: {:?}", config.database.path);

    // Create SQLite artifact store
    let artifact_store: Arc<dyn ArtifactStore> = Arc::new(
        SqliteArtifactStore::new(&config.database.path)
            .context("Failed to create artifact store")?,
    );
    info!("Artifact store initialized");

    // Spawn artifact writer task
    let (artifact_handle, artifact_writer) =
        create_artifact_recorder(Arc::clone(&artifact_store), ARTIFACT_BUFFER_SIZE);
    let writer_handle = tokio::spawn(artifact_writer.run());

    // Create compilation orchestrator (local engine first, remote fallback)
    let orchestrator = CompilationOrchestrator::from_config(&config.compiler)
        .context("Failed to create compilation orchestrator")?
        .with_artifacts(artifact_handle);

    for status in orchestrator.status().await {
        if status.available {
            info!(strategy = %status.strategy, target = %status.target, "Compilation strategy ready");
        } else {
            warn!(
                strategy = %status.strategy,
                target = %status.target,
                detail = status.detail.as_deref().unwrap_or(""),
                "Compilation strategy unavailable"
            );
        }
    }

    // Create app state and router
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(orchestrator),
        artifact_store,
    ));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // The router (and with it the orchestrator's handle) is gone once serve
    // returns, so the writer drains what is queued and exits.
    info!("Server shutting down...");
    let _ = writer_handle.await;
    info!("Artifact writer stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fastmusic_core::{
    load_config, load_config_from_env, validate_config, Config, ExtractionProvider,
    FfmpegTranscoder, FsScratchSpace, LogFormat, ScratchSpace, Transcoder, YtDlpProvider,
};
use fastmusic_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Determine config path
    let config_path = std::env::var("FASTMUSIC_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration before logging so the log format can follow it
    let config = match load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            init_logging(LogFormat::default());
            return Err(e);
        }
    };
    init_logging(config.logging.format);

    info!("FastMusic {} starting", VERSION);
    if config_path.exists() {
        info!("Configuration loaded from {:?}", config_path);
    } else {
        info!("No config file at {:?}, using defaults and environment", config_path);
    }

    validate_config(&config).context("Configuration validation failed")?;

    // Scratch directory for in-flight downloads
    let scratch: Arc<dyn ScratchSpace> = Arc::new(
        FsScratchSpace::create(config.scratch.dir.clone())
            .await
            .with_context(|| format!("Failed to prepare scratch dir {:?}", config.scratch.dir))?,
    );
    info!("Scratch directory: {:?}", config.scratch.dir);

    // External tools. Missing tools only fail the requests that need them.
    let provider = YtDlpProvider::new(config.provider.clone());
    match provider.validate().await {
        Ok(version) => info!("Using {} {}", provider.name(), version),
        Err(e) => warn!("Extraction provider unavailable: {}", e),
    }
    let transcoder = FfmpegTranscoder::new(config.converter.clone());
    if let Err(e) = transcoder.validate().await {
        warn!("Transcoder unavailable: {}", e);
    }

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(provider),
        Arc::new(transcoder),
        scratch,
    ));

    // Create router
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

    info!("Server shut down");
    Ok(())
}

fn load(config_path: &Path) -> Result<Config> {
    let config = if config_path.exists() {
        load_config(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        load_config_from_env().context("Failed to load config from environment")?
    };
    Ok(config)
}

fn init_logging(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received");
}

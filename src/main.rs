use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront::config::Config;
use storefront::session::MemoryStore;
use storefront::AppState;

#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about = "A minimal demo storefront", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "storefront.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting storefront v{}", env!("CARGO_PKG_VERSION"));

    // Ensure the activity log directory exists before any event is queued
    std::fs::create_dir_all(&config.activity.dir).with_context(|| {
        format!(
            "Failed to create activity log directory: {}",
            config.activity.dir.display()
        )
    })?;

    // Start the single activity log writer
    let (activity, writer) =
        storefront::activity::channel(config.activity.dir.clone(), config.activity.queue_capacity);
    tokio::spawn(writer.run());

    // Create app state
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(config.clone(), store, activity));

    let app = storefront::web::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Storefront listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

//! coursehub-api - course catalog service
//!
//! Serves the catalog REST endpoints, the nested course detail view and
//! transcript question answering over a SQLite catalog database.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use coursehub_common::config::{database_path, resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV};
use coursehub_common::db::init_database;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursehub_api::services::gemini_client::{GeminiClient, DEFAULT_MODEL};
use coursehub_api::{build_router, AppState};

/// Command-line arguments for coursehub-api
#[derive(Parser, Debug)]
#[command(name = "coursehub-api")]
#[command(about = "Course catalog REST service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8008", env = "COURSEHUB_PORT")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "COURSEHUB_BIND")]
    bind: std::net::IpAddr,

    /// SQLite database file (overrides the root folder)
    #[arg(short, long, env = "COURSEHUB_DATABASE")]
    database: Option<PathBuf>,

    /// Data folder holding coursehub.db
    #[arg(short, long, env = "COURSEHUB_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// API key enabling transcript questions
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Model used for transcript questions
    #[arg(long, env = "GEMINI_MODEL")]
    gemini_model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coursehub_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!(
        "Starting CourseHub API (coursehub-api) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let toml_config = TomlConfig::load();

    let db_path = match &args.database {
        Some(path) => path.clone(),
        None => {
            let root_folder =
                resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &toml_config);
            database_path(&root_folder)
        }
    };
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Connected to database");

    let mut state = AppState::new(pool);

    match args.gemini_api_key.filter(|key| !key.trim().is_empty()) {
        Some(api_key) => {
            let model = args
                .gemini_model
                .or(toml_config.gemini_model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string());
            let client = GeminiClient::new(api_key, model.clone())
                .context("Failed to create Gemini client")?;
            state = state.with_answer_model(Arc::new(client));
            info!("Transcript questions enabled (model: {})", model);
        }
        None => {
            warn!("GEMINI_API_KEY not set - transcript questions disabled");
        }
    }

    let app = build_router(state);

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("coursehub-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

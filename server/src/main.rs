use anyhow::Result;
use axum::Router;
use clap::Parser;
use search_core::{EngineConfig, SearchEngine};
use server::{build_app, cors_layer, open_catalog, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Catalog snapshot directory written by `indexer build`
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Engine config (JSON); defaults apply to missing keys
    #[arg(long)]
    config: Option<PathBuf>,
    /// Load the sample courses when no snapshot is found
    #[arg(long, default_value_t = false)]
    seed: bool,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Comma-separated allowed origins; any origin when unset
    #[arg(long, env = "CORS_ALLOW_ORIGIN")]
    cors_allow_origin: Option<String>,
    /// Token required by the admin endpoints
    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
    admin_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    tracing::info!(?config, "engine config");

    let catalog = open_catalog(args.catalog.as_deref(), args.seed)?;
    tracing::info!(courses = catalog.len(), "catalog ready");

    let engine = Arc::new(SearchEngine::new(catalog, config));
    let state = AppState {
        engine,
        admin_token: args.admin_token.clone(),
        snapshot_dir: args.catalog.clone(),
    };
    let app: Router = build_app(state, cors_layer(args.cors_allow_origin.as_deref()));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

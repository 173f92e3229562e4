mod config;
mod editor;
mod errors;
mod models;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::editor::export::{CommandRasterizer, PdfExporter};
use crate::editor::save::HttpResumeStore;
use crate::editor::summarize::HttpSummaryClient;
use crate::editor::EditorSession;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Builder v{}", env!("CARGO_PKG_VERSION"));

    let summarizer = HttpSummaryClient::new(config.summary_api_url.clone(), config.http_timeout)?;
    info!("Summary client initialized ({})", config.summary_api_url);

    let store = HttpResumeStore::new(config.save_api_url.clone(), config.http_timeout)?;
    info!("Resume store initialized ({})", config.save_api_url);

    let rasterizer = CommandRasterizer::new(config.rasterizer_cmd.clone());
    let exporter = PdfExporter::new(Arc::new(rasterizer), config.export_dir.clone());
    match &config.export_dir {
        Some(dir) => info!(
            "PDF export via '{}', writing to {}",
            config.rasterizer_cmd,
            dir.display()
        ),
        None => info!("PDF export via '{}', download only", config.rasterizer_cmd),
    }

    let state = AppState {
        session: EditorSession::new(Arc::new(summarizer), Arc::new(store), exporter),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

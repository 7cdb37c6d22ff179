mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use clubhouse_api::AppStateInner;
use clubhouse_db::Database;
use clubhouse_upstream::{SupabaseAllowList, SupabaseConfig, SupabaseStorage};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "clubhouse_server=debug,clubhouse_api=debug,clubhouse_upstream=debug,tower_http=debug".into()
                }),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let supabase = Arc::new(SupabaseConfig::from_env()?);
    if !supabase.is_configured() {
        warn!("SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY unset; uploads and allow-list checks will fail");
    }

    let db = Database::open(&config.db_path)?;

    let http = clubhouse_upstream::http_client(&supabase)?;
    let state = Arc::new(AppStateInner {
        db,
        allow_list: Arc::new(SupabaseAllowList::new(http.clone(), supabase.clone())),
        storage: Arc::new(SupabaseStorage::new(http, supabase)),
        max_upload_bytes: config.max_upload_bytes,
    });

    // The site frontend is served from another origin.
    let app = clubhouse_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Clubhouse listening on {}", addr);
    info!("Upload limit: {} bytes", config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}

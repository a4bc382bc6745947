use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use nudge_api::{AppState, AppStateInner};
use nudge_engine::Engine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nudge=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("NUDGE_DB_PATH").unwrap_or_else(|_| "nudge.db".into());
    let host = std::env::var("NUDGE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("NUDGE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database and engine
    let db = nudge_db::Database::open(&PathBuf::from(&db_path))?;
    let engine = Arc::new(Engine::new(Arc::new(db)));

    let state: AppState = Arc::new(AppStateInner { engine });

    let app = nudge_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Nudge server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

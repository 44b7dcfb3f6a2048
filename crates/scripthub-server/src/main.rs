use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use scripthub_api::AppStateInner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scripthub=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("SCRIPTHUB_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("SCRIPTHUB_DB_PATH").unwrap_or_else(|_| "scripthub.db".into());
    let host = std::env::var("SCRIPTHUB_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("SCRIPTHUB_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let oauth_google_url = std::env::var("SCRIPTHUB_OAUTH_GOOGLE_URL").ok();

    // Init database
    let db = scripthub_db::Database::open(&PathBuf::from(&db_path))?;

    let state = Arc::new(AppStateInner {
        db,
        jwt_secret,
        oauth_google_url,
    });

    let app = scripthub_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("ScriptHub listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! # cim-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the Civic Issue Management API.
//! Binds to a configurable port (default 4040).
//!
//! Required environment: `JWT_SECRET` (≥ 32 characters). Optional:
//! `PORT`, `DATABASE_URL` (absent → in-memory only), `MEDIA_BASE_URL` +
//! `MEDIA_API_KEY` (absent → evidence uploads return 503).

use cim_api::state::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment. The JWT secret is required —
    // a deployment without one must not come up.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(4040);

    let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| {
        tracing::error!("JWT_SECRET is not set — refusing to start");
        "missing JWT_SECRET"
    })?;
    let config = AppConfig { port, jwt_secret };

    // Initialize database pool (optional — absent means in-memory only).
    let db_pool = cim_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    // Attempt to create the media client from environment.
    let media_client = match cim_media_client::MediaConfig::from_env() {
        Ok(media_config) => {
            tracing::info!("media client configured");
            match cim_media_client::MediaClient::new(media_config) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::error!("Failed to create media client: {e}");
                    return Err(e.into());
                }
            }
        }
        Err(e) => {
            tracing::warn!("media client not configured: {e}. Evidence uploads will return 503.");
            None
        }
    };

    let state = cim_api::state::AppState::try_with_config(config, media_client, db_pool)
        .map_err(|e| {
            tracing::error!("Invalid JWT_SECRET: {e}");
            e
        })?;

    // Apply schema and hydrate in-memory stores (if a database is connected).
    if let Some(pool) = &state.db_pool {
        cim_api::db::ensure_schema(pool).await.map_err(|e| {
            tracing::error!("Schema application failed: {e}");
            e
        })?;
    }
    state.hydrate_from_db().await.map_err(|e| {
        tracing::error!("Database hydration failed: {e}");
        e
    })?;

    let app = cim_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("CIM API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

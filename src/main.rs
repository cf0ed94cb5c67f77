use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use learnhub_analytics::api::router;
use learnhub_analytics::catalog::{CatalogClient, CatalogConfig, CatalogHttpClient, StaticCatalog};
use learnhub_analytics::leaderboard::{
    LeaderboardClient, LeaderboardHttpClient, StaticLeaderboard,
};
use learnhub_analytics::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "learnhub_analytics=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://learnhub-analytics.db?mode=rwc".to_string());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let catalog: Arc<dyn CatalogClient> = match CatalogConfig::new_from_env() {
        Ok(config) => Arc::new(CatalogHttpClient::new(config)?),
        Err(e) => {
            warn!("Catalog API not configured ({}), serving empty scopes", e);
            Arc::new(StaticCatalog::default())
        }
    };

    let leaderboard: Arc<dyn LeaderboardClient> = match std::env::var("LEADERBOARD_API_URL") {
        Ok(url) => Arc::new(LeaderboardHttpClient::new(url)?),
        Err(_) => {
            warn!("Leaderboard API not configured, using static positions");
            Arc::new(StaticLeaderboard::default())
        }
    };

    let state = AppState {
        db: pool.clone(),
        catalog,
        leaderboard,
    };

    let app = router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

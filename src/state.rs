use std::sync::Arc;

use sqlx::SqlitePool;

use crate::catalog::CatalogClient;
use crate::leaderboard::LeaderboardClient;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub catalog: Arc<dyn CatalogClient>,
    pub leaderboard: Arc<dyn LeaderboardClient>,
}

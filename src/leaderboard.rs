use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Rank of one instructor among all instructors, computed by the
/// cross-instructor comparison service. Freshness is not guaranteed by
/// contract; the value may lag behind the metrics in the same report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardPosition {
    pub position: u32,
    pub total_participants: u32,
    pub category: String,
    pub points: u64,
}

#[async_trait]
pub trait LeaderboardClient: Send + Sync {
    async fn position_for(&self, instructor_id: &str) -> Result<LeaderboardPosition, AppError>;
}

pub struct LeaderboardHttpClient {
    client: Client,
    base_url: String,
}

impl LeaderboardHttpClient {
    pub fn new(base_url: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LeaderboardClient for LeaderboardHttpClient {
    async fn position_for(&self, instructor_id: &str) -> Result<LeaderboardPosition, AppError> {
        let url = format!("{}/leaderboard/instructors/{}", self.base_url, instructor_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("leaderboard request failed: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::NotFound),
            status if !status.is_success() => Err(AppError::Upstream(format!(
                "leaderboard API error {}",
                status
            ))),
            _ => response.json().await.map_err(|e| {
                AppError::Upstream(format!("failed to parse leaderboard response: {}", e))
            }),
        }
    }
}

/// Stub used when no leaderboard service is configured: every instructor is
/// placed last in a single-category board of unknown peers.
pub struct StaticLeaderboard {
    pub total_participants: u32,
}

impl Default for StaticLeaderboard {
    fn default() -> Self {
        Self {
            total_participants: 1,
        }
    }
}

#[async_trait]
impl LeaderboardClient for StaticLeaderboard {
    async fn position_for(&self, _instructor_id: &str) -> Result<LeaderboardPosition, AppError> {
        Ok(LeaderboardPosition {
            position: self.total_participants,
            total_participants: self.total_participants,
            category: "monthly-revenue".to_string(),
            points: 0,
        })
    }
}

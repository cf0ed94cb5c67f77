use axum::Json;
use axum::extract::{Path, Query};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::Utc;
use serde::Deserialize;

use crate::analytics::TimeRange;
use crate::error::AppError;
use crate::models::{CourseAnalytics, GamificationSnapshot, Report, TeacherOverview};
use crate::services::ReportService;
use crate::state::AppState;

#[derive(Deserialize)]
struct RangeParams {
    #[serde(default)]
    range: Option<String>,
}

impl RangeParams {
    fn time_range(&self) -> TimeRange {
        TimeRange::from_token(self.range.as_deref().unwrap_or(""))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/instructors/{id}/analytics", get(teacher_analytics))
        .route(
            "/instructors/{id}/courses/{course_id}/analytics",
            get(course_analytics),
        )
        .route("/instructors/{id}/gamification", get(gamification))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn teacher_analytics(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Report<TeacherOverview>>, AppError> {
    let service = ReportService::new(state.db.clone(), state.catalog.clone(), state.leaderboard.clone());
    let report = service
        .teacher_overview(&id, params.time_range(), Utc::now())
        .await?;
    Ok(Json(report))
}

async fn course_analytics(
    State(state): State<AppState>,
    Path((id, course_id)): Path<(String, String)>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Report<CourseAnalytics>>, AppError> {
    let service = ReportService::new(state.db.clone(), state.catalog.clone(), state.leaderboard.clone());
    let report = service
        .course_analytics(&id, &course_id, params.time_range(), Utc::now())
        .await?;
    Ok(Json(report))
}

async fn gamification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Report<GamificationSnapshot>>, AppError> {
    let service = ReportService::new(state.db.clone(), state.catalog.clone(), state.leaderboard.clone());
    let report = service.gamification_snapshot(&id, Utc::now()).await?;
    Ok(Json(report))
}

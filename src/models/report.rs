use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::aggregate::{OverviewBlock, PerformanceBlock, RevenueBlock};
use crate::analytics::ranking::{CourseStanding, StudentStanding};
use crate::analytics::trend::TrendPoint;
use crate::gamification::streak::StreakState;
use crate::gamification::{Achievement, Badge};
use crate::leaderboard::LeaderboardPosition;
use crate::models::CourseStatus;

/// Envelope shared by every report endpoint. Field names follow the
/// marketplace's JSON contract, hence camelCase on the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub time_range: String,
    pub generated_at: DateTime<Utc>,
}

impl<T: Serialize> Report<T> {
    pub fn new(data: T, time_range: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            data,
            time_range: time_range.into(),
            generated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentsBlock {
    pub total: usize,
    pub top: Vec<StudentStanding>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursesBlock {
    pub top_by_revenue: Vec<CourseStanding>,
    pub needs_attention: Vec<CourseStanding>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementBlock {
    pub granularity: String,
    pub enrollments: Vec<TrendPoint>,
    pub completion_rate: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherOverview {
    pub overview: OverviewBlock,
    pub performance: PerformanceBlock,
    pub revenue: RevenueBlock,
    pub students: StudentsBlock,
    pub courses: CoursesBlock,
    pub engagement: EngagementBlock,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseContentBlock {
    pub total_sections: usize,
    pub total_lessons: usize,
    pub total_duration_minutes: i64,
    pub sections: Vec<SectionSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub title: String,
    pub lessons: usize,
    pub duration_minutes: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOverviewBlock {
    pub total_students: usize,
    pub total_revenue: f64,
    pub average_rating: f64,
    pub total_ratings: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub student_name: String,
    pub rating: i64,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAnalytics {
    pub course_id: String,
    pub title: String,
    pub status: CourseStatus,
    pub overview: CourseOverviewBlock,
    pub performance: PerformanceBlock,
    pub content: CourseContentBlock,
    pub enrollment_trend: Vec<TrendPoint>,
    pub recent_reviews: Vec<ReviewEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationSnapshot {
    pub level: u32,
    pub experience: u64,
    pub achievements: Vec<Achievement>,
    pub badges: Vec<Badge>,
    pub streak: StreakState,
    pub leaderboard: LeaderboardPosition,
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::analytics::TimeRange;
use crate::analytics::aggregate;
use crate::analytics::ranking::{self, SortOrder};
use crate::analytics::trend::TrendSeries;
use crate::catalog::CatalogClient;
use crate::db::streak_store;
use crate::error::AppError;
use crate::gamification;
use crate::leaderboard::LeaderboardClient;
use crate::metrics;
use crate::models::report::{
    CourseContentBlock, CourseOverviewBlock, CoursesBlock, EngagementBlock, ReviewEntry,
    SectionSummary, StudentsBlock,
};
use crate::models::{
    Course, CourseAnalytics, Enrollment, GamificationSnapshot, Rating, Report, TeacherOverview,
};

/// Upper bound on the courses considered per report, keeping worst-case
/// cost proportional to the cap rather than to the instructor's catalog.
pub const MAX_SCOPE_COURSES: usize = 200;

const TOP_LIMIT: usize = 5;
const RECENT_REVIEWS_LIMIT: usize = 5;

/// Assembles the three public report views. Pure computation over the
/// snapshot fetched from the catalog; any catalog failure is fatal to the
/// whole report rather than degrading block by block.
pub struct ReportService {
    db: SqlitePool,
    catalog: Arc<dyn CatalogClient>,
    leaderboard: Arc<dyn LeaderboardClient>,
}

impl ReportService {
    pub fn new(
        db: SqlitePool,
        catalog: Arc<dyn CatalogClient>,
        leaderboard: Arc<dyn LeaderboardClient>,
    ) -> Self {
        Self {
            db,
            catalog,
            leaderboard,
        }
    }

    async fn scope(&self, instructor_id: &str) -> Result<Vec<Course>, AppError> {
        let mut courses = self
            .catalog
            .fetch_courses_by_instructor(instructor_id)
            .await?;
        if courses.len() > MAX_SCOPE_COURSES {
            warn!(
                "Truncating scope for instructor {}: {} courses exceeds cap of {}",
                instructor_id,
                courses.len(),
                MAX_SCOPE_COURSES
            );
            courses.sort_by(|a, b| {
                b.updated_at
                    .cmp(&a.updated_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
            courses.truncate(MAX_SCOPE_COURSES);
        }
        Ok(courses)
    }

    pub async fn teacher_overview(
        &self,
        instructor_id: &str,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> Result<Report<TeacherOverview>, AppError> {
        info!(
            "Generating teacher overview for {} over {}",
            instructor_id,
            range.as_str()
        );
        let courses = self.scope(instructor_id).await?;
        let enrollments = aggregate::scope_enrollments(&courses);

        let overview = aggregate::overview(&courses);
        let performance = aggregate::performance(&enrollments);
        let revenue = aggregate::revenue(&courses, range.window(now));

        let all_students = ranking::student_standings(&courses);
        let students = StudentsBlock {
            total: all_students.len(),
            top: ranking::rank(
                all_students,
                // Completed courses dominate; progress breaks near-ties.
                |s| s.courses_completed as f64 * 1000.0 + s.average_progress,
                |s| s.student_id.as_str(),
                SortOrder::Descending,
                TOP_LIMIT,
                None,
            ),
        };

        let standings = ranking::course_standings(&courses);
        let courses_block = CoursesBlock {
            top_by_revenue: ranking::rank(
                standings.clone(),
                |c| c.revenue,
                |c| c.course_id.as_str(),
                SortOrder::Descending,
                TOP_LIMIT,
                None,
            ),
            needs_attention: ranking::rank(
                standings,
                |c| c.completion_rate,
                |c| c.course_id.as_str(),
                SortOrder::Ascending,
                TOP_LIMIT,
                Some(&ranking::needs_attention),
            ),
        };

        let granularity = range.granularity();
        let enrollment_trend = TrendSeries::new(now, range.bucket_count(), granularity)
            .collect_with(|start, end| {
                metrics::count(&enrollments, |e| e.enrolled_at >= start && e.enrolled_at < end)
                    as f64
            });
        let completion_trend = TrendSeries::new(now, range.bucket_count(), granularity)
            .collect_with(|start, end| {
                let in_window: Vec<_> = enrollments
                    .iter()
                    .filter(|e| e.enrolled_at >= start && e.enrolled_at < end)
                    .collect();
                let completed = metrics::count(&in_window, |e| e.completed);
                metrics::percentage(completed as f64, in_window.len() as f64)
            });
        let engagement = EngagementBlock {
            granularity: granularity.as_str().to_string(),
            enrollments: enrollment_trend,
            completion_rate: completion_trend,
        };

        let data = TeacherOverview {
            overview,
            performance,
            revenue,
            students,
            courses: courses_block,
            engagement,
        };
        Ok(Report::new(data, range.as_str(), now))
    }

    pub async fn course_analytics(
        &self,
        instructor_id: &str,
        course_id: &str,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> Result<Report<CourseAnalytics>, AppError> {
        let course = self.catalog.fetch_course_by_id(course_id).await?;
        if course.instructor_id != instructor_id {
            warn!(
                "Instructor {} requested analytics for course {} they do not own",
                instructor_id, course_id
            );
            return Err(AppError::Forbidden);
        }

        let enrollments: Vec<&Enrollment> = course.enrollments.iter().collect();
        let overview = CourseOverviewBlock {
            total_students: course.total_enrollments(),
            total_revenue: metrics::round2(course.revenue()),
            average_rating: metrics::round2(metrics::average(&course.ratings, |r| {
                r.rating as f64
            })),
            total_ratings: course.ratings.len(),
        };
        let performance = aggregate::performance(&enrollments);
        let content = CourseContentBlock {
            total_sections: course.sections.len(),
            total_lessons: course.total_lessons(),
            total_duration_minutes: course.total_duration_minutes(),
            sections: course
                .sections
                .iter()
                .map(|s| SectionSummary {
                    title: s.title.clone(),
                    lessons: s.lessons.len(),
                    duration_minutes: s.lessons.iter().map(|l| l.duration_minutes).sum(),
                })
                .collect(),
        };

        let enrollment_trend = TrendSeries::new(now, range.bucket_count(), range.granularity())
            .collect_with(|start, end| {
                metrics::count(&course.enrollments, |e| {
                    e.enrolled_at >= start && e.enrolled_at < end
                }) as f64
            });

        let mut reviewed: Vec<&Rating> = course
            .ratings
            .iter()
            .filter(|r| r.review.is_some())
            .collect();
        reviewed.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.student_id.cmp(&b.student_id))
        });
        let recent_reviews = reviewed
            .into_iter()
            .take(RECENT_REVIEWS_LIMIT)
            .map(|r| ReviewEntry {
                student_name: r.student_name.clone(),
                rating: r.rating,
                review: r.review.clone().unwrap_or_default(),
                created_at: r.created_at,
            })
            .collect();

        let data = CourseAnalytics {
            course_id: course.id.clone(),
            title: course.title.clone(),
            status: course.status,
            overview,
            performance,
            content,
            enrollment_trend,
            recent_reviews,
        };
        Ok(Report::new(data, range.as_str(), now))
    }

    pub async fn gamification_snapshot(
        &self,
        instructor_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Report<GamificationSnapshot>, AppError> {
        let courses = self.scope(instructor_id).await?;
        let counters = gamification::InstructorCounters::from_courses(&courses);

        // Requesting the snapshot is the qualifying daily activity.
        let streak =
            streak_store::record_daily_activity(&self.db, instructor_id, now.date_naive()).await?;
        let leaderboard = self.leaderboard.position_for(instructor_id).await?;

        let data = GamificationSnapshot {
            level: gamification::level(&counters),
            experience: gamification::experience(&counters),
            achievements: gamification::achievements(&counters),
            badges: gamification::badges(&counters),
            streak,
            leaderboard,
        };
        Ok(Report::new(data, "all", now))
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::metrics;
use crate::models::{Course, CourseStatus, Enrollment};

/// Headline numbers for a scope. An instructor with zero courses produces
/// an all-zero block, never an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewBlock {
    pub total_courses: usize,
    pub published_courses: usize,
    pub draft_courses: usize,
    pub archived_courses: usize,
    pub total_students: usize,
    pub total_revenue: f64,
    pub average_rating: f64,
    pub total_ratings: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceBlock {
    pub completion_rate: f64,
    pub engagement_rate: f64,
    pub dropoff_rate: f64,
    pub average_progress: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRevenue {
    pub course_id: String,
    pub title: String,
    pub revenue: f64,
    pub enrollments: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueBlock {
    pub total: f64,
    pub current_period: f64,
    pub by_course: Vec<CourseRevenue>,
}

pub fn overview(courses: &[Course]) -> OverviewBlock {
    let ratings: Vec<i64> = courses
        .iter()
        .flat_map(|c| c.ratings.iter())
        .map(|r| r.rating)
        .collect();

    OverviewBlock {
        total_courses: courses.len(),
        published_courses: metrics::count(courses, |c| c.status == CourseStatus::Published),
        draft_courses: metrics::count(courses, |c| c.status == CourseStatus::Draft),
        archived_courses: metrics::count(courses, |c| c.status == CourseStatus::Archived),
        total_students: courses.iter().map(Course::total_enrollments).sum(),
        total_revenue: metrics::round2(metrics::sum(courses, Course::revenue)),
        average_rating: metrics::round2(metrics::average(&ratings, |r| *r as f64)),
        total_ratings: ratings.len(),
    }
}

/// Progress buckets partition the enrollment set: `completed` is its own
/// bucket, `dropoff` is progress below 10 percent, `engaged` is everything
/// else still in flight. The three rates therefore sum to 100 for a
/// non-empty scope.
pub fn performance(enrollments: &[&Enrollment]) -> PerformanceBlock {
    let total = enrollments.len() as f64;
    let completed = metrics::count(enrollments, |e| e.completed) as f64;
    let dropped = metrics::count(enrollments, |e| !e.completed && e.progress < 10) as f64;
    let engaged = metrics::count(enrollments, |e| !e.completed && e.progress >= 10) as f64;

    PerformanceBlock {
        completion_rate: metrics::percentage(completed, total),
        engagement_rate: metrics::percentage(engaged, total),
        dropoff_rate: metrics::percentage(dropped, total),
        average_progress: metrics::round2(metrics::average(enrollments, |e| e.progress as f64)),
    }
}

pub fn scope_enrollments(courses: &[Course]) -> Vec<&Enrollment> {
    courses.iter().flat_map(|c| c.enrollments.iter()).collect()
}

/// Revenue block for a scope. `window` is the half-open current-period
/// window; an enrollment counts toward it when `enrolled_at` falls inside.
/// The per-course breakdown is sorted by revenue descending with course id
/// as the tie-break.
pub fn revenue(courses: &[Course], window: (DateTime<Utc>, DateTime<Utc>)) -> RevenueBlock {
    let (start, end) = window;
    let current_period: f64 = courses
        .iter()
        .map(|c| {
            let recent =
                metrics::count(&c.enrollments, |e| e.enrolled_at >= start && e.enrolled_at < end);
            c.price * recent as f64
        })
        .sum();

    let mut by_course: Vec<CourseRevenue> = courses
        .iter()
        .map(|c| CourseRevenue {
            course_id: c.id.clone(),
            title: c.title.clone(),
            revenue: metrics::round2(c.revenue()),
            enrollments: c.total_enrollments(),
        })
        .collect();
    by_course.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.course_id.cmp(&b.course_id))
    });

    RevenueBlock {
        total: metrics::round2(metrics::sum(courses, Course::revenue)),
        current_period: metrics::round2(current_period),
        by_course,
    }
}

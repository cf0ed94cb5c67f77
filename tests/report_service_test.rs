use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;

use learnhub_analytics::analytics::TimeRange;
use learnhub_analytics::catalog::StaticCatalog;
use learnhub_analytics::error::AppError;
use learnhub_analytics::leaderboard::StaticLeaderboard;
use learnhub_analytics::models::{Course, CourseStatus, Enrollment, Lesson, Rating, Section};
use learnhub_analytics::services::ReportService;

const INSTRUCTOR: &str = "instructor-1";

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test db");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
}

fn course(id: &str, instructor: &str, price: f64) -> Course {
    let created = Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap();
    Course {
        id: id.to_string(),
        instructor_id: instructor.to_string(),
        title: format!("Course {id}"),
        price,
        status: CourseStatus::Published,
        created_at: created,
        updated_at: created,
        sections: Vec::new(),
        enrollments: Vec::new(),
        ratings: Vec::new(),
    }
}

fn enrollment(student: &str, progress: i64, completed: bool, days_ago: i64) -> Enrollment {
    Enrollment {
        student_id: student.to_string(),
        student_name: format!("Student {student}"),
        enrolled_at: fixed_now() - Duration::days(days_ago),
        progress: if completed { 100 } else { progress },
        completed,
        completed_at: completed.then(fixed_now),
        lesson_completions: Vec::new(),
    }
}

fn rating(student: &str, stars: i64, review: Option<&str>) -> Rating {
    Rating {
        student_id: student.to_string(),
        student_name: format!("Student {student}"),
        rating: stars,
        review: review.map(str::to_string),
        created_at: fixed_now() - Duration::days(2),
    }
}

fn service_with(courses: Vec<Course>, pool: SqlitePool) -> ReportService {
    ReportService::new(
        pool,
        Arc::new(StaticCatalog::new(courses)),
        Arc::new(StaticLeaderboard::default()),
    )
}

/// Three courses with ten enrollments each: six completed, four stalled at
/// zero progress.
fn scope_of_three_courses() -> Vec<Course> {
    (1..=3)
        .map(|n| {
            let mut c = course(&format!("course-{n}"), INSTRUCTOR, 50.0);
            for s in 0..6 {
                c.enrollments
                    .push(enrollment(&format!("done-{n}-{s}"), 100, true, 10));
            }
            for s in 0..4 {
                c.enrollments
                    .push(enrollment(&format!("stuck-{n}-{s}"), 0, false, 10));
            }
            c
        })
        .collect()
}

#[tokio::test]
async fn teacher_overview_round_trip() {
    let pool = setup_test_db().await;
    let service = service_with(scope_of_three_courses(), pool);

    let report = service
        .teacher_overview(INSTRUCTOR, TimeRange::Month, fixed_now())
        .await
        .expect("Failed to build report");

    assert!(report.success);
    assert_eq!(report.time_range, "30d");

    let data = report.data;
    assert_eq!(data.overview.total_students, 30);
    assert_eq!(data.overview.total_courses, 3);
    assert_eq!(data.overview.total_revenue, 1500.0);
    assert_eq!(data.performance.completion_rate, 60.0);
    assert_eq!(data.performance.dropoff_rate, 40.0);
    assert_eq!(data.performance.engagement_rate, 0.0);

    // Every enrollment is ten days old, inside the 30d revenue window.
    assert_eq!(data.revenue.current_period, 1500.0);

    // 30 daily buckets; all activity lands in the bucket ten days back.
    assert_eq!(data.engagement.enrollments.len(), 30);
    let counted: f64 = data.engagement.enrollments.iter().map(|p| p.value).sum();
    assert_eq!(counted, 30.0);
}

#[tokio::test]
async fn empty_scope_yields_zeroed_report() {
    let pool = setup_test_db().await;
    let service = service_with(Vec::new(), pool);

    let report = service
        .teacher_overview("instructor-with-no-courses", TimeRange::Month, fixed_now())
        .await
        .expect("Empty scope must not error");

    let data = report.data;
    assert_eq!(data.overview.total_courses, 0);
    assert_eq!(data.overview.total_students, 0);
    assert_eq!(data.overview.average_rating, 0.0);
    assert_eq!(data.performance.completion_rate, 0.0);
    assert!(data.students.top.is_empty());
    assert!(data.courses.top_by_revenue.is_empty());
    assert!(data.revenue.by_course.is_empty());
}

#[tokio::test]
async fn top_courses_rank_by_revenue_with_stable_tiebreak() {
    // Revenues: 500, 0, 300, 900, 300 (price x one enrollment).
    let revenues = [
        ("alpha", 500.0),
        ("bravo", 0.0),
        ("delta", 300.0),
        ("charlie", 900.0),
        ("echo", 300.0),
    ];
    let courses: Vec<Course> = revenues
        .iter()
        .map(|(id, price)| {
            let mut c = course(id, INSTRUCTOR, *price);
            c.enrollments.push(enrollment(&format!("s-{id}"), 100, true, 5));
            c
        })
        .collect();

    let pool = setup_test_db().await;
    let service = service_with(courses, pool);
    let report = service
        .teacher_overview(INSTRUCTOR, TimeRange::Month, fixed_now())
        .await
        .expect("Failed to build report");

    let top: Vec<(&str, f64)> = report
        .data
        .courses
        .top_by_revenue
        .iter()
        .map(|c| (c.course_id.as_str(), c.revenue))
        .collect();
    // The two 300-revenue courses tie; "delta" precedes "echo" by id.
    assert_eq!(top[0], ("charlie", 900.0));
    assert_eq!(top[1], ("alpha", 500.0));
    assert_eq!(top[2], ("delta", 300.0));
    assert_eq!(top[3], ("echo", 300.0));
}

#[tokio::test]
async fn needs_attention_lists_low_completion_courses() {
    let mut struggling = course("struggling", INSTRUCTOR, 10.0);
    for s in 0..5 {
        struggling
            .enrollments
            .push(enrollment(&format!("quit-{s}"), 0, false, 8));
    }
    let mut healthy = course("healthy", INSTRUCTOR, 10.0);
    for s in 0..5 {
        healthy
            .enrollments
            .push(enrollment(&format!("grad-{s}"), 100, true, 8));
    }

    let pool = setup_test_db().await;
    let service = service_with(vec![healthy, struggling], pool);
    let report = service
        .teacher_overview(INSTRUCTOR, TimeRange::Month, fixed_now())
        .await
        .expect("Failed to build report");

    let flagged: Vec<&str> = report
        .data
        .courses
        .needs_attention
        .iter()
        .map(|c| c.course_id.as_str())
        .collect();
    assert_eq!(flagged, vec!["struggling"]);
}

#[tokio::test]
async fn course_analytics_reports_content_and_reviews() {
    let mut c = course("course-1", INSTRUCTOR, 40.0);
    c.sections.push(Section {
        id: "sec-1".to_string(),
        title: "Getting Started".to_string(),
        lessons: vec![
            Lesson {
                id: "les-1".to_string(),
                title: "Intro".to_string(),
                duration_minutes: 10,
            },
            Lesson {
                id: "les-2".to_string(),
                title: "Setup".to_string(),
                duration_minutes: 25,
            },
        ],
    });
    c.enrollments.push(enrollment("s1", 100, true, 3));
    c.enrollments.push(enrollment("s2", 50, false, 3));
    c.ratings.push(rating("s1", 5, Some("Loved it")));
    c.ratings.push(rating("s2", 4, None));

    let pool = setup_test_db().await;
    let service = service_with(vec![c], pool);
    let report = service
        .course_analytics(INSTRUCTOR, "course-1", TimeRange::Week, fixed_now())
        .await
        .expect("Failed to build report");

    let data = report.data;
    assert_eq!(data.overview.total_students, 2);
    assert_eq!(data.overview.total_revenue, 80.0);
    assert_eq!(data.overview.average_rating, 4.5);
    assert_eq!(data.content.total_lessons, 2);
    assert_eq!(data.content.total_duration_minutes, 35);
    // Only ratings carrying review text are listed.
    assert_eq!(data.recent_reviews.len(), 1);
    assert_eq!(data.recent_reviews[0].review, "Loved it");
    assert_eq!(data.enrollment_trend.len(), 7);
}

#[tokio::test]
async fn course_analytics_rejects_foreign_instructor() {
    let foreign = course("course-1", "someone-else", 10.0);
    let pool = setup_test_db().await;
    let service = service_with(vec![foreign], pool);

    let err = service
        .course_analytics(INSTRUCTOR, "course-1", TimeRange::Month, fixed_now())
        .await
        .expect_err("Ownership check must reject");
    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn course_analytics_maps_missing_course_to_not_found() {
    let pool = setup_test_db().await;
    let service = service_with(Vec::new(), pool);

    let err = service
        .course_analytics(INSTRUCTOR, "no-such-course", TimeRange::Month, fixed_now())
        .await
        .expect_err("Unknown course must be a not-found error");
    assert!(matches!(err, AppError::NotFound));
}

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{Course, CourseStatus, Enrollment, Lesson, Rating, Section};

#[derive(Debug, Deserialize)]
pub struct CourseListResponse {
    pub courses: Vec<CourseDoc>,
}

/// Course document as the catalog service stores it. The stored rollup
/// fields (`totalEnrollments`, `averageRating`) are accepted so older
/// documents deserialize, but the engine recomputes both from the raw
/// collections and never reads them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDoc {
    pub id: String,
    pub instructor_id: String,
    pub title: String,
    #[serde(default)]
    pub price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub sections: Vec<SectionDoc>,
    #[serde(default)]
    pub enrollments: Vec<EnrollmentDoc>,
    #[serde(default)]
    pub ratings: Vec<RatingDoc>,
    #[serde(default)]
    pub total_enrollments: Option<i64>,
    #[serde(default)]
    pub average_rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDoc {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<LessonDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDoc {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub duration_minutes: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDoc {
    pub student_id: String,
    #[serde(default)]
    pub student_name: String,
    pub enrolled_at: DateTime<Utc>,
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lesson_completions: Vec<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingDoc {
    pub student_id: String,
    #[serde(default)]
    pub student_name: String,
    pub rating: i64,
    #[serde(default)]
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CourseDoc {
    /// Maps a stored document into the domain model, normalizing the fields
    /// the analytics invariants depend on: progress clamped to 0..=100 (and
    /// forced to 100 when completed), ratings clamped to 1..=5.
    pub fn into_course(self) -> Result<Course, AppError> {
        let status = match self.status.as_str() {
            "draft" => CourseStatus::Draft,
            "published" => CourseStatus::Published,
            "archived" => CourseStatus::Archived,
            other => {
                return Err(AppError::BadRequest(format!(
                    "Unknown course status: {other}"
                )));
            }
        };

        let enrollments = self
            .enrollments
            .into_iter()
            .map(|e| Enrollment {
                student_id: e.student_id,
                student_name: e.student_name,
                enrolled_at: e.enrolled_at,
                progress: if e.completed {
                    100
                } else {
                    e.progress.clamp(0, 100)
                },
                completed: e.completed,
                completed_at: e.completed_at,
                lesson_completions: e.lesson_completions,
            })
            .collect();

        let ratings = self
            .ratings
            .into_iter()
            .map(|r| Rating {
                student_id: r.student_id,
                student_name: r.student_name,
                rating: r.rating.clamp(1, 5),
                review: r.review,
                created_at: r.created_at,
            })
            .collect();

        let sections = self
            .sections
            .into_iter()
            .map(|s| Section {
                id: s.id,
                title: s.title,
                lessons: s
                    .lessons
                    .into_iter()
                    .map(|l| Lesson {
                        id: l.id,
                        title: l.title,
                        duration_minutes: l.duration_minutes.max(0),
                    })
                    .collect(),
            })
            .collect();

        Ok(Course {
            id: self.id,
            instructor_id: self.instructor_id,
            title: self.title,
            price: self.price.max(0.0),
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            sections,
            enrollments,
            ratings,
        })
    }
}

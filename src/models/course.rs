use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub student_id: String,
    pub student_name: String,
    pub enrolled_at: DateTime<Utc>,
    /// Progress through the course in percent, clamped to 0..=100 at the
    /// catalog boundary. `completed == true` implies `progress == 100`.
    pub progress: i64,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lesson_completions: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub student_id: String,
    pub student_name: String,
    /// Star rating clamped to 1..=5 at the catalog boundary.
    pub rating: i64,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub instructor_id: String,
    pub title: String,
    pub price: f64,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sections: Vec<Section>,
    pub enrollments: Vec<Enrollment>,
    pub ratings: Vec<Rating>,
}

impl Course {
    /// Enrollment count is always derived from the collection; any stored
    /// counter in the source document is ignored.
    pub fn total_enrollments(&self) -> usize {
        self.enrollments.len()
    }

    /// Revenue to date under the simplified model: price times enrollment
    /// count, ignoring refunds and discounts.
    pub fn revenue(&self) -> f64 {
        self.price * self.enrollments.len() as f64
    }

    pub fn total_lessons(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }

    pub fn total_duration_minutes(&self) -> i64 {
        self.sections
            .iter()
            .flat_map(|s| s.lessons.iter())
            .map(|l| l.duration_minutes)
            .sum()
    }
}

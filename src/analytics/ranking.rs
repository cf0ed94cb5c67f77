use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::metrics;
use crate::models::{Course, CourseStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Filters, sorts and slices a projected entity list. Ties on the primary
/// metric are broken by identity ascending so repeated calls over the same
/// input return the same order. Returns fewer than `limit` entries (possibly
/// none) without error.
pub fn rank<T>(
    items: Vec<T>,
    metric: impl Fn(&T) -> f64,
    identity: impl Fn(&T) -> &str,
    order: SortOrder,
    limit: usize,
    filter: Option<&dyn Fn(&T) -> bool>,
) -> Vec<T> {
    let mut kept: Vec<T> = match filter {
        Some(predicate) => items.into_iter().filter(|item| predicate(item)).collect(),
        None => items,
    };

    kept.sort_by(|a, b| {
        let primary = match order {
            SortOrder::Descending => metric(b).partial_cmp(&metric(a)),
            SortOrder::Ascending => metric(a).partial_cmp(&metric(b)),
        }
        .unwrap_or(Ordering::Equal);
        primary.then_with(|| identity(a).cmp(identity(b)))
    });
    kept.truncate(limit);
    kept
}

/// Flat per-course record carrying the metrics the ranked views display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStanding {
    pub course_id: String,
    pub title: String,
    pub status: CourseStatus,
    pub students: usize,
    pub revenue: f64,
    pub average_rating: f64,
    pub total_ratings: usize,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStanding {
    pub student_id: String,
    pub student_name: String,
    pub courses_enrolled: usize,
    pub courses_completed: usize,
    pub average_progress: f64,
}

pub fn course_standings(courses: &[Course]) -> Vec<CourseStanding> {
    courses
        .iter()
        .map(|c| {
            let completed = metrics::count(&c.enrollments, |e| e.completed) as f64;
            CourseStanding {
                course_id: c.id.clone(),
                title: c.title.clone(),
                status: c.status,
                students: c.total_enrollments(),
                revenue: metrics::round2(c.revenue()),
                average_rating: metrics::round2(metrics::average(&c.ratings, |r| {
                    r.rating as f64
                })),
                total_ratings: c.ratings.len(),
                completion_rate: metrics::percentage(completed, c.enrollments.len() as f64),
            }
        })
        .collect()
}

/// Groups every enrollment in scope by student. A BTreeMap keeps the
/// pre-rank ordering stable across calls.
pub fn student_standings(courses: &[Course]) -> Vec<StudentStanding> {
    let mut grouped: BTreeMap<String, (String, Vec<(i64, bool)>)> = BTreeMap::new();
    for course in courses {
        for enrollment in &course.enrollments {
            let entry = grouped
                .entry(enrollment.student_id.clone())
                .or_insert_with(|| (enrollment.student_name.clone(), Vec::new()));
            entry.1.push((enrollment.progress, enrollment.completed));
        }
    }

    grouped
        .into_iter()
        .map(|(student_id, (student_name, enrollments))| StudentStanding {
            student_id,
            student_name,
            courses_enrolled: enrollments.len(),
            courses_completed: metrics::count(&enrollments, |(_, completed)| *completed),
            average_progress: metrics::round2(metrics::average(&enrollments, |(progress, _)| {
                *progress as f64
            })),
        })
        .collect()
}

/// A published course is flagged when its students are not finishing or its
/// raters are unhappy. Courses with no enrollments (or no ratings) are not
/// flagged on the corresponding axis.
pub fn needs_attention(standing: &CourseStanding) -> bool {
    if standing.status != CourseStatus::Published {
        return false;
    }
    let low_completion = standing.students > 0 && standing.completion_rate < 50.0;
    let low_rating = standing.total_ratings > 0 && standing.average_rating < 3.5;
    low_completion || low_rating
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::{Enrollment, Rating};

    #[derive(Debug, Clone)]
    struct Entity {
        id: String,
        value: f64,
    }

    fn entity(id: &str, value: f64) -> Entity {
        Entity {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn rank_sorts_descending_and_truncates() {
        let items = vec![
            entity("a", 500.0),
            entity("b", 0.0),
            entity("c", 300.0),
            entity("d", 900.0),
            entity("e", 300.0),
        ];
        let ranked = rank(items, |i| i.value, |i| i.id.as_str(), SortOrder::Descending, 3, None);
        let ids: Vec<&str> = ranked.iter().map(|i| i.id.as_str()).collect();
        // The two 300-revenue entities tie; "c" wins on identity ascending.
        assert_eq!(ids, vec!["d", "a", "c"]);
    }

    #[test]
    fn rank_is_reproducible_for_equal_metrics() {
        let items = vec![entity("z", 10.0), entity("m", 10.0), entity("a", 10.0)];
        let first = rank(
            items.clone(),
            |i| i.value,
            |i| i.id.as_str(),
            SortOrder::Descending,
            10,
            None,
        );
        let second = rank(items, |i| i.value, |i| i.id.as_str(), SortOrder::Descending, 10, None);
        let first_ids: Vec<&str> = first.iter().map(|i| i.id.as_str()).collect();
        let second_ids: Vec<&str> = second.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(first_ids, vec!["a", "m", "z"]);
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn rank_applies_filter_before_limit() {
        let items = vec![entity("a", 5.0), entity("b", 80.0), entity("c", 3.0)];
        let low_only = |i: &Entity| i.value < 10.0;
        let ranked = rank(
            items,
            |i| i.value,
            |i| i.id.as_str(),
            SortOrder::Ascending,
            2,
            Some(&low_only),
        );
        let ids: Vec<&str> = ranked.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn rank_of_empty_input_is_empty() {
        let ranked = rank(
            Vec::<Entity>::new(),
            |i| i.value,
            |i| i.id.as_str(),
            SortOrder::Descending,
            5,
            None,
        );
        assert!(ranked.is_empty());
    }

    fn course_with(
        id: &str,
        status: CourseStatus,
        enrollments: Vec<Enrollment>,
        ratings: Vec<Rating>,
    ) -> Course {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Course {
            id: id.to_string(),
            instructor_id: "instructor-1".to_string(),
            title: format!("Course {id}"),
            price: 20.0,
            status,
            created_at: ts,
            updated_at: ts,
            sections: Vec::new(),
            enrollments,
            ratings,
        }
    }

    fn enrollment(student: &str, progress: i64, completed: bool) -> Enrollment {
        Enrollment {
            student_id: student.to_string(),
            student_name: format!("Student {student}"),
            enrolled_at: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            progress,
            completed,
            completed_at: None,
            lesson_completions: Vec::new(),
        }
    }

    fn rating(student: &str, stars: i64) -> Rating {
        Rating {
            student_id: student.to_string(),
            student_name: format!("Student {student}"),
            rating: stars,
            review: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn student_standings_group_across_courses() {
        let courses = vec![
            course_with(
                "a",
                CourseStatus::Published,
                vec![enrollment("s1", 100, true), enrollment("s2", 40, false)],
                Vec::new(),
            ),
            course_with(
                "b",
                CourseStatus::Published,
                vec![enrollment("s1", 20, false)],
                Vec::new(),
            ),
        ];
        let standings = student_standings(&courses);
        assert_eq!(standings.len(), 2);
        let s1 = standings.iter().find(|s| s.student_id == "s1").unwrap();
        assert_eq!(s1.courses_enrolled, 2);
        assert_eq!(s1.courses_completed, 1);
        assert_eq!(s1.average_progress, 60.0);
    }

    #[test]
    fn needs_attention_flags_low_completion_or_low_rating() {
        let struggling = course_with(
            "a",
            CourseStatus::Published,
            vec![enrollment("s1", 0, false), enrollment("s2", 100, true)],
            Vec::new(),
        );
        let poorly_rated = course_with(
            "b",
            CourseStatus::Published,
            vec![enrollment("s3", 100, true)],
            vec![rating("s3", 2)],
        );
        let healthy = course_with(
            "c",
            CourseStatus::Published,
            vec![enrollment("s4", 100, true)],
            vec![rating("s4", 5)],
        );
        // No enrollments and no ratings: nothing to judge yet.
        let unlaunched = course_with("d", CourseStatus::Published, Vec::new(), Vec::new());
        let draft = course_with(
            "e",
            CourseStatus::Draft,
            vec![enrollment("s5", 0, false)],
            Vec::new(),
        );

        let standings =
            course_standings(&[struggling, poorly_rated, healthy, unlaunched, draft]);
        let flagged: Vec<&str> = standings
            .iter()
            .filter(|s| needs_attention(s))
            .map(|s| s.course_id.as_str())
            .collect();
        assert_eq!(flagged, vec!["a", "b"]);
    }
}

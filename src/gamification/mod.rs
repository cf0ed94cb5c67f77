pub mod streak;

use serde::Serialize;

use crate::metrics;
use crate::models::Course;

/// Cumulative counters for one instructor, derived from the raw course
/// collection on every evaluation. All rule outputs below are pure
/// functions of this snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InstructorCounters {
    pub total_students: u64,
    pub total_courses: u64,
    pub rating_sum: u64,
    pub rating_count: u64,
}

impl InstructorCounters {
    pub fn from_courses(courses: &[Course]) -> Self {
        Self {
            total_students: courses.iter().map(|c| c.enrollments.len() as u64).sum(),
            total_courses: courses.len() as u64,
            rating_sum: courses
                .iter()
                .flat_map(|c| c.ratings.iter())
                .map(|r| r.rating as u64)
                .sum(),
            rating_count: courses.iter().map(|c| c.ratings.len() as u64).sum(),
        }
    }

    pub fn average_rating(&self) -> f64 {
        metrics::ratio(self.rating_sum as f64, self.rating_count as f64)
    }
}

/// Level is a non-decreasing function of the counters: each term grows (or
/// stays flat) when its counter grows, holding the others fixed.
pub fn level(counters: &InstructorCounters) -> u32 {
    let points = experience(counters) as f64 + counters.average_rating() * 20.0;
    (points / 1000.0).floor() as u32 + 1
}

pub fn experience(counters: &InstructorCounters) -> u64 {
    counters.total_students * 10 + counters.total_courses * 100
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub earned: bool,
}

struct AchievementRule {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    earned: fn(&InstructorCounters) -> bool,
}

/// Fixed, ordered rule list. Each predicate is evaluated independently
/// against the current counters; "earned" is its truth value at evaluation
/// time, so re-evaluating an unchanged snapshot yields identical results.
const ACHIEVEMENT_RULES: &[AchievementRule] = &[
    AchievementRule {
        id: "first-course",
        name: "First Course",
        description: "Create your first course",
        earned: |c| c.total_courses >= 1,
    },
    AchievementRule {
        id: "course-creator",
        name: "Course Creator",
        description: "Create five courses",
        earned: |c| c.total_courses >= 5,
    },
    AchievementRule {
        id: "course-factory",
        name: "Course Factory",
        description: "Create ten courses",
        earned: |c| c.total_courses >= 10,
    },
    AchievementRule {
        id: "hundred-students",
        name: "Hundred Club",
        description: "Teach one hundred students",
        earned: |c| c.total_students >= 100,
    },
    AchievementRule {
        id: "thousand-students",
        name: "Full House",
        description: "Teach one thousand students",
        earned: |c| c.total_students >= 1000,
    },
    AchievementRule {
        id: "crowd-pleaser",
        name: "Crowd Pleaser",
        description: "Hold a 4.0 average over fifty ratings",
        earned: |c| c.rating_count >= 50 && c.average_rating() >= 4.0,
    },
];

pub fn achievements(counters: &InstructorCounters) -> Vec<Achievement> {
    ACHIEVEMENT_RULES
        .iter()
        .map(|rule| Achievement {
            id: rule.id,
            name: rule.name,
            description: rule.description,
            earned: (rule.earned)(counters),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
}

/// Badges currently held, derived from rating quality and catalog size.
/// Unlike achievements the list only contains what is earned right now.
pub fn badges(counters: &InstructorCounters) -> Vec<Badge> {
    let mut earned = Vec::new();
    if counters.total_courses >= 3 {
        earned.push(Badge {
            id: "course-builder",
            name: "Course Builder",
        });
    }
    if counters.total_courses >= 10 {
        earned.push(Badge {
            id: "prolific-creator",
            name: "Prolific Creator",
        });
    }
    if counters.rating_count >= 5 && counters.average_rating() >= 4.0 {
        earned.push(Badge {
            id: "quality-teacher",
            name: "Quality Teacher",
        });
    }
    if counters.rating_count >= 10 && counters.average_rating() >= 4.5 {
        earned.push(Badge {
            id: "community-favorite",
            name: "Community Favorite",
        });
    }
    earned
}
